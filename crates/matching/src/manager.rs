use std::{
    collections::{BTreeMap, HashMap, HashSet},
    convert::identity,
    sync::Arc,
    time::Duration,
};

use db::{
    relation::{self, RelationKind},
    user, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionErrorExt, TransactionTrait,
};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::{
    notification,
    oracle::{OracleError, RankingOracle, Registration},
    profile::{ProfileChanges, ProfileField, ProfileView, ShownFields},
    relation::RelationSet,
    rules::Interest,
    Actor, Page, RelationshipError,
};

/// Candidate pool narrowing rules for recommendations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationPolicy {
    /// Only propose users whose gender differs from the actor's gender.
    pub opposite_gender: bool,

    /// Only propose users from the actor's region, if the actor has one.
    pub narrow_by_region: bool,

    /// Max time to wait for the ranking service.
    pub timeout: Duration,

    /// Recommendation count used when none was requested.
    pub default_count: u64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            opposite_gender: true,
            narrow_by_region: true,
            timeout: Duration::from_secs(10),
            default_count: 10,
        }
    }
}

impl From<&common::config::Recommendation> for RecommendationPolicy {
    fn from(config: &common::config::Recommendation) -> Self {
        Self {
            opposite_gender: config.opposite_gender,
            narrow_by_region: config.narrow_by_region,
            timeout: Duration::from_secs(config.timeout),
            default_count: config.default_count,
        }
    }
}

/// Result of a like operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    /// Both users like each other now.
    pub matched: bool,
}

/// Relationship manager.
///
/// Owns every mutation of user relations and keeps them consistent:
/// a skip purges positive relations, a retracted like dissolves a match,
/// and a mutual like forms exactly one match.
pub struct RelationshipManager {
    db: Arc<DatabaseConnection>,
    oracle: Arc<dyn RankingOracle>,
    policy: RecommendationPolicy,
}

impl RelationshipManager {
    pub fn new(
        db: Arc<DatabaseConnection>,
        oracle: Arc<dyn RankingOracle>,
        policy: RecommendationPolicy,
    ) -> Self {
        Self { db, oracle, policy }
    }

    /// Like the target user, forming a match if the target likes the actor back.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn like(
        &self,
        actor: &Actor,
        target: &str,
    ) -> Result<LikeOutcome, RelationshipError> {
        self.assert_interest(actor, target, Interest::Like)
            .await
            .map(|matched| LikeOutcome { matched })
    }

    /// Retract a like, dissolving a match if there was one.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn unlike(&self, actor: &Actor, target: &str) -> Result<(), RelationshipError> {
        self.retract_interest(actor, target, Interest::Like).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn star(&self, actor: &Actor, target: &str) -> Result<(), RelationshipError> {
        self.assert_interest(actor, target, Interest::Star)
            .await
            .map(drop)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn unstar(&self, actor: &Actor, target: &str) -> Result<(), RelationshipError> {
        self.retract_interest(actor, target, Interest::Star).await
    }

    /// Skip the target user, purging every positive relation towards them.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn skip(&self, actor: &Actor, target: &str) -> Result<(), RelationshipError> {
        self.assert_interest(actor, target, Interest::Skip)
            .await
            .map(drop)
    }

    /// Retract a skip. Relations purged by the skip are not restored.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn unskip(&self, actor: &Actor, target: &str) -> Result<(), RelationshipError> {
        self.retract_interest(actor, target, Interest::Skip).await
    }

    /// List profiles of users the actor is related to, newest relations first.
    pub async fn related(
        &self,
        actor: &Actor,
        kind: RelationKind,
        page: Option<Page>,
    ) -> Result<Vec<ProfileView>, RelationshipError> {
        let db = &*self.db;

        ensure_actor(db, actor.id).await?;

        let ids = RelationSet(kind).list_from(db, actor.id, page).await?;

        Ok(load_ordered(db, &ids)
            .await?
            .into_iter()
            .map(|model| ProfileView::for_viewer(actor, model))
            .collect())
    }

    /// Count users the actor is related to.
    pub async fn related_count(
        &self,
        actor: &Actor,
        kind: RelationKind,
    ) -> Result<u64, RelationshipError> {
        let db = &*self.db;

        ensure_actor(db, actor.id).await?;

        Ok(RelationSet(kind).count_from(db, actor.id).await?)
    }

    /// Recommend users to the actor.
    ///
    /// Candidates are ranked by the ranking service, and recommended users
    /// are recorded into the actor's recommendation history only after
    /// the ranking succeeded. Recommended profiles are public views, even
    /// for administrators.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn recommend(
        &self,
        actor: &Actor,
        desired_count: Option<u64>,
    ) -> Result<Vec<ProfileView>, RelationshipError> {
        let db = &*self.db;

        let count = desired_count.unwrap_or(self.policy.default_count);
        let count = usize::try_from(count).unwrap_or(usize::MAX);

        let actor_model = ensure_actor(db, actor.id).await?;
        let pool = self.candidate_pool(db, &actor_model).await?;

        if pool.is_empty() || count == 0 {
            debug!("no recommendation candidates");
            return Ok(Vec::new());
        }

        let ranking = timeout(self.policy.timeout, self.oracle.rank(actor.id, &pool))
            .await
            .map_err(|_| OracleError::Timeout)
            .and_then(identity)
            .map_err(|err| {
                warn!(%err, candidates = pool.len(), "unable to rank candidates");
                RelationshipError::RecommendationUnavailable(err)
            })?;

        let pool: HashSet<i64> = pool.into_iter().collect();
        let mut seen = HashSet::new();

        let chosen: Vec<i64> = ranking
            .into_iter()
            .filter(|id| pool.contains(id) && seen.insert(*id))
            .take(count)
            .collect();

        let actor_id = actor.id;

        self.db
            .transaction::<_, _, RelationshipError>(|txn| {
                Box::pin(async move {
                    let recommended = RelationSet(RelationKind::Recommend);

                    for &id in &chosen {
                        recommended.add(txn, actor_id, id).await?;
                    }

                    debug!(count = chosen.len(), "recommendations recorded");

                    Ok(load_ordered(txn, &chosen)
                        .await?
                        .into_iter()
                        .map(ProfileView::public)
                        .collect())
                })
            })
            .await
            .into_raw_result()
    }

    /// Get a profile as the viewer is allowed to see it.
    pub async fn profile(
        &self,
        viewer: &Actor,
        username: &str,
    ) -> Result<ProfileView, RelationshipError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .map(|model| ProfileView::for_viewer(viewer, model))
            .ok_or(RelationshipError::ProfileNotVisible)
    }

    /// Change which profile attributes the actor shows to other users.
    ///
    /// Returns visibility of every attribute after the change.
    #[instrument(skip(self, actor, changes), fields(actor = %actor.username))]
    pub async fn update_shown_fields(
        &self,
        actor: &Actor,
        changes: BTreeMap<ProfileField, bool>,
    ) -> Result<BTreeMap<ProfileField, bool>, RelationshipError> {
        let actor_id = actor.id;

        self.db
            .transaction::<_, _, RelationshipError>(|txn| {
                Box::pin(async move {
                    let model = user::Entity::find_by_id(actor_id)
                        .filter(user::Column::IsDeleted.eq(false))
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(RelationshipError::InactiveActor)?;

                    let shown = ShownFields::from_bits(model.shown_fields).apply(&changes);

                    user::Entity::update(user::ActiveModel {
                        id: ActiveValue::Unchanged(actor_id),
                        shown_fields: ActiveValue::Set(shown.bits()),
                        updated_at: ActiveValue::Set(db::now()),
                        ..Default::default()
                    })
                    .exec(txn)
                    .await?;

                    Ok(shown.to_map())
                })
            })
            .await
            .into_raw_result()
    }

    /// Edit profile attributes of the provided user.
    ///
    /// Users may edit their own profile, administrators may edit any profile.
    /// With `register` set, the updated profile is registered with the ranking
    /// service once the update is stored; a failed registration is logged and
    /// does not undo the update.
    #[instrument(skip(self, actor, changes), fields(actor = %actor.username))]
    pub async fn update_profile(
        &self,
        actor: &Actor,
        username: &str,
        changes: ProfileChanges,
        register: bool,
    ) -> Result<ProfileView, RelationshipError> {
        let viewer = actor.clone();
        let username = username.to_owned();

        let model = self
            .db
            .transaction::<_, _, RelationshipError>(|txn| {
                Box::pin(async move {
                    let target = managed_account(txn, &viewer, &username).await?;

                    let model = user::Entity::update(changes.into_active_model(target.id))
                        .exec(txn)
                        .await?;

                    debug!(target = %model.username, "profile updated");

                    Ok(model)
                })
            })
            .await
            .into_raw_result()?;

        if register {
            let registration = Registration::from(&model);

            match timeout(self.policy.timeout, self.oracle.register(&registration)).await {
                Ok(Ok(())) => debug!(target = %model.username, "profile registered"),
                Ok(Err(err)) => warn!(%err, "unable to register profile"),
                Err(_) => warn!(err = %OracleError::Timeout, "unable to register profile"),
            }
        }

        Ok(ProfileView::for_viewer(actor, model))
    }

    /// List every account that was not deleted, for administrators only.
    pub async fn list_users(
        &self,
        actor: &Actor,
        page: Option<Page>,
    ) -> Result<Vec<ProfileView>, RelationshipError> {
        if !actor.is_admin() {
            return Err(RelationshipError::NotPermitted);
        }

        let mut query = user::Entity::find()
            .filter(user::Column::IsDeleted.eq(false))
            .order_by_asc(user::Column::Id);

        if let Some(page) = page {
            query = query.offset(page.offset).limit(page.limit);
        }

        Ok(query
            .all(&*self.db)
            .await?
            .into_iter()
            .map(ProfileView::full)
            .collect())
    }

    /// Soft-delete an account.
    ///
    /// Relations of a deleted user are kept, but are no longer visible to anyone.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn delete_account(
        &self,
        actor: &Actor,
        username: &str,
    ) -> Result<(), RelationshipError> {
        let actor = actor.clone();
        let username = username.to_owned();

        self.db
            .transaction::<_, _, RelationshipError>(|txn| {
                Box::pin(async move {
                    let target = managed_account(txn, &actor, &username).await?;

                    user::Entity::update(user::ActiveModel {
                        id: ActiveValue::Unchanged(target.id),
                        is_deleted: ActiveValue::Set(true),
                        updated_at: ActiveValue::Set(db::now()),
                        ..Default::default()
                    })
                    .exec(txn)
                    .await?;

                    info!(target = %target.username, "account deleted");

                    Ok(())
                })
            })
            .await
            .into_raw_result()
    }

    /// Deactivate an account, making it unavailable as a relation target.
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn ban(&self, actor: &Actor, username: &str) -> Result<(), RelationshipError> {
        if !actor.is_admin() {
            return Err(RelationshipError::NotPermitted);
        }

        let updated = user::Entity::update_many()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsDeleted.eq(false))
            .col_expr(user::Column::IsActivated, false.into())
            .col_expr(user::Column::UpdatedAt, db::now().into())
            .exec(&*self.db)
            .await?;

        if updated.rows_affected == 0 {
            return Err(RelationshipError::TargetNotFound);
        }

        info!("account banned");

        Ok(())
    }

    async fn assert_interest(
        &self,
        actor: &Actor,
        target: &str,
        interest: Interest,
    ) -> Result<bool, RelationshipError> {
        let actor = actor.clone();
        let target = target.to_owned();

        self.db
            .transaction::<_, _, RelationshipError>(|txn| {
                Box::pin(async move {
                    let (actor, target) = prepare(txn, &actor, &target).await?;

                    if !RelationSet(interest.kind())
                        .add(txn, actor.id, target.id)
                        .await?
                    {
                        return Err(interest.already_present());
                    }

                    for &kind in interest.clears_on_assert() {
                        RelationSet(kind).remove(txn, actor.id, target.id).await?;
                    }

                    debug!(kind = ?interest.kind(), target = %target.username, "relation added");

                    if interest != Interest::Like {
                        return Ok(false);
                    }

                    let reciprocal = RelationSet(RelationKind::Like)
                        .contains(txn, target.id, actor.id)
                        .await?;

                    if reciprocal {
                        form_match(txn, &actor, &target).await?;
                    }

                    Ok(reciprocal)
                })
            })
            .await
            .into_raw_result()
    }

    async fn retract_interest(
        &self,
        actor: &Actor,
        target: &str,
        interest: Interest,
    ) -> Result<(), RelationshipError> {
        let actor = actor.clone();
        let target = target.to_owned();

        self.db
            .transaction::<_, _, RelationshipError>(|txn| {
                Box::pin(async move {
                    let (actor, target) = prepare(txn, &actor, &target).await?;

                    if !RelationSet(interest.kind())
                        .remove(txn, actor.id, target.id)
                        .await?
                    {
                        return Err(interest.not_present());
                    }

                    for &kind in interest.clears_on_retract() {
                        RelationSet(kind).remove(txn, actor.id, target.id).await?;
                    }

                    debug!(kind = ?interest.kind(), target = %target.username, "relation removed");

                    Ok(())
                })
            })
            .await
            .into_raw_result()
    }

    /// Identifiers of users that may be recommended to the provided user.
    async fn candidate_pool<C: ConnectionTrait>(
        &self,
        db: &C,
        actor: &user::Model,
    ) -> Result<Vec<i64>, DbErr> {
        let excluded: Vec<i64> = relation::Entity::find()
            .select_only()
            .column(relation::Column::ToUserId)
            .filter(relation::Column::FromUserId.eq(actor.id))
            .filter(relation::Column::Kind.is_in([
                RelationKind::Skip,
                RelationKind::Like,
                RelationKind::Star,
            ]))
            .into_tuple()
            .all(db)
            .await?;

        let mut query = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(user::Column::IsActivated.eq(true))
            .filter(user::Column::IsDeleted.eq(false))
            .filter(user::Column::Id.ne(actor.id))
            .filter(user::Column::Id.is_not_in(excluded));

        if self.policy.opposite_gender {
            if let Some(gender) = &actor.gender {
                query = query.filter(user::Column::Gender.ne(gender.as_str()));
            }
        }

        if self.policy.narrow_by_region && actor.location.is_some() {
            if let Some(region_code) = &actor.region_code {
                query = query.filter(user::Column::RegionCode.eq(region_code.as_str()));
            }
        }

        query
            .order_by_asc(user::Column::Id)
            .into_tuple()
            .all(db)
            .await
    }
}

/// Check preconditions shared by relation mutations and lock both users.
///
/// Returns models of the actor and the target.
async fn prepare<C: ConnectionTrait>(
    txn: &C,
    actor: &Actor,
    target: &str,
) -> Result<(user::Model, user::Model), RelationshipError> {
    let actor = user::Entity::find_by_id(actor.id)
        .filter(user::Column::IsDeleted.eq(false))
        .filter(user::Column::IsVerified.eq(true))
        .one(txn)
        .await?
        .ok_or(RelationshipError::InactiveActor)?;

    if actor.username == target {
        return Err(RelationshipError::InvalidTarget);
    }

    let target = user::Entity::find()
        .filter(user::Column::Username.eq(target))
        .filter(user::Column::IsActivated.eq(true))
        .filter(user::Column::IsDeleted.eq(false))
        .one(txn)
        .await?
        .ok_or(RelationshipError::TargetNotFound)?;

    lock_pair(txn, actor.id, target.id).await?;

    Ok((actor, target))
}

/// Lock rows of both users in ascending identifier order.
///
/// Mutations touching the same pair of users are serialized this way,
/// independently of which of them is acting.
async fn lock_pair<C: ConnectionTrait>(txn: &C, first: i64, second: i64) -> Result<(), DbErr> {
    for id in [first.min(second), first.max(second)] {
        user::Entity::find_by_id(id)
            .select_only()
            .column(user::Column::Id)
            .lock_exclusive()
            .into_tuple::<i64>()
            .one(txn)
            .await?;
    }

    Ok(())
}

/// Form a match between two users and notify both of them.
///
/// Nothing happens if the match already exists.
async fn form_match<C: ConnectionTrait>(
    txn: &C,
    actor: &user::Model,
    target: &user::Model,
) -> Result<(), DbErr> {
    if !RelationSet(RelationKind::Match)
        .add(txn, actor.id, target.id)
        .await?
    {
        return Ok(());
    }

    notification::enqueue(txn, actor.id, notification::match_text(&target.username)).await?;
    notification::enqueue(txn, target.id, notification::match_text(&actor.username)).await?;

    info!(target = %target.username, "match formed");

    Ok(())
}

/// Load the acting user, unless the account was deleted.
async fn ensure_actor<C: ConnectionTrait>(
    db: &C,
    actor_id: i64,
) -> Result<user::Model, RelationshipError> {
    user::Entity::find_by_id(actor_id)
        .filter(user::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or(RelationshipError::InactiveActor)
}

/// Load the account the actor wants to manage, locking it.
async fn managed_account<C: ConnectionTrait>(
    txn: &C,
    actor: &Actor,
    username: &str,
) -> Result<user::Model, RelationshipError> {
    ensure_actor(txn, actor.id).await?;

    if actor.username != username && !actor.is_admin() {
        return Err(RelationshipError::NotPermitted);
    }

    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::IsDeleted.eq(false))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(RelationshipError::ProfileNotVisible)
}

/// Load non-deleted users, preserving the order of provided identifiers.
async fn load_ordered<C: ConnectionTrait>(
    db: &C,
    ids: &[i64],
) -> Result<Vec<user::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut models: HashMap<i64, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids.iter().copied()))
        .filter(user::Column::IsDeleted.eq(false))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    Ok(ids.iter().filter_map(|id| models.remove(id)).collect())
}
