use db::{
    relation::{self, RelationKind},
    sea_query::OnConflict,
    user, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SelectExt,
};

use crate::Page;

/// Set of relations of a single kind.
///
/// Every operation accepts any connection, thus it can be used both
/// on a plain connection and inside of a transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RelationSet(pub RelationKind);

impl RelationSet {
    /// Add a relation from one user to another.
    ///
    /// Symmetric kinds are added in both directions. Returns `false`
    /// if the relation was already present.
    pub async fn add<C: ConnectionTrait>(&self, db: &C, from: i64, to: i64) -> Result<bool, DbErr> {
        let created_at = db::now();

        let mut entries = vec![self.entry(from, to, created_at)];

        if self.0.is_symmetric() {
            entries.push(self.entry(to, from, created_at));
        }

        let inserted = relation::Entity::insert_many(entries)
            .on_conflict(
                OnConflict::columns([
                    relation::Column::Kind,
                    relation::Column::FromUserId,
                    relation::Column::ToUserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(inserted > 0)
    }

    /// Remove a relation from one user to another.
    ///
    /// Symmetric kinds are removed in both directions. Returns `false`
    /// if there was nothing to remove.
    pub async fn remove<C: ConnectionTrait>(
        &self,
        db: &C,
        from: i64,
        to: i64,
    ) -> Result<bool, DbErr> {
        let mut pair = Condition::any().add(direction(from, to));

        if self.0.is_symmetric() {
            pair = pair.add(direction(to, from));
        }

        let result = relation::Entity::delete_many()
            .filter(relation::Column::Kind.eq(self.0))
            .filter(pair)
            .exec(db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Check if a relation from one user to another is present.
    pub async fn contains<C: ConnectionTrait + Send>(
        &self,
        db: &C,
        from: i64,
        to: i64,
    ) -> Result<bool, DbErr> {
        relation::Entity::find()
            .select_only()
            .filter(relation::Column::Kind.eq(self.0))
            .filter(direction(from, to))
            .exists(db)
            .await
    }

    /// List identifiers of users the provided user is related to,
    /// newest relations first.
    ///
    /// Deleted users are never listed.
    pub async fn list_from<C: ConnectionTrait>(
        &self,
        db: &C,
        from: i64,
        page: Option<Page>,
    ) -> Result<Vec<i64>, DbErr> {
        let mut query = relation::Entity::find()
            .select_only()
            .column(relation::Column::ToUserId)
            .join(JoinType::InnerJoin, relation::Relation::Target.def())
            .filter(relation::Column::Kind.eq(self.0))
            .filter(relation::Column::FromUserId.eq(from))
            .filter(user::Column::IsDeleted.eq(false))
            .order_by_desc(relation::Column::CreatedAt)
            .order_by_desc(relation::Column::Id);

        if let Some(page) = page {
            query = query.offset(page.offset).limit(page.limit);
        }

        query.into_tuple::<i64>().all(db).await
    }

    /// Count users the provided user is related to.
    ///
    /// Deleted users are not counted.
    pub async fn count_from<C: ConnectionTrait>(&self, db: &C, from: i64) -> Result<u64, DbErr> {
        relation::Entity::find()
            .join(JoinType::InnerJoin, relation::Relation::Target.def())
            .filter(relation::Column::Kind.eq(self.0))
            .filter(relation::Column::FromUserId.eq(from))
            .filter(user::Column::IsDeleted.eq(false))
            .count(db)
            .await
    }

    fn entry(
        &self,
        from: i64,
        to: i64,
        created_at: db::PrimitiveDateTime,
    ) -> relation::ActiveModel {
        relation::ActiveModel {
            kind: ActiveValue::Set(self.0),
            from_user_id: ActiveValue::Set(from),
            to_user_id: ActiveValue::Set(to),
            created_at: ActiveValue::Set(created_at),
            ..Default::default()
        }
    }
}

fn direction(from: i64, to: i64) -> Condition {
    Condition::all()
        .add(relation::Column::FromUserId.eq(from))
        .add(relation::Column::ToUserId.eq(to))
}
