use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use db::relation::RelationKind;
use matching::{profile::ProfileView, Actor, RelationshipManager};
use serde::Serialize;

use super::error::RelationshipRequestError;
use crate::pagination::Pagination;

/// JSON response body with a relation set size.
#[derive(Serialize)]
pub(super) struct CountResponse {
    count: u64,
}

async fn related(
    kind: RelationKind,
    actor: Actor,
    manager: Arc<RelationshipManager>,
    pagination: Pagination,
) -> Result<Json<Vec<ProfileView>>, RelationshipRequestError> {
    Ok(Json(
        manager.related(&actor, kind, pagination.page()).await?,
    ))
}

async fn related_count(
    kind: RelationKind,
    actor: Actor,
    manager: Arc<RelationshipManager>,
) -> Result<Json<CountResponse>, RelationshipRequestError> {
    let count = manager.related_count(&actor, kind).await?;

    Ok(Json(CountResponse { count }))
}

/// Generate listing and counting handlers for a relation kind.
macro_rules! relation_handlers {
    ($($list:ident, $count:ident => $kind:expr;)+) => {
        $(
            pub(super) async fn $list(
                Extension(actor): Extension<Actor>,
                Extension(manager): Extension<Arc<RelationshipManager>>,
                Query(pagination): Query<Pagination>,
            ) -> Result<Json<Vec<ProfileView>>, RelationshipRequestError> {
                related($kind, actor, manager, pagination).await
            }

            pub(super) async fn $count(
                Extension(actor): Extension<Actor>,
                Extension(manager): Extension<Arc<RelationshipManager>>,
            ) -> Result<Json<CountResponse>, RelationshipRequestError> {
                related_count($kind, actor, manager).await
            }
        )+
    };
}

relation_handlers!(
    liked, liked_count => RelationKind::Like;
    starred, starred_count => RelationKind::Star;
    skipped, skipped_count => RelationKind::Skip;
    matched, matched_count => RelationKind::Match;
);
