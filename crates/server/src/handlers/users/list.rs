use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use matching::{profile::ProfileView, Actor, RelationshipManager};

use super::error::RelationshipRequestError;
use crate::pagination::Pagination;

/// User list handler, available to administrators only.
///
/// Lists every account that was not deleted, in registration order.
pub(super) async fn list(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ProfileView>>, RelationshipRequestError> {
    Ok(Json(manager.list_users(&actor, pagination.page()).await?))
}
