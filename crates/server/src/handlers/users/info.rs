use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use matching::{profile::ProfileView, Actor, RelationshipManager};

use super::error::RelationshipRequestError;

/// User profile handler.
///
/// Hidden attributes of other users are omitted from the response.
pub(super) async fn info(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileView>, RelationshipRequestError> {
    Ok(Json(manager.profile(&actor, &username).await?))
}
