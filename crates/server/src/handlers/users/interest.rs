use std::sync::Arc;

use axum::{Extension, Json};
use matching::{Actor, LikeOutcome, RelationshipManager};
use serde::Deserialize;
use validator::Validate;

use super::error::RelationshipRequestError;
use crate::validation::ValidatedJson;

/// JSON request body pointing at a target user.
#[derive(Deserialize, Validate)]
pub(super) struct TargetRequest {
    /// Target user's username.
    #[validate(regex = "crate::validation::USERNAME")]
    pub(super) username: String,
}

/// Like handler.
///
/// Responds with `matched: true` if the target user likes the current user as well.
pub(super) async fn like(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<Json<LikeOutcome>, RelationshipRequestError> {
    Ok(Json(manager.like(&actor, &request.username).await?))
}

pub(super) async fn unlike(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.unlike(&actor, &request.username).await?)
}

pub(super) async fn star(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.star(&actor, &request.username).await?)
}

pub(super) async fn unstar(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.unstar(&actor, &request.username).await?)
}

pub(super) async fn skip(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.skip(&actor, &request.username).await?)
}

pub(super) async fn unskip(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.unskip(&actor, &request.username).await?)
}
