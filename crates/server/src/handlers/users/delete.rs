use std::sync::Arc;

use axum::{extract::Path, Extension};
use matching::{Actor, RelationshipManager};

use super::error::RelationshipRequestError;

/// Account deletion handler.
pub(super) async fn delete(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    Path(username): Path<String>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.delete_account(&actor, &username).await?)
}
