use axum::http::StatusCode;
use axum_derive_error::ErrorResponse;
use derive_more::{Display, Error};
use matching::RelationshipError;

/// HTTP representation of relationship errors.
#[derive(ErrorResponse, Display, Error)]
pub(crate) enum RelationshipRequestError {
    /// Database or another internal error.
    Internal(RelationshipError),

    #[status(StatusCode::BAD_REQUEST)]
    Rejected(RelationshipError),

    #[status(StatusCode::FORBIDDEN)]
    Forbidden(RelationshipError),

    #[status(StatusCode::NOT_FOUND)]
    NotFound(RelationshipError),

    #[status(StatusCode::SERVICE_UNAVAILABLE)]
    Unavailable(RelationshipError),
}

impl From<RelationshipError> for RelationshipRequestError {
    fn from(err: RelationshipError) -> Self {
        match err {
            RelationshipError::InactiveActor | RelationshipError::NotPermitted => {
                Self::Forbidden(err)
            }
            RelationshipError::TargetNotFound | RelationshipError::ProfileNotVisible => {
                Self::NotFound(err)
            }
            RelationshipError::RecommendationUnavailable(_) => Self::Unavailable(err),
            _ if err.is_client_fault() => Self::Rejected(err),
            _ => Self::Internal(err),
        }
    }
}
