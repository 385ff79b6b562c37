use db::DbErr;
use derive_more::{Display, Error, From};

use crate::oracle::OracleError;

/// Errors that may occur during relationship operations.
#[derive(Debug, Display, From, Error)]
pub enum RelationshipError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Acting user is missing, deleted or not verified.
    #[display(fmt = "this user is not verified")]
    InactiveActor,

    /// Acting user targeted themselves.
    #[display(fmt = "user can not target themselves")]
    InvalidTarget,

    /// Target user does not exist, was deactivated or deleted.
    #[display(fmt = "target user not found")]
    TargetNotFound,

    #[display(fmt = "target user is already liked")]
    AlreadyLiked,

    #[display(fmt = "target user is already starred")]
    AlreadyStarred,

    #[display(fmt = "target user is already skipped")]
    AlreadySkipped,

    #[display(fmt = "target user is not liked")]
    NotLiked,

    #[display(fmt = "target user is not starred")]
    NotStarred,

    #[display(fmt = "target user is not skipped")]
    NotSkipped,

    /// Acting user may not manage another user's account.
    #[display(fmt = "insufficient permissions")]
    NotPermitted,

    /// Requested profile does not exist or was deleted.
    #[display(fmt = "profile not found")]
    ProfileNotVisible,

    /// Ranking service failed to produce a ranking.
    #[display(fmt = "recommendations are unavailable: {}", _0)]
    RecommendationUnavailable(OracleError),
}

impl RelationshipError {
    /// Check if the error was caused by the request itself,
    /// rather than by a failing dependency.
    pub fn is_client_fault(&self) -> bool {
        !matches!(
            self,
            RelationshipError::DatabaseError(_) | RelationshipError::RecommendationUnavailable(_)
        )
    }
}
