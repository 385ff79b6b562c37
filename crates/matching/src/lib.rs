//! Relationship management between users.
//!
//! Users express interest in each other with likes and stars, lose interest
//! with skips, and are matched when two users like each other. All of these
//! are stored as directed relations (see [`db::relation`]), and
//! [`RelationshipManager`] is the only component that mutates them.
//!
//! # Consistency
//!
//! Every mutation runs inside of a single database transaction, with rows of
//! both users locked in a stable order, thus concurrent requests touching the
//! same pair of users are serialized and a match between two users is formed
//! (and announced) exactly once.

pub mod error;
pub mod manager;
pub mod notification;
pub mod oracle;
pub mod profile;
pub mod relation;
pub mod rules;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use db::user::Role;

pub use error::RelationshipError;
pub use manager::{LikeOutcome, RecommendationPolicy, RelationshipManager};

/// Authenticated user performing an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    /// User identifier.
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// User role.
    pub role: Role,
}

impl Actor {
    /// Check if the actor holds elevated permissions.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Window over an ordered list of relation entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Number of entries to skip.
    pub offset: u64,

    /// Max number of entries to return.
    pub limit: u64,
}
