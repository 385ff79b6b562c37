//! Interest kinds a user may assert or retract, and relations each change clears.
//!
//! Asserting a like or a star drops a previous skip of the same target, while
//! a skip drops every positive relation between two users. Retracting a like
//! dissolves a match, since a match only exists on top of two likes.

use db::relation::RelationKind;

use crate::RelationshipError;

/// Relation a user may assert or retract directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interest {
    Like,
    Star,
    Skip,
}

impl Interest {
    /// Stored relation kind.
    pub fn kind(self) -> RelationKind {
        match self {
            Interest::Like => RelationKind::Like,
            Interest::Star => RelationKind::Star,
            Interest::Skip => RelationKind::Skip,
        }
    }

    /// Error returned when asserting an interest that is already present.
    pub fn already_present(self) -> RelationshipError {
        match self {
            Interest::Like => RelationshipError::AlreadyLiked,
            Interest::Star => RelationshipError::AlreadyStarred,
            Interest::Skip => RelationshipError::AlreadySkipped,
        }
    }

    /// Error returned when retracting an interest that is absent.
    pub fn not_present(self) -> RelationshipError {
        match self {
            Interest::Like => RelationshipError::NotLiked,
            Interest::Star => RelationshipError::NotStarred,
            Interest::Skip => RelationshipError::NotSkipped,
        }
    }

    /// Relations from actor to target removed when this interest is asserted.
    ///
    /// Symmetric kinds are removed in both directions.
    pub fn clears_on_assert(self) -> &'static [RelationKind] {
        match self {
            Interest::Like | Interest::Star => &[RelationKind::Skip],
            Interest::Skip => &[
                RelationKind::Like,
                RelationKind::Star,
                RelationKind::Recommend,
                RelationKind::Match,
            ],
        }
    }

    /// Relations from actor to target removed when this interest is retracted.
    pub fn clears_on_retract(self) -> &'static [RelationKind] {
        match self {
            Interest::Like => &[RelationKind::Match],
            Interest::Star | Interest::Skip => &[],
        }
    }
}
