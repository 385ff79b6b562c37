//! Directed relationship between two users.
//!
//! All relationship kinds share a single join table, keyed by
//! `(kind, from_user_id, to_user_id)`. Symmetric kinds ([`RelationKind::Match`])
//! are stored as two rows, one per direction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User relation model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_relations")]
pub struct Model {
    /// Unique relation entry identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Relationship kind.
    pub kind: RelationKind,

    /// Identifier of a user that holds the relation.
    pub from_user_id: i64,

    /// Identifier of a user the relation points to.
    pub to_user_id: i64,

    /// Relation entry creation timestamp.
    pub created_at: TimeDateTime,
}

/// Relationship kind.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Interest in the target user.
    #[sea_orm(num_value = 0)]
    Like,

    /// Strong interest in the target user.
    #[sea_orm(num_value = 1)]
    Star,

    /// Lack of interest, suppresses the target from recommendations.
    #[sea_orm(num_value = 2)]
    Skip,

    /// Mutual like.
    #[sea_orm(num_value = 3)]
    Match,

    /// Recommendation history.
    #[sea_orm(num_value = 4)]
    Recommend,
}

impl RelationKind {
    /// Check if the relation always holds in both directions at once.
    pub fn is_symmetric(self) -> bool {
        matches!(self, RelationKind::Match)
    }
}

/// User relation model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FromUserId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ToUserId",
        to = "super::user::Column::Id"
    )]
    Target,
}

impl ActiveModelBehavior for ActiveModel {}
