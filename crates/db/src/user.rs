//! Registered user and their dating profile.
//!
//! Users are never physically removed: deleting an account flips [`Model::is_deleted`],
//! and every read path is expected to filter such users out, both as an acting
//! user and as a target of some relationship.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub is_activated: bool,
    pub is_deleted: bool,
    pub is_verified: bool,

    pub name: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub orientation: Option<String>,
    pub biographic: Option<String>,
    pub year_of_birth: Option<i32>,
    pub body_type: Option<String>,
    pub diet: Option<String>,
    pub drinks: Option<String>,
    pub drugs: Option<String>,
    pub education: Option<String>,
    pub ethnicity: Option<String>,
    pub height: Option<i32>,
    pub income: Option<i32>,
    pub job: Option<String>,
    pub location: Option<String>,
    pub offspring: Option<String>,
    pub pets: Option<String>,
    pub sign: Option<String>,
    pub smokes: Option<String>,
    pub speaks: Option<String>,

    /// Region code derived from the first component of [`Model::location`].
    pub region_code: Option<String>,

    /// Bit set of profile attributes the user agreed to show to other users.
    pub shown_fields: i32,

    pub created_at: TimeDateTime,
    pub updated_at: TimeDateTime,
}

/// User role.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(num_value = 0)]
    User,
    #[sea_orm(num_value = 1)]
    Admin,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::token::Entity")]
    Tokens,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Derive region code from a free-form location string.
///
/// Locations are stored as `"<region>, <rest>"`, thus the region code
/// is the trimmed text before the first comma.
///
/// ## Example
///
/// ```
/// use db::user::region_code;
///
/// assert_eq!(region_code("79, Ho Chi Minh City"), Some(String::from("79")));
/// assert_eq!(region_code("  "), None);
/// ```
pub fn region_code(location: &str) -> Option<String> {
    location
        .split(',')
        .next()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
}
