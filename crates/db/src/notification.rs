//! Notification addressed to a single user.
//!
//! Notifications are written as plain rows, thus inserting one inside of
//! a transaction makes its delivery commit or roll back together with
//! the change that caused it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub status: Status,
    pub created_at: TimeDateTime,
}

/// Notification status.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(num_value = 0)]
    Unread,
    #[sea_orm(num_value = 1)]
    Read,
    #[sea_orm(num_value = 2)]
    Pinned,
}

/// Notification model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
