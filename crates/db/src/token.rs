//! Bearer token identifying the user behind an API request.
//!
//! Tokens are issued by the account service; this crate only stores them
//! and resolves them back to users. A token stops being accepted once it
//! is older than [`TOKEN_LIFESPAN`]. Tests issue their own tokens with
//! `generate_token`, available with the `testing` feature.

#[cfg(feature = "testing")]
use rand::{
    distributions::{Alphanumeric, DistString},
    thread_rng,
};
#[cfg(feature = "testing")]
use sea_orm::ActiveValue;
use sea_orm::entity::prelude::*;
use time::{Duration, PrimitiveDateTime};

pub const TOKEN_LENGTH: usize = 64;
pub const TOKEN_LIFESPAN: Duration = Duration::weeks(12);

/// Authentication token model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authentication_tokens")]
pub struct Model {
    /// Unique authentication token identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Related user identifier.
    pub user_id: i64,

    /// Authentication token string value.
    pub token: String,

    /// Authentication token creation timestamp.
    pub created_at: TimeDateTime,
}

/// Authentication token model relations.
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

/// Earliest creation timestamp of a token that is still accepted.
pub fn oldest_valid_timestamp() -> PrimitiveDateTime {
    crate::now() - TOKEN_LIFESPAN
}

/// Generate new authentication token for the provided user identifier.
///
/// This function returns both an [`ActiveModel`] of an authentication token
/// and its string value.
///
/// ## Example
///
/// ```
/// use db::token::{TOKEN_LENGTH, generate_token};
///
/// let (_, token_string) = generate_token(1);
/// assert_eq!(token_string.len(), TOKEN_LENGTH);
/// ```
#[cfg(feature = "testing")]
pub fn generate_token(user_id: i64) -> (ActiveModel, String) {
    let token = Alphanumeric.sample_string(&mut thread_rng(), TOKEN_LENGTH);

    (
        ActiveModel {
            user_id: ActiveValue::Set(user_id),
            token: ActiveValue::Set(token.clone()),
            created_at: ActiveValue::Set(crate::now()),
            ..Default::default()
        },
        token,
    )
}
