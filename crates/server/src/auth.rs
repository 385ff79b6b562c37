use std::sync::Arc;

use axum::{
    extract::State,
    headers::{authorization::Bearer, Authorization},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use derive_more::{Display, Error, From};
use matching::Actor;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid authentication token was provided")]
    InvalidAuthenticationToken,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "administrator role is required to access")]
    AdminRequired,
}

/// Resolve a bearer token to the [`Actor`] performing the request.
///
/// Tokens of deleted users and expired tokens are rejected.
pub(super) async fn require_authentication<const REQUIRE_ADMIN: bool, B>(
    State(db): State<Arc<DatabaseConnection>>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let (id, username, role) = user::Entity::find()
        .select_only()
        .columns([user::Column::Id, user::Column::Username, user::Column::Role])
        .inner_join(token::Entity)
        .filter(token::Column::Token.eq(authorization.token()))
        .filter(token::Column::CreatedAt.gte(token::oldest_valid_timestamp()))
        .filter(user::Column::IsDeleted.eq(false))
        .into_tuple::<(i64, String, user::Role)>()
        .one(&*db)
        .await?
        .ok_or(AuthenticationError::InvalidAuthenticationToken)?;

    if REQUIRE_ADMIN && role != user::Role::Admin {
        return Err(AuthenticationError::AdminRequired);
    }

    req.extensions_mut().insert(Actor { id, username, role });

    Ok(next.run(req).await)
}
