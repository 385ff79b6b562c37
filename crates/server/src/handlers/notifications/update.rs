use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{notification, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use derive_more::{Display, Error, From};
use matching::Actor;
use serde::Deserialize;

/// JSON request body with a new notification status.
#[derive(Deserialize)]
pub(super) struct NotificationUpdateRequest {
    status: notification::Status,
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum NotificationUpdateError {
    DatabaseError(DbErr),
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "notification not found")]
    NotificationNotFound,
}

/// Notification status update handler.
///
/// Only notifications addressed to the current user can be updated.
pub(super) async fn update(
    Extension(actor): Extension<Actor>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    Json(request): Json<NotificationUpdateRequest>,
) -> Result<(), NotificationUpdateError> {
    let result = notification::Entity::update_many()
        .col_expr(notification::Column::Status, request.status.into())
        .filter(notification::Column::Id.eq(id))
        .filter(notification::Column::UserId.eq(actor.id))
        .exec(&*db)
        .await?;

    if result.rows_affected == 0 {
        return Err(NotificationUpdateError::NotificationNotFound);
    }

    Ok(())
}
