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
use serde::Serialize;

/// JSON response body with a number of deleted notifications.
#[derive(Serialize)]
pub(super) struct NotificationDeleteResponse {
    count: u64,
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum NotificationDeleteError {
    DatabaseError(DbErr),
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "notification not found")]
    NotificationNotFound,
}

/// Notification deletion handler.
///
/// Users delete their own notifications, administrators delete any notification.
pub(super) async fn delete(
    Extension(actor): Extension<Actor>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<NotificationDeleteResponse>, NotificationDeleteError> {
    let mut query = notification::Entity::delete_many().filter(notification::Column::Id.eq(id));

    if !actor.is_admin() {
        query = query.filter(notification::Column::UserId.eq(actor.id));
    }

    let result = query.exec(&*db).await?;

    if result.rows_affected == 0 {
        return Err(NotificationDeleteError::NotificationNotFound);
    }

    Ok(Json(NotificationDeleteResponse {
        count: result.rows_affected,
    }))
}
