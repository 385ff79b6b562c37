use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    notification, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use derive_more::{Display, Error, From};
use futures_util::TryStreamExt;
use matching::Actor;
use serde::Serialize;

use crate::pagination::Pagination;

/// Notification response data.
#[derive(Serialize)]
pub(super) struct NotificationData {
    pub id: i64,
    pub text: String,
    pub status: notification::Status,

    /// Creation timestamp, in seconds since the Unix epoch.
    pub created_at: i64,
}

impl From<notification::Model> for NotificationData {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            status: model.status,
            created_at: model.created_at.assume_utc().unix_timestamp(),
        }
    }
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum NotificationListError {
    DatabaseError(DbErr),
}

/// Notification list handler.
///
/// Lists notifications of the current user, newest first.
pub(super) async fn list(
    Extension(actor): Extension<Actor>,
    State(db): State<Arc<DatabaseConnection>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<NotificationData>>, NotificationListError> {
    let mut query = notification::Entity::find()
        .filter(notification::Column::UserId.eq(actor.id))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id);

    if let Some(page) = pagination.page() {
        query = query.offset(page.offset).limit(page.limit);
    }

    query
        .stream(&*db)
        .await?
        .err_into()
        .and_then(|model| async move { Ok(NotificationData::from(model)) })
        .try_collect()
        .await
        .map(Json)
}
