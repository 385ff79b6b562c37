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

use super::list::NotificationData;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum NotificationDetailsError {
    DatabaseError(DbErr),
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "notification not found")]
    NotificationNotFound,
}

/// Notification details handler.
///
/// Users see their own notifications, administrators see any notification.
pub(super) async fn details(
    Extension(actor): Extension<Actor>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<NotificationData>, NotificationDetailsError> {
    let mut query = notification::Entity::find_by_id(id);

    if !actor.is_admin() {
        query = query.filter(notification::Column::UserId.eq(actor.id));
    }

    query
        .one(&*db)
        .await?
        .map(|model| Json(model.into()))
        .ok_or(NotificationDetailsError::NotificationNotFound)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::testing::{create_admin, create_user, ResponseBodyExt, TestEnv};

    fn get(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn visible_to_owner_and_admins() {
        let env = TestEnv::new().await;
        let (alice_id, alice) = create_user(&env.db, "alice").await;
        let (_, bob) = create_user(&env.db, "bob").await;
        let (_, admin) = create_admin(&env.db, "admin").await;

        matching::notification::enqueue(&*env.db, alice_id, String::from("hello"))
            .await
            .unwrap();

        for token in [&alice, &admin] {
            let response = env
                .router()
                .oneshot(get("/notifications/1", token))
                .await
                .unwrap();

            let json = response.json().await;

            assert_eq!(json["id"], 1);
            assert_eq!(json["text"], "hello");
            assert_eq!(json["status"], "unread");
        }

        let response = env
            .router()
            .oneshot(get("/notifications/1", &bob))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
