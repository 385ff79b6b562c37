use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    notification, user, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    SelectExt,
};
use derive_more::{Display, Error, From};
use matching::Actor;
use serde::Deserialize;
use validator::Validate;

use super::list::NotificationData;
use crate::validation::ValidatedJson;

/// JSON request body of a new notification.
#[derive(Deserialize, Validate)]
pub(super) struct NotificationCreateRequest {
    /// Recipient user identifier.
    user_id: i64,

    #[validate(length(min = 1, max = 1024))]
    text: String,
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum NotificationCreateError {
    DatabaseError(DbErr),
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "administrator role is required to access")]
    AdminRequired,
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,
}

/// Notification creation handler, available to administrators only.
pub(super) async fn create(
    Extension(actor): Extension<Actor>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<NotificationCreateRequest>,
) -> Result<(StatusCode, Json<NotificationData>), NotificationCreateError> {
    if !actor.is_admin() {
        return Err(NotificationCreateError::AdminRequired);
    }

    if !user::Entity::find_by_id(request.user_id).exists(&*db).await? {
        return Err(NotificationCreateError::UserNotFound);
    }

    let model = notification::ActiveModel {
        user_id: ActiveValue::Set(request.user_id),
        text: ActiveValue::Set(request.text),
        status: ActiveValue::Set(notification::Status::Unread),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    }
    .insert(&*db)
    .await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::testing::{create_admin, create_user, RequestBodyExt, ResponseBodyExt, TestEnv};

    fn post(token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/notifications")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from_json(body))
            .unwrap()
    }

    #[tokio::test]
    async fn admins_notify_users() {
        let env = TestEnv::new().await;
        let (alice_id, alice) = create_user(&env.db, "alice").await;
        let (_, admin) = create_admin(&env.db, "admin").await;

        let response = env
            .router()
            .oneshot(post(&alice, json!({ "user_id": alice_id, "text": "hi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = env
            .router()
            .oneshot(post(&admin, json!({ "user_id": alice_id, "text": "welcome" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let json = response.json().await;

        assert_eq!(json["text"], "welcome");
        assert_eq!(json["status"], "unread");

        let response = env
            .router()
            .oneshot(post(&admin, json!({ "user_id": 999, "text": "welcome" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = env
            .router()
            .oneshot(post(&admin, json!({ "user_id": alice_id, "text": "" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
