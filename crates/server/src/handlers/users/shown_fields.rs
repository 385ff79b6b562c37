use std::{collections::BTreeMap, sync::Arc};

use axum::{Extension, Json};
use matching::{profile::ProfileField, Actor, RelationshipManager};

use super::error::RelationshipRequestError;

/// Profile attribute visibility update handler.
///
/// Attributes missing from the request body keep their visibility.
/// Responds with visibility of every attribute.
pub(super) async fn update(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    Json(changes): Json<BTreeMap<ProfileField, bool>>,
) -> Result<Json<BTreeMap<ProfileField, bool>>, RelationshipRequestError> {
    Ok(Json(manager.update_shown_fields(&actor, changes).await?))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::testing::{create_user, RequestBodyExt, ResponseBodyExt, TestEnv};

    fn put(token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/users/shown-fields")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from_json(body))
            .unwrap()
    }

    #[tokio::test]
    async fn partial_update() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;

        env.router()
            .oneshot(put(&alice, json!({ "email": true, "job": true })))
            .await
            .unwrap();

        let response = env
            .router()
            .oneshot(put(&alice, json!({ "job": false })))
            .await
            .unwrap();

        let json = response.json().await;

        assert_eq!(json["email"], true);
        assert_eq!(json["job"], false);
        assert_eq!(json["phone_number"], false);
        assert_eq!(json.as_object().map(|fields| fields.len()), Some(18));
    }

    #[tokio::test]
    async fn unknown_field() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;

        let response = env
            .router()
            .oneshot(put(&alice, json!({ "role": true })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
