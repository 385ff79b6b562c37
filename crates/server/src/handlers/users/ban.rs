use std::sync::Arc;

use axum::Extension;
use matching::{Actor, RelationshipManager};

use super::{error::RelationshipRequestError, interest::TargetRequest};
use crate::validation::ValidatedJson;

/// Account deactivation handler, available to administrators only.
pub(super) async fn ban(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedJson(request): ValidatedJson<TargetRequest>,
) -> Result<(), RelationshipRequestError> {
    Ok(manager.ban(&actor, &request.username).await?)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::testing::{create_admin, create_user, RequestBodyExt, TestEnv};

    fn post(uri: &str, token: &str, username: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from_json(json!({ "username": username })))
            .unwrap()
    }

    #[tokio::test]
    async fn banned_user_is_not_a_target() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;
        create_user(&env.db, "bob").await;
        let (_, admin) = create_admin(&env.db, "admin").await;

        let response = env
            .router()
            .oneshot(post("/users/ban", &alice, "bob"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = env
            .router()
            .oneshot(post("/users/ban", &admin, "bob"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let response = env
            .router()
            .oneshot(post("/users/like", &alice, "bob"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = env
            .router()
            .oneshot(post("/users/ban", &admin, "nobody"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
