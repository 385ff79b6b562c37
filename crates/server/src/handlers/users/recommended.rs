use std::sync::Arc;

use axum::{Extension, Json};
use matching::{profile::ProfileView, Actor, RelationshipManager};
use serde::Deserialize;
use validator::Validate;

use super::error::RelationshipRequestError;
use crate::validation::ValidatedQuery;

/// Recommendation query parameters.
#[derive(Deserialize, Validate)]
pub(super) struct RecommendedQuery {
    /// Max number of recommended users.
    #[validate(range(min = 1, max = 100))]
    quantity: Option<u64>,
}

/// Recommended users handler.
///
/// Every returned user is recorded into the current user's recommendation history.
pub(super) async fn recommended(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    ValidatedQuery(query): ValidatedQuery<RecommendedQuery>,
) -> Result<Json<Vec<ProfileView>>, RelationshipRequestError> {
    Ok(Json(manager.recommend(&actor, query.quantity).await?))
}

#[cfg(test)]
mod tests {
    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use matching::testing::StubOracle;
    use tower::ServiceExt;

    use crate::testing::{create_user, ResponseBodyExt, TestEnv};

    fn get(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn recommended_users() {
        let env = TestEnv::new().await;
        let (alice_id, alice) = create_user(&env.db, "alice").await;
        let (bob_id, _) = create_user(&env.db, "bob").await;
        let (carol_id, _) = create_user(&env.db, "carol").await;

        let response = env
            .router()
            .oneshot(get("/users/recommended?quantity=1", &alice))
            .await
            .unwrap();

        assert_json!(response.json().await, [{ "username": "bob" }]);
        assert_eq!(env.oracle.requests(), vec![(alice_id, vec![bob_id, carol_id])]);
    }

    #[tokio::test]
    async fn invalid_quantity() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;

        let response = env
            .router()
            .oneshot(get("/users/recommended?quantity=0", &alice))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(env.oracle.requests().is_empty());
    }

    #[tokio::test]
    async fn unavailable_ranking() {
        let env = TestEnv::with_oracle(StubOracle::failing()).await;
        let (_, alice) = create_user(&env.db, "alice").await;
        create_user(&env.db, "bob").await;

        let response = env
            .router()
            .oneshot(get("/users/recommended", &alice))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
