use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use matching::{
    profile::{ProfileChanges, ProfileView},
    Actor, RelationshipManager,
};
use serde::Deserialize;
use validator::Validate;

use super::error::RelationshipRequestError;
use crate::validation::ValidatedJson;

/// JSON request body with profile attributes to change.
///
/// Absent attributes are left unchanged, `null` clears an attribute.
#[derive(Deserialize, Validate)]
pub(super) struct ProfileUpdateRequest {
    /// Register the updated profile with the ranking service.
    #[serde(default)]
    init: bool,
    #[validate(length(max = 32))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    phone_number: Option<Option<String>>,
    #[validate(length(max = 128))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    name: Option<Option<String>>,
    #[validate(length(max = 32))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    gender: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    status: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    orientation: Option<Option<String>>,
    #[validate(length(max = 4096))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    biographic: Option<Option<String>>,
    #[validate(range(min = 1900, max = 2100))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    year_of_birth: Option<Option<i32>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    body_type: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    diet: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    drinks: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    drugs: Option<Option<String>>,
    #[validate(length(max = 128))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    education: Option<Option<String>>,
    #[validate(length(max = 128))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    ethnicity: Option<Option<String>>,
    #[validate(range(min = 0, max = 300))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    height: Option<Option<i32>>,
    #[validate(range(min = 0))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    income: Option<Option<i32>>,
    #[validate(length(max = 128))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    job: Option<Option<String>>,
    #[validate(length(max = 256))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    location: Option<Option<String>>,
    #[validate(length(max = 128))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    offspring: Option<Option<String>>,
    #[validate(length(max = 128))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    pets: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    sign: Option<Option<String>>,
    #[validate(length(max = 64))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    smokes: Option<Option<String>>,
    #[validate(length(max = 256))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    speaks: Option<Option<String>>,
}

impl From<ProfileUpdateRequest> for ProfileChanges {
    fn from(request: ProfileUpdateRequest) -> Self {
        Self {
            phone_number: request.phone_number,
            name: request.name,
            gender: request.gender,
            status: request.status,
            orientation: request.orientation,
            biographic: request.biographic,
            year_of_birth: request.year_of_birth,
            body_type: request.body_type,
            diet: request.diet,
            drinks: request.drinks,
            drugs: request.drugs,
            education: request.education,
            ethnicity: request.ethnicity,
            height: request.height,
            income: request.income,
            job: request.job,
            location: request.location,
            offspring: request.offspring,
            pets: request.pets,
            sign: request.sign,
            smokes: request.smokes,
            speaks: request.speaks,
        }
    }
}

/// Profile update handler.
///
/// Users may update their own profile, administrators may update any profile.
/// Setting `init` registers the updated profile with the ranking service.
pub(super) async fn update(
    Extension(actor): Extension<Actor>,
    Extension(manager): Extension<Arc<RelationshipManager>>,
    Path(username): Path<String>,
    ValidatedJson(request): ValidatedJson<ProfileUpdateRequest>,
) -> Result<Json<ProfileView>, RelationshipRequestError> {
    let register = request.init;

    Ok(Json(
        manager
            .update_profile(&actor, &username, request.into(), register)
            .await?,
    ))
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

    fn put(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from_json(body))
            .unwrap()
    }

    #[tokio::test]
    async fn location_sets_region_code() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;

        let response = env
            .router()
            .oneshot(put(
                "/users/alice",
                &alice,
                json!({ "location": "79, Ho Chi Minh City", "job": "engineer" }),
            ))
            .await
            .unwrap();

        let json = response.json().await;

        assert_eq!(json["location"], "79, Ho Chi Minh City");
        assert_eq!(json["region_code"], "79");
        assert_eq!(json["job"], "engineer");
    }

    #[tokio::test]
    async fn permissions() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;
        create_user(&env.db, "bob").await;
        let (_, admin) = create_admin(&env.db, "admin").await;

        let response = env
            .router()
            .oneshot(put("/users/bob", &alice, json!({ "name": "Robert" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = env
            .router()
            .oneshot(put("/users/bob", &admin, json!({ "name": "Robert" })))
            .await
            .unwrap();

        assert_eq!(response.json().await["name"], "Robert");

        let response = env
            .router()
            .oneshot(put("/users/nobody", &admin, json!({ "name": "Robert" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn null_clears_attribute() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;

        env.router()
            .oneshot(put(
                "/users/alice",
                &alice,
                json!({ "location": "79, Ho Chi Minh City", "job": "engineer" }),
            ))
            .await
            .unwrap();

        let response = env
            .router()
            .oneshot(put("/users/alice", &alice, json!({ "location": null })))
            .await
            .unwrap();

        let json = response.json().await;

        assert!(json.get("location").is_none());
        assert!(json.get("region_code").is_none());
        assert_eq!(json["job"], "engineer");
    }

    #[tokio::test]
    async fn init_registers_profile() {
        let env = TestEnv::new().await;
        let (alice_id, alice) = create_user(&env.db, "alice").await;

        let response = env
            .router()
            .oneshot(put(
                "/users/alice",
                &alice,
                json!({ "diet": "vegan", "init": true }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let registrations = env.oracle.registrations();

        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].user_id, alice_id);
        assert_eq!(registrations[0].diet.as_deref(), Some("vegan"));
    }

    #[tokio::test]
    async fn invalid_attributes() {
        let env = TestEnv::new().await;
        let (_, alice) = create_user(&env.db, "alice").await;

        let response = env
            .router()
            .oneshot(put("/users/alice", &alice, json!({ "year_of_birth": 1500 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
