use std::{error::Error, sync::Arc};

use axum::{async_trait, Router};
use common::config::Config;
use db::{token, user, ActiveValue, Database, DatabaseConnection, EntityTrait};
use hyper::body::{self, Bytes, HttpBody};
use matching::{testing::StubOracle, RecommendationPolicy, RelationshipManager};
use migration::MigratorTrait;
use serde::Serialize;

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Test application state backed by an in-memory database.
pub(crate) struct TestEnv {
    pub db: Arc<DatabaseConnection>,
    pub oracle: Arc<StubOracle>,
    pub manager: Arc<RelationshipManager>,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_oracle(StubOracle::identity()).await
    }

    pub async fn with_oracle(oracle: StubOracle) -> Self {
        let db = Arc::new(create_database().await);
        let oracle = Arc::new(oracle);
        let policy = Config::for_tests()
            .recommendation
            .as_ref()
            .map(RecommendationPolicy::from)
            .unwrap_or_default();
        let manager = Arc::new(RelationshipManager::new(db.clone(), oracle.clone(), policy));

        Self {
            db,
            oracle,
            manager,
        }
    }

    pub fn router(&self) -> Router {
        crate::app_router(self.db.clone(), self.manager.clone())
    }
}

/// Create a user with an authentication token, returning its identifier and token.
pub(crate) async fn create_user(db: &DatabaseConnection, username: &str) -> (i64, String) {
    let id = matching::testing::create_user(db, username).await;
    (id, issue_token(db, id).await)
}

/// Create an administrator with an authentication token.
pub(crate) async fn create_admin(db: &DatabaseConnection, username: &str) -> (i64, String) {
    let (id, token) = create_user(db, username).await;

    user::Entity::update(user::ActiveModel {
        id: ActiveValue::Unchanged(id),
        role: ActiveValue::Set(user::Role::Admin),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("unable to promote user");

    (id, token)
}

async fn issue_token(db: &DatabaseConnection, user_id: i64) -> String {
    let (model, token) = token::generate_token(user_id);

    token::Entity::insert(model)
        .exec_without_returning(db)
        .await
        .expect("unable to create token");

    token
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn text(self) -> String;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn text(self) -> String {
        String::from_utf8(self.bytes().await.to_vec()).expect("unable to convert to text")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
