use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use db::{user, ActiveValue, ConnectionTrait, EntityTrait};

use crate::oracle::{OracleError, RankingOracle, Registration};

#[cfg(test)]
pub(crate) async fn create_database() -> db::DatabaseConnection {
    use migration::MigratorTrait;

    let db = db::Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Connect to the Postgres database named by `DATABASE_URL`, recreating its schema.
///
/// Returns `None` if the variable is not set.
#[cfg(test)]
pub(crate) async fn postgres_database() -> Option<db::DatabaseConnection> {
    use migration::MigratorTrait;

    let url = std::env::var("DATABASE_URL").ok()?;
    let db = db::Database::connect(url)
        .await
        .expect("unable to connect to test database");

    migration::Migrator::fresh(&db)
        .await
        .expect("unable to recreate schema");

    Some(db)
}

/// Create a verified user with the provided username, returning its identifier.
pub async fn create_user<C: ConnectionTrait>(db: &C, username: &str) -> i64 {
    user::Entity::insert(user::ActiveModel {
        username: ActiveValue::Set(username.to_owned()),
        email: ActiveValue::Set(format!("{username}@example.com")),
        role: ActiveValue::Set(user::Role::User),
        is_activated: ActiveValue::Set(true),
        is_deleted: ActiveValue::Set(false),
        is_verified: ActiveValue::Set(true),
        shown_fields: ActiveValue::Set(0),
        created_at: ActiveValue::Set(db::now()),
        updated_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create user")
    .id
}

enum Behaviour {
    Identity,
    Fixed(Vec<i64>),
    Failing,
    Slow(Duration),
}

/// In-process ranking oracle that records every request.
pub struct StubOracle {
    behaviour: Behaviour,
    requests: Mutex<Vec<(i64, Vec<i64>)>>,
    registrations: Mutex<Vec<Registration>>,
}

impl StubOracle {
    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            requests: Mutex::new(Vec::new()),
            registrations: Mutex::new(Vec::new()),
        }
    }

    /// Rank candidates in the order they were provided.
    pub fn identity() -> Self {
        Self::with(Behaviour::Identity)
    }

    /// Always respond with the provided ranking.
    pub fn fixed(ranking: Vec<i64>) -> Self {
        Self::with(Behaviour::Fixed(ranking))
    }

    /// Always fail with a timeout, both ranking and registration.
    pub fn failing() -> Self {
        Self::with(Behaviour::Failing)
    }

    /// Respond after the provided delay.
    pub fn slow(delay: Duration) -> Self {
        Self::with(Behaviour::Slow(delay))
    }

    /// Requests received so far, as `(user_id, candidates)` pairs.
    pub fn requests(&self) -> Vec<(i64, Vec<i64>)> {
        self.requests.lock().expect("poisoned lock").clone()
    }

    /// Profiles registered so far.
    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().expect("poisoned lock").clone()
    }
}

#[async_trait]
impl RankingOracle for StubOracle {
    async fn rank(&self, user_id: i64, candidates: &[i64]) -> Result<Vec<i64>, OracleError> {
        self.requests
            .lock()
            .expect("poisoned lock")
            .push((user_id, candidates.to_vec()));

        match &self.behaviour {
            Behaviour::Identity => Ok(candidates.to_vec()),
            Behaviour::Fixed(ranking) => Ok(ranking.clone()),
            Behaviour::Failing => Err(OracleError::Timeout),
            Behaviour::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(candidates.to_vec())
            }
        }
    }

    async fn register(&self, registration: &Registration) -> Result<(), OracleError> {
        if let Behaviour::Failing = self.behaviour {
            return Err(OracleError::Timeout);
        }

        self.registrations
            .lock()
            .expect("poisoned lock")
            .push(registration.clone());

        Ok(())
    }
}
