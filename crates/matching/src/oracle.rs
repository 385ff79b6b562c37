//! External service that ranks recommendation candidates.

use std::time::Duration;

use async_trait::async_trait;
use db::user;
use derive_more::{Display, Error, From};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Errors that may occur while ranking candidates.
#[derive(Debug, Display, From, Error)]
pub enum OracleError {
    /// HTTP client error.
    Http(reqwest::Error),

    /// Ranking took longer than allowed.
    #[display(fmt = "ranking service timed out")]
    Timeout,
}

/// Ranking oracle over candidate user identifiers.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Order candidates by relevance to the provided user, most relevant first.
    async fn rank(&self, user_id: i64, candidates: &[i64]) -> Result<Vec<i64>, OracleError>;

    /// Make a user profile known to the ranking service.
    async fn register(&self, registration: &Registration) -> Result<(), OracleError>;
}

/// Profile attributes the ranking service ranks users by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub user_id: i64,
    pub status: Option<String>,
    pub body_type: Option<String>,
    pub diet: Option<String>,
    pub drinks: Option<String>,
    pub drugs: Option<String>,
    pub education: Option<String>,
    pub ethnicity: Option<String>,
    pub job: Option<String>,
    pub offspring: Option<String>,
    pub pets: Option<String>,
    pub religion: Option<String>,
    pub sign: Option<String>,
    pub smokes: Option<String>,
    pub speaks: Option<String>,

    /// Age in years, derived from the year of birth.
    pub age: Option<i32>,
    pub biographic: Option<String>,
}

impl From<&user::Model> for Registration {
    fn from(model: &user::Model) -> Self {
        let current_year = db::now().year();

        Self {
            user_id: model.id,
            status: model.status.clone(),
            body_type: model.body_type.clone(),
            diet: model.diet.clone(),
            drinks: model.drinks.clone(),
            drugs: model.drugs.clone(),
            education: model.education.clone(),
            ethnicity: model.ethnicity.clone(),
            job: model.job.clone(),
            offspring: model.offspring.clone(),
            pets: model.pets.clone(),
            religion: None,
            sign: model.sign.clone(),
            smokes: model.smokes.clone(),
            speaks: model.speaks.clone(),
            age: model.year_of_birth.map(|year| current_year - year),
            biographic: model.biographic.clone(),
        }
    }
}

/// JSON response body of the ranking service.
#[derive(Deserialize)]
struct RankResponse {
    rank_list: Vec<i64>,
}

/// Ranking service client.
///
/// Candidates are posted as a JSON array to `{root}/match?user_id={id}`,
/// and the service replies with `{"rank_list": [...]}`. Profiles are
/// registered by posting a [`Registration`] to `{root}/register`.
pub struct HttpRankingOracle {
    client: Client,
    root: String,
}

impl HttpRankingOracle {
    /// Create new client with the provided service root URL and request timeout.
    pub fn new(root: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            root: root.into().trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl RankingOracle for HttpRankingOracle {
    async fn rank(&self, user_id: i64, candidates: &[i64]) -> Result<Vec<i64>, OracleError> {
        let response: RankResponse = self
            .client
            .post(format!("{}/match", self.root))
            .query(&[("user_id", user_id)])
            .json(candidates)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.rank_list)
    }

    async fn register(&self, registration: &Registration) -> Result<(), OracleError> {
        self.client
            .post(format!("{}/register", self.root))
            .json(registration)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
