mod auth;
mod handlers;
mod pagination;
mod validation;

#[cfg(test)]
mod testing;

use std::{sync::Arc, time::Duration};

use axum::{Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use matching::{oracle::HttpRankingOracle, RecommendationPolicy, RelationshipManager};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new()?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    let Some(recommendation_config) = config.recommendation.as_ref() else {
        return Err(anyhow::Error::msg("unable to load recommendation config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);

    let oracle = HttpRankingOracle::new(
        &recommendation_config.url,
        Duration::from_secs(recommendation_config.timeout),
    )?;

    let manager = Arc::new(RelationshipManager::new(
        database.clone(),
        Arc::new(oracle),
        RecommendationPolicy::from(recommendation_config),
    ));

    info!(address = %server_config.address, "starting server");
    Server::bind(&server_config.address)
        .serve(app_router(database, manager).into_make_service())
        .await?;

    Ok(())
}

fn app_router(database: Arc<DatabaseConnection>, manager: Arc<RelationshipManager>) -> Router {
    Router::new()
        .nest("/users", handlers::users::routes(database.clone()))
        .nest(
            "/notifications",
            handlers::notifications::routes(database.clone()),
        )
        .layer(Extension(manager))
        .with_state(database)
}
