/// Account deactivation route.
mod ban;

/// Account deletion route.
mod delete;

/// Relationship error responses.
pub(crate) mod error;

/// User profile route.
mod info;

/// Like, star and skip routes.
mod interest;

/// User list route.
mod list;

/// Relation listing and counting routes.
mod listing;

/// User recommendation route.
mod recommended;

/// Profile attribute visibility route.
mod shown_fields;

/// Profile update route.
mod update;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use db::DatabaseConnection;

use crate::auth;

/// Create a router with relationship and profile routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> Router<Arc<DatabaseConnection>> {
    let user_routes = Router::new()
        .route("/like", post(interest::like))
        .route("/unlike", post(interest::unlike))
        .route("/star", post(interest::star))
        .route("/unstar", post(interest::unstar))
        .route("/skip", post(interest::skip))
        .route("/unskip", post(interest::unskip))
        .route("/liked", get(listing::liked))
        .route("/liked-count", get(listing::liked_count))
        .route("/starred", get(listing::starred))
        .route("/starred-count", get(listing::starred_count))
        .route("/skipped", get(listing::skipped))
        .route("/skipped-count", get(listing::skipped_count))
        .route("/matched", get(listing::matched))
        .route("/matched-count", get(listing::matched_count))
        .route("/recommended", get(recommended::recommended))
        .route("/info/:username", get(info::info))
        .route("/shown-fields", put(shown_fields::update))
        .route("/:username", put(update::update).delete(delete::delete))
        .route_layer(from_fn_with_state(
            database.clone(),
            auth::require_authentication::<false, _>,
        ));

    let admin_routes = Router::new()
        .route("/", get(list::list))
        .route("/ban", post(ban::ban))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<true, _>,
        ));

    Router::new().merge(user_routes).merge(admin_routes)
}
