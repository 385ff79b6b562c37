/// Notification creation route.
mod create;

/// Notification deletion route.
mod delete;

/// Notification details route.
mod details;

/// Notification list route.
mod list;

/// Notification status update route.
mod update;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use db::DatabaseConnection;

use crate::auth;

/// Create a router with notification routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/", get(list::list).post(create::create))
        .route(
            "/:id",
            get(details::details)
                .put(update::update)
                .delete(delete::delete),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
}
