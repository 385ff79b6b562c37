/// Notification routes.
pub(crate) mod notifications;

/// Relationship and profile routes.
pub(crate) mod users;
