pub(crate) mod auth_handler;
pub(crate) mod health_handler;
pub(crate) mod photo_handler;
pub(crate) mod user_handler;
