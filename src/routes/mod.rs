pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod photos;
pub(crate) mod root;
pub(crate) mod users;
