pub(crate) mod auth_state;
pub(crate) mod photo_state;
pub(crate) mod token_state;
pub(crate) mod user_state;
