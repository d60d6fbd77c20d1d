pub(crate) mod auth_service;
pub(crate) mod mail_service;
pub(crate) mod session_service;
pub(crate) mod token_service;
pub(crate) mod user_service;
