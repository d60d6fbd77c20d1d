pub(crate) mod photo_repository;
pub(crate) mod user_repository;
