pub(crate) mod photo;
pub(crate) mod user;
