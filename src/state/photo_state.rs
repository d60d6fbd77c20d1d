use crate::config::database::Database;
use crate::repository::photo_repository::PhotoRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct PhotoState {
    pub photo_repo: PhotoRepository,
}

impl PhotoState {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            photo_repo: PhotoRepository::new(db_conn),
        }
    }
}
