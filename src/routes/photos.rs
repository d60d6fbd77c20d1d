use crate::handler::photo_handler;
use crate::state::photo_state::PhotoState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn public_routes() -> Router<PhotoState> {
    Router::<PhotoState>::new().route("/photos/{id}", get(photo_handler::get_photo))
}

pub fn protected_routes() -> Router<PhotoState> {
    Router::<PhotoState>::new()
        .route("/photos/{id}/rating", post(photo_handler::rate_photo))
        .route("/photos/{id}/rating", delete(photo_handler::delete_rating))
}
