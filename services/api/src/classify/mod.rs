pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/classify", post(handlers::classify_text))
        .route("/api/classify/local", post(handlers::classify_local))
        .route("/api/classify/remote", post(handlers::classify_remote))
        .route("/api/categories", get(handlers::list_categories))
}
