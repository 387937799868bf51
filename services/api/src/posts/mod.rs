pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts", post(handlers::create_post))
        .route("/api/posts/{post_id}/comments", get(handlers::list_comments))
        .route("/api/posts/{post_id}/comments", post(handlers::create_comment))
        .route(
            "/api/posts/{post_id}/comments/{comment_id}",
            delete(handlers::delete_comment),
        )
}
