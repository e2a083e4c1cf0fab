use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/user", get(handlers::get_user))
        .route("/api/logout", post(handlers::logout))
        .route(
            "/api/feeds",
            get(handlers::list_feeds).post(handlers::create_feed),
        )
        .route(
            "/api/feeds/{id}",
            patch(handlers::update_feed).delete(handlers::delete_feed),
        )
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/article-content", get(handlers::article_content))
        .route("/api/vote", post(handlers::cast_vote))
        .route("/api/recommended", get(handlers::recommended_articles))
        .route("/api/article-score", post(handlers::record_article_score))
        .route("/api/reading-time", post(handlers::record_reading_time))
        .with_state(state)
}
