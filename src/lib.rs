pub mod config;
pub mod database;
pub mod error;
pub mod feeds;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod recommendation;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod topics;

pub use config::Config;

use services::{
    ArticleContentService, ArticleService, AuthService, EngagementService, FeedService,
    RecommendationService, VoteService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub feed_service: FeedService,
    pub article_service: ArticleService,
    pub content_service: ArticleContentService,
    pub vote_service: VoteService,
    pub engagement_service: EngagementService,
    pub recommendation_service: RecommendationService,
}
