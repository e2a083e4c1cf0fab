use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feed {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub user_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedWithCount {
    pub id: i32,
    pub title: String,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub article_count: i64,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub feed: Feed,
}

#[derive(Debug, Serialize)]
pub struct CreatedFeedResponse {
    pub feed: Feed,
    pub articles_added: usize,
}

#[derive(Debug, Serialize)]
pub struct FeedsResponse {
    pub feeds: Vec<FeedWithCount>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFeedInput {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFeedInput {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// An entry pulled from a remote feed, ready to be stored as an article.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub url: String,
    pub published_at: OffsetDateTime,
}
