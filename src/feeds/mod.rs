//! Fetches remote RSS, Atom, and JSON feeds and turns their entries into articles.

mod reader;

use std::time::Duration;

use feed_rs::model::Entry;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::AppError;
use crate::models::NewArticle;

pub use reader::{ReadableArticle, extract_readable};

const DEFAULT_FEED_TITLE: &str = "Untitled Feed";
const DEFAULT_ARTICLE_TITLE: &str = "Untitled";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid feed: {0}")]
    Parse(String),
}

impl From<FetchError> for AppError {
    fn from(error: FetchError) -> Self {
        AppError::FeedFetch(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedFeed {
    pub title: String,
    pub articles: Vec<NewArticle>,
}

#[derive(Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mindfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    #[instrument(name = "feed.fetch", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedFeed, FetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let feed = parse_feed(&body, OffsetDateTime::now_utc())?;

        tracing::info!(url, title = %feed.title, entries = feed.articles.len(), "Fetched feed");

        Ok(feed)
    }

    /// Downloads an article page as text.
    #[instrument(name = "page.fetch", skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        tracing::debug!(url, bytes = html.len(), "Fetched page");

        Ok(html)
    }
}

/// Entries without a date are stamped with `now`.
pub fn parse_feed(body: &[u8], now: OffsetDateTime) -> Result<FetchedFeed, FetchError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let title = feed
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FEED_TITLE.to_string());

    let articles = feed
        .entries
        .into_iter()
        .map(|entry| to_article(entry, now))
        .collect();

    Ok(FetchedFeed { title, articles })
}

fn to_article(entry: Entry, now: OffsetDateTime) -> NewArticle {
    let url = entry
        .links
        .first()
        .map(|link| link.href.clone())
        .unwrap_or_default();

    let published_at = entry
        .published
        .or(entry.updated)
        .and_then(|date| OffsetDateTime::from_unix_timestamp(date.timestamp()).ok())
        .unwrap_or(now);

    let content = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content))
        .unwrap_or_default();

    let title = entry
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ARTICLE_TITLE.to_string());

    NewArticle {
        title,
        content,
        url,
        published_at,
    }
}
