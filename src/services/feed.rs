use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    feeds::FeedFetcher,
    jobs::JobQueue,
    models::{CreateFeedInput, CreatedFeedResponse, Feed, FeedResponse, FeedsResponse, UpdateFeedInput},
    repository::FeedRepository,
    telemetry::{ARTICLES_INGESTED, FEEDS_ADDED, FEEDS_DELETED},
};

#[derive(Clone)]
pub struct FeedService {
    feed_repo: FeedRepository,
    fetcher: FeedFetcher,
    job_queue: JobQueue,
}

impl FeedService {
    pub fn new(feed_repo: FeedRepository, fetcher: FeedFetcher, job_queue: JobQueue) -> Self {
        Self {
            feed_repo,
            fetcher,
            job_queue,
        }
    }

    /// Fetches the feed, stores it with its entries, and queues topic extraction.
    #[instrument(name = "feed.add", skip(self, input), fields(url = %input.url))]
    pub async fn add(&self, user_id: i32, input: CreateFeedInput) -> AppResult<CreatedFeedResponse> {
        let url = validate_feed_url(&input.url)?;

        if self.feed_repo.exists_for_user(user_id, url).await? {
            return Err(AppError::Conflict("Feed already added".to_string()));
        }

        let fetched = self.fetcher.fetch(url).await?;

        let feed = self
            .feed_repo
            .create_with_articles(user_id, &fetched.title, url, &fetched.articles)
            .await
            .map_err(duplicate_as_conflict)?;

        if let Err(e) = self.job_queue.enqueue_topic_extraction(feed.id).await {
            tracing::warn!(feed_id = feed.id, error = %e, "Failed to enqueue topic extraction");
        }

        let articles_added = fetched.articles.len();

        FEEDS_ADDED.add(1, &[]);
        ARTICLES_INGESTED.add(articles_added as u64, &[]);

        tracing::info!(feed_id = feed.id, user_id, articles_added, "Feed added");

        Ok(CreatedFeedResponse {
            feed,
            articles_added,
        })
    }

    #[instrument(name = "feed.list", skip(self))]
    pub async fn list(&self, user_id: i32) -> AppResult<FeedsResponse> {
        let feeds = self.feed_repo.list_for_user(user_id).await?;
        Ok(FeedsResponse { feeds })
    }

    #[instrument(name = "feed.update", skip(self, input))]
    pub async fn update(
        &self,
        user_id: i32,
        feed_id: i32,
        input: UpdateFeedInput,
    ) -> AppResult<FeedResponse> {
        let feed = self.owned_feed(user_id, feed_id).await?;

        let title = input.title.as_deref().map(str::trim);
        if title.is_some_and(str::is_empty) {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }

        let url = input.url.as_deref().map(validate_feed_url).transpose()?;

        let feed = self
            .feed_repo
            .update(feed.id, title, url)
            .await
            .map_err(duplicate_as_conflict)?;

        tracing::info!(feed_id = feed.id, "Feed updated");

        Ok(FeedResponse { feed })
    }

    /// Removes the feed; its articles go with it.
    #[instrument(name = "feed.delete", skip(self))]
    pub async fn delete(&self, user_id: i32, feed_id: i32) -> AppResult<()> {
        let feed = self.owned_feed(user_id, feed_id).await?;

        self.feed_repo.delete(feed.id).await?;

        FEEDS_DELETED.add(1, &[]);

        tracing::info!(feed_id = feed.id, user_id, "Feed deleted");

        Ok(())
    }

    // Someone else's feed is reported as missing.
    async fn owned_feed(&self, user_id: i32, feed_id: i32) -> AppResult<Feed> {
        self.feed_repo
            .find_by_id(feed_id)
            .await?
            .filter(|feed| feed.user_id == user_id)
            .ok_or(AppError::NotFound("Feed not found".to_string()))
    }
}

fn validate_feed_url(url: &str) -> AppResult<&str> {
    let url = url.trim();

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(AppError::Validation(
            "Feed URL must start with http:// or https://".to_string(),
        ))
    }
}

fn duplicate_as_conflict(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Feed already added".to_string())
        }
        _ => AppError::Database(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_is_trimmed() {
        assert_eq!(
            validate_feed_url("  https://blog.rust-lang.org/feed.xml ").unwrap(),
            "https://blog.rust-lang.org/feed.xml"
        );
        assert!(validate_feed_url("http://example.com/rss").is_ok());
    }

    #[test]
    fn test_feed_url_requires_http_scheme() {
        for url in ["", "ftp://example.com/rss", "example.com/rss", "javascript:alert(1)"] {
            assert!(
                matches!(validate_feed_url(url), Err(AppError::Validation(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        assert!(matches!(
            duplicate_as_conflict(sqlx::Error::RowNotFound),
            AppError::Database(sqlx::Error::RowNotFound)
        ));
    }
}
