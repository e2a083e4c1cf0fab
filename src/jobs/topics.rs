use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::instrument;

use super::Job;
use crate::repository::{ArticleRepository, TopicRepository};
use crate::telemetry::TOPICS_EXTRACTED;
use crate::topics::TopicExtractor;

/// `feed_id: None` re-tags every article in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicExtractionPayload {
    #[serde(default)]
    pub feed_id: Option<i32>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TopicExtractionSummary {
    pub tagged: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct TopicExtractionHandler {
    articles: ArticleRepository,
    topics: TopicRepository,
    extractor: TopicExtractor,
}

impl TopicExtractionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            articles: ArticleRepository::new(pool.clone()),
            topics: TopicRepository::new(pool),
            extractor: TopicExtractor::default(),
        }
    }

    #[instrument(name = "job.extract_topics.handle", skip(self, job), fields(job_id = job.id))]
    pub async fn handle(&self, job: &Job) -> anyhow::Result<TopicExtractionSummary> {
        let payload: TopicExtractionPayload = serde_json::from_value(job.payload.clone())?;

        let articles = match payload.feed_id {
            Some(feed_id) => self.articles.texts_for_feed(feed_id).await?,
            None => self.articles.all_texts().await?,
        };

        tracing::info!(
            feed_id = ?payload.feed_id,
            articles = articles.len(),
            "Extracting article topics"
        );

        let mut summary = TopicExtractionSummary::default();

        // One bad article must not stop the rest of the batch.
        for article in &articles {
            let topics = self.extractor.extract(&article.title, &article.content);

            match self.topics.replace_for_article(article.id, &topics).await {
                Ok(()) => {
                    summary.tagged += 1;
                    TOPICS_EXTRACTED.add(1, &[]);
                    tracing::debug!(article_id = article.id, ?topics, "Article tagged");
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(article_id = article.id, error = %e, "Failed to store article topics");
                }
            }
        }

        tracing::info!(
            tagged = summary.tagged,
            failed = summary.failed,
            "Topic extraction finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_without_feed_means_every_article() {
        let payload: TopicExtractionPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(payload.feed_id, None);
    }

    #[test]
    fn test_payload_with_feed() {
        let payload: TopicExtractionPayload =
            serde_json::from_value(serde_json::json!({ "feed_id": 7 })).unwrap();
        assert_eq!(payload.feed_id, Some(7));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, serde_json::json!({ "feed_id": 7 }));
    }
}
