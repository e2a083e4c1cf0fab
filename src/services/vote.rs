use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::KeyValue;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{Vote, VoteAction, VoteInput},
    telemetry::{VOTES_CAST, VOTES_CLEARED},
};

/// Vote persistence as seen by [`VoteService`].
#[async_trait]
pub trait VoteWriter: Send + Sync {
    async fn article_exists(&self, article_id: i32) -> Result<bool, sqlx::Error>;

    async fn upsert_vote(&self, user_id: i32, article_id: i32, value: i16) -> Result<Vote, sqlx::Error>;

    /// Returns whether a vote was removed.
    async fn clear_vote(&self, user_id: i32, article_id: i32) -> Result<bool, sqlx::Error>;
}

#[derive(Clone)]
pub struct VoteService {
    votes: Arc<dyn VoteWriter>,
}

impl VoteService {
    pub fn new(votes: Arc<dyn VoteWriter>) -> Self {
        Self { votes }
    }

    /// Returns the stored vote, or `None` when the vote was cleared.
    #[instrument(name = "vote.cast", skip(self, input), fields(article_id = input.article_id, value = input.value))]
    pub async fn cast(&self, user_id: i32, input: VoteInput) -> AppResult<Option<Vote>> {
        let action = input
            .action()
            .ok_or_else(|| AppError::Validation("Vote value must be -1, 0 or 1".to_string()))?;

        match action {
            VoteAction::Clear => {
                if self.votes.clear_vote(user_id, input.article_id).await? {
                    VOTES_CLEARED.add(1, &[]);
                    tracing::info!(user_id, article_id = input.article_id, "Vote cleared");
                }
                Ok(None)
            }
            VoteAction::Set(value) => {
                if !self.votes.article_exists(input.article_id).await? {
                    return Err(AppError::NotFound("Article not found".to_string()));
                }

                let vote = self
                    .votes
                    .upsert_vote(user_id, input.article_id, value)
                    .await?;

                VOTES_CAST.add(1, &[KeyValue::new("value", i64::from(value))]);
                tracing::info!(user_id, article_id = input.article_id, value, "Vote recorded");

                Ok(Some(vote))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    struct InMemoryVotes {
        articles: HashSet<i32>,
        votes: Mutex<HashMap<(i32, i32), Vote>>,
    }

    impl InMemoryVotes {
        fn with_articles(ids: &[i32]) -> Arc<Self> {
            Arc::new(Self {
                articles: ids.iter().copied().collect(),
                ..Default::default()
            })
        }

        fn stored(&self, user_id: i32, article_id: i32) -> Option<i16> {
            self.votes
                .lock()
                .unwrap()
                .get(&(user_id, article_id))
                .map(|v| v.value)
        }
    }

    #[async_trait]
    impl VoteWriter for InMemoryVotes {
        async fn article_exists(&self, article_id: i32) -> Result<bool, sqlx::Error> {
            Ok(self.articles.contains(&article_id))
        }

        async fn upsert_vote(&self, user_id: i32, article_id: i32, value: i16) -> Result<Vote, sqlx::Error> {
            let mut votes = self.votes.lock().unwrap();
            let next_id = votes.len() as i32 + 1;
            let now = OffsetDateTime::now_utc();

            let vote = votes.entry((user_id, article_id)).or_insert(Vote {
                id: next_id,
                user_id,
                article_id,
                value,
                created_at: now,
                updated_at: now,
            });
            vote.value = value;
            vote.updated_at = now;

            Ok(vote.clone())
        }

        async fn clear_vote(&self, user_id: i32, article_id: i32) -> Result<bool, sqlx::Error> {
            Ok(self.votes.lock().unwrap().remove(&(user_id, article_id)).is_some())
        }
    }

    fn input(article_id: i32, value: i64) -> VoteInput {
        VoteInput { article_id, value }
    }

    #[tokio::test]
    async fn test_zero_vote_removes_stored_vote() {
        let store = InMemoryVotes::with_articles(&[7]);
        let service = VoteService::new(store.clone());

        let vote = service.cast(1, input(7, 1)).await.unwrap();
        assert_eq!(vote.map(|v| v.value), Some(1));
        assert_eq!(store.stored(1, 7), Some(1));

        let cleared = service.cast(1, input(7, 0)).await.unwrap();
        assert!(cleared.is_none());
        assert_eq!(store.stored(1, 7), None);
    }

    #[tokio::test]
    async fn test_clearing_missing_vote_is_fine() {
        let service = VoteService::new(InMemoryVotes::with_articles(&[7]));

        assert!(service.cast(1, input(7, 0)).await.unwrap().is_none());
        assert!(service.cast(1, input(404, 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revote_replaces_value() {
        let store = InMemoryVotes::with_articles(&[7]);
        let service = VoteService::new(store.clone());

        service.cast(1, input(7, 1)).await.unwrap();
        service.cast(1, input(7, -1)).await.unwrap();

        assert_eq!(store.stored(1, 7), Some(-1));
    }

    #[tokio::test]
    async fn test_out_of_range_value_is_rejected() {
        let store = InMemoryVotes::with_articles(&[7]);
        let service = VoteService::new(store.clone());

        let result = service.cast(1, input(7, 2)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.stored(1, 7), None);
    }

    #[tokio::test]
    async fn test_vote_on_unknown_article_is_not_found() {
        let service = VoteService::new(InMemoryVotes::with_articles(&[7]));

        let result = service.cast(1, input(8, 1)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
