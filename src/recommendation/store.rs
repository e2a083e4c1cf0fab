use async_trait::async_trait;
use time::OffsetDateTime;

use super::{CandidateArticle, VoteRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    /// Restrict to feeds owned by this user; `None` includes every feed.
    pub owner_id: Option<i32>,
    pub published_after: OffsetDateTime,
    pub limit: i64,
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn list_votes(&self, user_id: i32) -> anyhow::Result<Vec<VoteRecord>>;
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Newest-first candidates matching `query`, with their topics and feed.
    async fn list_candidates(&self, query: &CandidateQuery)
    -> anyhow::Result<Vec<CandidateArticle>>;
}
