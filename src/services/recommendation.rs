use std::sync::Arc;

use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    config::RecommendationSettings,
    recommendation::{
        ArticleStore, RecommendationRequest, Recommendations, SortOrder, VoteStore, recommend_from,
    },
    telemetry::{
        RECOMMENDATION_CANDIDATES, RECOMMENDATIONS_INSUFFICIENT_HISTORY, RECOMMENDATIONS_RELAXED,
        RECOMMENDATIONS_SERVED,
    },
};

#[derive(Clone)]
pub struct RecommendationService {
    votes: Arc<dyn VoteStore>,
    articles: Arc<dyn ArticleStore>,
    settings: RecommendationSettings,
}

impl RecommendationService {
    pub fn new(
        votes: Arc<dyn VoteStore>,
        articles: Arc<dyn ArticleStore>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            votes,
            articles,
            settings,
        }
    }

    #[instrument(name = "recommendation.recommend", skip(self))]
    pub async fn recommend(
        &self,
        user_id: i32,
        include_external: bool,
        sort: SortOrder,
    ) -> Recommendations {
        let request = RecommendationRequest {
            user_id,
            include_external,
            sort,
        };

        self.recommend_at(&request, OffsetDateTime::now_utc()).await
    }

    /// Never fails: a store error is logged and reported as insufficient history.
    pub async fn recommend_at(
        &self,
        request: &RecommendationRequest,
        now: OffsetDateTime,
    ) -> Recommendations {
        let recommendations = match self.compute(request, now).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                tracing::error!(user_id = request.user_id, error = ?e, "Failed to compute recommendations");
                Recommendations::InsufficientHistory
            }
        };

        match &recommendations {
            Recommendations::InsufficientHistory => {
                RECOMMENDATIONS_INSUFFICIENT_HISTORY.add(1, &[]);
            }
            Recommendations::Ranked(page) => {
                RECOMMENDATIONS_SERVED.add(1, &[]);
                if page.relaxed {
                    RECOMMENDATIONS_RELAXED.add(1, &[]);
                }
                tracing::info!(
                    user_id = request.user_id,
                    returned = page.articles.len(),
                    min_score = page.effective_min_score,
                    relaxed = page.relaxed,
                    "Recommendations ranked"
                );
            }
        }

        recommendations
    }

    async fn compute(
        &self,
        request: &RecommendationRequest,
        now: OffsetDateTime,
    ) -> anyhow::Result<Recommendations> {
        let votes = self.votes.list_votes(request.user_id).await?;
        if votes.is_empty() {
            return Ok(Recommendations::InsufficientHistory);
        }

        let query = request.candidate_query(&self.settings, now);
        let candidates = self.articles.list_candidates(&query).await?;

        RECOMMENDATION_CANDIDATES.record(candidates.len() as u64, &[]);
        tracing::debug!(votes = votes.len(), candidates = candidates.len(), "Loaded recommendation inputs");

        Ok(recommend_from(&votes, candidates, request, &self.settings, now))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::Duration;

    use super::*;
    use crate::recommendation::fixtures::{NOW, candidate, vote};
    use crate::recommendation::{CandidateArticle, CandidateQuery, VoteRecord};

    struct FakeVotes(Vec<VoteRecord>);

    #[async_trait]
    impl VoteStore for FakeVotes {
        async fn list_votes(&self, _user_id: i32) -> anyhow::Result<Vec<VoteRecord>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenVotes;

    #[async_trait]
    impl VoteStore for BrokenVotes {
        async fn list_votes(&self, _user_id: i32) -> anyhow::Result<Vec<VoteRecord>> {
            anyhow::bail!("connection reset")
        }
    }

    #[derive(Default)]
    struct FakeArticles {
        candidates: Vec<CandidateArticle>,
        queries: Mutex<Vec<CandidateQuery>>,
        broken: bool,
    }

    impl FakeArticles {
        fn with(candidates: Vec<CandidateArticle>) -> Self {
            Self {
                candidates,
                ..Default::default()
            }
        }

        fn queries(&self) -> Vec<CandidateQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ArticleStore for FakeArticles {
        async fn list_candidates(
            &self,
            query: &CandidateQuery,
        ) -> anyhow::Result<Vec<CandidateArticle>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.broken {
                anyhow::bail!("statement timeout");
            }
            Ok(self.candidates.clone())
        }
    }

    fn service(votes: impl VoteStore + 'static, articles: Arc<FakeArticles>) -> RecommendationService {
        RecommendationService::new(Arc::new(votes), articles, RecommendationSettings::default())
    }

    fn request(include_external: bool) -> RecommendationRequest {
        RecommendationRequest {
            user_id: 1,
            include_external,
            sort: SortOrder::Recommended,
        }
    }

    fn technology_fan() -> FakeVotes {
        FakeVotes(vec![
            vote(100, 1, 10, &["technology"]),
            vote(101, 1, 10, &["technology"]),
            vote(102, 1, 10, &["technology"]),
            vote(103, -1, 20, &["sports"]),
        ])
    }

    #[tokio::test]
    async fn test_no_votes_is_insufficient_history() {
        let articles = Arc::new(FakeArticles::with(vec![candidate(1, 10, 1, 0, &["technology"])]));
        let service = service(FakeVotes(vec![]), articles.clone());

        let result = service.recommend_at(&request(false), NOW).await;

        assert_eq!(result, Recommendations::InsufficientHistory);
        assert!(articles.queries().is_empty());
    }

    #[tokio::test]
    async fn test_vote_store_failure_is_insufficient_history() {
        let service = service(BrokenVotes, Arc::new(FakeArticles::default()));

        let result = service.recommend_at(&request(false), NOW).await;

        assert_eq!(result, Recommendations::InsufficientHistory);
    }

    #[tokio::test]
    async fn test_article_store_failure_is_insufficient_history() {
        let articles = Arc::new(FakeArticles {
            broken: true,
            ..Default::default()
        });
        let service = service(technology_fan(), articles);

        let result = service.recommend_at(&request(false), NOW).await;

        assert_eq!(result, Recommendations::InsufficientHistory);
    }

    #[tokio::test]
    async fn test_candidate_query_is_scoped_to_own_feeds() {
        let articles = Arc::new(FakeArticles::default());
        let service = service(technology_fan(), articles.clone());

        service.recommend_at(&request(false), NOW).await;
        service.recommend_at(&request(true), NOW).await;

        let queries = articles.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].owner_id, Some(1));
        assert_eq!(queries[0].published_after, NOW - Duration::days(30));
        assert_eq!(queries[0].limit, 30);
        assert_eq!(queries[1].owner_id, None);
    }

    #[tokio::test]
    async fn test_ranks_preferred_topic_first() {
        let articles = Arc::new(FakeArticles::with(vec![
            candidate(1, 30, 1, 1, &["sports"]),
            candidate(2, 10, 1, 1, &["technology"]),
        ]));
        let service = service(technology_fan(), articles);

        let result = service.recommend_at(&request(false), NOW).await;
        let ranked = result.articles().expect("ranked page");

        assert_eq!(ranked.first().map(|a| a.article.id), Some(2));
    }

    #[test]
    fn test_broken_store_outside_async_test() {
        let service = service(BrokenVotes, Arc::new(FakeArticles::default()));

        let result = tokio_test::block_on(service.recommend_at(&request(true), NOW));

        assert!(result.articles().is_none());
    }
}
