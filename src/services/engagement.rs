use opentelemetry::KeyValue;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{ArticleScore, ArticleScoreInput, ReadingTime, ReadingTimeInput},
    repository::{ArticleRepository, EngagementRepository},
    telemetry::ENGAGEMENT_RECORDED,
};

#[derive(Clone)]
pub struct EngagementService {
    engagement_repo: EngagementRepository,
    article_repo: ArticleRepository,
}

impl EngagementService {
    pub fn new(engagement_repo: EngagementRepository, article_repo: ArticleRepository) -> Self {
        Self {
            engagement_repo,
            article_repo,
        }
    }

    #[instrument(name = "engagement.record_score", skip(self, input), fields(article_id = input.article_id, interaction = ?input.interaction))]
    pub async fn record_score(
        &self,
        user_id: i32,
        input: ArticleScoreInput,
    ) -> AppResult<ArticleScore> {
        let increment = input.interaction.increment(input.value);
        if !increment.is_finite() {
            return Err(AppError::Validation("Interaction value must be a finite number".to_string()));
        }

        self.ensure_article(input.article_id).await?;

        let score = self
            .engagement_repo
            .increment_score(user_id, input.article_id, increment)
            .await?;

        ENGAGEMENT_RECORDED.add(1, &[KeyValue::new("kind", "score")]);
        tracing::info!(user_id, article_id = input.article_id, score = score.score, "Article score updated");

        Ok(score)
    }

    #[instrument(name = "engagement.record_reading_time", skip(self, input), fields(article_id = input.article_id))]
    pub async fn record_reading_time(
        &self,
        user_id: i32,
        input: ReadingTimeInput,
    ) -> AppResult<ReadingTime> {
        if input.duration < 0 {
            return Err(AppError::Validation("Duration cannot be negative".to_string()));
        }

        self.ensure_article(input.article_id).await?;

        let reading_time = self
            .engagement_repo
            .record_reading_time(user_id, input.article_id, input.duration)
            .await?;

        ENGAGEMENT_RECORDED.add(1, &[KeyValue::new("kind", "reading_time")]);
        tracing::info!(user_id, article_id = input.article_id, duration = input.duration, "Reading time recorded");

        Ok(reading_time)
    }

    async fn ensure_article(&self, article_id: i32) -> AppResult<()> {
        if self.article_repo.exists(article_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Article not found".to_string()))
        }
    }
}
