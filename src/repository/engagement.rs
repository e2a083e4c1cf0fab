use sqlx::PgPool;
use tracing::instrument;

use crate::models::{ArticleScore, ReadingTime};

#[derive(Clone)]
pub struct EngagementRepository {
    pool: PgPool,
}

impl EngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "db.engagement.increment_score", skip(self))]
    pub async fn increment_score(
        &self,
        user_id: i32,
        article_id: i32,
        increment: f64,
    ) -> Result<ArticleScore, sqlx::Error> {
        sqlx::query_as::<_, ArticleScore>(
            r#"
            INSERT INTO article_scores (user_id, article_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, article_id) DO UPDATE
            SET score = article_scores.score + EXCLUDED.score,
                updated_at = NOW()
            RETURNING user_id, article_id, score, updated_at
            "#,
        )
        .bind(user_id)
        .bind(article_id)
        .bind(increment)
        .fetch_one(&self.pool)
        .await
    }

    #[instrument(name = "db.engagement.record_reading_time", skip(self))]
    pub async fn record_reading_time(
        &self,
        user_id: i32,
        article_id: i32,
        duration: i32,
    ) -> Result<ReadingTime, sqlx::Error> {
        sqlx::query_as::<_, ReadingTime>(
            r#"
            INSERT INTO reading_times (user_id, article_id, duration)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, article_id, duration, created_at
            "#,
        )
        .bind(user_id)
        .bind(article_id)
        .bind(duration)
        .fetch_one(&self.pool)
        .await
    }
}
