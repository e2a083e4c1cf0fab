use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::models::Vote;
use crate::recommendation::{VoteRecord, VoteStore};
use crate::services::VoteWriter;

#[derive(Debug, FromRow)]
struct VoteHistoryRow {
    article_id: i32,
    value: i16,
    feed_id: i32,
    topics: Vec<String>,
}

#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "db.vote.upsert", skip(self))]
    pub async fn upsert(&self, user_id: i32, article_id: i32, value: i16) -> Result<Vote, sqlx::Error> {
        sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (user_id, article_id, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, article_id) DO UPDATE SET value = EXCLUDED.value
            RETURNING id, user_id, article_id, value, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(article_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await
    }

    #[instrument(name = "db.vote.delete", skip(self))]
    pub async fn delete(&self, user_id: i32, article_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM votes WHERE user_id = $1 AND article_id = $2")
            .bind(user_id)
            .bind(article_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(name = "db.vote.history", skip(self))]
    pub async fn history(&self, user_id: i32) -> Result<Vec<VoteRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, VoteHistoryRow>(
            r#"
            SELECT
                v.article_id, v.value, a.feed_id,
                COALESCE(
                    ARRAY_AGG(t.name::text ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL),
                    ARRAY[]::text[]
                ) AS topics
            FROM votes v
            JOIN articles a ON a.id = v.article_id
            LEFT JOIN article_topics atp ON atp.article_id = a.id
            LEFT JOIN topics t ON t.id = atp.topic_id
            WHERE v.user_id = $1
            GROUP BY v.id, a.id
            ORDER BY v.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| VoteRecord {
                article_id: row.article_id,
                value: row.value,
                feed_id: row.feed_id,
                topics: row.topics,
            })
            .collect())
    }
}

#[async_trait]
impl VoteStore for VoteRepository {
    async fn list_votes(&self, user_id: i32) -> anyhow::Result<Vec<VoteRecord>> {
        Ok(self.history(user_id).await?)
    }
}

#[async_trait]
impl VoteWriter for VoteRepository {
    async fn article_exists(&self, article_id: i32) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)")
            .bind(article_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn upsert_vote(&self, user_id: i32, article_id: i32, value: i16) -> Result<Vote, sqlx::Error> {
        self.upsert(user_id, article_id, value).await
    }

    async fn clear_vote(&self, user_id: i32, article_id: i32) -> Result<bool, sqlx::Error> {
        self.delete(user_id, article_id).await
    }
}
