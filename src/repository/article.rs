use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use time::OffsetDateTime;
use tracing::instrument;

use crate::models::{ArticleText, ArticleWithFeed};
use crate::recommendation::{ArticleStore, CandidateArticle, CandidateQuery, FeedRef};
use crate::services::ArticlePages;

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: i32,
    title: String,
    content: String,
    url: String,
    published_at: OffsetDateTime,
    feed_id: i32,
    feed_title: String,
    feed_owner_id: i32,
    topics: Vec<String>,
}

impl From<CandidateRow> for CandidateArticle {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            url: row.url,
            published_at: row.published_at,
            feed: FeedRef {
                id: row.feed_id,
                title: row.feed_title,
                owner_id: row.feed_owner_id,
            },
            topics: row.topics,
        }
    }
}

#[derive(Clone)]
pub struct ArticleRepository {
    pool: PgPool,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest-first keyset page. With a viewer, only their feeds are listed and
    /// their vote is attached; without one, every article is listed.
    #[instrument(name = "db.article.list_page", skip(self))]
    pub async fn list_page(
        &self,
        viewer_id: Option<i32>,
        cursor: Option<i32>,
        limit: i64,
    ) -> Result<Vec<ArticleWithFeed>, sqlx::Error> {
        sqlx::query_as::<_, ArticleWithFeed>(
            r#"
            SELECT
                a.id, a.title, a.content, a.url, a.published_at,
                a.feed_id, f.title AS feed_title,
                COALESCE(
                    ARRAY_AGG(t.name::text ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL),
                    ARRAY[]::text[]
                ) AS topics,
                v.value AS user_vote
            FROM articles a
            JOIN feeds f ON f.id = a.feed_id
            LEFT JOIN article_topics atp ON atp.article_id = a.id
            LEFT JOIN topics t ON t.id = atp.topic_id
            LEFT JOIN votes v ON v.article_id = a.id AND v.user_id = $1
            WHERE ($1::int IS NULL OR f.user_id = $1)
              AND (
                $2::int IS NULL
                OR (a.published_at, a.id) < (
                    SELECT c.published_at, c.id FROM articles c WHERE c.id = $2
                )
              )
            GROUP BY a.id, f.id, v.value
            ORDER BY a.published_at DESC, a.id DESC
            LIMIT $3
            "#,
        )
        .bind(viewer_id)
        .bind(cursor)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.article.exists", skip(self))]
    pub async fn exists(&self, id: i32) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1) as exists")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<bool, _>("exists"))
    }

    #[instrument(name = "db.article.texts_for_feed", skip(self))]
    pub async fn texts_for_feed(&self, feed_id: i32) -> Result<Vec<ArticleText>, sqlx::Error> {
        sqlx::query_as::<_, ArticleText>(
            "SELECT id, title, content FROM articles WHERE feed_id = $1 ORDER BY id",
        )
        .bind(feed_id)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.article.all_texts", skip(self))]
    pub async fn all_texts(&self) -> Result<Vec<ArticleText>, sqlx::Error> {
        sqlx::query_as::<_, ArticleText>("SELECT id, title, content FROM articles ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    #[instrument(name = "db.article.find_candidates", skip(self))]
    pub async fn find_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<CandidateArticle>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT
                a.id, a.title, a.content, a.url, a.published_at,
                f.id AS feed_id, f.title AS feed_title, f.user_id AS feed_owner_id,
                COALESCE(
                    ARRAY_AGG(t.name::text ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL),
                    ARRAY[]::text[]
                ) AS topics
            FROM articles a
            JOIN feeds f ON f.id = a.feed_id
            LEFT JOIN article_topics atp ON atp.article_id = a.id
            LEFT JOIN topics t ON t.id = atp.topic_id
            WHERE a.published_at >= $1
              AND ($2::int IS NULL OR f.user_id = $2)
            GROUP BY a.id, f.id
            ORDER BY a.published_at DESC, a.id DESC
            LIMIT $3
            "#,
        )
        .bind(query.published_after)
        .bind(query.owner_id)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ArticleStore for ArticleRepository {
    async fn list_candidates(
        &self,
        query: &CandidateQuery,
    ) -> anyhow::Result<Vec<CandidateArticle>> {
        Ok(self.find_candidates(query).await?)
    }
}

#[async_trait]
impl ArticlePages for ArticleRepository {
    async fn article_exists(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.exists(id).await
    }

    async fn page(
        &self,
        viewer_id: Option<i32>,
        cursor: Option<i32>,
        limit: i64,
    ) -> Result<Vec<ArticleWithFeed>, sqlx::Error> {
        self.list_page(viewer_id, cursor, limit).await
    }
}
