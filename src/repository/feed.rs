use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use tracing::instrument;

use crate::models::{Feed, FeedWithCount, NewArticle};

#[derive(Clone)]
pub struct FeedRepository {
    pool: PgPool,
}

impl FeedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the feed and all of its articles in one transaction.
    #[instrument(name = "db.feed.create_with_articles", skip(self, articles), fields(articles = articles.len()))]
    pub async fn create_with_articles(
        &self,
        user_id: i32,
        title: &str,
        url: &str,
        articles: &[NewArticle],
    ) -> Result<Feed, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let feed = sqlx::query_as::<_, Feed>(
            r#"
            INSERT INTO feeds (title, url, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, url, user_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(url)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        let contents: Vec<&str> = articles.iter().map(|a| a.content.as_str()).collect();
        let urls: Vec<&str> = articles.iter().map(|a| a.url.as_str()).collect();
        let published: Vec<OffsetDateTime> = articles.iter().map(|a| a.published_at).collect();

        sqlx::query(
            r#"
            INSERT INTO articles (title, content, url, published_at, feed_id)
            SELECT t.title, t.content, t.url, t.published_at, $5
            FROM UNNEST($1::text[], $2::text[], $3::text[], $4::timestamptz[])
                AS t(title, content, url, published_at)
            "#,
        )
        .bind(titles)
        .bind(contents)
        .bind(urls)
        .bind(published)
        .bind(feed.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(feed)
    }

    #[instrument(name = "db.feed.find_by_id", skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Feed>, sqlx::Error> {
        sqlx::query_as::<_, Feed>(
            "SELECT id, title, url, user_id, created_at, updated_at FROM feeds WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    #[instrument(name = "db.feed.list_for_user", skip(self))]
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<FeedWithCount>, sqlx::Error> {
        sqlx::query_as::<_, FeedWithCount>(
            r#"
            SELECT f.id, f.title, f.url, f.created_at, COUNT(a.id) AS article_count
            FROM feeds f
            LEFT JOIN articles a ON a.feed_id = f.id
            WHERE f.user_id = $1
            GROUP BY f.id
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.feed.exists_for_user", skip(self))]
    pub async fn exists_for_user(&self, user_id: i32, url: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM feeds WHERE user_id = $1 AND url = $2) as exists",
        )
        .bind(user_id)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<bool, _>("exists"))
    }

    #[instrument(name = "db.feed.update", skip(self))]
    pub async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        url: Option<&str>,
    ) -> Result<Feed, sqlx::Error> {
        sqlx::query_as::<_, Feed>(
            r#"
            UPDATE feeds
            SET
                title = COALESCE($2, title),
                url = COALESCE($3, url)
            WHERE id = $1
            RETURNING id, title, url, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(url)
        .fetch_one(&self.pool)
        .await
    }

    #[instrument(name = "db.feed.delete", skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM feeds WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
