use sqlx::PgPool;
use tracing::instrument;

#[derive(Clone)]
pub struct TopicRepository {
    pool: PgPool,
}

impl TopicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clears the article's topics and links the given ones, creating topic rows as needed.
    #[instrument(name = "db.topic.replace_for_article", skip(self))]
    pub async fn replace_for_article(
        &self,
        article_id: i32,
        topics: &[&str],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM article_topics WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut *tx)
            .await?;

        if !topics.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO topics (name)
                SELECT UNNEST($1::text[])
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(topics)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO article_topics (article_id, topic_id)
                SELECT $1, id FROM topics WHERE name = ANY($2::text[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(article_id)
            .bind(topics)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
