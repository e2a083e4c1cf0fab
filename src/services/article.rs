use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{ArticleDto, ArticleWithFeed, ArticlesResponse, ListArticlesQuery},
};

/// Article reads as seen by [`ArticleService`].
#[async_trait]
pub trait ArticlePages: Send + Sync {
    async fn article_exists(&self, id: i32) -> Result<bool, sqlx::Error>;

    async fn page(
        &self,
        viewer_id: Option<i32>,
        cursor: Option<i32>,
        limit: i64,
    ) -> Result<Vec<ArticleWithFeed>, sqlx::Error>;
}

#[derive(Clone)]
pub struct ArticleService {
    pages: Arc<dyn ArticlePages>,
}

impl ArticleService {
    pub fn new(pages: Arc<dyn ArticlePages>) -> Self {
        Self { pages }
    }

    /// A signed-in reader sees their own feeds; anonymous callers see everything.
    /// A cursor naming no article is rejected rather than read as the end of the list.
    #[instrument(name = "article.list", skip(self))]
    pub async fn list(
        &self,
        viewer_id: Option<i32>,
        query: ListArticlesQuery,
    ) -> AppResult<ArticlesResponse> {
        let limit = query.clamped_limit();

        if let Some(cursor) = query.cursor {
            if !self.pages.article_exists(cursor).await? {
                return Err(AppError::Validation(format!("Unknown cursor: {cursor}")));
            }
        }

        let articles = self.pages.page(viewer_id, query.cursor, limit).await?;

        Ok(into_page(articles, limit))
    }
}

fn into_page(articles: Vec<ArticleWithFeed>, limit: i64) -> ArticlesResponse {
    let has_more = articles.len() as i64 == limit;
    let next_cursor = articles.last().map(|a| a.id);

    ArticlesResponse {
        articles: articles.into_iter().map(ArticleDto::from).collect(),
        next_cursor,
        has_more,
    }
}
