use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    feeds::{FeedFetcher, ReadableArticle, extract_readable},
    telemetry::ARTICLE_PAGES_READ,
};

#[derive(Clone)]
pub struct ArticleContentService {
    fetcher: FeedFetcher,
}

impl ArticleContentService {
    pub fn new(fetcher: FeedFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches the page behind an article link and returns its readable text.
    #[instrument(name = "article.read", skip(self))]
    pub async fn read(&self, url: Option<&str>) -> AppResult<ReadableArticle> {
        let url = page_url(url)?;

        let html = self.fetcher.fetch_page(url).await?;
        let article = extract_readable(&html);

        ARTICLE_PAGES_READ.add(1, &[]);
        tracing::info!(url, length = article.length, "Article page extracted");

        Ok(article)
    }
}

fn page_url(url: Option<&str>) -> AppResult<&str> {
    let url = url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(AppError::Validation(
            "URL must start with http:// or https://".to_string(),
        ))
    }
}
