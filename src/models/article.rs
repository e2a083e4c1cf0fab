use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::recommendation::{
    RankedPage, Recommendations, ScoreBreakdown, ScoredArticle, SortOrder,
};

const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, FromRow)]
pub struct ArticleWithFeed {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub url: String,
    pub published_at: OffsetDateTime,
    pub feed_id: i32,
    pub feed_title: String,
    pub topics: Vec<String>,
    pub user_vote: Option<i16>,
}

/// The text the topic extractor reads.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleText {
    pub id: i32,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FeedSummary {
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub feed: FeedSummary,
    pub topics: Vec<String>,
    pub user_vote: Option<i16>,
}

impl From<ArticleWithFeed> for ArticleDto {
    fn from(article: ArticleWithFeed) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            url: article.url,
            published_at: article.published_at,
            feed: FeedSummary {
                id: article.feed_id,
                title: article.feed_title,
            },
            topics: article.topics,
            user_vote: article.user_vote,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleDto>,
    pub next_cursor: Option<i32>,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub cursor: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl ListArticlesQuery {
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ArticleContentQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendedQuery {
    #[serde(rename = "includeExternal", default)]
    pub include_external: bool,
    #[serde(rename = "sortOrder", default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct RecommendedArticleDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub feed: FeedSummary,
    pub topics: Vec<String>,
    pub score: ScoreBreakdown,
}

impl From<ScoredArticle> for RecommendedArticleDto {
    fn from(scored: ScoredArticle) -> Self {
        let article = scored.article;
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            url: article.url,
            published_at: article.published_at,
            feed: FeedSummary {
                id: article.feed.id,
                title: article.feed.title,
            },
            topics: article.topics,
            score: scored.score,
        }
    }
}

/// `articles` is `null` while the reader has no voting history, which is
/// distinct from an empty list of matches.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub articles: Option<Vec<RecommendedArticleDto>>,
    pub min_score: Option<f64>,
}

impl From<Recommendations> for RecommendationsResponse {
    fn from(recommendations: Recommendations) -> Self {
        match recommendations {
            Recommendations::InsufficientHistory => Self {
                articles: None,
                min_score: None,
            },
            Recommendations::Ranked(RankedPage {
                articles,
                effective_min_score,
                ..
            }) => Self {
                articles: Some(articles.into_iter().map(Into::into).collect()),
                min_score: Some(effective_min_score),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::fixtures::candidate;

    #[test]
    fn test_list_query_defaults_and_clamps() {
        let query: ListArticlesQuery = serde_json::from_str("{}").expect("valid query");
        assert_eq!(query.limit, 10);
        assert!(query.cursor.is_none());

        let query = ListArticlesQuery {
            cursor: None,
            limit: 500,
        };
        assert_eq!(query.clamped_limit(), 50);

        let query = ListArticlesQuery {
            cursor: None,
            limit: 0,
        };
        assert_eq!(query.clamped_limit(), 1);
    }

    #[test]
    fn test_recommended_query_uses_camel_case_params() {
        let query: RecommendedQuery =
            serde_json::from_str(r#"{"includeExternal": true, "sortOrder": "date"}"#)
                .expect("valid query");

        assert!(query.include_external);
        assert_eq!(query.sort_order, SortOrder::Date);

        let defaults: RecommendedQuery = serde_json::from_str("{}").expect("valid query");
        assert!(!defaults.include_external);
        assert_eq!(defaults.sort_order, SortOrder::Recommended);
    }

    #[test]
    fn test_insufficient_history_serializes_as_null() {
        let response = RecommendationsResponse::from(Recommendations::InsufficientHistory);
        let json = serde_json::to_string(&response).expect("serialization should succeed");

        assert_eq!(json, r#"{"articles":null,"min_score":null}"#);
    }

    #[test]
    fn test_empty_page_serializes_as_empty_list() {
        let response = RecommendationsResponse::from(Recommendations::Ranked(RankedPage {
            articles: vec![],
            effective_min_score: 0.1,
            relaxed: true,
        }));
        let json = serde_json::to_string(&response).expect("serialization should succeed");

        assert_eq!(json, r#"{"articles":[],"min_score":0.1}"#);
    }

    #[test]
    fn test_scored_article_carries_breakdown() {
        let dto = RecommendedArticleDto::from(ScoredArticle {
            article: candidate(5, 2, 1, 0, &["science"]),
            score: ScoreBreakdown {
                topic: 0.5,
                feed: 0.25,
                recency: 1.0,
                total: 0.55,
            },
        });

        assert_eq!(dto.feed.id, 2);
        assert_eq!(dto.topics, vec!["science".to_string()]);

        let json = serde_json::to_string(&dto).expect("serialization should succeed");
        assert!(json.contains("\"total\":0.55"));
    }
}
