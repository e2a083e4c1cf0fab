//! Vote-driven article recommendations.
//!
//! Preferences are rebuilt from the full vote history on every request, so
//! the output depends only on the votes, the candidates, and the clock.

pub mod preferences;
pub mod ranking;
pub mod scorer;
pub mod store;

use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::config::RecommendationSettings;

pub use preferences::Preferences;
pub use ranking::{RankedPage, rank};
pub use scorer::{RecencyModel, ScoreBreakdown, score_article};
pub use store::{ArticleStore, CandidateQuery, VoteStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Recommended,
    Date,
}

/// A vote joined with the parts of the voted article that preferences need.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteRecord {
    pub article_id: i32,
    pub value: i16,
    pub feed_id: i32,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedRef {
    pub id: i32,
    pub title: String,
    pub owner_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateArticle {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub url: String,
    pub published_at: OffsetDateTime,
    pub feed: FeedRef,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArticle {
    pub article: CandidateArticle,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub user_id: i32,
    pub include_external: bool,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations {
    /// The user has not voted yet (or their history could not be read).
    InsufficientHistory,
    Ranked(RankedPage),
}

impl Recommendations {
    pub fn articles(&self) -> Option<&[ScoredArticle]> {
        match self {
            Recommendations::InsufficientHistory => None,
            Recommendations::Ranked(page) => Some(&page.articles),
        }
    }
}

impl RecommendationRequest {
    pub fn candidate_query(
        &self,
        settings: &RecommendationSettings,
        now: OffsetDateTime,
    ) -> CandidateQuery {
        CandidateQuery {
            owner_id: (!self.include_external).then_some(self.user_id),
            published_after: lookback_cutoff(settings, now),
            limit: settings.candidate_limit(),
        }
    }
}

pub fn lookback_cutoff(settings: &RecommendationSettings, now: OffsetDateTime) -> OffsetDateTime {
    now - Duration::days(settings.lookback_days)
}

/// Learns preferences from `votes`, scores the eligible candidates, and ranks them.
///
/// Candidates outside the lookback window or (without `include_external`)
/// from feeds the user does not own are dropped before scoring.
pub fn recommend_from(
    votes: &[VoteRecord],
    candidates: Vec<CandidateArticle>,
    request: &RecommendationRequest,
    settings: &RecommendationSettings,
    now: OffsetDateTime,
) -> Recommendations {
    if votes.is_empty() {
        return Recommendations::InsufficientHistory;
    }

    let preferences = Preferences::learn(votes, settings);
    let cutoff = lookback_cutoff(settings, now);

    let scored: Vec<ScoredArticle> = candidates
        .into_iter()
        .filter(|a| a.published_at >= cutoff)
        .filter(|a| request.include_external || a.feed.owner_id == request.user_id)
        .map(|article| {
            let score = score_article(&article, &preferences, settings, now);
            ScoredArticle { article, score }
        })
        .collect();

    Recommendations::Ranked(rank(
        scored,
        settings.min_score,
        settings.fallback_floor,
        settings.page_size,
        request.sort,
    ))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn request(sort: SortOrder) -> RecommendationRequest {
        RecommendationRequest {
            user_id: 1,
            include_external: false,
            sort,
        }
    }

    fn technology_fan() -> Vec<VoteRecord> {
        vec![
            vote(100, 1, 10, &["technology"]),
            vote(101, 1, 10, &["technology"]),
            vote(102, 1, 10, &["technology"]),
            vote(103, -1, 20, &["sports"]),
        ]
    }

    #[test]
    fn test_no_votes_is_insufficient_history() {
        let result = recommend_from(
            &[],
            vec![candidate(1, 10, 1, 1, &["technology"])],
            &request(SortOrder::Recommended),
            &RecommendationSettings::default(),
            NOW,
        );

        assert_eq!(result, Recommendations::InsufficientHistory);
        assert!(result.articles().is_none());
    }

    #[test]
    fn test_liked_topic_outranks_disliked_topic() {
        let request = RecommendationRequest {
            include_external: true,
            ..request(SortOrder::Recommended)
        };
        let candidates = vec![
            candidate(2, 30, 2, 2, &["sports"]),
            candidate(1, 10, 1, 2, &["technology"]),
        ];

        let Recommendations::Ranked(page) = recommend_from(
            &technology_fan(),
            candidates.clone(),
            &request,
            &RecommendationSettings::default(),
            NOW,
        ) else {
            panic!("expected ranked recommendations");
        };

        assert_eq!(page.articles[0].article.id, 1);

        let prefs = Preferences::learn(&technology_fan(), &RecommendationSettings::default());
        let tech = score_article(&candidates[1], &prefs, &RecommendationSettings::default(), NOW);
        let sports = score_article(&candidates[0], &prefs, &RecommendationSettings::default(), NOW);
        assert!(tech.total > sports.total);
    }

    #[test]
    fn test_articles_outside_lookback_are_never_returned() {
        let settings = RecommendationSettings {
            min_score: 0.0,
            ..RecommendationSettings::default()
        };
        let candidates = vec![
            candidate(1, 10, 1, 31, &["technology"]),
            candidate(2, 10, 1, 29, &["technology"]),
        ];

        let result = recommend_from(
            &technology_fan(),
            candidates,
            &request(SortOrder::Recommended),
            &settings,
            NOW,
        );

        let ids: Vec<i32> = result
            .articles()
            .unwrap()
            .iter()
            .map(|a| a.article.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_foreign_feeds_excluded_unless_requested() {
        let settings = RecommendationSettings {
            min_score: 0.0,
            ..RecommendationSettings::default()
        };
        let candidates = vec![
            candidate(1, 10, 1, 1, &["technology"]),
            candidate(2, 40, 7, 1, &["technology"]),
        ];

        let own_only = recommend_from(
            &technology_fan(),
            candidates.clone(),
            &request(SortOrder::Recommended),
            &settings,
            NOW,
        );
        assert_eq!(own_only.articles().unwrap().len(), 1);

        let with_external = recommend_from(
            &technology_fan(),
            candidates,
            &RecommendationRequest {
                include_external: true,
                ..request(SortOrder::Recommended)
            },
            &settings,
            NOW,
        );
        assert_eq!(with_external.articles().unwrap().len(), 2);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let candidates: Vec<CandidateArticle> = (1..=12)
            .map(|id| candidate(id, 10 + id % 3, 1, i64::from(id), &["technology", "science"]))
            .collect();
        let settings = RecommendationSettings::default();

        let first = recommend_from(
            &technology_fan(),
            candidates.clone(),
            &request(SortOrder::Recommended),
            &settings,
            NOW,
        );
        let second = recommend_from(
            &technology_fan(),
            candidates,
            &request(SortOrder::Recommended),
            &settings,
            NOW,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_candidate_query_scopes_to_owner() {
        let settings = RecommendationSettings::default();
        let query = request(SortOrder::Date).candidate_query(&settings, NOW);

        assert_eq!(query.owner_id, Some(1));
        assert_eq!(query.published_after, NOW - Duration::days(30));
        assert_eq!(query.limit, 30);

        let external = RecommendationRequest {
            include_external: true,
            ..request(SortOrder::Date)
        };
        assert_eq!(external.candidate_query(&settings, NOW).owner_id, None);
    }

    #[test]
    fn test_sort_order_deserializes_lowercase() {
        let order: SortOrder = serde_json::from_str("\"date\"").expect("valid sort order");
        assert_eq!(order, SortOrder::Date);
        assert_eq!(SortOrder::default(), SortOrder::Recommended);
    }
}
