use serde::Serialize;
use time::OffsetDateTime;

use crate::config::RecommendationSettings;

use super::{CandidateArticle, Preferences};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// How article age feeds into the final score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RecencyModel {
    /// `1 - age / lookback`, applied to every article. Goes negative past the window.
    #[default]
    Linear,
    /// `exp(-age / decay_days)`, only for articles whose topic and feed relevance
    /// already exceeds `min_relevance`.
    Exponential { decay_days: f64, min_relevance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub topic: f64,
    pub feed: f64,
    pub recency: f64,
    pub total: f64,
}

/// Articles dated in the future count as published `now`.
pub fn age_in_days(published_at: OffsetDateTime, now: OffsetDateTime) -> f64 {
    ((now - published_at).as_seconds_f64() / SECONDS_PER_DAY).max(0.0)
}

pub fn score_article(
    article: &CandidateArticle,
    preferences: &Preferences,
    settings: &RecommendationSettings,
    now: OffsetDateTime,
) -> ScoreBreakdown {
    let topic_raw = if article.topics.is_empty() {
        0.0
    } else {
        let sum: f64 = article.topics.iter().map(|t| preferences.topic(t)).sum();
        sum / article.topics.len() as f64
    };

    let topic = topic_raw.tanh();
    let feed = preferences.feed(article.feed.id).tanh();
    let base = topic * settings.topic_weight + feed * settings.feed_weight;

    let age = age_in_days(article.published_at, now);
    let recency = match settings.recency_model {
        RecencyModel::Linear => 1.0 - age / settings.lookback_days as f64,
        RecencyModel::Exponential {
            decay_days,
            min_relevance,
        } => {
            if base > min_relevance {
                (-age / decay_days).exp()
            } else {
                0.0
            }
        }
    };

    let total = base + recency * settings.recency_weight;

    tracing::debug!(
        article_id = article.id,
        feed = %article.feed.title,
        topics = ?article.topics,
        topic_score = topic,
        feed_score = feed,
        recency_score = recency,
        final_score = total,
        "Scored article"
    );

    ScoreBreakdown {
        topic,
        feed,
        recency,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::fixtures::{NOW, candidate, vote};

    const EPSILON: f64 = 1e-9;

    fn prefs() -> Preferences {
        Preferences::learn(
            &[
                vote(1, 1, 10, &["technology"]),
                vote(2, 1, 10, &["technology", "science"]),
                vote(3, -1, 20, &["sports"]),
            ],
            &RecommendationSettings::default(),
        )
    }

    #[test]
    fn test_age_in_days_is_fractional() {
        let published = NOW - time::Duration::hours(36);
        assert!((age_in_days(published, NOW) - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_linear_combination() {
        let settings = RecommendationSettings::default();
        let article = candidate(1, 10, 1, 3, &["technology", "science"]);

        let score = score_article(&article, &prefs(), &settings, NOW);

        // topics: mean(2, 1) = 1.5, feed 10: 2
        let topic = 1.5_f64.tanh();
        let feed = 2.0_f64.tanh();
        let recency = 1.0 - 3.0 / 30.0;

        assert!((score.topic - topic).abs() < EPSILON);
        assert!((score.feed - feed).abs() < EPSILON);
        assert!((score.recency - recency).abs() < EPSILON);
        assert!((score.total - (topic * 0.6 + feed * 0.2 + recency * 0.2)).abs() < EPSILON);
    }

    #[test]
    fn test_untagged_article_scores_only_feed_and_recency() {
        let settings = RecommendationSettings::default();
        let article = candidate(1, 99, 1, 0, &[]);

        let score = score_article(&article, &prefs(), &settings, NOW);

        assert_eq!(score.topic, 0.0);
        assert_eq!(score.feed, 0.0);
        assert!((score.total - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_signals_are_squashed() {
        let heavy = Preferences::learn(
            &(0..50)
                .map(|i| vote(i, 1, 10, &["technology"]))
                .collect::<Vec<_>>(),
            &RecommendationSettings::default(),
        );
        let article = candidate(1, 10, 1, 0, &["technology"]);

        let score = score_article(&article, &heavy, &RecommendationSettings::default(), NOW);

        assert!(score.topic < 1.0 + EPSILON);
        assert!(score.feed < 1.0 + EPSILON);
        assert!(score.total <= 1.0 + EPSILON);
    }

    #[test]
    fn test_linear_recency_goes_negative_past_window() {
        let settings = RecommendationSettings::default();
        let article = candidate(1, 99, 1, 45, &[]);

        let score = score_article(&article, &Preferences::default(), &settings, NOW);

        assert!((score.recency - -0.5).abs() < EPSILON);
    }

    #[test]
    fn test_exponential_recency_is_gated_by_relevance() {
        let settings = RecommendationSettings {
            recency_model: RecencyModel::Exponential {
                decay_days: 7.0,
                min_relevance: 0.1,
            },
            ..RecommendationSettings::default()
        };

        let relevant = score_article(
            &candidate(1, 10, 1, 7, &["technology"]),
            &prefs(),
            &settings,
            NOW,
        );
        assert!((relevant.recency - (-1.0_f64).exp()).abs() < EPSILON);

        let irrelevant = score_article(
            &candidate(2, 20, 1, 0, &["sports"]),
            &prefs(),
            &settings,
            NOW,
        );
        assert_eq!(irrelevant.recency, 0.0);
        assert!(irrelevant.total < 0.0);
    }

    #[test]
    fn test_newer_article_scores_higher_all_else_equal() {
        let settings = RecommendationSettings::default();
        let newer = score_article(&candidate(1, 10, 1, 1, &["science"]), &prefs(), &settings, NOW);
        let older = score_article(&candidate(2, 10, 1, 20, &["science"]), &prefs(), &settings, NOW);

        assert!(newer.total > older.total);
    }

    #[test]
    fn test_future_dated_article_counts_as_new() {
        assert_eq!(age_in_days(NOW + time::Duration::days(60), NOW), 0.0);

        let settings = RecommendationSettings::default();
        let score = score_article(&candidate(1, 99, 1, -60, &[]), &Preferences::default(), &settings, NOW);

        assert!((score.recency - 1.0).abs() < EPSILON);
        assert!((score.total - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_future_dated_article_is_bounded_under_exponential_recency() {
        let settings = RecommendationSettings {
            recency_model: RecencyModel::Exponential {
                decay_days: 7.0,
                min_relevance: 0.1,
            },
            ..RecommendationSettings::default()
        };

        let score = score_article(&candidate(1, 10, 1, -30, &["technology"]), &prefs(), &settings, NOW);

        assert!((score.recency - 1.0).abs() < EPSILON);
        assert!(score.total <= 1.0 + EPSILON);
    }
}
