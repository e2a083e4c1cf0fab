use std::collections::HashMap;

use crate::config::RecommendationSettings;

use super::VoteRecord;

/// Signed per-topic and per-feed accumulators learned from a vote history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub topics: HashMap<String, f64>,
    pub feeds: HashMap<i32, f64>,
}

impl Preferences {
    pub fn learn(votes: &[VoteRecord], settings: &RecommendationSettings) -> Self {
        let mut preferences = Self::default();

        for vote in votes {
            let Some(weight) = vote_weight(vote.value, settings) else {
                tracing::debug!(
                    article_id = vote.article_id,
                    value = vote.value,
                    "Ignoring vote without a direction"
                );
                continue;
            };

            for topic in &vote.topics {
                *preferences.topics.entry(topic.clone()).or_insert(0.0) += weight;
            }
            *preferences.feeds.entry(vote.feed_id).or_insert(0.0) += weight;
        }

        tracing::debug!(
            votes = votes.len(),
            topics = ?preferences.topics,
            feeds = ?preferences.feeds,
            "Learned preferences"
        );

        preferences
    }

    pub fn topic(&self, name: &str) -> f64 {
        self.topics.get(name).copied().unwrap_or(0.0)
    }

    pub fn feed(&self, feed_id: i32) -> f64 {
        self.feeds.get(&feed_id).copied().unwrap_or(0.0)
    }
}

/// Upvotes and downvotes carry different strengths; anything else counts for nothing.
pub fn vote_weight(value: i16, settings: &RecommendationSettings) -> Option<f64> {
    match value {
        1 => Some(settings.upvote_strength),
        -1 => Some(settings.downvote_strength),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::fixtures::vote;

    #[test]
    fn test_downvotes_weigh_double() {
        let settings = RecommendationSettings::default();
        let prefs = Preferences::learn(
            &[vote(1, 1, 10, &["science"]), vote(2, -1, 10, &["science"])],
            &settings,
        );

        assert_eq!(prefs.topic("science"), -1.0);
        assert_eq!(prefs.feed(10), -1.0);
    }

    #[test]
    fn test_feed_counted_once_per_vote() {
        let settings = RecommendationSettings::default();
        let prefs = Preferences::learn(
            &[vote(1, 1, 10, &["science", "health", "education"])],
            &settings,
        );

        assert_eq!(prefs.feed(10), 1.0);
        assert_eq!(prefs.topic("science"), 1.0);
        assert_eq!(prefs.topic("health"), 1.0);
        assert_eq!(prefs.topic("education"), 1.0);
    }

    #[test]
    fn test_untagged_article_only_moves_feed() {
        let settings = RecommendationSettings::default();
        let prefs = Preferences::learn(&[vote(1, -1, 3, &[])], &settings);

        assert!(prefs.topics.is_empty());
        assert_eq!(prefs.feed(3), -2.0);
    }

    #[test]
    fn test_zero_and_unknown_values_are_ignored() {
        let settings = RecommendationSettings::default();
        let prefs = Preferences::learn(
            &[vote(1, 0, 10, &["science"]), vote(2, 5, 10, &["science"])],
            &settings,
        );

        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_missing_lookups_are_neutral() {
        let prefs = Preferences::default();
        assert_eq!(prefs.topic("gaming"), 0.0);
        assert_eq!(prefs.feed(99), 0.0);
    }

    #[test]
    fn test_custom_strengths() {
        let settings = RecommendationSettings {
            upvote_strength: 2.0,
            downvote_strength: -3.0,
            ..RecommendationSettings::default()
        };

        assert_eq!(vote_weight(1, &settings), Some(2.0));
        assert_eq!(vote_weight(-1, &settings), Some(-3.0));
        assert_eq!(vote_weight(0, &settings), None);
    }
}
