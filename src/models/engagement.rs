use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

const VOTE_WEIGHT: f64 = 10.0;
const VIEW_WEIGHT: f64 = 1.0;
const SCROLL_WEIGHT: f64 = 0.1;
const READ_TIME_WEIGHT: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Interaction {
    Vote,
    View,
    Scroll,
    ReadTime,
}

impl Interaction {
    /// Engagement points for one interaction. `value` is the vote direction,
    /// percent scrolled, or seconds read; views ignore it.
    pub fn increment(self, value: f64) -> f64 {
        match self {
            Interaction::Vote => VOTE_WEIGHT * value,
            Interaction::View => VIEW_WEIGHT,
            Interaction::Scroll => SCROLL_WEIGHT * value,
            Interaction::ReadTime => READ_TIME_WEIGHT * value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ArticleScoreInput {
    pub article_id: i32,
    pub interaction: Interaction,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleScore {
    pub user_id: i32,
    pub article_id: i32,
    pub score: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ReadingTimeInput {
    pub article_id: i32,
    pub duration: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadingTime {
    pub id: i32,
    pub user_id: i32,
    pub article_id: i32,
    pub duration: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_increments() {
        assert_eq!(Interaction::Vote.increment(-1.0), -10.0);
        assert_eq!(Interaction::View.increment(123.0), 1.0);
        assert!((Interaction::Scroll.increment(80.0) - 8.0).abs() < 1e-9);
        assert!((Interaction::ReadTime.increment(60.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_interaction_names_are_camel_case() {
        let input: ArticleScoreInput =
            serde_json::from_str(r#"{"article_id": 7, "interaction": "readTime", "value": 30}"#)
                .expect("valid input");

        assert_eq!(input.interaction, Interaction::ReadTime);
        assert_eq!(input.value, 30.0);
    }

    #[test]
    fn test_view_needs_no_value() {
        let input: ArticleScoreInput =
            serde_json::from_str(r#"{"article_id": 7, "interaction": "view"}"#)
                .expect("valid input");

        assert_eq!(input.value, 0.0);
        assert_eq!(input.interaction.increment(input.value), 1.0);
    }

    #[test]
    fn test_unknown_interaction_rejected() {
        let result = serde_json::from_str::<ArticleScoreInput>(
            r#"{"article_id": 7, "interaction": "share", "value": 1}"#,
        );
        assert!(result.is_err());
    }
}
