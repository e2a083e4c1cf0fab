use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vote {
    pub id: i32,
    pub user_id: i32,
    pub article_id: i32,
    pub value: i16,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct VoteInput {
    pub article_id: i32,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Set(i16),
    Clear,
}

impl VoteInput {
    pub fn action(&self) -> Option<VoteAction> {
        match self.value {
            0 => Some(VoteAction::Clear),
            1 => Some(VoteAction::Set(1)),
            -1 => Some(VoteAction::Set(-1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: i64) -> VoteInput {
        VoteInput {
            article_id: 1,
            value,
        }
    }

    #[test]
    fn test_vote_actions() {
        assert_eq!(input(1).action(), Some(VoteAction::Set(1)));
        assert_eq!(input(-1).action(), Some(VoteAction::Set(-1)));
        assert_eq!(input(0).action(), Some(VoteAction::Clear));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert_eq!(input(2).action(), None);
        assert_eq!(input(-2).action(), None);
        assert_eq!(input(i64::MAX).action(), None);
    }

    #[test]
    fn test_vote_input_deserialization() {
        let input: VoteInput =
            serde_json::from_str(r#"{"article_id": 42, "value": -1}"#).expect("valid input");

        assert_eq!(input.article_id, 42);
        assert_eq!(input.action(), Some(VoteAction::Set(-1)));
    }
}
