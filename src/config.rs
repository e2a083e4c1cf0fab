use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::recommendation::RecencyModel;

const MAX_LOOKBACK_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
    pub feed_fetch_timeout_secs: u64,
    pub recommendation: RecommendationSettings,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env_or("PORT", 8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expires_in_hours: env_or("JWT_EXPIRES_IN_HOURS", 168),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "mindfeed".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            feed_fetch_timeout_secs: env_or("FEED_FETCH_TIMEOUT_SECS", 15),
            recommendation: RecommendationSettings::from_env(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Tuning knobs for the recommendation engine.
///
/// Weights are applied to squashed signals in `(-1, 1)` and must sum to one so
/// the final score stays comparable with `min_score` across configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSettings {
    pub topic_weight: f64,
    pub feed_weight: f64,
    pub recency_weight: f64,
    pub min_score: f64,
    pub upvote_strength: f64,
    pub downvote_strength: f64,
    pub lookback_days: i64,
    pub page_size: usize,
    pub fallback_floor: usize,
    pub recency_model: RecencyModel,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            topic_weight: 0.6,
            feed_weight: 0.2,
            recency_weight: 0.2,
            min_score: 0.2,
            upvote_strength: 1.0,
            downvote_strength: -2.0,
            lookback_days: 30,
            page_size: 10,
            fallback_floor: 5,
            recency_model: RecencyModel::Linear,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("recommendation weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("recommendation min score must be within [0, 1], got {0}")]
    MinScore(f64),

    #[error("recommendation lookback must be between 1 and {max} days, got {0}", max = MAX_LOOKBACK_DAYS)]
    Lookback(i64),

    #[error("recommendation page size must be positive")]
    PageSize,

    #[error("exponential recency decay must be positive, got {0}")]
    DecayDays(f64),
}

impl RecommendationSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let recency_model = match env::var("RECOMMEND_RECENCY_MODEL").as_deref() {
            Ok("exponential") => RecencyModel::Exponential {
                decay_days: env_or("RECOMMEND_DECAY_DAYS", 7.0),
                min_relevance: env_or("RECOMMEND_MIN_RELEVANCE", 0.1),
            },
            Ok("linear") | Err(_) => RecencyModel::Linear,
            Ok(other) => panic!("RECOMMEND_RECENCY_MODEL must be linear or exponential, got {other}"),
        };

        Self {
            topic_weight: env_or("RECOMMEND_TOPIC_WEIGHT", defaults.topic_weight),
            feed_weight: env_or("RECOMMEND_FEED_WEIGHT", defaults.feed_weight),
            recency_weight: env_or("RECOMMEND_RECENCY_WEIGHT", defaults.recency_weight),
            min_score: env_or("RECOMMEND_MIN_SCORE", defaults.min_score),
            upvote_strength: env_or("RECOMMEND_UPVOTE_STRENGTH", defaults.upvote_strength),
            downvote_strength: env_or("RECOMMEND_DOWNVOTE_STRENGTH", defaults.downvote_strength),
            lookback_days: env_or("RECOMMEND_LOOKBACK_DAYS", defaults.lookback_days),
            page_size: env_or("RECOMMEND_PAGE_SIZE", defaults.page_size),
            fallback_floor: env_or("RECOMMEND_FALLBACK_FLOOR", defaults.fallback_floor),
            recency_model,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let sum = self.topic_weight + self.feed_weight + self.recency_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(SettingsError::WeightSum(sum));
        }

        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(SettingsError::MinScore(self.min_score));
        }

        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            return Err(SettingsError::Lookback(self.lookback_days));
        }

        if self.page_size == 0 {
            return Err(SettingsError::PageSize);
        }

        if let RecencyModel::Exponential { decay_days, .. } = self.recency_model {
            if decay_days <= 0.0 {
                return Err(SettingsError::DecayDays(decay_days));
            }
        }

        Ok(())
    }

    /// How many candidates the store is asked for per request.
    pub fn candidate_limit(&self) -> i64 {
        (self.page_size * 3) as i64
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
