mod articles;
mod auth;
mod content;
mod engagement;
mod feeds;
mod health;
mod recommendations;
mod votes;

pub use articles::list_articles;
pub use auth::{get_user, login, logout, register};
pub use content::article_content;
pub use engagement::{record_article_score, record_reading_time};
pub use feeds::{create_feed, delete_feed, list_feeds, update_feed};
pub use health::health_check;
pub use recommendations::recommended_articles;
pub use votes::cast_vote;
