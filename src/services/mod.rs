mod article;
mod auth;
mod content;
mod engagement;
mod feed;
mod recommendation;
mod vote;

pub use article::{ArticlePages, ArticleService};
pub use auth::{AuthService, Claims, TokenKeys};
pub use content::ArticleContentService;
pub use engagement::EngagementService;
pub use feed::FeedService;
pub use recommendation::RecommendationService;
pub use vote::{VoteService, VoteWriter};
