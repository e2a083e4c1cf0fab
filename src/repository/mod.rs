mod article;
mod engagement;
mod feed;
mod topic;
mod user;
mod vote;

pub use article::ArticleRepository;
pub use engagement::EngagementRepository;
pub use feed::FeedRepository;
pub use topic::TopicRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
