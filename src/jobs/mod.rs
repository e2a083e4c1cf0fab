mod queue;
mod topics;

pub use queue::{Job, JobKind, JobQueue};
pub use topics::{TopicExtractionHandler, TopicExtractionPayload, TopicExtractionSummary};
