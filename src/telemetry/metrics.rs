use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("mindfeed"));

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total HTTP requests handled")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request latency")
        .with_unit("ms")
        .build()
});

pub static USERS_REGISTERED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("users.registered")
        .with_description("Total users registered")
        .build()
});

pub static FEEDS_ADDED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("feeds.added")
        .with_description("Total feeds subscribed")
        .build()
});

pub static FEEDS_DELETED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("feeds.deleted")
        .with_description("Total feeds removed")
        .build()
});

pub static ARTICLES_INGESTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("articles.ingested")
        .with_description("Total articles stored from fetched feeds")
        .build()
});

pub static ARTICLE_PAGES_READ: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("articles.pages_read")
        .with_description("Total article pages extracted for the reader")
        .build()
});

pub static VOTES_CAST: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("votes.cast")
        .with_description("Total upvotes and downvotes recorded")
        .build()
});

pub static VOTES_CLEARED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("votes.cleared")
        .with_description("Total votes removed")
        .build()
});

pub static ENGAGEMENT_RECORDED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("engagement.recorded")
        .with_description("Total engagement signals recorded")
        .build()
});

pub static RECOMMENDATIONS_SERVED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("recommendations.served")
        .with_description("Total ranked recommendation pages served")
        .build()
});

pub static RECOMMENDATIONS_INSUFFICIENT_HISTORY: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("recommendations.insufficient_history")
        .with_description("Total requests answered without enough vote history")
        .build()
});

pub static RECOMMENDATIONS_RELAXED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("recommendations.relaxed_threshold")
        .with_description("Total pages that needed the relaxed score threshold")
        .build()
});

pub static RECOMMENDATION_CANDIDATES: LazyLock<Histogram<u64>> = LazyLock::new(|| {
    METER
        .u64_histogram("recommendations.candidates")
        .with_description("Candidate articles considered per request")
        .build()
});

pub static TOPICS_EXTRACTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("topics.extracted")
        .with_description("Total articles tagged with topics")
        .build()
});

pub static JOBS_ENQUEUED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("jobs.enqueued")
        .with_description("Total jobs enqueued")
        .build()
});

pub static JOBS_COMPLETED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("jobs.completed")
        .with_description("Total jobs completed successfully")
        .build()
});

pub static JOBS_FAILED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("jobs.failed")
        .with_description("Total jobs failed")
        .build()
});
