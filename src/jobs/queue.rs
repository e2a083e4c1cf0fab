use opentelemetry::trace::TraceContextExt;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::{Span, instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::TopicExtractionPayload;
use crate::telemetry::{JOBS_COMPLETED, JOBS_ENQUEUED, JOBS_FAILED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    ExtractTopics,
    RepopulateTopics,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::ExtractTopics => "extract_topics",
            JobKind::RepopulateTopics => "repopulate_topics",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "extract_topics" => Some(JobKind::ExtractTopics),
            "repopulate_topics" => Some(JobKind::RepopulateTopics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub kind: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub attempts: i32,
    pub trace_context: Option<serde_json::Value>,
}

impl Job {
    pub fn job_kind(&self) -> Option<JobKind> {
        JobKind::parse(&self.kind)
    }
}

/// Postgres-backed queue; workers claim rows with `FOR UPDATE SKIP LOCKED`.
#[derive(Clone)]
pub struct JobQueue {
    pool: PgPool,
}

impl JobQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "job.enqueue", skip(self, kind, payload), fields(kind = kind.as_str()))]
    pub async fn enqueue<T: Serialize>(&self, kind: JobKind, payload: &T) -> Result<i64, sqlx::Error> {
        let trace_context = capture_trace_context();
        let payload = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);

        let job_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (kind, payload, trace_context)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(kind.as_str())
        .bind(&payload)
        .bind(&trace_context)
        .fetch_one(&self.pool)
        .await?;

        JOBS_ENQUEUED.add(1, &[opentelemetry::KeyValue::new("kind", kind.as_str())]);
        tracing::info!(job_id, kind = kind.as_str(), "Job enqueued");

        Ok(job_id)
    }

    /// Tags the articles of one freshly added feed.
    pub async fn enqueue_topic_extraction(&self, feed_id: i32) -> Result<i64, sqlx::Error> {
        self.enqueue(
            JobKind::ExtractTopics,
            &TopicExtractionPayload {
                feed_id: Some(feed_id),
            },
        )
        .await
    }

    /// Re-tags every stored article, e.g. after the taxonomy changes.
    pub async fn enqueue_topic_repopulation(&self) -> Result<i64, sqlx::Error> {
        self.enqueue(JobKind::RepopulateTopics, &TopicExtractionPayload { feed_id: None })
            .await
    }

    pub async fn dequeue(&self) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'processing',
                started_at = NOW(),
                attempts = attempts + 1
            WHERE id = (
                SELECT id FROM jobs
                WHERE status = 'pending'
                  AND scheduled_at <= NOW()
                  AND attempts < max_attempts
                ORDER BY priority DESC, scheduled_at ASC
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING id, kind, payload, status, attempts, trace_context
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn complete(&self, job_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET status = 'completed', completed_at = NOW() WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        JOBS_COMPLETED.add(1, &[]);
        Ok(())
    }

    /// Puts the job back to pending until it runs out of attempts.
    pub async fn fail(&self, job_id: i64, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = CASE
                    WHEN attempts >= max_attempts THEN 'failed'
                    ELSE 'pending'
                END,
                failed_at = NOW(),
                error_message = $2
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(error)
        .execute(&self.pool)
        .await?;

        JOBS_FAILED.add(1, &[]);
        Ok(())
    }
}

fn capture_trace_context() -> Option<serde_json::Value> {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return None;
    }

    let carrier = HashMap::from([(
        "traceparent".to_string(),
        format!(
            "00-{}-{}-{:02x}",
            span_context.trace_id(),
            span_context.span_id(),
            span_context.trace_flags().to_u8()
        ),
    )]);

    serde_json::to_value(&carrier).ok()
}
