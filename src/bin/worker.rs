use std::collections::HashMap;
use std::time::Duration;

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use mindfeed::{
    Config,
    database::create_pool,
    jobs::{Job, JobKind, JobQueue, TopicExtractionHandler},
    telemetry::init_telemetry,
};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const REPOPULATE_FLAG: &str = "--repopulate-topics";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let telemetry_guard = init_telemetry(&config)?;

    let pool = create_pool(&config).await?;
    let job_queue = JobQueue::new(pool.clone());

    if std::env::args().skip(1).any(|arg| arg == REPOPULATE_FLAG) {
        let job_id = job_queue.enqueue_topic_repopulation().await?;
        tracing::info!(job_id, "Queued topic repopulation for every article");
    }

    tracing::info!(
        environment = %config.environment,
        "Starting worker"
    );

    let handler = TopicExtractionHandler::new(pool);
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let worker_handle = {
        let job_queue = job_queue.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = process_job(&job_queue, &handler).await {
                            tracing::error!(error = %e, "Error processing job");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Worker received shutdown signal");
                        break;
                    }
                }
            }
        })
    };

    shutdown_signal().await;
    let _ = shutdown_tx.send(());

    worker_handle.await?;

    tracing::info!("Worker shutdown complete");
    telemetry_guard.shutdown();

    Ok(())
}

async fn process_job(job_queue: &JobQueue, handler: &TopicExtractionHandler) -> anyhow::Result<()> {
    let Some(job) = job_queue.dequeue().await? else {
        return Ok(());
    };

    let span = tracing::info_span!(
        "job.process",
        job_id = job.id,
        job_kind = %job.kind,
        attempt = job.attempts,
    );
    let _ = span.set_parent(extract_trace_context(&job));

    async {
        tracing::info!(job_id = job.id, kind = %job.kind, "Processing job");

        let result = match job.job_kind() {
            Some(JobKind::ExtractTopics | JobKind::RepopulateTopics) => {
                handler.handle(&job).await.map(|_| ())
            }
            None => {
                tracing::warn!(job_id = job.id, kind = %job.kind, "Unknown job kind");
                Err(anyhow::anyhow!("Unknown job kind: {}", job.kind))
            }
        };

        match result {
            Ok(()) => {
                job_queue.complete(job.id).await?;
                tracing::info!(job_id = job.id, "Job completed");
            }
            Err(e) => {
                job_queue.fail(job.id, &e.to_string()).await?;
                tracing::error!(job_id = job.id, error = %e, "Job failed");
            }
        }

        Ok(())
    }
    .instrument(span)
    .await
}

fn extract_trace_context(job: &Job) -> opentelemetry::Context {
    let carrier: Option<HashMap<String, String>> = job
        .trace_context
        .clone()
        .and_then(|value| serde_json::from_value(value).ok());

    match carrier {
        Some(carrier) => TraceContextPropagator::new().extract(&carrier),
        None => opentelemetry::Context::new(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
