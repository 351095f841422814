use chrono::Utc;
use reelstream_core::models::{IngestJob, JobStatus};
use reelstream_core::{AppError, ErrorMetadata};
use reelstream_processing::{IngestRequest, IngestionPipeline};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock, Semaphore};
use uuid::Uuid;

/// In-process record of every queued ingestion, keyed by job id.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, IngestJob>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: Uuid) -> Option<IngestJob> {
        self.jobs.read().await.get(&id).cloned()
    }

    async fn insert(&self, job: IngestJob) {
        self.jobs.write().await.insert(job.id, job);
    }

    async fn remove(&self, id: Uuid) {
        self.jobs.write().await.remove(&id);
    }

    /// Apply a status change if the job exists and the transition is allowed.
    async fn transition(
        &self,
        id: Uuid,
        next: JobStatus,
        movie_id: Option<Uuid>,
        error: Option<String>,
    ) -> bool {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            return false;
        };
        if !job.status.can_transition_to(next) {
            tracing::warn!(job_id = %id, from = %job.status, to = %next, "Rejected job transition");
            return false;
        }
        job.status = next;
        job.movie_id = movie_id.or(job.movie_id);
        job.error = error;
        job.updated_at = Utc::now();
        true
    }
}

struct IngestTask {
    job_id: Uuid,
    request: IngestRequest,
}

/// Bounded queue feeding ingestion requests to a fixed-size worker pool.
///
/// Requests are validated before they are queued; workers run the ingestion
/// pipeline and record the outcome in the [`JobRegistry`].
#[derive(Clone)]
pub struct IngestQueue {
    tx: mpsc::Sender<IngestTask>,
    jobs: JobRegistry,
}

impl IngestQueue {
    /// Create the queue and spawn its worker pool. Must be called inside a Tokio runtime.
    pub fn new(
        pipeline: Arc<IngestionPipeline>,
        jobs: JobRegistry,
        queue_size: usize,
        max_concurrent: usize,
    ) -> Self {
        let queue_size = queue_size.max(1);
        let max_concurrent = max_concurrent.max(1);
        let (tx, rx) = mpsc::channel(queue_size);

        let worker_jobs = jobs.clone();
        tokio::spawn(async move {
            Self::worker_pool(rx, pipeline, worker_jobs, max_concurrent).await;
        });

        tracing::info!(
            queue_size = queue_size,
            max_concurrent = max_concurrent,
            "Ingest queue initialized with bounded channel"
        );

        Self { tx, jobs }
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    /// Enqueue a validated request, returning its pending job record.
    ///
    /// Fails with `ServiceUnavailable` when the queue is full; the rejected job
    /// is not recorded.
    #[tracing::instrument(skip(self, request), fields(job.type = "ingest", job.id = tracing::field::Empty))]
    pub async fn submit(&self, request: IngestRequest) -> Result<IngestJob, AppError> {
        let job = IngestJob::pending();
        tracing::Span::current().record("job.id", tracing::field::display(job.id));
        self.jobs.insert(job.clone()).await;

        let task = IngestTask {
            job_id: job.id,
            request,
        };
        match self.tx.try_send(task) {
            Ok(()) => {
                tracing::info!(job_id = %job.id, "Enqueued ingest job");
                Ok(job)
            }
            Err(e) => {
                self.jobs.remove(job.id).await;
                match e {
                    TrySendError::Full(_) => {
                        tracing::warn!("Ingest queue is full, rejecting job");
                        Err(AppError::ServiceUnavailable(
                            "Ingest queue is full, please try again later".to_string(),
                        ))
                    }
                    TrySendError::Closed(_) => Err(AppError::Internal(
                        "Ingest queue is no longer accepting jobs".to_string(),
                    )),
                }
            }
        }
    }

    async fn worker_pool(
        mut rx: mpsc::Receiver<IngestTask>,
        pipeline: Arc<IngestionPipeline>,
        jobs: JobRegistry,
        max_concurrent: usize,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        while let Some(task) = rx.recv().await {
            let permit = semaphore.clone().acquire_owned().await;
            let pipeline = pipeline.clone();
            let jobs = jobs.clone();

            tokio::spawn(async move {
                let _permit = permit;
                Self::process_job(task, pipeline, jobs).await;
            });
        }

        tracing::debug!("Ingest queue closed, worker pool exiting");
    }

    #[tracing::instrument(skip_all, fields(job.id = %task.job_id, job.status = tracing::field::Empty))]
    async fn process_job(task: IngestTask, pipeline: Arc<IngestionPipeline>, jobs: JobRegistry) {
        let IngestTask { job_id, request } = task;
        let start = std::time::Instant::now();

        if !jobs
            .transition(job_id, JobStatus::Transcoding, None, None)
            .await
        {
            return;
        }
        tracing::info!(job_id = %job_id, "Starting ingest job");

        match pipeline.ingest(request).await {
            Ok(movie) => {
                tracing::Span::current().record("job.status", "published");
                tracing::info!(
                    job_id = %job_id,
                    movie_id = %movie.id,
                    duration_ms = start.elapsed().as_millis(),
                    "Ingest job published"
                );
                jobs.transition(job_id, JobStatus::Published, Some(movie.id), None)
                    .await;
            }
            Err(e) => {
                tracing::Span::current().record("job.status", "failed");
                tracing::error!(
                    job_id = %job_id,
                    error = %e,
                    duration_ms = start.elapsed().as_millis(),
                    "Ingest job failed"
                );
                let message = AppError::from(e).client_message();
                jobs.transition(job_id, JobStatus::Failed, None, Some(message))
                    .await;
            }
        }
    }
}
