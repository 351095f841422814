use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a queued ingestion: `Pending → Transcoding → Published | Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Transcoding,
    Published,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Published | JobStatus::Failed)
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Transcoding)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Transcoding, JobStatus::Published)
                | (JobStatus::Transcoding, JobStatus::Failed)
        )
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Transcoding => write!(f, "transcoding"),
            JobStatus::Published => write!(f, "published"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Handle returned to clients that submit an ingestion to the background queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestJob {
    pub id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IngestJob {
    pub fn pending() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            movie_id: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Transcoding));
        assert!(JobStatus::Transcoding.can_transition_to(JobStatus::Published));
        assert!(JobStatus::Transcoding.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Published));
        assert!(!JobStatus::Published.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Transcoding));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Transcoding.is_terminal());
        assert!(JobStatus::Published.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_pending_job_serializes_lowercase_status() {
        let job = IngestJob::pending();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("movieId").is_none());
    }
}
