//! Wire types for the Sphere API.
//!
//! Status values arrive as free-form strings owned by the server; they are
//! kept as strings on the wire and classified with [`StatusClass`] where the
//! client needs to branch on them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A foundational model as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Model identifier.
    pub id: String,

    /// Human-readable name, if one was given.
    #[serde(default)]
    pub name: Option<String>,

    /// Current training status (e.g. `queued`, `training`, `done`).
    #[serde(default)]
    pub status: String,

    /// Embedding-space dimensionality, once known.
    #[serde(default)]
    pub dimensions: Option<u32>,

    /// Number of training epochs, once known.
    #[serde(default)]
    pub epochs: Option<u32>,

    /// Final training loss, once training finished.
    #[serde(default)]
    pub final_loss: Option<f64>,

    /// Compute cluster the model trained on.
    #[serde(default)]
    pub compute_cluster: Option<String>,
}

/// Coarse classification of a server-reported status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Training finished successfully.
    Done,
    /// Training ended in an error.
    Failed,
    /// Anything else: still queued, running, or in an unknown state.
    InProgress,
}

impl StatusClass {
    /// Classify a status string.
    #[must_use]
    pub fn of(status: &str) -> Self {
        match status {
            "done" => Self::Done,
            "error" | "failed" => Self::Failed,
            _ => Self::InProgress,
        }
    }

    /// Whether this status ends the training lifecycle.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// One planned job in a model's training pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPlanEntry {
    /// Kind of job (e.g. `ingest`, `train`, `evaluate`).
    #[serde(default)]
    pub job_type: Option<String>,

    /// Identifier of the scheduled job, absent until the job is created.
    #[serde(default)]
    pub job_id: Option<String>,
}

/// A scheduled or finished server-side job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Kind of job.
    #[serde(default)]
    pub job_type: Option<String>,

    /// Job status (e.g. `pending`, `running`, `done`, `error`).
    #[serde(default)]
    pub status: String,

    /// Completion percentage while running.
    #[serde(default)]
    pub progress: Option<u32>,

    /// Queue the job is waiting in or running on.
    #[serde(default)]
    pub queue: Option<String>,

    /// Creation timestamp, ISO-8601.
    #[serde(default)]
    pub created_at: Option<String>,

    /// Completion timestamp, ISO-8601.
    #[serde(default)]
    pub finished_at: Option<String>,

    /// Error message for failed jobs.
    #[serde(default)]
    pub error: Option<String>,
}

/// Snapshot of a model's training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgress {
    /// Overall model status.
    #[serde(default)]
    pub status: String,

    /// Planned jobs in execution order.
    #[serde(default)]
    pub job_plan: Vec<JobPlanEntry>,

    /// Jobs keyed by job id.
    #[serde(default)]
    pub jobs: BTreeMap<String, Job>,

    /// Updated model record, when the server includes one.
    #[serde(default)]
    pub model: Option<ModelRecord>,
}

impl TrainingProgress {
    /// Jobs that ended in an error, in plan order where possible.
    #[must_use]
    pub fn failed_jobs(&self) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|job| StatusClass::of(&job.status) == StatusClass::Failed)
            .collect()
    }
}

/// Response to a model creation or extension request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedModel {
    /// Identifier of the new model.
    pub model_id: String,

    /// Initial status of the new model.
    #[serde(default)]
    pub status: String,
}

/// Server health report: an open set of key-value fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthReport {
    /// Raw report fields as returned by the server.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Response to a publish request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Path the model was published under.
    #[serde(default)]
    pub published_path: Option<String>,

    /// Remaining server-provided fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response to a delete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionReceipt {
    /// Identifier of the model marked for deletion.
    #[serde(default)]
    pub model_id: Option<String>,

    /// Remaining server-provided fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("done", StatusClass::Done; "done is terminal success")]
    #[test_case("error", StatusClass::Failed; "error is terminal failure")]
    #[test_case("failed", StatusClass::Failed; "failed is terminal failure")]
    #[test_case("training", StatusClass::InProgress; "training is in progress")]
    #[test_case("queued", StatusClass::InProgress; "queued is in progress")]
    #[test_case("", StatusClass::InProgress; "empty is in progress")]
    #[test_case("DONE", StatusClass::InProgress; "classification is case sensitive")]
    fn status_classification(status: &str, expected: StatusClass) {
        assert_eq!(StatusClass::of(status), expected);
    }

    #[test]
    fn terminal_statuses() {
        assert!(StatusClass::Done.is_terminal());
        assert!(StatusClass::Failed.is_terminal());
        assert!(!StatusClass::InProgress.is_terminal());
    }

    #[test]
    fn model_record_tolerates_missing_fields() {
        let record: ModelRecord =
            serde_json::from_str(r#"{"id": "fm-1"}"#).expect("deserialize");
        assert_eq!(record.id, "fm-1");
        assert_eq!(record.name, None);
        assert_eq!(record.status, "");
        assert_eq!(record.final_loss, None);
    }

    #[test]
    fn training_progress_deserializes_full_payload() {
        let payload = r#"{
            "status": "training",
            "job_plan": [
                {"job_type": "ingest", "job_id": "j-1"},
                {"job_type": "train"}
            ],
            "jobs": {
                "j-1": {
                    "job_type": "ingest",
                    "status": "running",
                    "progress": 40,
                    "queue": "cpu",
                    "created_at": "2025-06-01T12:00:00Z"
                }
            }
        }"#;

        let progress: TrainingProgress = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(progress.status, "training");
        assert_eq!(progress.job_plan.len(), 2);
        assert_eq!(progress.job_plan[1].job_id, None);
        let job = progress.jobs.get("j-1").expect("job present");
        assert_eq!(job.progress, Some(40));
        assert_eq!(job.queue.as_deref(), Some("cpu"));
        assert!(progress.model.is_none());
    }

    #[test]
    fn failed_jobs_filters_by_status() {
        let payload = r#"{
            "status": "failed",
            "jobs": {
                "j-1": {"job_type": "ingest", "status": "done"},
                "j-2": {"job_type": "train", "status": "error", "error": "OOM"},
                "j-3": {"job_type": "evaluate", "status": "failed"}
            }
        }"#;

        let progress: TrainingProgress = serde_json::from_str(payload).expect("deserialize");
        let failed = progress.failed_jobs();
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].error.as_deref(), Some("OOM"));
    }

    #[test]
    fn health_report_keeps_all_fields() {
        let report: HealthReport =
            serde_json::from_str(r#"{"status": "ok", "version": "2.3.1", "queue_depth": 7}"#)
                .expect("deserialize");
        assert_eq!(report.fields.len(), 3);
        assert_eq!(
            report.fields.get("status").and_then(|v| v.as_str()),
            Some("ok")
        );
    }

    #[test]
    fn publish_receipt_collects_extra_fields() {
        let receipt: PublishReceipt = serde_json::from_str(
            r#"{"published_path": "org/acme/churn", "visibility": "public"}"#,
        )
        .expect("deserialize");
        assert_eq!(receipt.published_path.as_deref(), Some("org/acme/churn"));
        assert_eq!(
            receipt.extra.get("visibility").and_then(|v| v.as_str()),
            Some("public")
        );
    }
}
