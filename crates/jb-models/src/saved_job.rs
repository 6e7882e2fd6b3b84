//! Saved-job bookmarks.

use serde::{Deserialize, Serialize};

use crate::job::JobSummary;

/// A bookmark row linking a candidate to a job. The (user_id, job_id) pair
/// is unique per candidate, enforced by the backend schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: i64,
    pub user_id: String,
    pub job_id: i64,
}

/// Insert payload for a new bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavedJob {
    pub user_id: String,
    pub job_id: i64,
}

/// A bookmark joined with its job (and the job's company).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJobWithJob {
    #[serde(flatten)]
    pub saved: SavedJob,
    pub job: Option<JobSummary>,
}
