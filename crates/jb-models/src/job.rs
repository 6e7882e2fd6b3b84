//! Job postings and the embedded shapes returned by list/detail queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::Application;
use crate::company::CompanyRef;

/// A job row as stored in the `jobs` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Row id
    pub id: i64,
    /// Job title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Location (free-form, filterable by equality)
    pub location: String,
    /// Owning company
    pub company_id: i64,
    /// Recruiter who posted the job (identity-provider user id)
    pub recruiter_id: String,
    /// Whether the position is still accepting applications
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

/// Marker row embedded from `saved:saved_jobs(id)` — presence means the
/// current viewer has bookmarked the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMarker {
    pub id: i64,
}

/// A job joined with its company and the viewer's saved marker, as returned
/// by the paginated listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: Job,
    /// Embedded company name/logo (absent if the join returned nothing)
    pub company: Option<CompanyRef>,
    /// Saved-job markers for the current viewer
    #[serde(default)]
    pub saved: Vec<SavedMarker>,
}

impl JobSummary {
    /// True when the current viewer has bookmarked this job.
    pub fn is_saved(&self) -> bool {
        !self.saved.is_empty()
    }
}

/// A single job joined with its company and all of its applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<CompanyRef>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

/// Payload for creating a new job posting.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobDraft {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    pub company_id: i64,
    pub recruiter_id: String,
    #[serde(rename = "isOpen", default = "default_open")]
    pub is_open: bool,
}

fn default_open() -> bool {
    true
}
