//! Applications and their status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Application status. The backend schema constrains the column to exactly
/// these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted, awaiting review
    #[default]
    Applied,
    /// In the interview pipeline
    Interviewing,
    /// Offer accepted
    Hired,
    /// Turned down
    Rejected,
}

impl ApplicationStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Check if this is a terminal state (no further transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Hired | ApplicationStatus::Rejected)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "interviewing" => Ok(ApplicationStatus::Interviewing),
            "hired" => Ok(ApplicationStatus::Hired),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

/// An application row as stored in the `applications` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    /// Candidate who applied (identity-provider user id)
    pub candidate_id: String,
    pub job_id: i64,
    /// Candidate display name
    pub name: Option<String>,
    pub status: ApplicationStatus,
    /// Years of experience
    pub experience: u32,
    pub education: String,
    pub skills: String,
    /// Public URL of the uploaded resume object
    pub resume: String,
    pub created_at: DateTime<Utc>,
}

/// A candidate's submission before the resume has been uploaded. The resume
/// URL is attached by the apply workflow once the upload succeeds.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicationDraft {
    #[validate(length(min = 1))]
    pub candidate_id: String,
    pub job_id: i64,
    pub name: Option<String>,
    #[validate(range(max = 60))]
    pub experience: u32,
    #[validate(length(min = 1, max = 200))]
    pub education: String,
    #[validate(length(min = 1, max = 500))]
    pub skills: String,
    #[serde(default)]
    pub status: ApplicationStatus,
}

impl ApplicationDraft {
    /// Attach the resume URL, producing the row to insert.
    pub fn into_record(self, resume_url: impl Into<String>) -> ApplicationRecord {
        ApplicationRecord {
            draft: self,
            resume: resume_url.into(),
        }
    }
}

/// The insert payload for the `applications` table: the draft plus the
/// computed resume URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(flatten)]
    pub draft: ApplicationDraft,
    pub resume: String,
}

/// The embedded job shape selected alongside a candidate's applications
/// (`job:jobs(title,company:companies(name))`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedJobRef {
    pub title: String,
    pub company: Option<AppliedCompanyRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedCompanyRef {
    pub name: String,
}

/// An application joined with its job title and company name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<AppliedJobRef>,
}
