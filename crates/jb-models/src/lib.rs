//! Shared data models for the job-board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and companies, including the embedded shapes PostgREST returns
//! - Applications and their status lifecycle
//! - Saved-job bookmarks
//! - Filtering and range pagination

pub mod application;
pub mod company;
pub mod job;
pub mod paging;
pub mod saved_job;

// Re-export common types
pub use application::{
    Application, ApplicationDraft, ApplicationRecord, ApplicationStatus, ApplicationWithJob,
};
pub use company::{Company, CompanyRef};
pub use job::{Job, JobDetail, JobDraft, JobSummary, SavedMarker};
pub use paging::{JobFilter, Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use saved_job::{NewSavedJob, SavedJob, SavedJobWithJob};
