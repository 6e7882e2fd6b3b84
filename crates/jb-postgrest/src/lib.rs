//! PostgREST data-access layer for the job board.
//!
//! This crate provides:
//! - A tuned HTTP client for the hosted REST surface (anon key + per-user
//!   bearer token, range pagination, exact counts)
//! - Typed repositories for jobs, saved jobs, applications and companies
//! - Retry logic with exponential backoff and jitter
//! - A composable query builder for filters and embedded resources

pub mod applications_repo;
pub mod client;
pub mod companies_repo;
pub mod error;
pub mod jobs_repo;
pub mod metrics;
pub mod query;
pub mod retry;
pub mod saved_jobs_repo;

#[cfg(test)]
mod client_tests;

pub use applications_repo::ApplicationsRepo;
pub use client::{AccessToken, PostgrestClient, PostgrestConfig};
pub use companies_repo::CompaniesRepo;
pub use error::{PostgrestError, PostgrestResult};
pub use jobs_repo::JobsRepo;
pub use query::Query;
pub use retry::RetryConfig;
pub use saved_jobs_repo::SavedJobsRepo;
