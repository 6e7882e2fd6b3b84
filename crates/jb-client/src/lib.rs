//! Client workflows for the job board.
//!
//! This crate provides:
//! - Session token provisioning (provider trait, Clerk backend, cache)
//! - Observable fetch state with stale-response protection
//! - The apply saga (resume upload + application insert with compensation)
//! - Job-listing filter and pagination state

pub mod apply;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod session;

pub use apply::{ApplicationService, ResumeUpload, ALLOWED_RESUME_TYPES};
pub use error::{ClientError, ClientResult};
pub use fetch::{FetchState, Fetcher};
pub use listing::JobListing;
pub use session::{
    ClerkConfig, ClerkTokenProvider, StaticTokenProvider, TokenCache, TokenProvider,
};
