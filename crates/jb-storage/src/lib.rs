//! Resume object storage client.
//!
//! This crate provides:
//! - Resume upload/delete against the hosted storage REST surface
//! - Collision-proof object naming
//! - Public URL construction for uploaded resumes

pub mod client;
pub mod error;

pub use client::{resume_object_name, ResumeStore, StorageConfig, RESUME_BUCKET};
pub use error::{StorageError, StorageResult};
