//! Axum HTTP API server for the job board.
//!
//! This crate provides:
//! - REST endpoints for jobs, saved jobs, applications and companies
//! - Bearer-token authentication with the session token forwarded to the
//!   data layer for row-level-security authorization
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
