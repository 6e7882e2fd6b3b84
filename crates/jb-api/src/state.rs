//! Application state.

use std::sync::Arc;

use jb_client::ApplicationService;
use jb_postgrest::{ApplicationsRepo, CompaniesRepo, JobsRepo, PostgrestClient, SavedJobsRepo};
use jb_storage::ResumeStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub postgrest: PostgrestClient,
    pub storage: ResumeStore,
    pub jobs: Arc<JobsRepo>,
    pub saved_jobs: Arc<SavedJobsRepo>,
    pub applications: Arc<ApplicationsRepo>,
    pub companies: Arc<CompaniesRepo>,
    pub apply: Arc<ApplicationService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let postgrest = PostgrestClient::from_env()?;
        let storage = ResumeStore::from_env()?;

        let jobs = Arc::new(JobsRepo::new(postgrest.clone()));
        let saved_jobs = Arc::new(SavedJobsRepo::new(postgrest.clone()));
        let applications = Arc::new(ApplicationsRepo::new(postgrest.clone()));
        let companies = Arc::new(CompaniesRepo::new(postgrest.clone()));
        let apply = Arc::new(ApplicationService::new(
            ApplicationsRepo::new(postgrest.clone()),
            storage.clone(),
        ));

        Ok(Self {
            config,
            postgrest,
            storage,
            jobs,
            saved_jobs,
            applications,
            companies,
            apply,
        })
    }
}
