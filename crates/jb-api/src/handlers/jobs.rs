//! Job API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use jb_models::{
    Job, JobDetail, JobDraft, JobFilter, JobSummary, PageRequest, SavedJobWithJob,
    DEFAULT_PAGE_SIZE,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

// =============================================================================
// Listing
// =============================================================================

/// Query parameters for the job listing.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search_query: Option<String>,
    pub location: Option<String>,
    pub company_id: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// One page of the job board.
#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
    pub total_count: u64,
    pub page: u32,
    pub total_pages: u32,
}

/// List jobs matching the filters, one page at a time.
pub async fn list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let token = auth.access_token()?;

    let filter = JobFilter {
        search_query: query.search_query,
        location: query.location,
        company_id: query.company_id,
    };
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    );

    let result = state.jobs.list(&token, &filter, &page).await?;
    let total_pages = result.total_pages(page.page_size);

    Ok(Json(JobListResponse {
        jobs: result.rows,
        total_count: result.total_count,
        page: page.page,
        total_pages,
    }))
}

// =============================================================================
// Single job
// =============================================================================

/// Fetch a single job with its company and applications.
pub async fn get_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<JobDetail>> {
    let token = auth.access_token()?;

    let detail = state
        .jobs
        .get(&token, job_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("job {} not found", job_id)))?;

    Ok(Json(detail))
}

/// Payload for posting a job. The recruiter is the authenticated caller.
#[derive(Debug, Deserialize, Validate)]
pub struct NewJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    pub company_id: i64,
}

/// Post a new job.
pub async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<NewJobRequest>,
) -> ApiResult<Json<Job>> {
    request.validate()?;
    let token = auth.access_token()?;

    let draft = JobDraft {
        title: request.title,
        description: request.description,
        location: request.location,
        company_id: request.company_id,
        recruiter_id: auth.user_id.clone(),
        is_open: true,
    };

    let job = state.jobs.create(&token, &draft).await?;
    metrics::record_job_posted();
    Ok(Json(job))
}

/// Payload for opening or closing hiring.
#[derive(Debug, Deserialize)]
pub struct HiringStatusRequest {
    pub is_open: bool,
}

/// Open or close hiring for a job.
pub async fn update_hiring_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<i64>,
    Json(request): Json<HiringStatusRequest>,
) -> ApiResult<Json<Job>> {
    let token = auth.access_token()?;

    let job = state
        .jobs
        .set_hiring_status(&token, job_id, request.is_open)
        .await?;
    info!(job_id, is_open = request.is_open, "Hiring status updated");
    Ok(Json(job))
}

#[derive(Serialize)]
pub struct DeleteJobResponse {
    pub deleted: u64,
}

/// Delete a job posting.
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<DeleteJobResponse>> {
    let token = auth.access_token()?;

    let deleted = state.jobs.delete(&token, job_id).await?;
    Ok(Json(DeleteJobResponse { deleted }))
}

// =============================================================================
// Saved jobs
// =============================================================================

#[derive(Serialize)]
pub struct SaveJobResponse {
    pub saved: bool,
}

/// Bookmark a job for the caller.
pub async fn save_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<SaveJobResponse>> {
    let token = auth.access_token()?;

    let row = state
        .saved_jobs
        .toggle(&token, &auth.user_id, job_id, false)
        .await?;
    Ok(Json(SaveJobResponse {
        saved: row.is_some(),
    }))
}

/// Remove the caller's bookmark on a job.
pub async fn unsave_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<SaveJobResponse>> {
    let token = auth.access_token()?;

    let row = state
        .saved_jobs
        .toggle(&token, &auth.user_id, job_id, true)
        .await?;
    Ok(Json(SaveJobResponse {
        saved: row.is_some(),
    }))
}

/// List the caller's bookmarked jobs.
pub async fn list_saved_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SavedJobWithJob>>> {
    let token = auth.access_token()?;

    let saved = state.saved_jobs.list(&token, &auth.user_id).await?;
    Ok(Json(saved))
}

// =============================================================================
// Recruiter's jobs
// =============================================================================

/// List the jobs the caller has posted.
pub async fn list_my_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<JobSummary>>> {
    let token = auth.access_token()?;

    let jobs = state.jobs.list_for_recruiter(&token, &auth.user_id).await?;
    Ok(Json(jobs))
}
