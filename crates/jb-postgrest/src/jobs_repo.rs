//! Typed repository for job rows.

use serde_json::json;
use tracing::info;

use jb_models::{Job, JobDetail, JobDraft, JobFilter, JobSummary, Page, PageRequest};

use crate::client::{AccessToken, PostgrestClient};
use crate::error::{PostgrestError, PostgrestResult};
use crate::query::Query;

const TABLE: &str = "jobs";

/// Select clause for listings: the job row plus the company card fields and
/// the caller's saved-job markers (row-level security scopes the embed to
/// the current user).
const LIST_SELECT: &str = "*,company:companies(name,logo_url),saved:saved_jobs(id)";

/// Select clause for a single job page: company card plus all applications.
const DETAIL_SELECT: &str = "*,company:companies(name,logo_url),applications:applications(*)";

/// Repository for job rows.
pub struct JobsRepo {
    client: PostgrestClient,
}

impl JobsRepo {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// List open-board jobs matching the filter, one page at a time, with
    /// an exact total count for the pager.
    pub async fn list(
        &self,
        token: &AccessToken,
        filter: &JobFilter,
        page: &PageRequest,
    ) -> PostgrestResult<Page<JobSummary>> {
        let mut query = Query::new().select(LIST_SELECT).count_exact();

        if let Some(location) = filter.location.as_deref().filter(|s| !s.is_empty()) {
            query = query.eq("location", location);
        }
        if let Some(company_id) = filter.company_id {
            query = query.eq("company_id", company_id);
        }
        if let Some(search) = filter.search_query.as_deref().filter(|s| !s.is_empty()) {
            query = query.ilike_contains("title", search);
        }

        query = query.range(page.row_window());

        self.client.select_page(token, TABLE, &query).await
    }

    /// Fetch a single job with its company and applications. `Ok(None)`
    /// means the row does not exist (or is invisible to the caller).
    pub async fn get(
        &self,
        token: &AccessToken,
        job_id: i64,
    ) -> PostgrestResult<Option<JobDetail>> {
        let query = Query::new().select(DETAIL_SELECT).eq("id", job_id).limit(1);

        let mut rows: Vec<JobDetail> = self.client.select_rows(token, TABLE, &query).await?;
        Ok(rows.pop())
    }

    /// Post a new job.
    pub async fn create(&self, token: &AccessToken, draft: &JobDraft) -> PostgrestResult<Job> {
        let rows: Vec<Job> = self.client.insert_rows(token, TABLE, &[draft]).await?;

        let job = rows.into_iter().next().ok_or_else(|| {
            PostgrestError::invalid_response("job insert returned no representation")
        })?;
        info!(job_id = job.id, "Created job");
        Ok(job)
    }

    /// Open or close hiring for a job. Zero updated rows means the job does
    /// not exist or the caller is not its recruiter.
    pub async fn set_hiring_status(
        &self,
        token: &AccessToken,
        job_id: i64,
        is_open: bool,
    ) -> PostgrestResult<Job> {
        let query = Query::new().eq("id", job_id);
        let body = json!({ "isOpen": is_open });

        let rows: Vec<Job> = self
            .client
            .update_rows(token, TABLE, &query, &body)
            .await?;

        rows.into_iter().next().ok_or_else(|| {
            PostgrestError::not_found(format!(
                "job {} not updated (missing or not owned by caller)",
                job_id
            ))
        })
    }

    /// Delete a job, returning how many rows were removed. Zero is not an
    /// error here; the caller may surface it however it likes.
    pub async fn delete(&self, token: &AccessToken, job_id: i64) -> PostgrestResult<u64> {
        let query = Query::new().eq("id", job_id);

        let rows: Vec<Job> = self.client.delete_rows(token, TABLE, &query).await?;
        let deleted = rows.len() as u64;
        info!(job_id, deleted, "Deleted job rows");
        Ok(deleted)
    }

    /// All jobs posted by a recruiter, newest-first ordering left to the
    /// backend default.
    pub async fn list_for_recruiter(
        &self,
        token: &AccessToken,
        recruiter_id: &str,
    ) -> PostgrestResult<Vec<JobSummary>> {
        if recruiter_id.trim().is_empty() {
            return Err(PostgrestError::missing_credential(
                "recruiter id is missing",
            ));
        }

        let query = Query::new()
            .select("*,company:companies(name,logo_url)")
            .eq("recruiter_id", recruiter_id);

        self.client.select_rows(token, TABLE, &query).await
    }
}
