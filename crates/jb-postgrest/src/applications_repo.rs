//! Typed repository for application rows.

use serde_json::json;
use tracing::info;

use jb_models::{Application, ApplicationRecord, ApplicationStatus, ApplicationWithJob};

use crate::client::{AccessToken, PostgrestClient};
use crate::error::{PostgrestError, PostgrestResult};
use crate::query::Query;

const TABLE: &str = "applications";

/// Select clause for a candidate's application list: the application row
/// plus the job title and company name for the card header.
const CANDIDATE_SELECT: &str = "*,job:jobs(title,company:companies(name))";

/// Repository for application rows.
pub struct ApplicationsRepo {
    client: PostgrestClient,
}

impl ApplicationsRepo {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// Insert a finished application record (resume already uploaded).
    pub async fn insert(
        &self,
        token: &AccessToken,
        record: &ApplicationRecord,
    ) -> PostgrestResult<Application> {
        let rows: Vec<Application> = self.client.insert_rows(token, TABLE, &[record]).await?;

        let application = rows.into_iter().next().ok_or_else(|| {
            PostgrestError::invalid_response("application insert returned no representation")
        })?;
        info!(
            application_id = application.id,
            job_id = application.job_id,
            "Created application"
        );
        Ok(application)
    }

    /// Move a single application to a new status, addressed by its own row
    /// id (never the job id — a job can carry many applications). Zero
    /// updated rows means the row is missing or not visible to the caller.
    pub async fn update_status(
        &self,
        token: &AccessToken,
        application_id: i64,
        status: ApplicationStatus,
    ) -> PostgrestResult<Application> {
        let query = Query::new().eq("id", application_id);
        let body = json!({ "status": status });

        let mut rows: Vec<Application> = self
            .client
            .update_rows(token, TABLE, &query, &body)
            .await?;

        let application = rows.pop().ok_or_else(|| {
            PostgrestError::not_found(format!(
                "application {} not updated (missing or not visible to caller)",
                application_id
            ))
        })?;
        info!(application_id, status = %status, "Updated application status");
        Ok(application)
    }

    /// All applications a candidate has submitted, with the job headline
    /// embedded.
    pub async fn list_for_candidate(
        &self,
        token: &AccessToken,
        candidate_id: &str,
    ) -> PostgrestResult<Vec<ApplicationWithJob>> {
        if candidate_id.trim().is_empty() {
            return Err(PostgrestError::missing_credential(
                "candidate id is missing",
            ));
        }

        let query = Query::new()
            .select(CANDIDATE_SELECT)
            .eq("candidate_id", candidate_id);

        self.client.select_rows(token, TABLE, &query).await
    }
}
