//! Typed repository for saved-job rows (the per-user bookmark list).

use tracing::info;

use jb_models::{NewSavedJob, SavedJob, SavedJobWithJob};

use crate::client::{AccessToken, PostgrestClient};
use crate::error::{PostgrestError, PostgrestResult};
use crate::query::Query;

const TABLE: &str = "saved_jobs";

/// Select clause for the saved list: the bookmark row plus the full job
/// card it points at.
const LIST_SELECT: &str = "*,job:jobs(*,company:companies(name,logo_url),saved:saved_jobs(id))";

/// Repository for saved-job rows.
pub struct SavedJobsRepo {
    client: PostgrestClient,
}

impl SavedJobsRepo {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// Bookmark a job for a user.
    pub async fn save(
        &self,
        token: &AccessToken,
        user_id: &str,
        job_id: i64,
    ) -> PostgrestResult<SavedJob> {
        Self::require_user(user_id)?;

        let row = NewSavedJob {
            user_id: user_id.to_string(),
            job_id,
        };
        let rows: Vec<SavedJob> = self.client.insert_rows(token, TABLE, &[row]).await?;

        rows.into_iter().next().ok_or_else(|| {
            PostgrestError::invalid_response("saved-job insert returned no representation")
        })
    }

    /// Remove a user's bookmark on a job. Returns how many rows were
    /// deleted (zero when the bookmark did not exist).
    pub async fn unsave(
        &self,
        token: &AccessToken,
        user_id: &str,
        job_id: i64,
    ) -> PostgrestResult<u64> {
        Self::require_user(user_id)?;

        let query = Query::new().eq("user_id", user_id).eq("job_id", job_id);

        let rows: Vec<SavedJob> = self.client.delete_rows(token, TABLE, &query).await?;
        Ok(rows.len() as u64)
    }

    /// Flip a bookmark: delete it when it exists, create it otherwise.
    /// Returns the new row when the job ends up saved, `None` when it ends
    /// up unsaved.
    pub async fn toggle(
        &self,
        token: &AccessToken,
        user_id: &str,
        job_id: i64,
        already_saved: bool,
    ) -> PostgrestResult<Option<SavedJob>> {
        if already_saved {
            let deleted = self.unsave(token, user_id, job_id).await?;
            info!(user_id, job_id, deleted, "Removed saved job");
            Ok(None)
        } else {
            let row = self.save(token, user_id, job_id).await?;
            info!(user_id, job_id, "Saved job");
            Ok(Some(row))
        }
    }

    /// All jobs the user has bookmarked, with the embedded job cards.
    pub async fn list(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> PostgrestResult<Vec<SavedJobWithJob>> {
        Self::require_user(user_id)?;

        let query = Query::new().select(LIST_SELECT).eq("user_id", user_id);

        self.client.select_rows(token, TABLE, &query).await
    }

    fn require_user(user_id: &str) -> PostgrestResult<()> {
        if user_id.trim().is_empty() {
            return Err(PostgrestError::missing_credential("user id is missing"));
        }
        Ok(())
    }
}
