//! Apply workflow.
//!
//! Submitting an application is a two-step saga: upload the resume, then
//! insert the application row pointing at it. An upload failure aborts
//! before the insert; an insert failure deletes the just-uploaded resume
//! so the bucket does not accumulate orphans.

use tracing::{info, warn};
use validator::Validate;

use jb_models::{Application, ApplicationDraft};
use jb_postgrest::{AccessToken, ApplicationsRepo};
use jb_storage::{resume_object_name, ResumeStore};

use crate::error::{ClientError, ClientResult};

/// Resume content types the form accepts (PDF and Word).
pub const ALLOWED_RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// An uploaded resume file, as received from the form.
pub struct ResumeUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    fn validate(&self) -> ClientResult<()> {
        if self.bytes.is_empty() {
            return Err(ClientError::validation("resume file is empty"));
        }
        if !ALLOWED_RESUME_TYPES.contains(&self.content_type.as_str()) {
            return Err(ClientError::validation(format!(
                "unsupported resume type: {}",
                self.content_type
            )));
        }
        Ok(())
    }
}

/// Runs the apply saga.
pub struct ApplicationService {
    applications: ApplicationsRepo,
    store: ResumeStore,
}

impl ApplicationService {
    pub fn new(applications: ApplicationsRepo, store: ResumeStore) -> Self {
        Self {
            applications,
            store,
        }
    }

    /// Submit an application: validate, upload the resume, insert the row.
    pub async fn submit(
        &self,
        token: &AccessToken,
        draft: ApplicationDraft,
        resume: ResumeUpload,
    ) -> ClientResult<Application> {
        draft.validate()?;
        resume.validate()?;

        let object_name = resume_object_name(&draft.candidate_id);
        let resume_url = self
            .store
            .upload_resume(
                token.as_str(),
                &object_name,
                &resume.content_type,
                resume.bytes,
            )
            .await?;

        let record = draft.into_record(resume_url);
        match self.applications.insert(token, &record).await {
            Ok(application) => {
                info!(
                    application_id = application.id,
                    job_id = application.job_id,
                    "Application submitted"
                );
                Ok(application)
            }
            Err(e) => {
                // Compensate: the row never landed, so the upload must go too
                if let Err(del) = self.store.delete_resume(token.as_str(), &object_name).await {
                    warn!(
                        object_name,
                        "Failed to delete resume after insert failure, object orphaned: {}", del
                    );
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use jb_models::ApplicationStatus;
    use jb_postgrest::{PostgrestClient, PostgrestConfig, RetryConfig};
    use jb_storage::StorageConfig;

    fn service(base_url: &str) -> ApplicationService {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = PostgrestClient::new(PostgrestConfig {
            base_url: base_url.clone(),
            anon_key: "anon-key".to_string(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            retry: RetryConfig {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 2,
            },
        })
        .expect("client builds");
        let store = ResumeStore::new(StorageConfig {
            base_url,
            anon_key: "anon-key".to_string(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        })
        .expect("store builds");

        ApplicationService::new(ApplicationsRepo::new(client), store)
    }

    fn token() -> AccessToken {
        AccessToken::new("user-jwt").expect("token is non-empty")
    }

    fn draft() -> ApplicationDraft {
        ApplicationDraft {
            candidate_id: "user_1".to_string(),
            job_id: 9,
            name: Some("Asha".to_string()),
            experience: 4,
            education: "B.Tech".to_string(),
            skills: "Rust, SQL".to_string(),
            status: ApplicationStatus::default(),
        }
    }

    fn pdf() -> ResumeUpload {
        ResumeUpload {
            content_type: "application/pdf".to_string(),
            bytes: vec![b'%', b'P', b'D', b'F'],
        }
    }

    fn inserted_row() -> serde_json::Value {
        json!([{
            "id": 31,
            "candidate_id": "user_1",
            "job_id": 9,
            "name": "Asha",
            "status": "applied",
            "experience": 4,
            "education": "B.Tech",
            "skills": "Rust, SQL",
            "resume": "https://base/storage/v1/object/public/resumes/r",
            "created_at": "2024-05-01T10:00:00Z"
        }])
    }

    #[tokio::test]
    async fn test_submit_uploads_then_inserts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex("^/storage/v1/object/resumes/resume-.*-user_1$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/applications"))
            .respond_with(ResponseTemplate::new(201).set_body_json(inserted_row()))
            .expect(1)
            .mount(&server)
            .await;

        let application = service(&server.uri())
            .submit(&token(), draft(), pdf())
            .await
            .expect("submit succeeds");

        assert_eq!(application.id, 31);
        assert_eq!(application.status, ApplicationStatus::Applied);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_before_insert() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex("^/storage/v1/object/resumes/.*"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/applications"))
            .respond_with(ResponseTemplate::new(201).set_body_json(inserted_row()))
            .expect(0)
            .mount(&server)
            .await;

        let result = service(&server.uri()).submit(&token(), draft(), pdf()).await;
        assert!(matches!(result, Err(ClientError::Storage(_))));
    }

    #[tokio::test]
    async fn test_insert_failure_deletes_uploaded_resume() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex("^/storage/v1/object/resumes/.*"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/applications"))
            .respond_with(ResponseTemplate::new(400).set_body_string("constraint violation"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path_regex("^/storage/v1/object/resumes/resume-.*-user_1$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = service(&server.uri()).submit(&token(), draft(), pdf()).await;
        assert!(matches!(result, Err(ClientError::Postgrest(_))));
    }

    #[tokio::test]
    async fn test_invalid_draft_never_touches_the_network() {
        let mut bad = draft();
        bad.education = String::new();

        let result = service("http://localhost:1")
            .submit(&token(), bad, pdf())
            .await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unsupported_resume_type_is_rejected() {
        let result = service("http://localhost:1")
            .submit(
                &token(),
                draft(),
                ResumeUpload {
                    content_type: "image/png".to_string(),
                    bytes: vec![1],
                },
            )
            .await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}
