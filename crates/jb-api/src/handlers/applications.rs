//! Application API handlers.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use jb_client::ResumeUpload;
use jb_models::{Application, ApplicationDraft, ApplicationStatus, ApplicationWithJob};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Apply to a job. Multipart form: text fields plus the resume file.
pub async fn apply_to_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<Json<Application>> {
    let token = auth.access_token()?;
    let form = ApplyForm::from_multipart(multipart).await?;

    let draft = ApplicationDraft {
        candidate_id: auth.user_id.clone(),
        job_id,
        name: form.name,
        experience: form.experience,
        education: form.education,
        skills: form.skills,
        status: ApplicationStatus::default(),
    };
    let resume = ResumeUpload {
        content_type: form.resume_content_type,
        bytes: form.resume_bytes,
    };

    let application = state.apply.submit(&token, draft, resume).await?;
    metrics::record_application_submitted();
    info!(
        application_id = application.id,
        job_id, "Application accepted"
    );
    Ok(Json(application))
}

/// Payload for moving an application to a new status.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// Update the status of one application, addressed by its row id.
pub async fn update_application_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<Json<Application>> {
    let token = auth.access_token()?;

    let updated = state
        .applications
        .update_status(&token, application_id, request.status)
        .await?;
    Ok(Json(updated))
}

/// List the caller's submitted applications with their job headlines.
pub async fn list_my_applications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ApplicationWithJob>>> {
    let token = auth.access_token()?;

    let applications = state
        .applications
        .list_for_candidate(&token, &auth.user_id)
        .await?;
    Ok(Json(applications))
}

// =============================================================================
// Multipart parsing
// =============================================================================

struct ApplyForm {
    name: Option<String>,
    experience: u32,
    education: String,
    skills: String,
    resume_content_type: String,
    resume_bytes: Vec<u8>,
}

impl ApplyForm {
    async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut name = None;
        let mut experience = None;
        let mut education = None;
        let mut skills = None;
        let mut resume = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
        {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "name" => name = Some(Self::text(field).await?),
                "experience" => {
                    let raw = Self::text(field).await?;
                    let years = raw.parse::<u32>().map_err(|_| {
                        ApiError::bad_request(format!("experience must be a number, got {:?}", raw))
                    })?;
                    experience = Some(years);
                }
                "education" => education = Some(Self::text(field).await?),
                "skills" => skills = Some(Self::text(field).await?),
                "resume" => {
                    let content_type = field
                        .content_type()
                        .map(|ct| ct.to_string())
                        .unwrap_or_default();
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::bad_request(format!("failed to read resume: {}", e))
                    })?;
                    resume = Some((content_type, bytes.to_vec()));
                }
                other => {
                    return Err(ApiError::bad_request(format!(
                        "unexpected form field: {}",
                        other
                    )));
                }
            }
        }

        let (resume_content_type, resume_bytes) =
            resume.ok_or_else(|| ApiError::bad_request("resume file is required"))?;

        Ok(Self {
            name: name.filter(|s| !s.trim().is_empty()),
            experience: experience
                .ok_or_else(|| ApiError::bad_request("experience is required"))?,
            education: education.ok_or_else(|| ApiError::bad_request("education is required"))?,
            skills: skills.ok_or_else(|| ApiError::bad_request("skills is required"))?,
            resume_content_type,
            resume_bytes,
        })
    }

    async fn text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
        field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed form field: {}", e)))
    }
}
