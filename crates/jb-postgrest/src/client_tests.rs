//! HTTP-level tests for the PostgREST client and repositories.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jb_models::{ApplicationStatus, JobFilter, PageRequest};

use crate::client::{AccessToken, PostgrestClient, PostgrestConfig};
use crate::error::PostgrestError;
use crate::query::Query;
use crate::retry::RetryConfig;
use crate::{ApplicationsRepo, JobsRepo, SavedJobsRepo};

// =============================================================================
// Test helpers
// =============================================================================

fn test_client(base_url: &str) -> PostgrestClient {
    let config = PostgrestConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        anon_key: "anon-key".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    };
    PostgrestClient::new(config).expect("client builds")
}

fn token() -> AccessToken {
    AccessToken::new("user-jwt").expect("token is non-empty")
}

fn job_row(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Rust Engineer",
        "description": "Build services",
        "location": "Bangalore",
        "company_id": 4,
        "recruiter_id": "user_123",
        "isOpen": true,
        "created_at": "2024-05-01T10:00:00Z"
    })
}

// =============================================================================
// Client tests
// =============================================================================

#[tokio::test]
async fn test_select_page_sends_auth_and_range_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-jwt"))
        .and(header("Range", "6-11"))
        .and(header("Range-Unit", "items"))
        .and(header("Prefer", "count=exact"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "6-7/13")
                .set_body_json(json!([job_row(7), job_row(8)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = Query::new().select("*").range((6, 11)).count_exact();

    let page: jb_models::Page<serde_json::Value> = client
        .select_page(&token(), "jobs", &query)
        .await
        .expect("page fetch succeeds");

    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.total_count, 13);
}

#[tokio::test]
async fn test_select_page_without_content_range_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = Query::new().count_exact();

    let result: Result<jb_models::Page<serde_json::Value>, _> =
        client.select_page(&token(), "jobs", &query).await;

    assert!(matches!(result, Err(PostgrestError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result: Result<Vec<serde_json::Value>, _> = client
        .select_rows(&token(), "jobs", &Query::new())
        .await;

    assert!(matches!(result, Err(PostgrestError::NotFound(_))));
}

#[tokio::test]
async fn test_server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_row(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let rows: Vec<serde_json::Value> = client
        .select_rows(&token(), "jobs", &Query::new())
        .await
        .expect("succeeds after retries");

    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_insert_sends_representation_preference() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/saved_jobs"))
        .and(header("Prefer", "return=representation"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([{ "id": 9, "user_id": "user_123", "job_id": 7 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let rows: Vec<serde_json::Value> = client
        .insert_rows(
            &token(),
            "saved_jobs",
            &json!([{ "user_id": "user_123", "job_id": 7 }]),
        )
        .await
        .expect("insert succeeds");

    assert_eq!(rows[0]["id"], 9);
}

// =============================================================================
// Repository tests
// =============================================================================

#[tokio::test]
async fn test_jobs_list_renders_filters_and_embeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param(
            "select",
            "*,company:companies(name,logo_url),saved:saved_jobs(id)",
        ))
        .and(query_param("location", "eq.Delhi"))
        .and(query_param("company_id", "eq.4"))
        .and(query_param("title", "ilike.*rust*"))
        .and(header("Range", "0-5"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "0-0/1")
                .set_body_json(json!([job_row(1)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repo = JobsRepo::new(test_client(&server.uri()));
    let filter = JobFilter {
        search_query: Some("rust".into()),
        location: Some("Delhi".into()),
        company_id: Some(4),
    };

    let page = repo
        .list(&token(), &filter, &PageRequest::new(1, 6))
        .await
        .expect("list succeeds");

    assert_eq!(page.total_count, 1);
    assert_eq!(page.rows[0].job.title, "Rust Engineer");
}

#[tokio::test]
async fn test_jobs_get_returns_none_for_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("id", "eq.42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = JobsRepo::new(test_client(&server.uri()));
    let detail = repo.get(&token(), 42).await.expect("get succeeds");
    assert!(detail.is_none());
}

#[tokio::test]
async fn test_set_hiring_status_zero_rows_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = JobsRepo::new(test_client(&server.uri()));
    let result = repo.set_hiring_status(&token(), 7, false).await;
    assert!(matches!(result, Err(PostgrestError::NotFound(_))));
}

#[tokio::test]
async fn test_update_application_status_zero_rows_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/applications"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = ApplicationsRepo::new(test_client(&server.uri()));
    let result = repo
        .update_status(&token(), 7, ApplicationStatus::Interviewing)
        .await;
    assert!(matches!(result, Err(PostgrestError::NotFound(_))));
}

#[tokio::test]
async fn test_update_status_targets_one_application_by_id() {
    let server = MockServer::start().await;

    // The filter must address the application row itself, not its job:
    // a job carries many applications and only one may change state here.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/applications"))
        .and(query_param("id", "eq.31"))
        .and(body_json(json!({ "status": "hired" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 31,
            "candidate_id": "user_456",
            "job_id": 7,
            "name": "Asha",
            "status": "hired",
            "experience": 4,
            "education": "Graduate",
            "skills": "rust, sql",
            "resume": "https://cdn.example.com/resume-abc",
            "created_at": "2024-05-01T10:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let repo = ApplicationsRepo::new(test_client(&server.uri()));
    let application = repo
        .update_status(&token(), 31, ApplicationStatus::Hired)
        .await
        .expect("update succeeds");

    assert_eq!(application.id, 31);
    assert_eq!(application.status, ApplicationStatus::Hired);
}

#[tokio::test]
async fn test_saved_jobs_save_then_unsave_round_trips() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/saved_jobs"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!([{ "user_id": "user_1", "job_id": 7 }])))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([{ "id": 9, "user_id": "user_1", "job_id": 7 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/saved_jobs"))
        .and(query_param("user_id", "eq.user_1"))
        .and(query_param("job_id", "eq.7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 9, "user_id": "user_1", "job_id": 7 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repo = SavedJobsRepo::new(test_client(&server.uri()));

    let saved = repo
        .toggle(&token(), "user_1", 7, false)
        .await
        .expect("save succeeds");
    assert_eq!(saved.as_ref().map(|s| s.id), Some(9));

    let unsaved = repo
        .toggle(&token(), "user_1", 7, true)
        .await
        .expect("unsave succeeds");
    assert!(unsaved.is_none());
}
