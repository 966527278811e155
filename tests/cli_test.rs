//! Command dispatch against a stub backend with file-backed sessions

mod common;

use std::path::Path;

use axum::http::Method;
use clap::Parser;
use common::{application_json, posting_json, user, StubBackend, TWO_PAGE_PDF};
use good_job::cli::{self, Cli};
use good_job::core::FileStorage;
use good_job::{Portal, SessionStore};
use serde_json::json;
use tempfile::TempDir;

fn session_at(dir: &Path, portal: Portal) -> SessionStore {
    SessionStore::open(portal, FileStorage::for_portal(dir, portal)).unwrap()
}

fn sign_in(dir: &Path, portal: Portal, token: &str) {
    let mut session = session_at(dir, portal);
    session
        .login(user(1, "Sam", portal), token.to_string())
        .unwrap();
}

async fn goodjob(backend: &StubBackend, dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec![
        "goodjob".to_string(),
        "--api-url".to_string(),
        backend.api_url(),
        "--session-dir".to_string(),
        dir.display().to_string(),
    ];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    cli::run(Cli::try_parse_from(argv)?).await
}

#[tokio::test]
async fn employer_post_sends_the_form() {
    let backend = StubBackend::start().await;
    backend.respond_json(
        Method::POST,
        "/api/job-postings",
        201,
        posting_json(31, "Backend Engineer", "Acme", "Remote"),
    );
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Employer, "tok");

    goodjob(
        &backend,
        dir.path(),
        &[
            "employer",
            "post",
            "--title",
            "Backend Engineer",
            "--company",
            "Acme",
            "--description",
            "Build APIs",
            "--location",
            "Remote",
            "--salary",
            "75000",
            "--employment-type",
            "Part-time",
        ],
    )
    .await
    .unwrap();

    let requests = backend.requests_to("/api/job-postings");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok"));
    let body = requests[0].json();
    assert_eq!(body["title"], "Backend Engineer");
    assert_eq!(body["company_name"], "Acme");
    assert_eq!(body["salary"], json!(75000.0));
    assert_eq!(body["employment_type"], "Part-time");
}

#[tokio::test]
async fn employer_post_without_salary_stays_offline() {
    let backend = StubBackend::start().await;
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Employer, "tok");

    let err = goodjob(
        &backend,
        dir.path(),
        &["employer", "post", "--title", "Designer", "--company", "Globex"],
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Job description is required");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn set_status_updates_the_application() {
    let backend = StubBackend::start().await;
    backend.respond_json(
        Method::GET,
        "/api/job-applications/7",
        200,
        application_json(7, 2, "pending", "Ann"),
    );
    backend.respond_json(
        Method::GET,
        "/api/job-postings/2/applications",
        200,
        json!([application_json(7, 2, "pending", "Ann")]),
    );
    backend.respond_json(
        Method::PUT,
        "/api/job-applications/7",
        200,
        application_json(7, 2, "accepted", "Ann"),
    );
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Employer, "tok");

    goodjob(&backend, dir.path(), &["employer", "set-status", "7", "approved"])
        .await
        .unwrap();

    let updates: Vec<_> = backend
        .requests_to("/api/job-applications/7")
        .into_iter()
        .filter(|request| request.method == Method::PUT)
        .collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].json(), json!({ "status": "accepted" }));
    assert!(session_at(dir.path(), Portal::Employer).is_authenticated());
}

#[tokio::test]
async fn set_status_with_rejected_token_clears_the_session_file() {
    let backend = StubBackend::start().await;
    backend.respond_json(
        Method::GET,
        "/api/job-applications/7",
        401,
        json!({ "message": "Unauthenticated." }),
    );
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Employer, "stale");

    let err = goodjob(&backend, dir.path(), &["employer", "set-status", "7", "accepted"])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Session expired. Please log in again.");
    let session = session_at(dir.path(), Portal::Employer);
    assert!(!session.is_authenticated());
    assert_eq!(session.storage().get("token").unwrap(), None);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn set_status_when_signed_out_sends_nothing() {
    let backend = StubBackend::start().await;
    let dir = TempDir::new().unwrap();

    let err = goodjob(&backend, dir.path(), &["employer", "set-status", "7", "rejected"])
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Not signed in."), "{}", err);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn talent_apply_uploads_the_resume_file() {
    let backend = StubBackend::start().await;
    backend.respond_json(
        Method::GET,
        "/api/job-postings/3",
        200,
        posting_json(3, "Backend Engineer", "Acme Corp", "Remote"),
    );
    backend.respond_json(
        Method::POST,
        "/api/job-postings/3/apply",
        201,
        application_json(70, 3, "pending", "Sam"),
    );
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Talent, "tok");
    let resume = dir.path().join("cv.pdf");
    std::fs::write(&resume, TWO_PAGE_PDF).unwrap();

    goodjob(
        &backend,
        dir.path(),
        &["talent", "apply", "3", resume.to_str().unwrap()],
    )
    .await
    .unwrap();

    let uploads = backend.requests_to("/api/job-postings/3/apply");
    assert_eq!(uploads.len(), 1);
    let content_type = uploads[0].content_type.clone().unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"), "{}", content_type);
    assert!(uploads[0].body_text().contains(r#"filename="cv.pdf""#));
}

#[tokio::test]
async fn talent_apply_rejects_unsupported_resume_before_upload() {
    let backend = StubBackend::start().await;
    backend.respond_json(
        Method::GET,
        "/api/job-postings/3",
        200,
        posting_json(3, "Backend Engineer", "Acme Corp", "Remote"),
    );
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Talent, "tok");
    let resume = dir.path().join("cv.txt");
    std::fs::write(&resume, "plain text").unwrap();

    assert!(goodjob(
        &backend,
        dir.path(),
        &["talent", "apply", "3", resume.to_str().unwrap()],
    )
    .await
    .is_err());
    assert!(backend.requests_to("/api/job-postings/3/apply").is_empty());
}

#[tokio::test]
async fn talent_resume_saves_the_document() {
    let backend = StubBackend::start().await;
    let mut listed = application_json(5, 3, "pending", "Sam");
    listed["resume_url"] = json!(format!("{}/files/cv.pdf", backend.origin));
    backend.respond_json(Method::GET, "/api/my-applications", 200, json!([listed]));
    backend.respond(Method::GET, "/files/cv.pdf", 200, TWO_PAGE_PDF);
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), Portal::Talent, "tok");
    let out = dir.path().join("downloads").join("resume.pdf");

    goodjob(
        &backend,
        dir.path(),
        &["talent", "resume", "5", "--out", out.to_str().unwrap()],
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read(&out).unwrap(), TWO_PAGE_PDF.as_bytes());
}
