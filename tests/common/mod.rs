//! Common test utilities: a stub job-board backend and JSON fixtures

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use good_job::core::{MemoryStorage, SessionStore};
use good_job::types::User;
use good_job::{ApiClient, Portal};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

/// One request as the stub saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Canned-response HTTP server on an ephemeral port. Unknown routes get 404.
pub struct StubBackend {
    pub origin: String,
    state: StubState,
    task: JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().unwrap();

        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend stopped");
        });

        Self {
            origin: format!("http://{}", addr),
            state,
            task,
        }
    }

    /// `http://127.0.0.1:<port>/api`
    pub fn api_url(&self) -> String {
        format!("{}/api", self.origin)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.api_url(), None).unwrap()
    }

    /// Serve `body` with `status` for `method path` (path includes `/api`).
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.state.routes.lock().unwrap().insert(
            (method, path.to_string()),
            (StatusCode::from_u16(status).unwrap(), body.into()),
        );
    }

    pub fn respond_json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond(method, path, status, body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: header(AUTHORIZATION),
        accept: header(ACCEPT),
        content_type: header(CONTENT_TYPE),
        body: body.to_vec(),
    });

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method, uri.path().to_string()))
        .cloned();

    match canned {
        Some((status, body)) => (status, [(CONTENT_TYPE, "application/json")], body).into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#).into_response(),
    }
}

// ===== Fixtures =====

pub fn user_json(id: u64, name: &str, account_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.test", name.to_lowercase()),
        "type": account_type,
        "email_verified_at": null,
        "created_at": "2024-04-01T08:30:00.000000Z",
        "updated_at": "2024-04-01T08:30:00.000000Z"
    })
}

pub fn user(id: u64, name: &str, portal: Portal) -> User {
    serde_json::from_value(user_json(id, name, portal.account_type().as_str())).unwrap()
}

pub fn posting_json(id: u64, title: &str, company: &str, location: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "title": title,
        "description": "Work on interesting things.",
        "company_name": company,
        "location": location,
        "salary": "75000.00",
        "employment_type": "Full-time",
        "posted_at": "2024-04-02 09:00:00",
        "closes_at": "2024-05-02T09:00:00.000000Z",
        "created_at": "2024-04-02T09:00:00.000000Z",
        "updated_at": "2024-04-02T09:00:00.000000Z"
    })
}

pub fn application_json(id: u64, job_posting_id: u64, status: &str, applicant: &str) -> Value {
    json!({
        "id": id,
        "job_posting_id": job_posting_id,
        "user_id": 20 + id,
        "status": status,
        "resume_path": format!("resumes/{}.pdf", id),
        "resume_url": format!("good-job.litegral.com/resumes/{}.pdf", id),
        "created_at": "2024-04-03T10:00:00.000000Z",
        "updated_at": "2024-04-03T10:00:00.000000Z",
        "user": { "name": applicant, "email": format!("{}@example.test", applicant.to_lowercase()) },
        "job_posting": {
            "id": job_posting_id,
            "title": "Backend Engineer",
            "company_name": "Acme Corp",
            "location": "Remote"
        }
    })
}

/// In-memory session already signed in with `token`
pub fn signed_in(portal: Portal, token: &str) -> SessionStore {
    let mut session = SessionStore::new(portal, MemoryStorage::new());
    session
        .login(user(1, "Sam", portal), token.to_string())
        .unwrap();
    session
}

/// Minimal two-page PDF
pub const TWO_PAGE_PDF: &str = "%PDF-1.4\n1 0 obj << /Type /Pages /Kids [2 0 R 3 0 R] /Count 2 >>\n\
2 0 obj << /Type /Page /Parent 1 0 R >>\n3 0 obj << /Type /Page /Parent 1 0 R >>\n%%EOF\n";
