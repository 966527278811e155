// src/core/api_client.rs
//! Gateway to the job-board REST API - one method per endpoint, one request per call

use anyhow::Context;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::app_log;
use crate::error::ApiError;
use crate::resume_validator::ResumeFile;
use crate::types::application::StatusUpdate;
use crate::types::{
    ApplicationStatus, AuthResponse, ErrorBody, JobApplication, JobPosting, LoginRequest,
    NewJobPosting, Paginated, RegisterRequest, UpdateProfileRequest, User,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

const REGISTER_ENDPOINT: &str = "/register";
const LOGIN_ENDPOINT: &str = "/login";
const USER_ENDPOINT: &str = "/user";
const PROFILE_ENDPOINT: &str = "/profile";
const MY_JOB_POSTINGS_ENDPOINT: &str = "/my-job-postings";
const JOB_POSTINGS_ENDPOINT: &str = "/job-postings";
const MY_APPLICATIONS_ENDPOINT: &str = "/my-applications";
const JOB_APPLICATIONS_ENDPOINT: &str = "/job-applications";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `timeout` of `None` leaves the network stack default in place.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ===== Authentication =====

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, REGISTER_ENDPOINT, None).json(request);
        self.execute(builder, false, "Failed to register").await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, LOGIN_ENDPOINT, None).json(request);
        self.execute(builder, false, "Failed to login").await
    }

    pub async fn fetch_profile(&self, token: &str) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, USER_ENDPOINT, Some(token));
        self.execute(builder, true, "Failed to fetch profile. Please try again later.")
            .await
    }

    pub async fn update_profile(
        &self,
        token: &str,
        request: &UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        let builder = self
            .request(Method::PUT, PROFILE_ENDPOINT, Some(token))
            .json(request);
        self.execute(builder, true, "Failed to update profile").await
    }

    // ===== Job Postings =====

    pub async fn list_my_job_postings(
        &self,
        token: &str,
    ) -> Result<Paginated<JobPosting>, ApiError> {
        let builder = self.request(Method::GET, MY_JOB_POSTINGS_ENDPOINT, Some(token));
        self.execute(builder, true, "Failed to fetch job postings").await
    }

    /// Public board. The token is attached when there is one.
    pub async fn list_job_postings(
        &self,
        token: Option<&str>,
    ) -> Result<Paginated<JobPosting>, ApiError> {
        let builder = self.request(Method::GET, JOB_POSTINGS_ENDPOINT, token);
        self.execute(builder, token.is_some(), "Failed to fetch job postings")
            .await
    }

    pub async fn get_job_posting(
        &self,
        token: Option<&str>,
        job_posting_id: u64,
    ) -> Result<JobPosting, ApiError> {
        let path = format!("{}/{}", JOB_POSTINGS_ENDPOINT, job_posting_id);
        let builder = self.request(Method::GET, &path, token);
        self.execute(builder, token.is_some(), "Failed to fetch job details")
            .await
    }

    pub async fn create_job_posting(
        &self,
        token: &str,
        posting: &NewJobPosting,
    ) -> Result<JobPosting, ApiError> {
        let builder = self
            .request(Method::POST, JOB_POSTINGS_ENDPOINT, Some(token))
            .json(posting);
        self.execute(builder, true, "Failed to create job posting").await
    }

    // ===== Job Applications =====

    pub async fn list_applications(
        &self,
        token: &str,
        job_posting_id: u64,
    ) -> Result<Vec<JobApplication>, ApiError> {
        let path = format!("{}/{}/applications", JOB_POSTINGS_ENDPOINT, job_posting_id);
        let builder = self.request(Method::GET, &path, Some(token));
        self.execute(builder, true, "Failed to fetch job applications")
            .await
    }

    /// Submit a resume as multipart form data under the `resume` key.
    pub async fn apply(
        &self,
        token: &str,
        job_posting_id: u64,
        resume: ResumeFile,
    ) -> Result<JobApplication, ApiError> {
        const FALLBACK: &str = "Application submission failed. Please try again.";

        let content_type = resume.content_type();
        let part = Part::bytes(resume.bytes)
            .file_name(resume.file_name)
            .mime_str(content_type)
            .map_err(|source| ApiError::Transport {
                message: FALLBACK.to_string(),
                source,
            })?;
        let form = Form::new().part("resume", part);

        let path = format!("{}/{}/apply", JOB_POSTINGS_ENDPOINT, job_posting_id);
        let builder = self
            .request(Method::POST, &path, Some(token))
            .multipart(form);
        self.execute(builder, true, FALLBACK).await
    }

    pub async fn list_my_applications(&self, token: &str) -> Result<Vec<JobApplication>, ApiError> {
        let builder = self.request(Method::GET, MY_APPLICATIONS_ENDPOINT, Some(token));
        self.execute(builder, true, "Failed to fetch your applications.")
            .await
    }

    pub async fn get_application(
        &self,
        token: &str,
        application_id: u64,
    ) -> Result<JobApplication, ApiError> {
        let path = format!("{}/{}", JOB_APPLICATIONS_ENDPOINT, application_id);
        let builder = self.request(Method::GET, &path, Some(token));
        self.execute(builder, true, "Failed to fetch job application")
            .await
    }

    pub async fn update_application_status(
        &self,
        token: &str,
        application_id: u64,
        status: ApplicationStatus,
    ) -> Result<JobApplication, ApiError> {
        let path = format!("{}/{}", JOB_APPLICATIONS_ENDPOINT, application_id);
        let builder = self
            .request(Method::PUT, &path, Some(token))
            .json(&StatusUpdate { status });
        self.execute(builder, true, "Failed to update application status")
            .await
    }

    // ===== Documents =====

    /// Fetch raw bytes from an absolute URL (resume storage). No token is
    /// attached; documents live outside the API.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        const FALLBACK: &str = "Failed to load PDF document";

        app_log!(info, "Downloading document: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                message: FALLBACK.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::failure(status, &body, false, FALLBACK));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                message: FALLBACK.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }

    // ===== Plumbing =====

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<R>(
        &self,
        builder: RequestBuilder,
        authenticated: bool,
        fallback: &str,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = builder.send().await.map_err(|source| {
            app_log!(warn, "Request failed before a response: {}", source);
            ApiError::Transport {
                message: fallback.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let url = response.url().to_string();
        app_log!(debug, "{} -> {}", url, status);

        let body = response.text().await.map_err(|source| ApiError::Transport {
            message: fallback.to_string(),
            source,
        })?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|source| {
                app_log!(error, "Unexpected response body from {}: {}", url, source);
                ApiError::Decode {
                    message: fallback.to_string(),
                    source,
                }
            });
        }

        app_log!(warn, "{} returned {}: {}", url, status, body);
        Err(Self::failure(status, &body, authenticated, fallback))
    }

    fn failure(status: StatusCode, body: &str, authenticated: bool, fallback: &str) -> ApiError {
        let parsed = ErrorBody::parse(body);
        let message = parsed.message.unwrap_or_else(|| fallback.to_string());

        if authenticated && status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized { message };
        }

        ApiError::Server {
            status: status.as_u16(),
            message,
            field_errors: parsed.errors,
        }
    }
}
