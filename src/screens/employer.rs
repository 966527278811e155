// src/screens/employer.rs
//! Employer portal screens: own postings, the posting form, and a posting's
//! applications.

use chrono::{DateTime, Duration, Utc};

use super::{bearer, required, surface_error, SESSION_EXPIRED};
use crate::app_log;
use crate::core::{ApiClient, Resource, SessionStore};
use crate::error::{ApiError, ValidationError};
use crate::types::{ApplicationStatus, EmploymentType, JobApplication, JobPosting, NewJobPosting};
use crate::utils::resolve_resume_url;

const NOT_SIGNED_IN: &str = "You must be logged in to post a job.";
const POSTING_LIFETIME_DAYS: i64 = 30;

/// The signed-in employer's postings
#[derive(Debug, Default)]
pub struct JobListScreen {
    pub postings: Resource<String, Vec<JobPosting>>,
}

impl JobListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let token = bearer(session, SESSION_EXPIRED)?;
        let result = self
            .postings
            .ensure(token.clone(), async {
                api.list_my_job_postings(&token).await.map(|page| page.data)
            })
            .await;

        if let Err(err) = &result {
            let message = surface_error(err, session, SESSION_EXPIRED);
            self.postings.fail(message);
        }
        result
    }
}

/// Raw form input. Every field is text until [`validate`](Self::validate).
#[derive(Debug, Clone)]
pub struct JobPostingForm {
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub location: String,
    pub salary: String,
    pub employment_type: String,
    submitting: bool,
    error: Option<String>,
}

impl Default for JobPostingForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            company_name: String::new(),
            description: String::new(),
            location: String::new(),
            salary: String::new(),
            employment_type: EmploymentType::default().to_string(),
            submitting: false,
            error: None,
        }
    }
}

impl JobPostingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Build the request body. The posting closes 30 days after `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewJobPosting, ValidationError> {
        required("Job title", &self.title)?;
        required("Company name", &self.company_name)?;
        required("Job description", &self.description)?;
        required("Location", &self.location)?;
        required("Salary", &self.salary)?;
        required("Employment type", &self.employment_type)?;

        let salary: f64 = self
            .salary
            .trim()
            .parse()
            .ok()
            .filter(|value: &f64| value.is_finite())
            .ok_or(ValidationError::NotANumber { field: "Salary" })?;

        let employment_type = self
            .employment_type
            .parse::<EmploymentType>()
            .map_err(ValidationError::Invalid)?;

        Ok(NewJobPosting {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            salary,
            company_name: self.company_name.trim().to_string(),
            employment_type,
            closes_at: now + Duration::days(POSTING_LIFETIME_DAYS),
        })
    }

    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &mut SessionStore,
        now: DateTime<Utc>,
    ) -> Result<JobPosting, ApiError> {
        self.error = None;

        let prepared = bearer(session, NOT_SIGNED_IN)
            .and_then(|token| Ok((token, self.validate(now)?)));
        let (token, posting) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        self.submitting = true;
        let result = api.create_job_posting(&token, &posting).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                app_log!(info, "Created job posting {} ({})", created.id, created.title);
                Ok(created)
            }
            Err(err) => {
                self.error = Some(surface_error(&err, session, SESSION_EXPIRED));
                Err(err)
            }
        }
    }
}

/// Applications received for one posting, with per-row status updates
#[derive(Debug)]
pub struct ApplicationListScreen {
    job_posting_id: u64,
    pub applications: Resource<(u64, String), Vec<JobApplication>>,
    updating: Option<u64>,
    action_error: Option<String>,
}

impl ApplicationListScreen {
    pub fn new(job_posting_id: u64) -> Self {
        Self {
            job_posting_id,
            applications: Resource::new(),
            updating: None,
            action_error: None,
        }
    }

    /// Screen for the posting that `application_id` was made to. A rejected
    /// token ends the session and comes back as the session-expired message.
    pub async fn for_application(
        api: &ApiClient,
        session: &mut SessionStore,
        application_id: u64,
    ) -> Result<Self, ApiError> {
        let token = bearer(session, SESSION_EXPIRED)?;

        match api.get_application(&token, application_id).await {
            Ok(application) => Ok(Self::new(application.job_posting_id)),
            Err(err) => {
                let message = surface_error(&err, session, SESSION_EXPIRED);
                Err(match err {
                    ApiError::Unauthorized { .. } => ApiError::Unauthorized { message },
                    other => other,
                })
            }
        }
    }

    pub fn job_posting_id(&self) -> u64 {
        self.job_posting_id
    }

    /// Row whose status update is in flight
    pub fn updating(&self) -> Option<u64> {
        self.updating
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let token = bearer(session, SESSION_EXPIRED)?;
        let job_posting_id = self.job_posting_id;
        let result = self
            .applications
            .ensure((job_posting_id, token.clone()), async {
                api.list_applications(&token, job_posting_id).await
            })
            .await;

        if let Err(err) = &result {
            let message = surface_error(err, session, SESSION_EXPIRED);
            self.applications.fail(message);
        }
        result
    }

    /// Set one application's status. Only the confirmed row changes; every
    /// other row is left exactly as loaded.
    pub async fn update_status(
        &mut self,
        api: &ApiClient,
        session: &mut SessionStore,
        application_id: u64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        self.action_error = None;
        let token = bearer(session, SESSION_EXPIRED)?;

        self.updating = Some(application_id);
        let result = api
            .update_application_status(&token, application_id, status)
            .await;
        self.updating = None;

        match result {
            Ok(_) => {
                if let Some(rows) = self.applications.data_mut() {
                    if let Some(row) = rows.iter_mut().find(|row| row.id == application_id) {
                        row.status = status;
                    }
                }
                app_log!(info, "Application {} is now {}", application_id, status);
                Ok(())
            }
            Err(err) => {
                self.action_error = Some(surface_error(&err, session, SESSION_EXPIRED));
                Err(err)
            }
        }
    }

    /// Link to an applicant's resume, if one was uploaded
    pub fn resume_link(&self, api: &ApiClient, application: &JobApplication) -> Option<String> {
        if application.resume_url.trim().is_empty() {
            return None;
        }
        Some(resolve_resume_url(api.base_url(), &application.resume_url))
    }
}

/// One posting plus the applications it received
#[derive(Debug)]
pub struct JobDetailScreen {
    pub posting: Resource<(u64, String), JobPosting>,
    pub applications: ApplicationListScreen,
}

impl JobDetailScreen {
    pub fn new(job_posting_id: u64) -> Self {
        Self {
            posting: Resource::new(),
            applications: ApplicationListScreen::new(job_posting_id),
        }
    }

    pub fn job_posting_id(&self) -> u64 {
        self.applications.job_posting_id()
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let token = bearer(session, SESSION_EXPIRED)?;
        let id = self.job_posting_id();
        let result = self
            .posting
            .ensure((id, token.clone()), async {
                api.get_job_posting(Some(&token), id).await
            })
            .await;

        if let Err(err) = result {
            let message = surface_error(&err, session, SESSION_EXPIRED);
            self.posting.fail(message);
            return Err(err);
        }

        self.applications.load(api, session).await
    }
}
