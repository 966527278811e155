// src/screens/talent.rs
//! Talent portal screens

use anyhow::Result;

use super::{bearer, required, surface_error, PdfPreview, SESSION_EXPIRED};
use crate::app_log;
use crate::core::{ApiClient, Resource, SessionStore, ToastQueue};
use crate::error::{ApiError, ValidationError};
use crate::resume_validator::{ResumeFile, ResumeValidationError, ResumeValidator};
use crate::types::job_posting::filter_postings;
use crate::types::{JobApplication, JobPosting, UpdateProfileRequest, User};

pub const APPLICATIONS_SESSION_EXPIRED: &str =
    "Session expired. Please log in again to view your applications.";
pub const APPLICATIONS_NOT_SIGNED_IN: &str = "You must be logged in to view your applications.";
pub const PROFILE_SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const PROFILE_NOT_SIGNED_IN: &str = "Not authenticated. Please login.";

/// Public job board with client-side search
#[derive(Debug, Default)]
pub struct JobBoardScreen {
    pub postings: Resource<Option<String>, Vec<JobPosting>>,
    search: String,
}

impl JobBoardScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let token = session.token().map(str::to_string);
        let result = self
            .postings
            .ensure(token.clone(), async {
                api.list_job_postings(token.as_deref())
                    .await
                    .map(|page| page.data)
            })
            .await;

        if let Err(err) = &result {
            let message = surface_error(err, session, SESSION_EXPIRED);
            self.postings.fail(message);
        }
        result
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Postings matching the search term, in server order
    pub fn visible(&self) -> Vec<&JobPosting> {
        match self.postings.data() {
            Some(postings) => filter_postings(postings, self.search.trim()),
            None => Vec::new(),
        }
    }

    pub fn empty_message(&self) -> &'static str {
        if self.search.trim().is_empty() {
            "No job postings available at the moment."
        } else {
            "Try adjusting your search terms."
        }
    }
}

#[derive(Debug)]
pub struct JobPostingDetailsScreen {
    job_posting_id: u64,
    pub posting: Resource<(u64, Option<String>), JobPosting>,
}

impl JobPostingDetailsScreen {
    pub fn new(job_posting_id: u64) -> Self {
        Self {
            job_posting_id,
            posting: Resource::new(),
        }
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let token = session.token().map(str::to_string);
        let id = self.job_posting_id;
        let result = self
            .posting
            .ensure((id, token.clone()), async {
                api.get_job_posting(token.as_deref(), id).await
            })
            .await;

        if let Err(err) = &result {
            let message = surface_error(err, session, SESSION_EXPIRED);
            self.posting.fail(message);
        }
        result
    }
}

/// Resume upload for one posting
#[derive(Debug)]
pub struct ApplyScreen {
    job_posting_id: u64,
    pub posting: Resource<(u64, String), JobPosting>,
    resume: Option<ResumeFile>,
    submitting: bool,
    error: Option<String>,
    success: Option<String>,
    uploaded_resume_url: Option<String>,
}

impl ApplyScreen {
    pub fn new(job_posting_id: u64) -> Self {
        Self {
            job_posting_id,
            posting: Resource::new(),
            resume: None,
            submitting: false,
            error: None,
            success: None,
            uploaded_resume_url: None,
        }
    }

    pub fn resume(&self) -> Option<&ResumeFile> {
        self.resume.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn uploaded_resume_url(&self) -> Option<&str> {
        self.uploaded_resume_url.as_deref()
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let token = bearer(session, SESSION_EXPIRED)?;
        let id = self.job_posting_id;
        let result = self
            .posting
            .ensure((id, token.clone()), async {
                api.get_job_posting(Some(&token), id).await
            })
            .await;

        if let Err(err) = &result {
            let message = if err.is_unauthorized() {
                surface_error(err, session, SESSION_EXPIRED)
            } else {
                "Could not load job details.".to_string()
            };
            self.posting.fail(message);
        }
        result
    }

    /// Pick a resume. A rejected file leaves nothing selected.
    pub fn select_resume(&mut self, resume: ResumeFile) -> Result<(), ResumeValidationError> {
        self.success = None;
        self.uploaded_resume_url = None;

        match ResumeValidator::validate(&resume) {
            Ok(()) => {
                self.error = None;
                self.resume = Some(resume);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.message.clone());
                self.resume = None;
                Err(e)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &mut SessionStore,
        toasts: &ToastQueue,
    ) -> Result<JobApplication, ApiError> {
        self.error = None;
        self.success = None;
        self.uploaded_resume_url = None;

        let prepared = match self.resume.clone() {
            None => Err(ValidationError::Invalid(
                "Please select a resume file to upload.".to_string(),
            )
            .into()),
            Some(resume) => bearer(session, SESSION_EXPIRED).map(|token| (token, resume)),
        };
        let (token, resume) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        self.submitting = true;
        let result = api.apply(&token, self.job_posting_id, resume).await;
        self.submitting = false;

        match result {
            Ok(application) => {
                app_log!(
                    info,
                    "Applied to job posting {} (application {})",
                    self.job_posting_id,
                    application.id
                );
                let message = "Application submitted successfully!";
                self.success = Some(message.to_string());
                toasts.success(message);
                if !application.resume_url.is_empty() {
                    self.uploaded_resume_url = Some(application.resume_url.clone());
                }
                Ok(application)
            }
            Err(err) => {
                let message = surface_error(&err, session, SESSION_EXPIRED);
                toasts.error(message.clone());
                self.error = Some(message);
                Err(err)
            }
        }
    }
}

/// The signed-in talent's applications, with an optional resume preview
#[derive(Debug, Default)]
pub struct MyApplicationsScreen {
    pub applications: Resource<Option<String>, Vec<JobApplication>>,
    preview: Option<PdfPreview>,
}

impl MyApplicationsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let Some(token) = session.token().map(str::to_string) else {
            self.applications.reject(None, APPLICATIONS_NOT_SIGNED_IN);
            return Err(ValidationError::Invalid(APPLICATIONS_NOT_SIGNED_IN.to_string()).into());
        };

        let result = self
            .applications
            .ensure(Some(token.clone()), async {
                api.list_my_applications(&token).await
            })
            .await;

        if let Err(err) = &result {
            let message = surface_error(err, session, APPLICATIONS_SESSION_EXPIRED);
            self.applications.fail(message);
        }
        result
    }

    /// Open the resume of `application_id` in the preview. Returns `None` when
    /// the application is unknown or has no resume.
    pub fn open_preview(&mut self, application_id: u64) -> Option<&mut PdfPreview> {
        let url = self
            .applications
            .data()?
            .iter()
            .find(|application| application.id == application_id)
            .map(|application| application.resume_url.clone())
            .filter(|url| !url.trim().is_empty())?;

        self.preview = Some(PdfPreview::open(&url));
        self.preview.as_mut()
    }

    pub fn preview(&self) -> Option<&PdfPreview> {
        self.preview.as_ref()
    }

    pub fn preview_mut(&mut self) -> Option<&mut PdfPreview> {
        self.preview.as_mut()
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }
}

/// Profile page. Shows the session identity at once, then the fresh copy
/// from the server.
#[derive(Debug, Default)]
pub struct ProfileScreen {
    pub profile: Resource<Option<String>, User>,
    cached: Option<User>,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.profile.data().or(self.cached.as_ref())
    }

    pub async fn load(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<(), ApiError> {
        let Some(token) = session.token().map(str::to_string) else {
            self.cached = None;
            self.profile.reject(None, PROFILE_NOT_SIGNED_IN);
            return Err(ValidationError::Invalid(PROFILE_NOT_SIGNED_IN.to_string()).into());
        };
        self.cached = session.user().cloned();

        let result = self
            .profile
            .ensure(Some(token.clone()), async { api.fetch_profile(&token).await })
            .await;

        if let Err(err) = &result {
            let message = surface_error(err, session, PROFILE_SESSION_EXPIRED);
            if err.is_unauthorized() {
                self.cached = None;
            }
            self.profile.fail(message);
        }
        result
    }
}

/// Name/email edit with an optional password change
#[derive(Debug, Clone, Default)]
pub struct EditProfileForm {
    pub name: String,
    pub email: String,
    pub change_password: bool,
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
    submitting: bool,
    error: Option<String>,
}

impl EditProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required("Name", &self.name)?;
        required("Email", &self.email)?;
        Ok(())
    }

    /// Password fields go out only when a change was asked for and the
    /// current password was given.
    pub fn payload(&self) -> UpdateProfileRequest {
        let mut request = UpdateProfileRequest {
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            ..UpdateProfileRequest::default()
        };

        if self.change_password && !self.current_password.is_empty() {
            request.current_password = Some(self.current_password.clone());
            request.password = Some(self.password.clone());
            request.password_confirmation = Some(self.password_confirmation.clone());
        }
        request
    }

    /// Save, then swap the new identity into the session under the same token.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &mut SessionStore,
        toasts: &ToastQueue,
    ) -> Result<User> {
        self.error = None;

        let prepared = self
            .validate()
            .map_err(ApiError::from)
            .and_then(|()| bearer(session, PROFILE_NOT_SIGNED_IN));
        let token = match prepared {
            Ok(token) => token,
            Err(err) => {
                let message = err.to_string();
                toasts.error(message.clone());
                self.error = Some(message);
                return Err(err.into());
            }
        };

        self.submitting = true;
        let result = api.update_profile(&token, &self.payload()).await;
        self.submitting = false;

        match result {
            Ok(user) => {
                session.login(user.clone(), token)?;
                toasts.success("Profile updated successfully");
                Ok(user)
            }
            Err(err) => {
                let message = surface_error(&err, session, PROFILE_SESSION_EXPIRED);
                toasts.error(message.clone());
                self.error = Some(message);
                Err(err.into())
            }
        }
    }
}
