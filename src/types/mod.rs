//! Wire records exchanged with the job-board API

pub mod application;
pub mod job_posting;
pub mod portal;
pub mod response;
pub mod timestamp;
pub mod user;

pub use application::{ApplicationStatus, JobApplication};
pub use job_posting::{EmploymentType, JobPosting, NewJobPosting};
pub use portal::Portal;
pub use response::{AuthResponse, ErrorBody, Paginated};
pub use user::{AccountType, LoginRequest, RegisterRequest, UpdateProfileRequest, User};
