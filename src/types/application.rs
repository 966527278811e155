use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::timestamp;

/// Review status of an application. Any status may be set to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Interviewing,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under review",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "under review" => Ok(ApplicationStatus::UnderReview),
            "interviewing" => Ok(ApplicationStatus::Interviewing),
            "accepted" | "approved" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!(
                "Unknown application status: {}. Use pending, under review, interviewing, accepted or rejected",
                s
            )),
        }
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingSummary {
    pub id: u64,
    pub title: String,
    pub company_name: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: u64,
    pub job_posting_id: u64,
    pub user_id: u64,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_path: Option<String>,
    #[serde(default)]
    pub resume_url: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_posting_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_posting: Option<PostingSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ApplicantSummary>,
}

/// Body of `PUT /job-applications/{id}`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parsing_is_case_insensitive_with_approved_alias() {
        assert_eq!("Under Review".parse(), Ok(ApplicationStatus::UnderReview));
        assert_eq!("APPROVED".parse(), Ok(ApplicationStatus::Accepted));
        assert_eq!("accepted".parse(), Ok(ApplicationStatus::Accepted));
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn status_goes_over_the_wire_lowercase() {
        let body = serde_json::to_value(StatusUpdate {
            status: ApplicationStatus::UnderReview,
        })
        .unwrap();
        assert_eq!(body, json!({ "status": "under review" }));
    }

    #[test]
    fn application_with_nested_posting() {
        let application: JobApplication = serde_json::from_value(json!({
            "id": 11,
            "job_posting_id": 3,
            "user_id": 9,
            "status": "Interviewing",
            "resume_path": "resumes/cv.pdf",
            "resume_url": "good-job.litegral.com/resumes/cv.pdf",
            "created_at": "2024-05-03T09:00:00.000000Z",
            "updated_at": "2024-05-03T09:00:00.000000Z",
            "job_posting": { "id": 3, "title": "Chef", "company_name": "Bistro", "location": "Paris" }
        }))
        .unwrap();

        assert_eq!(application.status, ApplicationStatus::Interviewing);
        assert_eq!(application.job_posting.unwrap().company_name, "Bistro");
    }
}
