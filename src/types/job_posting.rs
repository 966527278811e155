use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::timestamp;

/// Job posting as the backend returns it. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub company_name: String,
    pub location: String,
    #[serde(
        default,
        deserialize_with = "deserialize_salary",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<f64>,
    pub employment_type: String,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub closes_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications_count: Option<u64>,
}

impl JobPosting {
    /// Case-insensitive substring match on title, company name or location.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.company_name.to_lowercase().contains(&term)
            || self.location.to_lowercase().contains(&term)
    }

    pub fn formatted_salary(&self) -> String {
        format_salary(self.salary)
    }
}

/// Postings matching `term`, in their original order. An empty term keeps all.
pub fn filter_postings<'a>(postings: &'a [JobPosting], term: &str) -> Vec<&'a JobPosting> {
    postings.iter().filter(|posting| posting.matches(term)).collect()
}

/// `$75,000.00`, or `Not specified` when the posting has no salary.
pub fn format_salary(salary: Option<f64>) -> String {
    let Some(amount) = salary else {
        return "Not specified".to_string();
    };

    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

// Salary arrives either as a JSON number or as a decimal string ("75000.00").
fn deserialize_salary<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSalary {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawSalary>::deserialize(deserializer)? {
        Some(RawSalary::Number(value)) => Some(value),
        Some(RawSalary::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Temporary,
    Internship,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 5] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Temporary,
        EmploymentType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Temporary => "Temporary",
            EmploymentType::Internship => "Internship",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(' ', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_lowercase() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown employment type: {}. Use one of: {}",
                    s,
                    Self::ALL.map(|kind| kind.as_str()).join(", ")
                )
            })
    }
}

/// Body of `POST /job-postings`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJobPosting {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub company_name: String,
    pub employment_type: EmploymentType,
    #[serde(with = "timestamp")]
    pub closes_at: DateTime<Utc>,
}
