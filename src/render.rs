// src/render.rs
//! Terminal output for the CLI: tables, JSON and CSV

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

use crate::core::{Toast, ToastKind};
use crate::types::{JobApplication, JobPosting, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct PostingRow<'a> {
    id: u64,
    title: &'a str,
    company_name: &'a str,
    location: &'a str,
    employment_type: &'a str,
    salary: String,
    applications: Option<u64>,
}

impl<'a> From<&'a JobPosting> for PostingRow<'a> {
    fn from(posting: &'a JobPosting) -> Self {
        Self {
            id: posting.id,
            title: &posting.title,
            company_name: &posting.company_name,
            location: &posting.location,
            employment_type: &posting.employment_type,
            salary: posting.formatted_salary(),
            applications: posting.applications_count,
        }
    }
}

#[derive(Serialize)]
struct ApplicationRow<'a> {
    id: u64,
    job_posting_id: u64,
    job_title: &'a str,
    applicant: &'a str,
    email: &'a str,
    status: &'static str,
    applied_on: String,
    resume_url: &'a str,
}

impl<'a> From<&'a JobApplication> for ApplicationRow<'a> {
    fn from(application: &'a JobApplication) -> Self {
        Self {
            id: application.id,
            job_posting_id: application.job_posting_id,
            job_title: application
                .job_posting
                .as_ref()
                .map(|p| p.title.as_str())
                .unwrap_or(""),
            applicant: application.user.as_ref().map(|u| u.name.as_str()).unwrap_or(""),
            email: application.user.as_ref().map(|u| u.email.as_str()).unwrap_or(""),
            status: application.status.label(),
            applied_on: application.created_at.format("%Y-%m-%d").to_string(),
            resume_url: &application.resume_url,
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn write_csv<W: Write, R: Serialize>(out: W, rows: impl IntoIterator<Item = R>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

pub fn postings<W: Write>(mut out: W, postings: &[&JobPosting], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, postings),
        OutputFormat::Csv => write_csv(out, postings.iter().map(|p| PostingRow::from(*p))),
        OutputFormat::Table => {
            writeln!(
                out,
                "{:<5} {:<30} {:<20} {:<18} {:<11} {:>14}",
                "ID", "Title", "Company", "Location", "Type", "Salary"
            )?;
            writeln!(out, "{}", "-".repeat(103))?;
            for posting in postings {
                writeln!(
                    out,
                    "{:<5} {:<30} {:<20} {:<18} {:<11} {:>14}",
                    posting.id,
                    truncate(&posting.title, 30),
                    truncate(&posting.company_name, 20),
                    truncate(&posting.location, 18),
                    truncate(&posting.employment_type, 11),
                    posting.formatted_salary()
                )?;
            }
            Ok(())
        }
    }
}

pub fn applications<W: Write>(
    mut out: W,
    applications: &[JobApplication],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, applications),
        OutputFormat::Csv => write_csv(out, applications.iter().map(ApplicationRow::from)),
        OutputFormat::Table => {
            writeln!(
                out,
                "{:<5} {:<28} {:<22} {:<14} {:<10}",
                "ID", "Job / Applicant", "Email", "Status", "Applied"
            )?;
            writeln!(out, "{}", "-".repeat(83))?;
            for application in applications {
                let row = ApplicationRow::from(application);
                let who = if row.applicant.is_empty() { row.job_title } else { row.applicant };
                writeln!(
                    out,
                    "{:<5} {:<28} {:<22} {:<14} {:<10}",
                    row.id,
                    truncate(who, 28),
                    truncate(row.email, 22),
                    row.status,
                    row.applied_on
                )?;
            }
            Ok(())
        }
    }
}

pub fn posting_detail<W: Write>(mut out: W, posting: &JobPosting) -> Result<()> {
    writeln!(out, "{}", posting.title)?;
    writeln!(out, "  Company:    {}", posting.company_name)?;
    writeln!(out, "  Location:   {}", posting.location)?;
    writeln!(out, "  Type:       {}", posting.employment_type)?;
    writeln!(out, "  Salary:     {}", posting.formatted_salary())?;
    writeln!(out, "  Posted:     {}", posting.created_at.format("%Y-%m-%d"))?;
    if let Some(closes_at) = posting.closes_at {
        writeln!(out, "  Closes:     {}", closes_at.format("%Y-%m-%d"))?;
    }
    if let Some(count) = posting.applications_count {
        writeln!(out, "  Applicants: {}", count)?;
    }
    if !posting.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", posting.description)?;
    }
    Ok(())
}

pub fn user<W: Write>(mut out: W, user: &User) -> Result<()> {
    writeln!(out, "{} <{}>", user.name, user.email)?;
    writeln!(out, "  Account:      {}", user.account_type.label())?;
    writeln!(out, "  Member since: {}", user.created_at.format("%Y-%m-%d"))?;
    Ok(())
}

pub fn toasts<W: Write>(mut out: W, toasts: &[Toast]) -> Result<()> {
    for toast in toasts {
        let marker = match toast.kind {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
        };
        writeln!(out, "{} {}", marker, toast.message)?;
    }
    Ok(())
}
