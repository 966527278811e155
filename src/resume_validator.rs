// src/resume_validator.rs
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::app_log;
use crate::utils::{get_file_extension, resume_content_type};

/// Upload limit the backend enforces for resumes
pub const MAX_RESUME_SIZE: u64 = 10 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// A resume picked for upload, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size as shown next to the picked file, e.g. `0.25 MB`
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }

    pub fn content_type(&self) -> &'static str {
        resume_content_type(&self.file_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeErrorType {
    FileNotFound,
    UnreadableFile,
    EmptyFile,
    TooLarge,
    WrongFormat,
    CorruptedFile,
}

impl ResumeErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound => "RESUME_NOT_FOUND",
            Self::UnreadableFile => "RESUME_UNREADABLE",
            Self::EmptyFile => "RESUME_EMPTY",
            Self::TooLarge => "RESUME_TOO_LARGE",
            Self::WrongFormat => "RESUME_WRONG_FORMAT",
            Self::CorruptedFile => "RESUME_CORRUPTED",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ResumeValidationError {
    pub path: PathBuf,
    pub error_type: ResumeErrorType,
    pub message: String,
    pub suggestion: String,
}

impl ResumeValidationError {
    fn new(
        path: impl Into<PathBuf>,
        error_type: ResumeErrorType,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            error_type,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

pub struct ResumeValidator;

impl ResumeValidator {
    /// Read a resume from disk and validate it for upload
    pub async fn load(path: &Path) -> Result<ResumeFile, ResumeValidationError> {
        if !path.exists() {
            return Err(ResumeValidationError::new(
                path,
                ResumeErrorType::FileNotFound,
                format!("Resume not found: {}", path.display()),
                "Check the path and try again",
            ));
        }

        let metadata = fs::metadata(path).await.map_err(|_| {
            ResumeValidationError::new(
                path,
                ResumeErrorType::UnreadableFile,
                "Cannot read resume file metadata",
                "Check file permissions",
            )
        })?;

        // Refuse before reading a huge file into memory
        if metadata.len() > MAX_RESUME_SIZE {
            return Err(Self::too_large(path, metadata.len()));
        }

        let bytes = fs::read(path).await.map_err(|e| {
            ResumeValidationError::new(
                path,
                ResumeErrorType::UnreadableFile,
                format!("Cannot read resume file: {}", e),
                "Check file permissions",
            )
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();

        let resume = ResumeFile::new(file_name, bytes);
        Self::validate(&resume)?;
        app_log!(
            info,
            "Resume validation passed: {} ({})",
            path.display(),
            resume.size_label()
        );
        Ok(resume)
    }

    pub fn validate(resume: &ResumeFile) -> Result<(), ResumeValidationError> {
        let path = PathBuf::from(&resume.file_name);

        if resume.bytes.is_empty() {
            return Err(ResumeValidationError::new(
                path,
                ResumeErrorType::EmptyFile,
                "Resume file is empty",
                "Please upload a valid resume file",
            ));
        }

        if resume.size() > MAX_RESUME_SIZE {
            return Err(Self::too_large(&path, resume.size()));
        }

        let extension = get_file_extension(&resume.file_name).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ResumeValidationError::new(
                path,
                ResumeErrorType::WrongFormat,
                "Unsupported resume format",
                "Please use PDF, DOC or DOCX format only",
            ));
        }

        if extension == "pdf" && !resume.bytes.starts_with(PDF_SIGNATURE) {
            return Err(ResumeValidationError::new(
                path,
                ResumeErrorType::CorruptedFile,
                "Invalid PDF file - corrupted or wrong format",
                "Please upload a valid PDF document",
            ));
        }

        Ok(())
    }

    fn too_large(path: &Path, size: u64) -> ResumeValidationError {
        ResumeValidationError::new(
            path,
            ResumeErrorType::TooLarge,
            format!(
                "Resume file too large: {:.1}MB (max 10MB)",
                size as f64 / 1024.0 / 1024.0
            ),
            "Please compress your resume and try again",
        )
    }
}
