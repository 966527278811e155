// src/screens/pdf_preview.rs
use regex::bytes::Regex;
use std::sync::OnceLock;

use crate::app_log;
use crate::core::{ApiClient, Resource};
use crate::error::{ApiError, ValidationError};
use crate::utils::ensure_https;

const LOAD_FAILED: &str = "Failed to load PDF document";

fn page_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `/Type /Page` objects, not the `/Type /Pages` tree nodes
        Regex::new(r"(?-u)/Type\s*/Page(?:[^s]|$)").expect("Invalid page pattern")
    })
}

fn count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?-u)/Count\s+(\d+)").expect("Invalid count pattern"))
}

/// Number of pages in a PDF. Falls back to the page tree's `/Count` when the
/// page objects sit in compressed streams.
pub fn count_pages(bytes: &[u8]) -> usize {
    let objects = page_pattern().find_iter(bytes).count();
    if objects > 0 {
        return objects;
    }

    count_pattern()
        .captures_iter(bytes)
        .filter_map(|caps| std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?.parse().ok())
        .max()
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

impl PdfDocument {
    pub fn parse(bytes: Vec<u8>) -> Result<Self, ValidationError> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(ValidationError::Invalid(format!("Error: {}", LOAD_FAILED)));
        }
        let pages = count_pages(&bytes);
        if pages == 0 {
            return Err(ValidationError::Invalid(format!("Error: {}", LOAD_FAILED)));
        }
        Ok(Self { bytes, pages })
    }
}

/// Paged viewer over one resume document
#[derive(Debug)]
pub struct PdfPreview {
    url: String,
    pub document: Resource<String, PdfDocument>,
    page: usize,
}

impl PdfPreview {
    /// Scheme-less URLs are fetched over https.
    pub fn open(url: &str) -> Self {
        Self {
            url: ensure_https(url.trim()),
            document: Resource::new(),
            page: 1,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let url = self.url.clone();
        let result = self
            .document
            .load(url.clone(), async {
                let bytes = api.download(&url).await?;
                Ok(PdfDocument::parse(bytes)?)
            })
            .await;

        match &result {
            Ok(()) => {
                self.page = 1;
                app_log!(info, "Loaded {} ({} pages)", self.url, self.pages());
            }
            Err(err) => {
                if !err.to_string().starts_with("Error: ") {
                    self.document.fail(format!("Error: {}", err));
                }
            }
        }
        result
    }

    /// Current page, 1-based
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page count, 0 until loaded
    pub fn pages(&self) -> usize {
        self.document.data().map(|doc| doc.pages).unwrap_or(0)
    }

    pub fn next(&mut self) -> usize {
        self.page = (self.page + 1).min(self.pages().max(1));
        self.page
    }

    pub fn previous(&mut self) -> usize {
        self.page = self.page.saturating_sub(1).max(1);
        self.page
    }
}
