// src/utils.rs

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// MIME type sent with an uploaded resume
pub fn resume_content_type(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

/// Prefix `https://` unless the URL already carries a scheme
pub fn ensure_https(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches("//"))
    }
}

/// API base URL without its trailing `/api` segment
pub fn api_origin(base_url: &str) -> &str {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed)
}

/// Turn whatever the backend stored as a resume location into a link.
pub fn resolve_resume_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    if url.contains("/resumes/") && !url.starts_with('/') {
        // Storage host without a scheme, e.g. `good-job.litegral.com/resumes/x.pdf`
        let first = url.split('/').next().unwrap_or_default();
        if first.contains('.') {
            return ensure_https(url);
        }
    }

    let origin = api_origin(base_url);
    if url.starts_with('/') {
        format!("{}{}", origin, url)
    } else {
        format!("{}/{}", origin, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("cv.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("letter.docx"), Some("docx".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_resume_content_type() {
        assert_eq!(resume_content_type("cv.pdf"), "application/pdf");
        assert_eq!(resume_content_type("cv.doc"), "application/msword");
        assert_eq!(resume_content_type("cv.bin"), "application/octet-stream");
    }

    #[test]
    fn test_resolve_resume_url() {
        let base = "http://localhost:8000/api";
        assert_eq!(
            resolve_resume_url(base, "https://cdn.test/r.pdf"),
            "https://cdn.test/r.pdf"
        );
        assert_eq!(
            resolve_resume_url(base, "good-job.litegral.com/resumes/r.pdf"),
            "https://good-job.litegral.com/resumes/r.pdf"
        );
        assert_eq!(
            resolve_resume_url(base, "/storage/resumes/r.pdf"),
            "http://localhost:8000/storage/resumes/r.pdf"
        );
        assert_eq!(
            resolve_resume_url(base, "storage/r.pdf"),
            "http://localhost:8000/storage/r.pdf"
        );
    }

    #[test]
    fn test_ensure_https() {
        assert_eq!(ensure_https("files.test/a.pdf"), "https://files.test/a.pdf");
        assert_eq!(ensure_https("http://files.test/a.pdf"), "http://files.test/a.pdf");
    }
}
