//! Profile signal intake: turns the request's optional resume / LinkedIn /
//! GitHub fields into a single combined text blob for skill extraction.

pub mod github;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("invalid base64 resume data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("PDF text extraction failed: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
}

/// Decodes a base64-encoded PDF and extracts its text.
pub fn resume_text_from_pdf(base64_data: &str) -> Result<String, IntakeError> {
    let bytes = BASE64_STANDARD.decode(base64_data.trim())?;
    let text = pdf_extract::extract_text_from_mem(&bytes)?;
    Ok(text)
}

/// The assembled per-request profile signals. Each field is already plain
/// text; `combined_text` is what feeds the extraction prompt.
#[derive(Debug, Default)]
pub struct ProfileSignals {
    pub resume_text: Option<String>,
    pub linkedin_text: Option<String>,
    pub github_text: Option<String>,
}

impl ProfileSignals {
    pub fn combined_text(&self) -> String {
        [
            self.resume_text.as_deref(),
            self.linkedin_text.as_deref(),
            self.github_text.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.combined_text().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_text_joins_present_signals() {
        let signals = ProfileSignals {
            resume_text: Some("resume body".to_string()),
            linkedin_text: None,
            github_text: Some("github summary".to_string()),
        };
        let combined = signals.combined_text();
        assert!(combined.contains("resume body"));
        assert!(combined.contains("github summary"));
        assert!(!signals.is_empty());
    }

    #[test]
    fn test_blank_signals_count_as_empty() {
        let signals = ProfileSignals {
            resume_text: Some("   ".to_string()),
            linkedin_text: Some(String::new()),
            github_text: None,
        };
        assert!(signals.is_empty());
    }

    #[test]
    fn test_invalid_base64_is_decode_error() {
        let err = resume_text_from_pdf("not//valid base64!!!").unwrap_err();
        assert!(matches!(err, IntakeError::Decode(_)));
    }

    #[test]
    fn test_garbage_bytes_are_pdf_error() {
        let garbage = BASE64_STANDARD.encode(b"definitely not a pdf");
        let err = resume_text_from_pdf(&garbage).unwrap_err();
        assert!(matches!(err, IntakeError::Pdf(_)));
    }
}
