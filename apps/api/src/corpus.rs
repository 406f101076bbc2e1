//! Job postings corpus — the external collaborator that supplies raw job
//! description text for role skill extraction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

/// Default cap on how many matching postings feed one extraction.
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 50;

/// Boundary trait so handlers and extractors never depend on how postings
/// are loaded or stored.
#[async_trait]
pub trait JobCorpus: Send + Sync {
    /// Concatenated descriptions of up to `limit` postings whose title
    /// contains `role_name` (case-insensitive substring match).
    async fn get_role_descriptions(&self, role_name: &str, limit: usize) -> String;
}

#[derive(Debug, Deserialize)]
struct Posting {
    title: String,
    description: String,
}

/// In-memory corpus loaded once at startup from a JSONL file with one
/// `{"title": .., "description": ..}` object per line.
pub struct JsonlJobCorpus {
    postings: Vec<Posting>,
}

impl JsonlJobCorpus {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job postings file '{path}'"))?;

        let mut postings = Vec::new();
        let mut skipped = 0usize;
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Posting>(line) {
                Ok(posting) => postings.push(posting),
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("Skipped {skipped} malformed job posting lines in '{path}'");
        }
        info!("Loaded {} job postings from '{path}'", postings.len());

        Ok(Self { postings })
    }

    /// Corpus with no postings. Role extraction against it finds no
    /// descriptions and falls back to the static role table.
    pub fn empty() -> Self {
        Self { postings: Vec::new() }
    }
}

#[async_trait]
impl JobCorpus for JsonlJobCorpus {
    async fn get_role_descriptions(&self, role_name: &str, limit: usize) -> String {
        let needle = role_name.to_lowercase();
        self.postings
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .take(limit)
            .map(|p| p.description.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus(entries: &[(&str, &str)]) -> JsonlJobCorpus {
        JsonlJobCorpus {
            postings: entries
                .iter()
                .map(|(title, description)| Posting {
                    title: title.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_title_match_is_case_insensitive_substring() {
        let corpus = corpus(&[
            ("Senior Data Analyst", "SQL dashboards"),
            ("data analyst intern", "Excel reporting"),
            ("Backend Engineer", "Rust services"),
        ]);
        let text = corpus.get_role_descriptions("Data Analyst", 50).await;
        assert!(text.contains("SQL dashboards"));
        assert!(text.contains("Excel reporting"));
        assert!(!text.contains("Rust services"));
    }

    #[tokio::test]
    async fn test_limit_caps_matches() {
        let corpus = corpus(&[
            ("Data Analyst", "first"),
            ("Data Analyst", "second"),
            ("Data Analyst", "third"),
        ]);
        let text = corpus.get_role_descriptions("data analyst", 2).await;
        assert!(text.contains("first"));
        assert!(text.contains("second"));
        assert!(!text.contains("third"));
    }

    #[tokio::test]
    async fn test_no_match_yields_empty() {
        let corpus = corpus(&[("Backend Engineer", "Rust")]);
        let text = corpus.get_role_descriptions("Florist", 50).await;
        assert!(text.is_empty());
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"title": "Data Analyst", "description": "SQL"}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"title": "PM", "description": "Roadmaps"}}"#).unwrap();

        let corpus = JsonlJobCorpus::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(corpus.postings.len(), 2);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(JsonlJobCorpus::load("/definitely/not/here.jsonl").is_err());
    }
}
