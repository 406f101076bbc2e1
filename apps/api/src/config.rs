use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Provider API keys are optional: a missing key means that provider is
/// skipped during gateway fallback, not a startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    /// Path to a JSONL file of job postings (`{"title": .., "description": ..}`
    /// per line). Absent → empty corpus, role extraction degrades to the
    /// static role table.
    pub job_postings_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            job_postings_path: optional_env("JOB_POSTINGS_PATH"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating empty strings as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
