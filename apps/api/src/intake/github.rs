//! Public GitHub signal: summarizes a user's repositories into languages,
//! topics, and a repo count for the skill extraction prompt.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "navigator-api";
const REPOS_PER_PAGE: u32 = 50;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned status {0} for user '{1}'")]
    Status(u16, String),
}

#[derive(Debug, Deserialize)]
struct Repo {
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
}

/// Aggregated view of a user's public repositories.
#[derive(Debug, Clone, Serialize)]
pub struct GithubSummary {
    pub username: String,
    pub repo_count: usize,
    pub languages: Vec<String>,
    pub topics: Vec<String>,
}

impl GithubSummary {
    /// Renders the summary as a text fragment for the extraction prompt.
    pub fn as_signal_text(&self) -> String {
        format!(
            "GitHub profile '{}': {} public repositories. Languages: {}. Topics: {}.",
            self.username,
            self.repo_count,
            self.languages.join(", "),
            self.topics.join(", ")
        )
    }
}

/// Fetches and summarizes up to one page of a user's public repositories.
pub async fn fetch_github_summary(
    client: &reqwest::Client,
    username: &str,
) -> Result<GithubSummary, GithubError> {
    let response = client
        .get(format!(
            "{GITHUB_API_URL}/users/{username}/repos?per_page={REPOS_PER_PAGE}"
        ))
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(GithubError::Status(status.as_u16(), username.to_string()));
    }

    let repos: Vec<Repo> = response.json().await?;
    debug!("Fetched {} repos for GitHub user '{username}'", repos.len());

    Ok(summarize(username, repos))
}

fn summarize(username: &str, repos: Vec<Repo>) -> GithubSummary {
    let mut languages = BTreeSet::new();
    let mut topics = BTreeSet::new();

    for repo in &repos {
        if let Some(language) = &repo.language {
            languages.insert(language.clone());
        }
        for topic in &repo.topics {
            topics.insert(topic.clone());
        }
    }

    GithubSummary {
        username: username.to_string(),
        repo_count: repos.len(),
        languages: languages.into_iter().collect(),
        topics: topics.into_iter().collect(),
    }
}
