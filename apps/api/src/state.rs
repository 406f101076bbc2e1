use crate::analysis::extractors::RoleSkillExtractor;
use crate::config::Config;
use crate::llm_client::LlmGateway;

/// Shared application state injected into all route handlers via Axum
/// extractors. The role extractor carries the only cross-request mutable
/// state (the role skill cache).
#[derive(Clone)]
pub struct AppState {
    pub gateway: LlmGateway,
    pub role_skills: RoleSkillExtractor,
    /// Plain HTTP client for non-LLM collaborators (GitHub).
    pub http: reqwest::Client,
    #[allow(dead_code)]
    pub config: Config,
}
