//! Skill extraction services: resume → SkillProfile and role → SkillProfile,
//! both via the gateway + JSON extractor, with an injected in-process cache
//! for role results.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::analysis::prompts::{ROLE_SKILLS_PROMPT_TEMPLATE, USER_SKILLS_PROMPT_TEMPLATE};
use crate::analysis::skills::{ExperienceLevel, SkillProfile};
use crate::corpus::{JobCorpus, DEFAULT_DESCRIPTION_LIMIT};
use crate::llm_client::json_extract::{extract_json, InvalidResponse};
use crate::llm_client::{GatewayError, LlmGateway};

pub const EXTRACTION_TEMPERATURE: f32 = 0.3;

/// Concatenated role descriptions are truncated to this many characters
/// before prompting, bounding cost and latency.
pub const DESCRIPTION_CHAR_BUDGET: usize = 8000;

/// Typed failure of an extraction step. Handlers never propagate these to
/// the client: each one maps to a deterministic fallback plus a warning.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    InvalidResponse(#[from] InvalidResponse),

    #[error("model output missing required shape: {0}")]
    StructuralViolation(String),

    #[error("no job postings matched role '{0}'")]
    NoPostings(String),
}

/// Extracts a normalized SkillProfile from combined resume/profile signals.
pub async fn extract_user_skills(
    gateway: &LlmGateway,
    profile_text: &str,
) -> Result<SkillProfile, ExtractionError> {
    let prompt = USER_SKILLS_PROMPT_TEMPLATE.replace("{resume_text}", profile_text);
    let raw = gateway.ask_for_json(&prompt, EXTRACTION_TEMPERATURE).await?;
    let value = extract_json(&raw)?;
    profile_from_value(value)
}

/// Process-wide memoization of role → SkillProfile. No eviction or expiry;
/// lifetime = process lifetime. Safe for concurrent read/insert; on a race,
/// the first writer wins and the duplicate computation is discarded.
#[derive(Clone, Default)]
pub struct RoleSkillCache {
    inner: Arc<RwLock<HashMap<String, SkillProfile>>>,
}

impl RoleSkillCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_name: &str) -> Option<SkillProfile> {
        self.read().get(role_name).cloned()
    }

    /// First-writer-wins insert. Returns true if this call populated the slot.
    pub fn insert_if_absent(&self, role_name: &str, profile: SkillProfile) -> bool {
        let mut map = self.write();
        if map.contains_key(role_name) {
            return false;
        }
        map.insert(role_name.to_string(), profile);
        true
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, SkillProfile>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, SkillProfile>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Role skill extraction with corpus sourcing and cache memoization.
/// The cache is injected here rather than living as module-global state.
#[derive(Clone)]
pub struct RoleSkillExtractor {
    corpus: Arc<dyn JobCorpus>,
    cache: RoleSkillCache,
}

impl RoleSkillExtractor {
    pub fn new(corpus: Arc<dyn JobCorpus>, cache: RoleSkillCache) -> Self {
        Self { corpus, cache }
    }

    /// Cache hit by exact role name → cached profile, no LLM call.
    /// Miss → corpus descriptions (capped and truncated) → gateway → parse →
    /// cache. Only successful extractions are cached, so a transient failure
    /// never poisons future requests.
    pub async fn extract(
        &self,
        gateway: &LlmGateway,
        role_name: &str,
    ) -> Result<SkillProfile, ExtractionError> {
        if let Some(cached) = self.cache.get(role_name) {
            debug!("role skill cache hit for '{role_name}'");
            return Ok(cached);
        }

        let descriptions = self
            .corpus
            .get_role_descriptions(role_name, DEFAULT_DESCRIPTION_LIMIT)
            .await;
        if descriptions.trim().is_empty() {
            return Err(ExtractionError::NoPostings(role_name.to_string()));
        }
        let descriptions = truncate_chars(&descriptions, DESCRIPTION_CHAR_BUDGET);

        let prompt = ROLE_SKILLS_PROMPT_TEMPLATE.replace("{descriptions}", descriptions);
        let raw = gateway.ask_for_json(&prompt, EXTRACTION_TEMPERATURE).await?;
        let value = extract_json(&raw)?;
        let profile = profile_from_value(value)?;

        self.cache.insert_if_absent(role_name, profile.clone());
        Ok(profile)
    }
}

/// Validates the extracted value's shape and converts it into a normalized
/// SkillProfile. An invalid `experience_level` is dropped rather than failing
/// the whole extraction; absent or wrongly-typed categories are structural
/// violations.
fn profile_from_value(mut value: Value) -> Result<SkillProfile, ExtractionError> {
    let obj = value.as_object_mut().ok_or_else(|| {
        ExtractionError::StructuralViolation("expected a JSON object".to_string())
    })?;

    if !["technical", "tools", "soft"]
        .iter()
        .any(|key| obj.contains_key(*key))
    {
        return Err(ExtractionError::StructuralViolation(
            "no skill categories present".to_string(),
        ));
    }

    if let Some(level) = obj.get("experience_level") {
        if serde_json::from_value::<ExperienceLevel>(level.clone()).is_err() {
            obj.remove("experience_level");
        }
    }

    let profile: SkillProfile = serde_json::from_value(value)
        .map_err(|e| ExtractionError::StructuralViolation(e.to_string()))?;

    Ok(profile.normalized())
}

/// Truncates to at most `budget` characters without splitting a char.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubCorpus(&'static str);

    #[async_trait]
    impl JobCorpus for StubCorpus {
        async fn get_role_descriptions(&self, _role_name: &str, _limit: usize) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_profile_from_value_normalizes() {
        let value = json!({
            "technical": ["JS", "Py", "Python"],
            "tools": ["Git"],
            "soft": ["Communication"],
            "experience_level": "Intermediate"
        });
        let profile = profile_from_value(value).unwrap();
        assert!(profile.technical.contains("JavaScript"));
        assert!(profile.technical.contains("Python"));
        assert_eq!(profile.technical.len(), 2);
        assert_eq!(profile.experience_level, Some(ExperienceLevel::Intermediate));
    }

    #[test]
    fn test_profile_from_value_rejects_non_object() {
        let err = profile_from_value(json!(["SQL"])).unwrap_err();
        assert!(matches!(err, ExtractionError::StructuralViolation(_)));
    }

    #[test]
    fn test_profile_from_value_rejects_missing_categories() {
        let err = profile_from_value(json!({"skills": ["SQL"]})).unwrap_err();
        assert!(matches!(err, ExtractionError::StructuralViolation(_)));
    }

    #[test]
    fn test_profile_from_value_drops_bogus_experience_level() {
        let value = json!({"technical": ["SQL"], "experience_level": "Wizard"});
        let profile = profile_from_value(value).unwrap();
        assert!(profile.experience_level.is_none());
        assert!(profile.technical.contains("SQL"));
    }

    #[test]
    fn test_profile_from_value_rejects_non_string_skills() {
        let err = profile_from_value(json!({"technical": [1, 2]})).unwrap_err();
        assert!(matches!(err, ExtractionError::StructuralViolation(_)));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte chars must not be split.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_cache_first_writer_wins() {
        let cache = RoleSkillCache::new();
        let first = SkillProfile {
            technical: ["SQL".to_string()].into(),
            ..Default::default()
        };
        let second = SkillProfile {
            technical: ["Rust".to_string()].into(),
            ..Default::default()
        };
        assert!(cache.insert_if_absent("Data Analyst", first.clone()));
        assert!(!cache.insert_if_absent("Data Analyst", second));
        assert_eq!(cache.get("Data Analyst"), Some(first));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_gateway() {
        let cache = RoleSkillCache::new();
        let cached = SkillProfile {
            technical: ["SQL".to_string()].into(),
            ..Default::default()
        };
        cache.insert_if_absent("Data Analyst", cached.clone());

        // Gateway has no credentials: any real call would fail, so success
        // proves the cache short-circuited.
        let extractor = RoleSkillExtractor::new(Arc::new(StubCorpus("whatever")), cache);
        let gateway = LlmGateway::new(None, None);
        let profile = extractor.extract(&gateway, "Data Analyst").await.unwrap();
        assert_eq!(profile, cached);
    }

    #[tokio::test]
    async fn test_failed_extraction_is_not_cached() {
        let cache = RoleSkillCache::new();
        let extractor =
            RoleSkillExtractor::new(Arc::new(StubCorpus("some postings")), cache.clone());
        let gateway = LlmGateway::new(None, None);

        let err = extractor.extract(&gateway, "Data Analyst").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Gateway(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_empty_corpus_reports_no_postings() {
        let extractor =
            RoleSkillExtractor::new(Arc::new(StubCorpus("   ")), RoleSkillCache::new());
        let gateway = LlmGateway::new(None, None);

        let err = extractor.extract(&gateway, "Florist").await.unwrap_err();
        assert!(matches!(err, ExtractionError::NoPostings(_)));
    }
}
