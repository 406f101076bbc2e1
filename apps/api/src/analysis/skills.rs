//! Skill profiles and the skill normalizer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Coarse self-reported experience bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(alias = "beginner")]
    Beginner,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "advanced")]
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

/// A structured skill set: three named categories of canonical skill strings.
///
/// Categories are always present (missing keys deserialize to empty sets) and
/// hold deduplicated, normalized tokens. `BTreeSet` keeps the serialized
/// order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    #[serde(default)]
    pub technical: BTreeSet<String>,
    #[serde(default)]
    pub tools: BTreeSet<String>,
    #[serde(default)]
    pub soft: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
}

impl SkillProfile {
    /// Returns a copy with every category run through the normalizer.
    /// Idempotent: normalizing twice yields the same sets.
    pub fn normalized(&self) -> SkillProfile {
        SkillProfile {
            technical: normalize_skills(&self.technical),
            tools: normalize_skills(&self.tools),
            soft: normalize_skills(&self.soft),
            experience_level: self.experience_level,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.tools.is_empty() && self.soft.is_empty()
    }
}

/// Alias table mapping common free-text variants to canonical skill names.
/// Lookup is case-insensitive on the trimmed token.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("REST API", "REST"),
    ("REST APIs", "REST"),
    ("RESTful Services", "REST"),
    ("JS", "JavaScript"),
    ("Py", "Python"),
    ("Tensorflow", "TensorFlow"),
    ("Postgres", "PostgreSQL"),
    ("K8s", "Kubernetes"),
    ("ML", "Machine Learning"),
];

/// Canonicalizes free-text skill tokens: trim, alias-resolve, deduplicate.
/// Pure; empty input yields an empty set.
pub fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .filter_map(|skill| {
            let trimmed = skill.as_ref().trim();
            if trimmed.is_empty() {
                return None;
            }
            let canonical = SKILL_ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
                .map(|(_, canonical)| canonical.to_string())
                .unwrap_or_else(|| trimmed.to_string());
            Some(canonical)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliasing_trim_and_dedupe() {
        let normalized = normalize_skills(["JS", "js ", "JavaScript"]);
        assert_eq!(normalized, BTreeSet::from(["JavaScript".to_string()]));
    }

    #[test]
    fn test_unknown_skills_kept_as_is() {
        let normalized = normalize_skills(["Haskell", "  Elm  "]);
        assert!(normalized.contains("Haskell"));
        assert!(normalized.contains("Elm"));
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn test_empty_input_empty_output() {
        let normalized = normalize_skills(Vec::<String>::new());
        assert!(normalized.is_empty());
    }

    #[test]
    fn test_blank_tokens_dropped() {
        let normalized = normalize_skills(["", "   ", "SQL"]);
        assert_eq!(normalized.len(), 1);
        assert!(normalized.contains("SQL"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_skills(["REST APIs", "Py", "Tensorflow", "SQL"]);
        let twice = normalize_skills(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_profile_normalized_is_idempotent() {
        let profile = SkillProfile {
            technical: BTreeSet::from(["JS ".to_string(), "Py".to_string()]),
            tools: BTreeSet::from(["K8s".to_string()]),
            soft: BTreeSet::from(["Communication".to_string()]),
            experience_level: Some(ExperienceLevel::Intermediate),
        };
        let once = profile.normalized();
        let twice = once.normalized();
        assert_eq!(once, twice);
        assert!(once.technical.contains("JavaScript"));
        assert!(once.technical.contains("Python"));
        assert!(once.tools.contains("Kubernetes"));
        assert_eq!(once.experience_level, Some(ExperienceLevel::Intermediate));
    }

    #[test]
    fn test_profile_missing_categories_deserialize_empty() {
        let profile: SkillProfile = serde_json::from_str(r#"{"technical": ["SQL"]}"#).unwrap();
        assert!(profile.tools.is_empty());
        assert!(profile.soft.is_empty());
        assert!(profile.experience_level.is_none());
    }

    #[test]
    fn test_experience_level_lowercase_alias() {
        let profile: SkillProfile =
            serde_json::from_str(r#"{"experience_level": "intermediate"}"#).unwrap();
        assert_eq!(profile.experience_level, Some(ExperienceLevel::Intermediate));
    }
}
