//! Alignment & Gap Engine — weighted overlap scoring between a user profile
//! and a role profile, plus missing-skill identification and the readiness
//! estimator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::skills::SkillProfile;

/// Category weights. Fixed constants, not user-configurable; they sum to 1.0.
pub const TECHNICAL_WEIGHT: f64 = 0.6;
pub const TOOLS_WEIGHT: f64 = 0.25;
pub const SOFT_WEIGHT: f64 = 0.15;

/// Skills the role requires that the user profile lacks, per category.
/// Sorted for determinism.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingSkills {
    pub technical: Vec<String>,
    pub tools: Vec<String>,
    pub soft: Vec<String>,
}

impl MissingSkills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.tools.is_empty() && self.soft.is_empty()
    }
}

/// Derived scoring result. Recomputed fresh on every request; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Percentage in [0,100], rounded to two decimals.
    pub score: f64,
    pub missing: MissingSkills,
}

/// Computes the weighted alignment percentage between user and role.
///
/// Per category: ratio = |user ∩ role| / |role|, or 0 when the role lists no
/// skills for that category. An empty required category deliberately
/// contributes 0 rather than full credit or weight renormalization.
pub fn calculate_alignment(user: &SkillProfile, role: &SkillProfile) -> f64 {
    let score = category_ratio(&user.technical, &role.technical) * TECHNICAL_WEIGHT
        + category_ratio(&user.tools, &role.tools) * TOOLS_WEIGHT
        + category_ratio(&user.soft, &role.soft) * SOFT_WEIGHT;

    round2(score * 100.0)
}

/// Per-category set difference `role - user`, sorted.
pub fn identify_missing_skills(user: &SkillProfile, role: &SkillProfile) -> MissingSkills {
    MissingSkills {
        technical: difference(&role.technical, &user.technical),
        tools: difference(&role.tools, &user.tools),
        soft: difference(&role.soft, &user.soft),
    }
}

/// Computes score and missing skills together.
pub fn analyze_alignment(user: &SkillProfile, role: &SkillProfile) -> AlignmentResult {
    AlignmentResult {
        score: calculate_alignment(user, role),
        missing: identify_missing_skills(user, role),
    }
}

/// Maps an alignment score onto a coarse readiness bucket.
/// Total over [0,100]; scores outside the range clamp into the outer buckets.
pub fn estimate_readiness(score: f64) -> &'static str {
    if score >= 80.0 {
        "Job-ready in ~30 days"
    } else if score >= 60.0 {
        "Job-ready in ~60 days"
    } else if score >= 40.0 {
        "Job-ready in ~90 days"
    } else {
        "Needs strong foundation (120+ days)"
    }
}

fn category_ratio(user: &BTreeSet<String>, role: &BTreeSet<String>) -> f64 {
    if role.is_empty() {
        return 0.0;
    }
    let matched = user.intersection(role).count();
    matched as f64 / role.len() as f64
}

fn difference(role: &BTreeSet<String>, user: &BTreeSet<String>) -> Vec<String> {
    role.difference(user).cloned().collect()
}

/// Rounds to two decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
