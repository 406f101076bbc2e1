//! Evaluator / Adaptive Replanner — the progress-feedback loop: mark skills
//! complete, re-score, re-plan. One iteration per call; the core holds no
//! session state across calls.

use crate::analysis::alignment::{analyze_alignment, AlignmentResult};
use crate::analysis::extractors::ExtractionError;
use crate::analysis::planner::{generate_plan, RoadmapPlan};
use crate::analysis::skills::{normalize_skills, ExperienceLevel, SkillProfile};
use crate::llm_client::LlmGateway;

/// Merges completed skills into the user's technical set, re-normalizes both
/// profiles, and recomputes alignment and missing skills from scratch.
/// Pure recomputation — no memo of prior state.
pub fn evaluate_progress(
    completed: &[String],
    user: &SkillProfile,
    role: &SkillProfile,
) -> AlignmentResult {
    let updated_user = SkillProfile {
        technical: normalize_skills(user.technical.iter().map(String::as_str).chain(
            completed.iter().map(String::as_str),
        )),
        tools: normalize_skills(&user.tools),
        soft: normalize_skills(&user.soft),
        experience_level: user.experience_level,
    };
    let normalized_role = role.normalized();

    analyze_alignment(&updated_user, &normalized_role)
}

/// Result of one evaluate → re-plan iteration. The plan is a `Result` so the
/// boundary layer can substitute the templated fallback and record a warning.
pub struct ReplanOutcome {
    pub alignment: AlignmentResult,
    pub plan: Result<RoadmapPlan, ExtractionError>,
}

/// Composes `evaluate_progress` with the planner: progress → re-score →
/// re-plan. Repeated calls are the caller's responsibility.
pub async fn adaptive_replan(
    gateway: &LlmGateway,
    completed: &[String],
    user: &SkillProfile,
    role: &SkillProfile,
    experience_level: Option<ExperienceLevel>,
    hours_per_day: u32,
) -> ReplanOutcome {
    let alignment = evaluate_progress(completed, user, role);
    let plan = generate_plan(gateway, &alignment.missing, experience_level, hours_per_day).await;

    ReplanOutcome { alignment, plan }
}
