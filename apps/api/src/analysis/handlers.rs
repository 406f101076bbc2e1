//! Axum route handlers for the analysis API.
//!
//! These implement the degradation contract: every LLM-dependent step that
//! fails is substituted with its deterministic fallback and recorded as
//! exactly one human-readable warning. Nothing in the pipeline is fatal to
//! the request; the worst case is an all-fallback response.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::alignment::{analyze_alignment, estimate_readiness, AlignmentResult};
use crate::analysis::evaluator::adaptive_replan;
use crate::analysis::extractors::extract_user_skills;
use crate::analysis::fallback::{fallback_role_skills, scan_profile_signals, template_roadmap};
use crate::analysis::planner::{generate_plan, RoadmapPlan};
use crate::analysis::skills::{ExperienceLevel, SkillProfile};
use crate::errors::AppError;
use crate::intake::github::fetch_github_summary;
use crate::intake::{resume_text_from_pdf, ProfileSignals};
use crate::state::AppState;

const DEFAULT_HOURS_PER_DAY: u32 = 2;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: Option<String>,
    /// Base64-encoded PDF, used when `resume_text` is absent.
    pub resume_file_base64: Option<String>,
    pub linkedin_text: Option<String>,
    pub github_username: Option<String>,
    pub target_role: String,
    pub experience_level: Option<ExperienceLevel>,
    pub hours_per_day: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub user_skills: SkillProfile,
    pub role_skills: SkillProfile,
    pub alignment: AlignmentResult,
    pub readiness: &'static str,
    pub roadmap: RoadmapPlan,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplanRequest {
    #[serde(default)]
    pub completed_skills: Vec<String>,
    pub user_skills: SkillProfile,
    pub role_skills: SkillProfile,
    pub target_role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub hours_per_day: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ReplanResponse {
    pub alignment: AlignmentResult,
    pub readiness: &'static str,
    pub roadmap: RoadmapPlan,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Full pipeline: intake → user skill extraction → role skill extraction →
/// alignment → readiness → roadmap. Each step degrades independently.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.target_role.trim().is_empty() {
        return Err(AppError::Validation("target_role cannot be empty".to_string()));
    }

    let mut warnings = Vec::new();

    let signals = gather_signals(&state, &request, &mut warnings).await;
    if signals.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no usable profile signals: provide resume_text, resume_file_base64, \
             linkedin_text, or github_username"
                .to_string(),
        ));
    }
    let profile_text = signals.combined_text();

    let user_skills = match extract_user_skills(&state.gateway, &profile_text).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("user skill extraction failed: {e}");
            warnings.push(format!(
                "skill extraction failed ({e}); substituted keyword scan of profile signals"
            ));
            scan_profile_signals(&profile_text)
        }
    };

    let role_skills = match state
        .role_skills
        .extract(&state.gateway, &request.target_role)
        .await
    {
        Ok(profile) => profile,
        Err(e) => {
            warn!("role skill extraction failed: {e}");
            warnings.push(format!(
                "role skill extraction for '{}' failed ({e}); substituted static role table",
                request.target_role
            ));
            fallback_role_skills(&request.target_role)
        }
    };

    let user_skills = user_skills.normalized();
    let role_skills = role_skills.normalized();

    let alignment = analyze_alignment(&user_skills, &role_skills);
    let readiness = estimate_readiness(alignment.score);

    let experience_level = request.experience_level.or(user_skills.experience_level);
    let hours_per_day = request.hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY);

    let roadmap = match generate_plan(
        &state.gateway,
        &alignment.missing,
        experience_level,
        hours_per_day,
    )
    .await
    {
        Ok(plan) => plan,
        Err(e) => {
            warn!("roadmap generation failed: {e}");
            warnings.push(format!(
                "roadmap generation failed ({e}); substituted templated plan"
            ));
            template_roadmap(&alignment.missing, &request.target_role)
        }
    };

    Ok(Json(AnalyzeResponse {
        user_skills,
        role_skills,
        alignment,
        readiness,
        roadmap,
        warnings,
    }))
}

/// POST /api/v1/replan
///
/// The adaptive feedback loop: mark skills complete → re-score → re-plan.
pub async fn handle_replan(
    State(state): State<AppState>,
    Json(request): Json<ReplanRequest>,
) -> Result<Json<ReplanResponse>, AppError> {
    let mut warnings = Vec::new();

    let hours_per_day = request.hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY);
    let outcome = adaptive_replan(
        &state.gateway,
        &request.completed_skills,
        &request.user_skills,
        &request.role_skills,
        request.experience_level,
        hours_per_day,
    )
    .await;

    let readiness = estimate_readiness(outcome.alignment.score);

    let roadmap = match outcome.plan {
        Ok(plan) => plan,
        Err(e) => {
            warn!("replan roadmap generation failed: {e}");
            warnings.push(format!(
                "roadmap generation failed ({e}); substituted templated plan"
            ));
            let role_label = request.target_role.as_deref().unwrap_or("your target role");
            template_roadmap(&outcome.alignment.missing, role_label)
        }
    };

    Ok(Json(ReplanResponse {
        alignment: outcome.alignment,
        readiness,
        roadmap,
        warnings,
    }))
}

/// Assembles the optional profile signals, recording a warning for each
/// signal that was supplied but could not be used.
async fn gather_signals(
    state: &AppState,
    request: &AnalyzeRequest,
    warnings: &mut Vec<String>,
) -> ProfileSignals {
    let resume_text = match (&request.resume_text, &request.resume_file_base64) {
        (Some(text), _) if !text.trim().is_empty() => Some(text.clone()),
        (_, Some(data)) if !data.trim().is_empty() => match resume_text_from_pdf(data) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("resume PDF extraction failed: {e}");
                warnings.push(format!("resume PDF extraction failed ({e}); resume file ignored"));
                None
            }
        },
        _ => None,
    };

    let github_text = match &request.github_username {
        Some(username) if !username.trim().is_empty() => {
            match fetch_github_summary(&state.http, username).await {
                Ok(summary) => Some(summary.as_signal_text()),
                Err(e) => {
                    warn!("GitHub fetch failed: {e}");
                    warnings.push(format!(
                        "GitHub fetch for '{username}' failed ({e}); GitHub signal skipped"
                    ));
                    None
                }
            }
        }
        _ => None,
    };

    ProfileSignals {
        resume_text,
        linkedin_text: request.linkedin_text.clone(),
        github_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extractors::{RoleSkillCache, RoleSkillExtractor};
    use crate::config::Config;
    use crate::corpus::JsonlJobCorpus;
    use crate::llm_client::LlmGateway;
    use std::sync::Arc;

    /// State with no LLM credentials and an empty corpus: every LLM-backed
    /// step fails fast without network I/O, exercising the all-fallback path.
    fn offline_state() -> AppState {
        AppState {
            gateway: LlmGateway::new(None, None),
            role_skills: RoleSkillExtractor::new(
                Arc::new(JsonlJobCorpus::empty()),
                RoleSkillCache::new(),
            ),
            http: reqwest::Client::new(),
            config: Config {
                groq_api_key: None,
                openrouter_api_key: None,
                job_postings_path: None,
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }

    fn analyze_request(resume_text: &str, target_role: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            resume_text: Some(resume_text.to_string()),
            target_role: target_role.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_all_fallback_response_is_well_formed() {
        let state = offline_state();
        let request = analyze_request(
            "Analyst with SQL, Excel and strong communication skills.",
            "Data Analyst",
        );

        let Json(response) = handle_analyze(State(state), Json(request)).await.unwrap();

        // Keyword scan found skills from the resume text.
        assert!(response.user_skills.technical.contains("SQL"));
        assert!(response.user_skills.tools.contains("Excel"));
        // Role profile came from the static table.
        assert!(response.role_skills.technical.contains("SQL"));
        // Score bounded, readiness consistent with it.
        assert!((0.0..=100.0).contains(&response.alignment.score));
        assert!(!response.readiness.is_empty());
        // Templated plan is exactly 4 weeks.
        assert_eq!(response.roadmap.weeks.len(), 4);
        // One warning per degraded LLM step (extraction, role, planner).
        assert_eq!(response.warnings.len(), 3);
    }

    #[tokio::test]
    async fn test_analyze_empty_target_role_rejected() {
        let state = offline_state();
        let request = analyze_request("some resume", "  ");
        let err = handle_analyze(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_analyze_without_signals_rejected() {
        let state = offline_state();
        let request = AnalyzeRequest {
            target_role: "Data Analyst".to_string(),
            ..Default::default()
        };
        let err = handle_analyze(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_analyze_bad_resume_pdf_degrades_with_warning() {
        let state = offline_state();
        let request = AnalyzeRequest {
            resume_file_base64: Some("!!! not base64 !!!".to_string()),
            linkedin_text: Some("Python developer, docker enthusiast".to_string()),
            target_role: "Backend Engineer".to_string(),
            ..Default::default()
        };

        let Json(response) = handle_analyze(State(state), Json(request)).await.unwrap();

        assert!(response
            .warnings
            .iter()
            .any(|w| w.contains("resume PDF extraction failed")));
        // LinkedIn text still drove the keyword scan.
        assert!(response.user_skills.technical.contains("Python"));
    }

    #[tokio::test]
    async fn test_analyze_unknown_role_uses_default_table_entry() {
        let state = offline_state();
        let request = analyze_request("git and communication", "Llama Wrangler");

        let Json(response) = handle_analyze(State(state), Json(request)).await.unwrap();

        assert!(response.role_skills.technical.contains("Problem Solving"));
        // Default table: user matched Git + Communication out of 3 categories:
        // technical 0/1, tools 1/1, soft 1/1 → 0 + 25 + 15 = 40.0
        assert_eq!(response.alignment.score, 40.0);
        assert_eq!(response.readiness, "Job-ready in ~90 days");
    }

    #[tokio::test]
    async fn test_replan_rescores_and_falls_back_to_template() {
        let state = offline_state();
        let request = ReplanRequest {
            completed_skills: vec!["Python".to_string()],
            user_skills: SkillProfile {
                technical: ["SQL".to_string()].into(),
                soft: ["Communication".to_string()].into(),
                ..Default::default()
            },
            role_skills: SkillProfile {
                technical: ["SQL".to_string(), "Python".to_string()].into(),
                soft: ["Communication".to_string()].into(),
                ..Default::default()
            },
            target_role: Some("Data Analyst".to_string()),
            experience_level: None,
            hours_per_day: None,
        };

        let Json(response) = handle_replan(State(state), Json(request)).await.unwrap();

        assert_eq!(response.alignment.score, 75.0);
        assert!(response.alignment.missing.technical.is_empty());
        assert_eq!(response.roadmap.weeks.len(), 4);
        assert_eq!(response.warnings.len(), 1);
    }
}
