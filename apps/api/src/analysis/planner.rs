//! Roadmap Planner — builds the 4-week learning plan from missing skills and
//! hard-enforces the week contract on whatever the model returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::alignment::MissingSkills;
use crate::analysis::extractors::ExtractionError;
use crate::analysis::prompts::ROADMAP_PROMPT_TEMPLATE;
use crate::analysis::skills::ExperienceLevel;
use crate::llm_client::json_extract::extract_json;
use crate::llm_client::LlmGateway;

pub const PLANNING_TEMPERATURE: f32 = 0.2;

/// The only week keys a plan may carry, in order. Anything else the model
/// generates (week_5, week_12, prose keys) is discarded — a structural guard
/// against over-generation, independent of whether the model honored the
/// prompt rules.
pub const WEEK_KEYS: [&str; 4] = ["week_1", "week_2", "week_3", "week_4"];

/// One week of the learning roadmap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub checkpoint: String,
}

/// An ordered sequence of at most 4 week entries. Serialized as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadmapPlan {
    pub weeks: Vec<WeekPlan>,
}

/// Week fields as the model emits them, keyed under `week_N`.
#[derive(Debug, Default, Deserialize)]
struct WeekBody {
    #[serde(default)]
    focus: String,
    #[serde(default)]
    tasks: Vec<String>,
    #[serde(default)]
    project: String,
    #[serde(default)]
    checkpoint: String,
}

/// Generates a 4-week roadmap for the missing skills via the gateway.
/// The planner never synthesizes weeks itself; a failure here is handled by
/// the boundary's templated-plan fallback.
pub async fn generate_plan(
    gateway: &LlmGateway,
    missing: &MissingSkills,
    experience_level: Option<ExperienceLevel>,
    hours_per_day: u32,
) -> Result<RoadmapPlan, ExtractionError> {
    let level = experience_level
        .unwrap_or(ExperienceLevel::Intermediate)
        .as_str();

    let prompt = ROADMAP_PROMPT_TEMPLATE
        .replace("{experience_level}", level)
        .replace("{hours_per_day}", &hours_per_day.to_string())
        .replace("{missing_technical}", &missing.technical.join(", "))
        .replace("{missing_tools}", &missing.tools.join(", "))
        .replace("{missing_soft}", &missing.soft.join(", "));

    let raw = gateway.ask_for_json(&prompt, PLANNING_TEMPERATURE).await?;
    let value = extract_json(&raw)?;
    enforce_week_contract(&value)
}

/// Filters a parsed plan down to keys `week_1..week_4`, in that order.
/// Extra weeks are truncated; missing weeks are simply absent.
pub fn enforce_week_contract(value: &Value) -> Result<RoadmapPlan, ExtractionError> {
    let obj = value.as_object().ok_or_else(|| {
        ExtractionError::StructuralViolation("plan is not a JSON object".to_string())
    })?;

    let mut weeks = Vec::new();
    for key in WEEK_KEYS {
        let Some(body) = obj.get(key) else {
            continue;
        };
        let body: WeekBody = serde_json::from_value(body.clone())
            .map_err(|e| ExtractionError::StructuralViolation(format!("{key}: {e}")))?;
        weeks.push(WeekPlan {
            week: key.to_string(),
            focus: body.focus,
            tasks: body.tasks,
            project: body.project,
            checkpoint: body.checkpoint,
        });
    }

    Ok(RoadmapPlan { weeks })
}
