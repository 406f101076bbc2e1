// Career gap analysis engine: skill normalization, alignment scoring,
// extraction, planning, and the adaptive replan loop.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod alignment;
pub mod evaluator;
pub mod extractors;
pub mod fallback;
pub mod handlers;
pub mod planner;
pub mod prompts;
pub mod skills;
