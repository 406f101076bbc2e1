// All LLM prompt constants for the analysis module.
// The JSON-only system contract lives in the gateway; these are user prompts.

/// Resume skill extraction. Replace `{resume_text}` before sending.
pub const USER_SKILLS_PROMPT_TEMPLATE: &str = r#"Extract structured skills from the following resume and profile signals.

Return ONLY valid JSON in this format:

{
  "technical": [],
  "tools": [],
  "soft": [],
  "experience_level": "Beginner | Intermediate | Advanced"
}

Resume:
{resume_text}"#;

/// Role skill extraction from a job-posting corpus sample.
/// Replace `{descriptions}` before sending.
pub const ROLE_SKILLS_PROMPT_TEMPLATE: &str = r#"Extract required skills from the following job descriptions.

Return ONLY valid JSON in this format:

{
  "technical": [],
  "tools": [],
  "soft": []
}

Job Descriptions:
{descriptions}"#;

/// 4-week roadmap generation. Replace `{experience_level}`, `{hours_per_day}`,
/// `{missing_technical}`, `{missing_tools}`, `{missing_soft}`.
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"You are an AI career planning system.

The user:
- Level: {experience_level}
- Study time per day: {hours_per_day} hours

Missing Technical Skills:
{missing_technical}

Missing Tool Skills:
{missing_tools}

Missing Soft Skills:
{missing_soft}

RULES:
- Generate EXACTLY 4 weeks.
- Only week_1, week_2, week_3, week_4.
- Do NOT generate week_5 or beyond.
- No repetition.
- Keep tasks concise.
- Strictly valid JSON.
- No explanations.

FORMAT:

{
    "week_1": {
        "focus": "",
        "tasks": [],
        "project": "",
        "checkpoint": ""
    },
    "week_2": {
        "focus": "",
        "tasks": [],
        "project": "",
        "checkpoint": ""
    },
    "week_3": {
        "focus": "",
        "tasks": [],
        "project": "",
        "checkpoint": ""
    },
    "week_4": {
        "focus": "",
        "tasks": [],
        "project": "",
        "checkpoint": ""
    }
}"#;
