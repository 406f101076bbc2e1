//! Deterministic fallback computations for every LLM-dependent step.
//!
//! These are the substitutions the boundary layer applies when extraction or
//! planning fails: a keyword scan instead of LLM skill extraction, a static
//! role table instead of corpus-driven role extraction, and a templated
//! roadmap instead of a generated plan. All pure, no network.

use crate::analysis::alignment::MissingSkills;
use crate::analysis::planner::{RoadmapPlan, WeekPlan};
use crate::analysis::skills::SkillProfile;

enum Category {
    Technical,
    Tools,
    Soft,
}

/// Fixed keyword inventory matched case-insensitively against profile text.
/// (needle, canonical name, category)
const KEYWORD_INVENTORY: &[(&str, &str, Category)] = &[
    ("sql", "SQL", Category::Technical),
    ("python", "Python", Category::Technical),
    ("javascript", "JavaScript", Category::Technical),
    ("typescript", "TypeScript", Category::Technical),
    ("react", "React", Category::Technical),
    ("node", "Node.js", Category::Technical),
    ("machine learning", "Machine Learning", Category::Technical),
    ("statistics", "Statistics", Category::Technical),
    ("data visualization", "Data Visualization", Category::Technical),
    ("excel", "Excel", Category::Tools),
    ("tableau", "Tableau", Category::Tools),
    ("power bi", "Power BI", Category::Tools),
    ("aws", "AWS", Category::Tools),
    ("git", "Git", Category::Tools),
    ("docker", "Docker", Category::Tools),
    ("communication", "Communication", Category::Soft),
    ("stakeholder", "Stakeholder Management", Category::Soft),
    ("storytelling", "Storytelling", Category::Soft),
    ("product sense", "Product Sense", Category::Soft),
];

/// Keyword-matching skill extraction: the substitute when the LLM extractor
/// fails. Matches the inventory against the lowercased signal text.
pub fn scan_profile_signals(text: &str) -> SkillProfile {
    let haystack = text.to_lowercase();
    let mut profile = SkillProfile::default();

    for (needle, canonical, category) in KEYWORD_INVENTORY {
        if haystack.contains(needle) {
            let set = match category {
                Category::Technical => &mut profile.technical,
                Category::Tools => &mut profile.tools,
                Category::Soft => &mut profile.soft,
            };
            set.insert(canonical.to_string());
        }
    }

    profile
}

/// Static per-role skill requirements: the substitute when role extraction
/// fails. Unknown roles get the `default` entry.
pub fn fallback_role_skills(role_name: &str) -> SkillProfile {
    let (technical, tools, soft): (&[&str], &[&str], &[&str]) = match role_name {
        r if r.eq_ignore_ascii_case("Product Analyst") => (
            &["SQL", "A/B Testing", "Metrics"],
            &["Excel", "Tableau"],
            &["Communication", "Stakeholder Management"],
        ),
        r if r.eq_ignore_ascii_case("Data Analyst") => (
            &["SQL", "Data Cleaning", "Visualization"],
            &["Excel", "Power BI"],
            &["Storytelling", "Communication"],
        ),
        r if r.eq_ignore_ascii_case("Frontend Engineer") => (
            &["JavaScript", "React", "TypeScript"],
            &["Git", "Vite"],
            &["Problem Solving", "Collaboration"],
        ),
        r if r.eq_ignore_ascii_case("Backend Engineer") => (
            &["Python", "APIs", "Databases"],
            &["Django", "Postman", "Git"],
            &["Problem Solving", "Communication"],
        ),
        r if r.eq_ignore_ascii_case("Full Stack Developer") => (
            &["JavaScript", "React", "Node.js"],
            &["Git", "Docker", "Postman"],
            &["Collaboration", "Problem Solving"],
        ),
        r if r.eq_ignore_ascii_case("Machine Learning Engineer") => (
            &["Python", "Machine Learning", "Model Evaluation"],
            &["Jupyter", "TensorFlow", "Git"],
            &["Analytical Thinking", "Communication"],
        ),
        r if r.eq_ignore_ascii_case("DevOps Engineer") => (
            &["CI/CD", "Infrastructure as Code", "Cloud"],
            &["Docker", "Kubernetes", "GitHub Actions"],
            &["Ownership", "Collaboration"],
        ),
        r if r.eq_ignore_ascii_case("UI/UX Designer") => (
            &["Interaction Design", "User Research", "Prototyping"],
            &["Figma", "FigJam", "Adobe XD"],
            &["Empathy", "Communication"],
        ),
        r if r.eq_ignore_ascii_case("Product Manager") => (
            &["Roadmapping", "Prioritization", "Analytics"],
            &["Jira", "Notion", "Mixpanel"],
            &["Leadership", "Stakeholder Management"],
        ),
        _ => (&["Problem Solving"], &["Git"], &["Communication"]),
    };

    SkillProfile {
        technical: technical.iter().map(|s| s.to_string()).collect(),
        tools: tools.iter().map(|s| s.to_string()).collect(),
        soft: soft.iter().map(|s| s.to_string()).collect(),
        experience_level: None,
    }
}

/// Templated 4-week roadmap: the substitute when the planner fails.
/// Always exactly 4 weeks, driven by the missing-skill lists.
pub fn template_roadmap(missing: &MissingSkills, target_role: &str) -> RoadmapPlan {
    let gaps: Vec<&str> = missing
        .technical
        .iter()
        .chain(missing.tools.iter())
        .chain(missing.soft.iter())
        .map(|s| s.as_str())
        .collect();

    let week_one = &gaps[..gaps.len().min(2)];
    let week_two = &gaps[gaps.len().min(2)..gaps.len().min(4)];

    let week_1 = WeekPlan {
        week: "week_1".to_string(),
        focus: if week_one.is_empty() {
            "Baseline projects".to_string()
        } else {
            format!("Close gaps: {}", week_one.join(", "))
        },
        tasks: vec![
            "Pick one learning resource per gap skill".to_string(),
            "Daily skill drills".to_string(),
            "Start one portfolio project".to_string(),
        ],
        project: "One portfolio project exercising the week's skills".to_string(),
        checkpoint: "Project skeleton reviewed".to_string(),
    };

    let week_2 = WeekPlan {
        week: "week_2".to_string(),
        focus: if week_two.is_empty() {
            "Advance project".to_string()
        } else {
            format!("Build proof in {}", week_two.join(", "))
        },
        tasks: vec![
            "Extend the portfolio project".to_string(),
            "Write a short case study".to_string(),
        ],
        project: "Second project or major feature + case study".to_string(),
        checkpoint: "Mock interview".to_string(),
    };

    let week_3 = WeekPlan {
        week: "week_3".to_string(),
        focus: format!("Role alignment for {target_role}"),
        tasks: vec![
            "Map projects to role requirements".to_string(),
            "Prepare interview stories".to_string(),
            "Update resume".to_string(),
        ],
        project: "Interview stories + resume update".to_string(),
        checkpoint: "Role fit score update".to_string(),
    };

    let week_4 = WeekPlan {
        week: "week_4".to_string(),
        focus: "Signal amplification".to_string(),
        tasks: vec![
            "Refresh LinkedIn and GitHub profiles".to_string(),
            "Apply to target roles".to_string(),
        ],
        project: "LinkedIn refresh + applications".to_string(),
        checkpoint: "Next sprint plan".to_string(),
    };

    RoadmapPlan {
        weeks: vec![week_1, week_2, week_3, week_4],
    }
}
