//! Robust JSON extraction from raw model output.
//!
//! LLM output is not contractually valid JSON: it arrives fenced in markdown,
//! wrapped in prose, with smart quotes, trailing commas, or Python-style
//! literals. This module recovers a structured value through an ordered list
//! of candidate substrings and repair passes — maximally tolerant, but it
//! never invents data: if no candidate parses, extraction fails.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("no JSON value could be recovered from model output")]
pub struct InvalidResponse;

/// Extracts the first JSON object or array recoverable from `text`.
///
/// Candidates are tried in order:
/// 1. The whole text with surrounding code fences stripped.
/// 2. The content of every fenced block in the text.
/// 3. Brace-delimited `{...}` spans (greedy largest first, then each
///    balanced group).
/// 4. The whole trimmed text, if it looks like a bracketed array.
///
/// Each candidate gets quote normalization and trailing-comma stripping, a
/// strict parse, and then a relaxed parse that tolerates single-quoted
/// strings, tuple parentheses, and Python literal keywords.
pub fn extract_json(text: &str) -> Result<Value, InvalidResponse> {
    for candidate in collect_candidates(text) {
        if let Some(value) = parse_candidate(&candidate) {
            return Ok(value);
        }
    }
    Err(InvalidResponse)
}

fn collect_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    candidates.push(strip_fences(text).to_string());
    candidates.extend(fenced_blocks(text));

    // Greedy largest brace span first, then each balanced group.
    let trimmed = text.trim();
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            candidates.push(trimmed[start..=end].to_string());
        }
    }
    candidates.extend(balanced_brace_groups(trimmed));

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        candidates.push(trimmed.to_string());
    }

    candidates
}

fn parse_candidate(candidate: &str) -> Option<Value> {
    let repaired = strip_trailing_commas(&normalize_quotes(candidate));

    if let Some(value) = parse_structured(&repaired) {
        return Some(value);
    }

    // Permissive literal-structure pass: single quotes, tuples, True/False/None.
    let relaxed = strip_trailing_commas(&relax_literals(&repaired));
    parse_structured(&relaxed)
}

/// Strict parse accepting only objects and arrays — scalars are not useful
/// extraction results and usually indicate a false-positive candidate.
fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ Value::Object(_)) | Ok(value @ Value::Array(_)) => Some(value),
        _ => None,
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences wrapping the whole text.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Collects the content of every fenced block, dropping a leading language
/// tag line (`json`, `python`, ...) when present.
fn fenced_blocks(text: &str) -> Vec<String> {
    text.split("```")
        .skip(1)
        .step_by(2)
        .map(|block| {
            let block = block.trim();
            match block.split_once('\n') {
                Some((first_line, rest))
                    if !first_line.contains('{') && !first_line.contains('[') =>
                {
                    rest.trim().to_string()
                }
                _ => block.to_string(),
            }
        })
        .filter(|b| !b.is_empty())
        .collect()
}

/// Collects each balanced top-level `{...}` group, string-aware.
fn balanced_brace_groups(text: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut group_start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    group_start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = group_start.take() {
                        groups.push(text[start..=i].to_string());
                    }
                }
            }
            _ => {}
        }
    }

    groups
}

/// Replaces curly/smart quotes with their straight equivalents.
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            _ => c,
        })
        .collect()
}

/// Removes trailing commas before a closing brace or bracket, string-aware.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Rewrites Python-ish literal structure into JSON: single-quoted strings
/// become double-quoted, tuple parentheses become brackets, and the keywords
/// True/False/None become true/false/null.
fn relax_literals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                // Copy a double-quoted string verbatim.
                out.push(c);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        i += 1;
                        out.push(chars[i]);
                    } else if chars[i] == '"' {
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            '\'' => {
                // Single-quoted string: re-emit double-quoted, escaping inner
                // double quotes and unescaping inner single quotes.
                out.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '\'' {
                    match chars[i] {
                        '\\' if i + 1 < chars.len() && chars[i + 1] == '\'' => {
                            out.push('\'');
                            i += 1;
                        }
                        '"' => out.push_str("\\\""),
                        other => out.push(other),
                    }
                    i += 1;
                }
                out.push('"');
                i += 1;
            }
            '(' => {
                out.push('[');
                i += 1;
            }
            ')' => {
                out.push(']');
                i += 1;
            }
            c if c.is_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "True" => out.push_str("true"),
                    "False" => out.push_str("false"),
                    "None" => out.push_str("null"),
                    other => out.push_str(other),
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    out
}
