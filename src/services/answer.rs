// SPDX-License-Identifier: MIT

//! Structured-answer extraction from LLM completion text.
//!
//! The completion is asked to include a JSON payload
//! `{title, summary, steps, template}`, usually inside a markdown code
//! fence. Providers are unreliable about this, so extraction degrades:
//! fenced JSON block, then a bare JSON object scan, then a heuristic
//! line parser. Malformed output is never surfaced to the caller as an
//! error.

use serde::{Deserialize, Serialize};

const MAX_TITLE_CHARS: usize = 80;
const MAX_SUMMARY_CHARS: usize = 200;
const MAX_STEPS: usize = 5;

/// The structured portion of an answer (sources are attached separately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub title: String,
    pub summary: String,
    pub steps: Vec<String>,
    pub template: Option<String>,
}

/// JSON payload shape the completion is asked to emit.
#[derive(Deserialize)]
struct RawAnswer {
    title: Option<String>,
    summary: Option<String>,
    #[serde(default)]
    steps: Vec<String>,
    template: Option<String>,
}

impl RawAnswer {
    /// An empty object carries no answer; treat it as unparseable.
    fn has_content(&self) -> bool {
        self.title.is_some() || self.summary.is_some() || !self.steps.is_empty()
    }
}

/// Extract a structured answer from completion text.
pub fn parse_answer(response_text: &str, query: &str) -> StructuredAnswer {
    if let Some(raw) = extract_json_answer(response_text) {
        return normalize(raw, response_text, query);
    }
    heuristic_parse(response_text, query)
}

fn extract_json_answer(text: &str) -> Option<RawAnswer> {
    if let Some(block) = fenced_block(text) {
        if let Ok(raw) = serde_json::from_str::<RawAnswer>(block.trim()) {
            if raw.has_content() {
                return Some(raw);
            }
        }
    }

    // Bare object scan: widest `{ ... }` span in the text.
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<RawAnswer>(&text[start..=end])
        .ok()
        .filter(RawAnswer::has_content)
}

/// Body of the first markdown code fence, info string stripped.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

fn normalize(raw: RawAnswer, response_text: &str, query: &str) -> StructuredAnswer {
    let mut steps: Vec<String> = raw
        .steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if steps.is_empty() {
        steps = default_steps();
    }
    steps.truncate(MAX_STEPS);

    StructuredAnswer {
        title: raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| truncate_title(query)),
        summary: raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| char_prefix(response_text, MAX_SUMMARY_CHARS)),
        steps,
        template: raw.template.filter(|t| !t.trim().is_empty()),
    }
}

/// Last-resort parser: title from the query, summary from the leading
/// text, steps from numbered or dashed lines.
fn heuristic_parse(response_text: &str, query: &str) -> StructuredAnswer {
    let mut steps: Vec<String> = response_text
        .lines()
        .map(str::trim)
        .filter(|line| looks_like_step(line))
        .map(|line| line.to_string())
        .take(MAX_STEPS)
        .collect();

    if steps.is_empty() {
        steps = default_steps();
    }

    StructuredAnswer {
        title: truncate_title(query),
        summary: char_prefix(response_text, MAX_SUMMARY_CHARS),
        steps,
        template: None,
    }
}

fn looks_like_step(line: &str) -> bool {
    if line.starts_with("- ") {
        return true;
    }
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('1'..='9'), Some('.') | Some(')'))
    )
}

fn default_steps() -> Vec<String> {
    vec![
        "Review the relevant laws and regulations".to_string(),
        "Gather all necessary documentation".to_string(),
        "Consult with appropriate authorities if needed".to_string(),
        "Follow prescribed legal procedures".to_string(),
    ]
}

/// Query truncated to the title cap on a char boundary.
fn truncate_title(query: &str) -> String {
    if query.chars().count() <= MAX_TITLE_CHARS {
        return query.to_string();
    }
    let mut title = char_prefix(query, MAX_TITLE_CHARS - 3);
    title.push_str("...");
    title
}

fn char_prefix(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
