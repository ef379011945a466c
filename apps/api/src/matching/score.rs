//! Match score parsing: turns the model's free-form answer into a 0–100 score plus feedback.
//!
//! The model is asked to put the score alone on the first line. In practice the line
//! arrives as `83`, `Score: 83`, `83/100`, `**83%**` or `Match score (0-100): 83`. The
//! first number after the last `:` wins; without one, the first number on the line.
//! When there is none, the score falls back to `DEFAULT_MATCH_SCORE`.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Score recorded when the first line of the answer carries no number.
pub const DEFAULT_MATCH_SCORE: f64 = 50.0;

pub const MAX_MATCH_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub feedback: String,
}

/// Coarse rating used by clients to colour a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::High
        } else if score >= 60.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Splits a model answer into score (first line) and feedback (everything after it).
///
/// Feedback is the remaining lines, or the whole answer when it is a single line.
pub fn parse_match_output(text: &str) -> MatchResult {
    let text = text.trim();
    let lines: Vec<&str> = text.lines().collect();
    let first_line = lines.first().copied().unwrap_or("");

    let score = match score_from_line(first_line) {
        Some(score) => score.clamp(0.0, MAX_MATCH_SCORE),
        None => {
            warn!(
                first_line = %first_line,
                "No score on first line of match analysis, using default {DEFAULT_MATCH_SCORE}"
            );
            DEFAULT_MATCH_SCORE
        }
    };

    let feedback = if lines.len() > 1 {
        lines[1..].join("\n").trim().to_string()
    } else {
        text.to_string()
    };

    MatchResult { score, feedback }
}

/// A label before the last `:` may carry its own numbers ("out of 100", "0-100").
fn score_from_line(line: &str) -> Option<f64> {
    line.rsplit_once(':')
        .and_then(|(_, value)| leading_number(value))
        .or_else(|| leading_number(line))
}

/// Returns the first decimal number in `line`, with an optional sign directly before it.
fn leading_number(line: &str) -> Option<f64> {
    let bytes = line.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;

    let mut end = start;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    let negative = start > 0 && bytes[start - 1] == b'-';
    let value: f64 = line[start..end].parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}
