//! Skill matching and ATS scoring.
//!
//! A known skill counts as present when any word of the resume is at least
//! [`MATCH_THRESHOLD`] similar to it. The ATS score is the share of the user's
//! declared skills that were found.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::similarity::ratio;

/// Minimum similarity for a resume word to count as a skill mention.
pub const MATCH_THRESHOLD: f64 = 0.8;

/// Display value persisted when no known skill was found.
pub const NOT_DETECTED: &str = "Not detected";

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Distinct lowercase words of `text`.
fn tokenize(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Known skills mentioned in `text`, in the order they were given.
pub fn match_skills(text: &str, known_skills: &[String]) -> Vec<String> {
    let tokens = tokenize(text);
    known_skills
        .iter()
        .filter(|skill| {
            let skill = skill.to_lowercase();
            tokens
                .iter()
                .any(|token| ratio(token, &skill) >= MATCH_THRESHOLD)
        })
        .cloned()
        .collect()
}

/// Percentage (0–100, floored) of `known_skills` mentioned in `text`.
/// No known skills scores 0.
#[cfg_attr(not(test), allow(dead_code))]
pub fn ats_score(text: &str, known_skills: &[String]) -> u8 {
    let found = match_skills(text, known_skills).len();
    score_from_counts(found, known_skills.len())
}

/// `floor(found * 100 / max(total, 1))`.
///
/// `found` comes from [`match_skills`], whose result is a sub-sequence of the
/// known skills, so `found <= total` and the score never exceeds 100.
pub fn score_from_counts(found: usize, total: usize) -> u8 {
    debug_assert!(found <= total, "found {found} of only {total} skills");
    let total = total.max(1);
    (found * 100 / total) as u8
}

/// Comma-joined skills for display, or [`NOT_DETECTED`].
pub fn display_skills(matched: &[String]) -> String {
    if matched.is_empty() {
        NOT_DETECTED.to_string()
    } else {
        matched.join(", ")
    }
}
