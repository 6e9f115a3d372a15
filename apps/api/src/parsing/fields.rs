//! Name and email extraction from resume text.

use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_EMAIL: &str = "unknown@example.com";

/// Only the top of a resume is searched for the candidate's name.
const NAME_WINDOW_LINES: usize = 10;

static NAME_SKIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d|[@:]").unwrap());
static UPPERCASE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,}(?:\s+[A-Z]{2,}){1,2}$").unwrap());
static CAPITALIZED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+(?:\s[A-Z][a-z]+)+$").unwrap());

const EMAIL: &str = r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+";
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL).unwrap());
static MAILTO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("mailto:({EMAIL})")).unwrap());
static LATEX_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\href\{mailto:([^}]+)\}\{[^}]*\}").unwrap());

/// Best-effort candidate name from the first lines of the text.
///
/// Lines holding digits, `@` or `:` are contact details, not names. The first
/// remaining line that is either two or three ALL-CAPS words (returned in
/// title case) or two or more Capitalized words (returned as-is) wins.
pub fn extract_name(text: &str) -> String {
    for line in text.trim().split('\n').take(NAME_WINDOW_LINES) {
        let line = line.trim();
        if line.is_empty() || NAME_SKIP.is_match(line) {
            continue;
        }
        if UPPERCASE_NAME.is_match(line) {
            return title_case(line);
        }
        if CAPITALIZED_NAME.is_match(line) {
            return line.to_string();
        }
    }
    UNKNOWN_NAME.to_string()
}

/// Upper-cases the first letter of each alphabetic run and lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Best-effort email address. Never empty: falls back to [`UNKNOWN_EMAIL`].
pub fn extract_email(text: &str) -> String {
    if let Some(email) = extract_latex_email(text) {
        if email != UNKNOWN_EMAIL {
            return email;
        }
    }

    if let Some(caps) = MAILTO_RE.captures(text) {
        return caps[1].to_string();
    }

    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_EMAIL.to_string())
}

/// Unwraps LaTeX `\href{mailto:ADDR}{LABEL}` links to `ADDR`, then returns the
/// first address in the rewritten text.
fn extract_latex_email(text: &str) -> Option<String> {
    let rewritten = LATEX_HREF_RE.replace_all(text, "${1}");
    EMAIL_RE.find(&rewritten).map(|m| m.as_str().to_string())
}
