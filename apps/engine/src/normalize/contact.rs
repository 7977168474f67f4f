use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::capitalize;

static NAME_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("valid name separator regex"));

/// Title-cases a person's name part by part.
///
/// Parts are split on runs of whitespace and hyphens and re-joined with single
/// spaces. `Mc` and `O'` prefixes keep the following letter upper-case.
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATOR_RE
        .split(name.trim())
        .filter(|part| !part.is_empty())
        .map(capitalize_name_part)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_name_part(part: &str) -> String {
    let lower = part.to_lowercase();
    let has_prefix = lower.starts_with("mc") || lower.starts_with("o'");
    if has_prefix && part.chars().count() > 2 {
        let split = part.char_indices().nth(2).map_or(part.len(), |(i, _)| i);
        let (prefix, rest) = part.split_at(split);
        return capitalize(prefix) + &capitalize(rest);
    }
    capitalize(part)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Layout chosen for a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneFormat {
    /// `(XXX) XXX-XXXX`
    UsFormat,
    /// `+1 (XXX) XXX-XXXX`, or the trimmed input when the digits fit neither layout.
    InternationalFormat,
}

/// 10 digits become `(XXX) XXX-XXXX`, 11 digits with a leading 1 become
/// `+1 (XXX) XXX-XXXX`; anything else is returned trimmed but otherwise untouched.
pub fn normalize_phone(phone: &str) -> (String, PhoneFormat) {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => (
            format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
            PhoneFormat::UsFormat,
        ),
        11 if digits.starts_with('1') => (
            format!("+1 ({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..]),
            PhoneFormat::InternationalFormat,
        ),
        _ => (phone.trim().to_string(), PhoneFormat::InternationalFormat),
    }
}
