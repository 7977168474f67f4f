use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::field_name::normalize_field_name;

/// Administrative, hidden, placeholder and note-style labels that must never be
/// mapped. Matched case-insensitively, in order, against the normalized label.
pub const FIELD_BLACKLIST_PATTERNS: &[&str] = &[
    // Internal / reserved
    r"\binternal\s+use\b",
    r"\breserved\b",
    r"\bdo\s+not\s+fill\b",
    r"\bdo\s+not\s+complete\b",
    r"\bnot\s+for\s+applicant\b",
    r"\bfor\s+internal\s+use\s+only\b",
    r"\bhr\s+use\s+only\b",
    r"\brecruiter\s+use\s+only\b",
    r"\badmin\s+use\s+only\b",
    r"\badministrative\s+use\s+only\b",
    // Hidden / system
    r"\bhidden\b",
    r"\bsystem\s+field\b",
    r"\bauto\s+generated\b",
    r"\bgenerated\s+by\s+system\b",
    // Placeholder / example
    r"\bplaceholder\b",
    r"\bexample\b",
    r"\bsample\b",
    r"\btest\s+field\b",
    r"\bdemo\b",
    // Disabled / inactive
    r"\bdisabled\b",
    r"\binactive\b",
    r"\bnot\s+in\s+use\b",
    r"\bdeprecated\b",
    // Free-text note fields
    r"^\s*comment\s*$",
    r"^\s*note\s*$",
    r"^\s*notes\s*$",
    r"^\s*remarks\s*$",
];

static COMPILED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FIELD_BLACKLIST_PATTERNS
        .iter()
        .map(|p| {
            let re = Regex::new(&format!("(?i){p}")).expect("valid blacklist pattern");
            (*p, re)
        })
        .collect()
});

/// Checks a raw label against the blacklist; returns the first matching pattern.
pub fn is_field_blacklisted(field_name: &str) -> (bool, Option<&'static str>) {
    let (normalized, _) = normalize_field_name(field_name, false);
    match COMPILED.iter().find(|(_, re)| re.is_match(&normalized)) {
        Some((pattern, _)) => {
            debug!(field = field_name, pattern, "Field matched blacklist");
            (true, Some(pattern))
        }
        None => (false, None),
    }
}

pub fn blacklist_reason(pattern: &str) -> String {
    format!("Field matches blacklist pattern: {pattern}")
}
