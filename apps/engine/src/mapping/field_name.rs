use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(required|optional|please enter|enter)\s*:?\s*").expect("valid prefix regex")
});

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*:?\s*(required|optional|\(required\)|\(optional\))$")
        .expect("valid suffix regex")
});

static SPECIAL_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid special-chars regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// One recorded transformation of the field-name pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStep {
    pub step: String,
    pub description: String,
    pub before: String,
    pub after: String,
}

/// Normalizes a raw ATS label for matching.
///
/// Pipeline: lowercase + trim, strip decorative prefix, strip decorative suffix,
/// drop everything but word characters/spaces/hyphens, collapse whitespace.
/// Steps are only recorded when `track_steps` is set, and only when they changed
/// the string.
pub fn normalize_field_name(
    field_name: &str,
    track_steps: bool,
) -> (String, Option<Vec<NormalizationStep>>) {
    let mut steps = track_steps.then(Vec::new);

    let lowered = field_name.to_lowercase().trim().to_string();
    record(
        &mut steps,
        "lowercase",
        "Converted to lowercase",
        field_name,
        &lowered,
    );

    let no_prefix = PREFIX_RE.replace(&lowered, "").into_owned();
    record(
        &mut steps,
        "remove_prefix",
        "Removed common prefixes (required:, optional:, etc.)",
        &lowered,
        &no_prefix,
    );

    let no_suffix = SUFFIX_RE.replace(&no_prefix, "").into_owned();
    record(
        &mut steps,
        "remove_suffix",
        "Removed common suffixes ((required), (optional), etc.)",
        &no_prefix,
        &no_suffix,
    );

    let no_special = SPECIAL_CHARS_RE.replace_all(&no_suffix, "").into_owned();
    record(
        &mut steps,
        "remove_special_chars",
        "Removed special characters (kept spaces and hyphens)",
        &no_suffix,
        &no_special,
    );

    let collapsed = WHITESPACE_RE
        .replace_all(&no_special, " ")
        .trim()
        .to_string();
    record(
        &mut steps,
        "normalize_whitespace",
        "Normalized whitespace (collapsed multiple spaces)",
        &no_special,
        &collapsed,
    );

    (collapsed, steps)
}

fn record(
    steps: &mut Option<Vec<NormalizationStep>>,
    step: &str,
    description: &str,
    before: &str,
    after: &str,
) {
    if let Some(steps) = steps {
        if before != after {
            steps.push(NormalizationStep {
                step: step.to_string(),
                description: description.to_string(),
                before: before.to_string(),
                after: after.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_decorations_on_both_ends() {
        let (normalized, steps) = normalize_field_name("  Required: Email Address (Required) ", false);
        assert_eq!(normalized, "email address");
        assert!(steps.is_none());
    }

    #[test]
    fn test_records_only_changing_steps() {
        let (normalized, steps) = normalize_field_name("Email Address*", true);
        assert_eq!(normalized, "email address");
        let names: Vec<_> = steps
            .unwrap()
            .into_iter()
            .map(|s| s.step)
            .collect();
        assert_eq!(names, vec!["lowercase", "remove_special_chars"]);
    }

    #[test]
    fn test_already_normalized_records_nothing() {
        let (normalized, steps) = normalize_field_name("email", true);
        assert_eq!(normalized, "email");
        assert_eq!(steps, Some(vec![]));
    }

    #[test]
    fn test_keeps_hyphens_and_collapses_spaces() {
        let (normalized, _) = normalize_field_name("E-Mail    Address:", false);
        assert_eq!(normalized, "e-mail address");
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let (normalized, _) = normalize_field_name("   ", false);
        assert_eq!(normalized, "");
    }

    #[test]
    fn test_please_enter_prefix() {
        let (normalized, _) = normalize_field_name("Please enter your city", false);
        assert_eq!(normalized, "your city");
    }

    #[test]
    fn test_step_before_after_chain() {
        let (_, steps) = normalize_field_name("Optional: Phone #", true);
        let steps = steps.unwrap();
        assert_eq!(steps[0].before, "Optional: Phone #");
        assert_eq!(steps[0].after, "optional: phone #");
        assert_eq!(steps[1].step, "remove_prefix");
        assert_eq!(steps[1].after, "phone #");
        assert_eq!(steps.last().unwrap().after, "phone");
    }
}
