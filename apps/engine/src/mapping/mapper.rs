//! Mapping Orchestrator: composes blacklist, matcher, scorer and selector into the
//! per-field decision procedure.
//!
//! Business outcomes are never errors:
//! - blacklisted label → `Some` result with `match_type = ignored`
//! - no match / low confidence → `None`, or a diagnostic record when `explain` is set
//! - empty entry list or null projected value for a category field → `None`

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::blacklist::{blacklist_reason, is_field_blacklisted};
use super::confidence::{score_confidence, MatchType, DEFAULT_FUZZY_THRESHOLD};
use super::explain::{
    below_threshold_summary, human_readable_summary, ignored_summary, MappingExplanation,
    MatchMethod, MatchingTrace, NormalizationTrace, SelectionTrace,
};
use super::field_name::normalize_field_name;
use super::fuzzy::fuzzy_match_field;
use super::selector::{entry_degree, select_entry, selection_reasoning, SelectionStrategy};
use super::taxonomy::{CanonicalField, CANONICAL_SCHEMA_VERSION};
use crate::config::UnknownOptions;
use crate::errors::EngineError;
use crate::models::{EntryCategory, ResumeEntry, ResumeRecord};

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Options accepted by [`map_ats_field`] and [`map_multiple_fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub selection_strategy: SelectionStrategy,
    pub fuzzy_threshold: f64,
    pub explain: bool,
    /// Unrecognised option keys; reported as warnings, otherwise ignored.
    pub unknown: UnknownOptions,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            selection_strategy: SelectionStrategy::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            explain: false,
            unknown: UnknownOptions::default(),
        }
    }
}

impl MapOptions {
    pub const KEYS: &'static [&'static str] =
        &["selection_strategy", "fuzzy_threshold", "explain"];

    /// Builds options from a loose JSON object. Known keys are parsed strictly;
    /// anything else is collected into `unknown`.
    pub fn from_json_object(object: &Map<String, Value>) -> Result<Self, EngineError> {
        let mut options = MapOptions::default();
        for (key, value) in object {
            match key.as_str() {
                "selection_strategy" => {
                    let raw = value.as_str().ok_or_else(|| invalid(key, "expected a string"))?;
                    options.selection_strategy = raw.parse()?;
                }
                "fuzzy_threshold" => {
                    let raw = value.as_f64().ok_or_else(|| invalid(key, "expected a number"))?;
                    options.fuzzy_threshold = checked_threshold(raw)?;
                }
                "explain" => {
                    options.explain = value
                        .as_bool()
                        .ok_or_else(|| invalid(key, "expected a boolean"))?;
                }
                other => options.unknown.push(other),
            }
        }
        Ok(options)
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.selection_strategy = strategy;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }
}

pub(crate) fn checked_threshold(raw: f64) -> Result<f64, EngineError> {
    if (0.0..=1.0).contains(&raw) {
        Ok(raw)
    } else {
        Err(EngineError::InvalidThreshold(raw))
    }
}

fn invalid(key: &str, reason: &str) -> EngineError {
    EngineError::InvalidOption {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    pub canonical_field: Option<CanonicalField>,
    pub schema_path: Option<String>,
    pub value: Value,
    pub match_type: Option<MatchType>,
    pub confidence: f64,
    pub raw_score: f64,
    pub sensitivity_weight: Option<f64>,
    pub selection_strategy: Option<SelectionStrategy>,
    pub selected_index: Option<usize>,
    pub ats_field_name: String,
    pub normalized_field_name: Option<String>,
    pub canonical_schema_version: String,
    pub blacklist_reason: Option<String>,
    pub explainability: Option<MappingExplanation>,
}

impl MappingResult {
    /// A usable mapping: matched and resolved, not ignored or diagnostic.
    pub fn is_match(&self) -> bool {
        matches!(self.match_type, Some(MatchType::Exact | MatchType::Fuzzy))
            && self.schema_path.is_some()
    }

    pub fn is_ignored(&self) -> bool {
        self.match_type == Some(MatchType::Ignored)
    }

    fn empty(ats_field_name: &str) -> Self {
        Self {
            canonical_field: None,
            schema_path: None,
            value: Value::Null,
            match_type: None,
            confidence: 0.0,
            raw_score: 0.0,
            sensitivity_weight: None,
            selection_strategy: None,
            selected_index: None,
            ats_field_name: ats_field_name.to_string(),
            normalized_field_name: None,
            canonical_schema_version: CANONICAL_SCHEMA_VERSION.to_string(),
            blacklist_reason: None,
            explainability: None,
        }
    }
}

/// Batch output keyed by original label, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedFields(Vec<(String, MappingResult)>);

impl MappedFields {
    pub fn get(&self, field_name: &str) -> Option<&MappingResult> {
        self.0
            .iter()
            .find(|(name, _)| name == field_name)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingResult)> {
        self.0.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// A repeated label keeps its first position and takes the latest result.
    fn insert(&mut self, field_name: &str, result: MappingResult) {
        match self.0.iter_mut().find(|(name, _)| name == field_name) {
            Some(slot) => slot.1 = result,
            None => self.0.push((field_name.to_string(), result)),
        }
    }
}

impl Serialize for MappedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in &self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Schema-path resolution
// ────────────────────────────────────────────────────────────────────────────

/// Where a canonical field lives in the resume and what it holds there.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub schema_path: String,
    pub value: Value,
    pub selected_index: Option<usize>,
}

/// Resolves `field` against `resume`. `None` only when a category list is empty.
pub fn map_field_to_schema_path(
    field: CanonicalField,
    resume: &ResumeRecord,
    strategy: SelectionStrategy,
) -> Option<Resolution> {
    let (Some(category), Some(sub_field)) = (field.category(), field.sub_field()) else {
        return Some(resolve_flat(field, resume));
    };

    let (index, entry) = select_entry(category, resume.entries(category), strategy)?;
    let (key, value) = project_sub_field(category, sub_field, entry);
    Some(Resolution {
        schema_path: format!("{}[{index}].{key}", category.list_key()),
        value,
        selected_index: Some(index),
    })
}

fn resolve_flat(field: CanonicalField, resume: &ResumeRecord) -> Resolution {
    let name_tokens = || {
        resume
            .name
            .as_deref()
            .map(|n| n.split_whitespace().collect::<Vec<_>>())
            .unwrap_or_default()
    };
    let (path, value) = match field {
        CanonicalField::FullName => ("name".to_string(), resume.top_level("name")),
        CanonicalField::FirstName => (
            "name (first)".to_string(),
            name_tokens()
                .first()
                .map(|t| Value::String(t.to_string()))
                .unwrap_or(Value::Null),
        ),
        CanonicalField::LastName => {
            let tokens = name_tokens();
            let last = if tokens.len() >= 2 {
                Value::String(tokens[1..].join(" "))
            } else {
                Value::Null
            };
            ("name (last)".to_string(), last)
        }
        CanonicalField::PhoneNumber => ("phone".to_string(), resume.top_level("phone")),
        other => (other.as_str().to_string(), resume.top_level(other.as_str())),
    };
    Resolution {
        schema_path: path,
        value,
        selected_index: None,
    }
}

/// Returns the resume key the sub-field is read from and its value.
fn project_sub_field(
    category: EntryCategory,
    sub_field: &str,
    entry: &ResumeEntry,
) -> (&'static str, Value) {
    let string = |key: &str| {
        entry
            .get(key)
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null)
    };
    match (category, sub_field) {
        (EntryCategory::Education, "degree") => ("degree", string("degree")),
        (EntryCategory::Education, "institution") => ("institution", string("institution")),
        (EntryCategory::Education, "start_date") => ("start_year", string("start_year")),
        (EntryCategory::Education, "end_date") => ("end_year", string("end_year")),
        (EntryCategory::Education, "gpa") => ("gpa", string("gpa")),
        (EntryCategory::Education, "major") => {
            let major = entry_degree(entry)
                .and_then(|degree| degree.split_once(" in "))
                .map(|(_, major)| Value::String(major.to_string()))
                .unwrap_or(Value::Null);
            ("major", major)
        }
        (EntryCategory::Experience, "title") => ("title", string("title")),
        (EntryCategory::Experience, "company") => ("company", string("company")),
        (EntryCategory::Experience, "start_date") => ("start_year", string("start_year")),
        (EntryCategory::Experience, "end_date") => ("end_year", string("end_year")),
        (EntryCategory::Experience, "description") => ("description", string("description")),
        (EntryCategory::Experience, "current") => {
            ("current", Value::Bool(entry.get("end_year").is_none()))
        }
        (EntryCategory::Project, "name") => ("name", string("name")),
        (EntryCategory::Project, "description") => ("description", string("description")),
        _ => ("unknown", Value::Null),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Maps one ATS label to a resume value.
///
/// Returns `None` for no match, a below-threshold match, or an unresolvable
/// category field. With `explain`, the first two return a diagnostic record instead;
/// callers must treat a missing `canonical_field` or `schema_path` as "no mapping".
pub fn map_ats_field(
    field_name: &str,
    resume: &ResumeRecord,
    options: &MapOptions,
) -> Option<MappingResult> {
    options.unknown.warn("map_ats_field", MapOptions::KEYS);
    map_one_quiet(field_name, resume, options)
}

/// Maps each label in order, keeping only accepted and ignored results.
pub fn map_multiple_fields<S: AsRef<str>>(
    field_names: &[S],
    resume: &ResumeRecord,
    options: &MapOptions,
) -> MappedFields {
    options.unknown.warn("map_multiple_fields", MapOptions::KEYS);
    let mut mapped = MappedFields::default();
    for field_name in field_names {
        let field_name = field_name.as_ref();
        match map_one_quiet(field_name, resume, options) {
            Some(result) if result.is_match() || result.is_ignored() => {
                mapped.insert(field_name, result)
            }
            _ => debug!(field = field_name, "No mapping for field"),
        }
    }
    debug!(
        requested = field_names.len(),
        mapped = mapped.len(),
        "Batch mapping finished"
    );
    mapped
}

/// Same procedure as [`map_ats_field`], without reporting unknown options.
pub(crate) fn map_one_quiet(
    field_name: &str,
    resume: &ResumeRecord,
    options: &MapOptions,
) -> Option<MappingResult> {
    let threshold = options.fuzzy_threshold;
    let strategy = options.selection_strategy;
    let explain = options.explain;

    if let (true, Some(pattern)) = is_field_blacklisted(field_name) {
        return Some(ignored_result(field_name, pattern, threshold, explain));
    }

    let matched = fuzzy_match_field(field_name, threshold, explain);
    let (normalization, matching) = match matched.explanation {
        Some(exp) => (Some(exp.normalization), Some(exp.matching)),
        None => (None, None),
    };

    let Some(canonical) = matched.field else {
        if !explain {
            return None;
        }
        return Some(MappingResult {
            raw_score: matched.raw_score,
            normalized_field_name: Some(matched.normalized),
            explainability: Some(MappingExplanation {
                field_name_normalization: normalization,
                field_matching: matching,
                confidence_calculation: None,
                selection: None,
                human_readable_summary: None,
            }),
            ..MappingResult::empty(field_name)
        });
    };

    let match_type = if matched.exact {
        MatchType::Exact
    } else {
        MatchType::Fuzzy
    };
    let score = score_confidence(match_type, matched.raw_score, canonical, threshold);

    if !score.accepted {
        debug!(
            field = field_name,
            canonical = %canonical,
            confidence = score.confidence,
            threshold,
            "Fuzzy match below threshold"
        );
        if !explain {
            return None;
        }
        return Some(MappingResult {
            canonical_field: Some(canonical),
            match_type: Some(MatchType::Fuzzy),
            confidence: score.confidence,
            raw_score: score.raw_score,
            sensitivity_weight: Some(score.sensitivity_weight),
            normalized_field_name: Some(matched.normalized),
            explainability: Some(MappingExplanation {
                field_name_normalization: normalization,
                field_matching: matching,
                confidence_calculation: Some(score.trace(canonical)),
                selection: None,
                human_readable_summary: Some(below_threshold_summary(
                    field_name,
                    canonical,
                    score.confidence,
                    threshold,
                )),
            }),
            ..MappingResult::empty(field_name)
        });
    }

    let resolution = map_field_to_schema_path(canonical, resume, strategy)?;
    if canonical.category().is_some() && resolution.value.is_null() {
        debug!(field = field_name, canonical = %canonical, "Selected entry has no value");
        return None;
    }

    debug!(
        field = field_name,
        canonical = %canonical,
        match_type = match_type.as_str(),
        confidence = score.confidence,
        schema_path = %resolution.schema_path,
        "Mapped field"
    );

    let explainability = explain.then(|| MappingExplanation {
        field_name_normalization: normalization,
        field_matching: matching,
        confidence_calculation: Some(score.trace(canonical)),
        selection: canonical.category().map(|category| {
            let entries = resume.entries(category);
            SelectionTrace {
                category,
                strategy,
                total_entries: entries.len(),
                selected_index: resolution.selected_index,
                reasoning: selection_reasoning(
                    category,
                    entries,
                    resolution.selected_index,
                    strategy,
                ),
            }
        }),
        human_readable_summary: Some(human_readable_summary(
            field_name,
            canonical,
            matched.exact,
            score.confidence,
            resolution.selected_index.map(|i| (i, strategy)),
        )),
    });

    Some(MappingResult {
        canonical_field: Some(canonical),
        schema_path: Some(resolution.schema_path),
        value: resolution.value,
        match_type: Some(match_type),
        confidence: score.confidence,
        raw_score: score.raw_score,
        sensitivity_weight: Some(score.sensitivity_weight),
        selection_strategy: Some(strategy),
        selected_index: resolution.selected_index,
        ats_field_name: field_name.to_string(),
        normalized_field_name: Some(matched.normalized),
        canonical_schema_version: CANONICAL_SCHEMA_VERSION.to_string(),
        blacklist_reason: None,
        explainability,
    })
}

fn ignored_result(
    field_name: &str,
    pattern: &str,
    threshold: f64,
    explain: bool,
) -> MappingResult {
    let mut result = MappingResult {
        match_type: Some(MatchType::Ignored),
        blacklist_reason: Some(blacklist_reason(pattern)),
        ..MappingResult::empty(field_name)
    };
    if explain {
        let (normalized, steps) = normalize_field_name(field_name, true);
        result.normalized_field_name = Some(normalized.clone());
        result.explainability = Some(MappingExplanation {
            field_name_normalization: Some(NormalizationTrace {
                original: field_name.to_string(),
                normalized,
                steps: steps.unwrap_or_default(),
            }),
            field_matching: Some(MatchingTrace {
                method: MatchMethod::Ignored,
                matched_field: None,
                similarity_score: None,
                alternatives_considered: Vec::new(),
                threshold,
                reasoning: format!("Field was ignored due to blacklist pattern match: {pattern}"),
            }),
            confidence_calculation: None,
            selection: None,
            human_readable_summary: Some(ignored_summary(field_name, pattern)),
        });
    }
    result
}

/// Logs labels that could not be mapped; used by review tooling.
pub(crate) fn warn_unmapped(unmapped: &[&str]) {
    if !unmapped.is_empty() {
        warn!(
            event = "mapping_failed",
            count = unmapped.len(),
            fields = ?unmapped,
            "Some form fields could not be mapped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resume() -> ResumeRecord {
        serde_json::from_value(json!({
            "name": "Mary Ann Smith",
            "email": "mary@example.com",
            "phone": "(555) 123-4567",
            "city": "Austin",
            "skills": ["Python", "SQL"],
            "education": [
                {"degree": "Bachelor of Science in Computer Science", "institution": "State University",
                 "start_year": "2012", "end_year": "2016"},
                {"degree": "Master of Science", "institution": "Tech Institute",
                 "start_year": "2016", "end_year": "2018"}
            ],
            "experience": [
                {"title": "Senior Engineer", "company": "Acme Inc.", "start_year": "2019",
                 "end_year": null, "description": "Builds things"},
                {"title": "Engineer", "company": "Initech LLC", "start_year": "2016",
                 "end_year": "2019"}
            ],
            "projects": []
        }))
        .unwrap()
    }

    #[test]
    fn test_name_parts_use_whitespace_split() {
        let r = resume();
        let first = map_ats_field("First Name", &r, &MapOptions::default()).unwrap();
        assert_eq!(first.schema_path.as_deref(), Some("name (first)"));
        assert_eq!(first.value, json!("Mary"));
        let last = map_ats_field("Last Name", &r, &MapOptions::default()).unwrap();
        assert_eq!(last.value, json!("Ann Smith"));
    }

    #[test]
    fn test_single_token_name_has_null_last_name() {
        let mut r = resume();
        r.name = Some("Cher".to_string());
        let last = map_ats_field("Surname", &r, &MapOptions::default()).unwrap();
        assert_eq!(last.schema_path.as_deref(), Some("name (last)"));
        assert_eq!(last.value, Value::Null);
    }

    #[test]
    fn test_flat_field_with_missing_value_still_maps() {
        let r = resume();
        let country = map_ats_field("Country", &r, &MapOptions::default()).unwrap();
        assert_eq!(country.schema_path.as_deref(), Some("country"));
        assert_eq!(country.value, Value::Null);
        let city = map_ats_field("City", &r, &MapOptions::default()).unwrap();
        assert_eq!(city.value, json!("Austin"));
    }

    #[test]
    fn test_phone_number_reads_phone() {
        let r = resume();
        let m = map_ats_field("Phone Number", &r, &MapOptions::default()).unwrap();
        assert_eq!(m.canonical_field, Some(CanonicalField::PhoneNumber));
        assert_eq!(m.schema_path.as_deref(), Some("phone"));
        assert_eq!(m.value, json!("(555) 123-4567"));
    }

    #[test]
    fn test_major_extracted_from_degree() {
        let r = resume();
        let opts = MapOptions::default().with_strategy(SelectionStrategy::Longest);
        let m = map_ats_field("Major", &r, &opts).unwrap();
        assert_eq!(m.schema_path.as_deref(), Some("education[0].major"));
        assert_eq!(m.value, json!("Computer Science"));

        // most recent entry has no " in " clause, so no major
        assert!(map_ats_field("Major", &r, &MapOptions::default()).is_none());
    }

    #[test]
    fn test_experience_current_flag() {
        let r = resume();
        let m = map_ats_field("Current Position", &r, &MapOptions::default()).unwrap();
        assert_eq!(m.schema_path.as_deref(), Some("experience[0].current"));
        assert_eq!(m.value, json!(true));
        assert_eq!(m.selected_index, Some(0));
    }

    #[test]
    fn test_empty_project_list_fails_safely() {
        let r = resume();
        let opts = MapOptions::default().with_explain(true);
        assert!(map_ats_field("Project Name", &r, &opts).is_none());
    }

    #[test]
    fn test_options_from_json_object() {
        let object = json!({
            "selection_strategy": "highest_degree",
            "fuzzy_threshold": 0.8,
            "explain": true,
            "verbose": 1
        });
        let opts = MapOptions::from_json_object(object.as_object().unwrap()).unwrap();
        assert_eq!(opts.selection_strategy, SelectionStrategy::HighestDegree);
        assert_eq!(opts.fuzzy_threshold, 0.8);
        assert!(opts.explain);
        assert_eq!(opts.unknown.keys(), &["verbose".to_string()]);
    }

    #[test]
    fn test_options_reject_bad_values() {
        let bad_threshold = json!({"fuzzy_threshold": 1.5});
        assert!(matches!(
            MapOptions::from_json_object(bad_threshold.as_object().unwrap()),
            Err(EngineError::InvalidThreshold(_))
        ));
        let bad_strategy = json!({"selection_strategy": "newest"});
        assert!(matches!(
            MapOptions::from_json_object(bad_strategy.as_object().unwrap()),
            Err(EngineError::UnknownStrategy(_))
        ));
        let bad_explain = json!({"explain": "yes"});
        assert!(matches!(
            MapOptions::from_json_object(bad_explain.as_object().unwrap()),
            Err(EngineError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_unknown_options_do_not_change_outcome() {
        let r = resume();
        let mut opts = MapOptions::default();
        opts.unknown.push("legacy_mode");
        let with_unknown = map_ats_field("Email", &r, &opts);
        let plain = map_ats_field("Email", &r, &MapOptions::default());
        assert_eq!(with_unknown, plain);
    }

    #[test]
    fn test_batch_keeps_input_order_and_dedupes() {
        let r = resume();
        let mapped = map_multiple_fields(
            &["Phone", "Favourite Colour", "Email", "Internal Use Only", "Phone"],
            &r,
            &MapOptions::default(),
        );
        let keys: Vec<_> = mapped.keys().collect();
        assert_eq!(keys, vec!["Phone", "Email", "Internal Use Only"]);
        assert!(mapped.get("Internal Use Only").unwrap().is_ignored());
    }

    #[test]
    fn test_batch_excludes_diagnostics_when_explaining() {
        let r = resume();
        let opts = MapOptions::default().with_explain(true);
        let mapped = map_multiple_fields(&["E-Mail Addres", "Email"], &r, &opts);
        assert_eq!(mapped.len(), 1);
        assert!(mapped.get("Email").unwrap().explainability.is_some());
    }

    #[test]
    fn test_batch_serializes_as_ordered_object() {
        let r = resume();
        let mapped = map_multiple_fields(&["Phone", "City"], &r, &MapOptions::default());
        let text = serde_json::to_string(&mapped).unwrap();
        let phone_at = text.find("\"Phone\"").unwrap();
        let city_at = text.find("\"City\"").unwrap();
        assert!(phone_at < city_at);
    }
}
