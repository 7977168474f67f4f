//! Resume Normalizer: validates a raw parsed resume and rewrites it into the
//! canonical shape the mapping engine reads.
//!
//! The raw input is never modified; it is echoed back next to the normalized
//! record. With `debug` set, an explainability tree records what every field
//! went through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::contact::{normalize_email, normalize_name, normalize_phone, PhoneFormat};
use super::entries::{
    normalize_education, normalize_experience, normalize_projects, NormalizedEntry,
};
use super::skills::{
    normalize_skills, NormalizedSkill, RoleProfile, SkillNormalization, SkillSource,
};
use super::validation::validate_resume_schema;
use super::NORMALIZATION_VERSION;
use crate::config::UnknownOptions;
use crate::errors::EngineError;
use crate::models::{ResumeEntry, ResumeRecord};

/// Top-level keys the normalizer rewrites itself; everything else passes through.
const RESUME_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "education",
    "skills",
    "experience",
    "projects",
];

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerOptions {
    pub role_profile: RoleProfile,
    pub normalize_enabled: bool,
    pub skills_as_strings: bool,
    pub debug: bool,
    /// Unrecognised option keys; reported as warnings, otherwise ignored.
    pub unknown: UnknownOptions,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            role_profile: RoleProfile::default(),
            normalize_enabled: true,
            skills_as_strings: false,
            debug: false,
            unknown: UnknownOptions::default(),
        }
    }
}

impl NormalizerOptions {
    pub const KEYS: &'static [&'static str] =
        &["debug", "normalize_enabled", "role_profile", "skills_as_strings"];

    /// Keys accepted by [`normalize_resume`], which also names its input.
    const NORMALIZE_RESUME_KEYS: &'static [&'static str] = &[
        "debug",
        "normalize_enabled",
        "raw_resume_data",
        "role_profile",
        "skills_as_strings",
    ];

    /// Builds options from a loose JSON object. Known keys are parsed strictly;
    /// anything else is collected into `unknown`.
    pub fn from_json_object(object: &Map<String, Value>) -> Result<Self, EngineError> {
        let mut options = NormalizerOptions::default();
        for (key, value) in object {
            match key.as_str() {
                "role_profile" => {
                    let raw = value.as_str().ok_or_else(|| invalid(key, "expected a string"))?;
                    options.role_profile = raw.parse()?;
                }
                "normalize_enabled" => options.normalize_enabled = flag(key, value)?,
                "skills_as_strings" => options.skills_as_strings = flag(key, value)?,
                "debug" => options.debug = flag(key, value)?,
                other => options.unknown.push(other),
            }
        }
        Ok(options)
    }

    pub fn with_profile(mut self, role_profile: RoleProfile) -> Self {
        self.role_profile = role_profile;
        self
    }

    pub fn with_normalize_enabled(mut self, enabled: bool) -> Self {
        self.normalize_enabled = enabled;
        self
    }

    pub fn with_skills_as_strings(mut self, as_strings: bool) -> Self {
        self.skills_as_strings = as_strings;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn flag(key: &str, value: &Value) -> Result<bool, EngineError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(key, "expected a boolean"))
}

fn invalid(key: &str, reason: &str) -> EngineError {
    EngineError::InvalidOption {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// The canonical resume. Same top-level shape as the raw input; keys the
/// normalizer does not own (`city`, `linkedin_url`, ...) are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Vec<ResumeEntry>,
    pub skills: Vec<NormalizedSkill>,
    pub experience: Vec<ResumeEntry>,
    pub projects: Vec<ResumeEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NormalizedResume {
    /// The record shape the mapping engine consumes.
    pub fn to_resume_record(&self) -> ResumeRecord {
        ResumeRecord {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            skills: self.skills.iter().map(skill_value).collect(),
            education: self.education.clone(),
            experience: self.experience.clone(),
            projects: self.projects.clone(),
            extra: self.extra.clone(),
        }
    }
}

fn skill_value(skill: &NormalizedSkill) -> Value {
    match skill {
        NormalizedSkill::Name(name) => Value::String(name.clone()),
        NormalizedSkill::Scored(s) => json!({
            "name": s.name,
            "confidence": s.confidence,
            "source": s.source,
        }),
    }
}

/// `normalized` is the canonical record, or the raw input echoed back when
/// normalization is disabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedPayload {
    Resume(NormalizedResume),
    Raw(Value),
}

impl NormalizedPayload {
    pub fn as_resume(&self) -> Option<&NormalizedResume> {
        match self {
            NormalizedPayload::Resume(resume) => Some(resume),
            NormalizedPayload::Raw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationOutput {
    pub raw: Value,
    pub normalized: NormalizedPayload,
    pub normalization_enabled: bool,
    pub normalization_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_profile: Option<RoleProfile>,
    /// The deprecated profile that was asked for, when it fell back to `default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_profile: Option<RoleProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explainability: Option<Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ResumeNormalizer {
    role_profile: RoleProfile,
    original_profile: Option<RoleProfile>,
    normalize_enabled: bool,
    skills_as_strings: bool,
    debug: bool,
}

impl ResumeNormalizer {
    /// Deprecated profiles fall back to `default`; the requested one is kept
    /// and reported in every output.
    pub fn new(options: NormalizerOptions) -> Self {
        options
            .unknown
            .warn("ResumeNormalizer::new", NormalizerOptions::KEYS);

        let (role_profile, original_profile) = if options.role_profile.is_active() {
            (options.role_profile, None)
        } else {
            warn!(
                profile = %options.role_profile,
                "Role profile '{}' is deprecated; falling back to 'default'",
                options.role_profile
            );
            (RoleProfile::Default, Some(options.role_profile))
        };

        Self {
            role_profile,
            original_profile,
            normalize_enabled: options.normalize_enabled,
            skills_as_strings: options.skills_as_strings,
            debug: options.debug,
        }
    }

    /// Profile actually applied.
    pub fn role_profile(&self) -> RoleProfile {
        self.role_profile
    }

    /// Validates `raw`, then normalizes it (unless disabled).
    pub fn normalize(&self, raw: &Value) -> Result<NormalizationOutput, EngineError> {
        validate_resume_schema(raw)?;

        if !self.normalize_enabled {
            return Ok(NormalizationOutput {
                raw: raw.clone(),
                normalized: NormalizedPayload::Raw(raw.clone()),
                normalization_enabled: false,
                normalization_version: NORMALIZATION_VERSION.to_string(),
                role_profile: None,
                original_profile: None,
                profile_deprecated: None,
                explainability: None,
            });
        }

        let empty = Map::new();
        let resume = raw.as_object().unwrap_or(&empty);
        let source = if explicit_skills_section(resume) {
            SkillSource::ExplicitSection
        } else {
            SkillSource::Inferred
        };

        let name = scalar(resume, "name").map(normalize_name);
        let email = scalar(resume, "email").map(normalize_email);
        let phone = scalar(resume, "phone").map(normalize_phone);
        let education = normalize_education(list(resume, "education"));
        let skills = normalize_skills(
            list(resume, "skills"),
            self.role_profile,
            source,
            self.skills_as_strings,
        );
        let experience = normalize_experience(list(resume, "experience"));
        let projects = normalize_projects(list(resume, "projects"));

        let explainability = self.debug.then(|| {
            json!({
                "name": explain_scalar(
                    resume,
                    "name",
                    name.as_deref(),
                    "title_case_with_special_handling",
                    &[
                        "strip_whitespace",
                        "split_by_hyphens_and_spaces",
                        "capitalize_parts",
                        "handle_special_prefixes_mc_o",
                    ],
                ),
                "email": explain_scalar(
                    resume,
                    "email",
                    email.as_deref(),
                    "lowercase",
                    &["strip_whitespace", "to_lowercase"],
                ),
                "phone": explain_phone(resume, phone.as_ref()),
                "education": explain_education(resume, &education),
                "skills": self.explain_skills(resume, &skills, source),
                "experience": explain_experience(resume, &experience),
                "projects": explain_projects(resume, &projects),
            })
        });

        let extra: BTreeMap<String, Value> = resume
            .iter()
            .filter(|(key, _)| !RESUME_FIELDS.contains(&key.as_str()) && !key.starts_with('_'))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let normalized = NormalizedResume {
            name,
            email,
            phone: phone.map(|(formatted, _)| formatted),
            education: education.into_iter().map(|e| e.entry).collect(),
            skills: skills.skills,
            experience: experience.into_iter().map(|e| e.entry).collect(),
            projects,
            extra,
        };

        info!(
            role_profile = %self.role_profile,
            education = normalized.education.len(),
            experience = normalized.experience.len(),
            skills = normalized.skills.len(),
            projects = normalized.projects.len(),
            "Resume normalized"
        );

        Ok(NormalizationOutput {
            raw: raw.clone(),
            normalized: NormalizedPayload::Resume(normalized),
            normalization_enabled: true,
            normalization_version: NORMALIZATION_VERSION.to_string(),
            role_profile: Some(self.role_profile),
            original_profile: self.original_profile,
            profile_deprecated: self.original_profile.map(|_| true),
            explainability,
        })
    }

    fn explain_skills(
        &self,
        resume: &Map<String, Value>,
        result: &SkillNormalization,
        source: SkillSource,
    ) -> Value {
        let raw = list(resume, "skills");
        if raw.is_empty() {
            return empty_list_node();
        }
        let skills: Vec<Value> = result
            .outcomes
            .iter()
            .enumerate()
            .map(|(index, outcome)| {
                let mut node = json!({
                    "index": index,
                    "source": "raw",
                    "value": outcome.input,
                    "transformed_value": outcome.canonical,
                    "canonicalized": outcome.canonical.to_lowercase() != outcome.input.to_lowercase(),
                    "resolution": outcome.resolution,
                    "duplicate": outcome.duplicate,
                });
                if !self.skills_as_strings {
                    node["confidence"] = json!(outcome.confidence);
                    node["confidence_source"] = json!(source);
                }
                node
            })
            .collect();

        let ordering = if self.role_profile == RoleProfile::Default {
            "first_seen_order"
        } else {
            "role_specific_prioritization"
        };
        let format = if self.skills_as_strings {
            "strings"
        } else {
            "objects_with_confidence"
        };
        json!({
            "source": source,
            "value": raw,
            "transformed_value": result.skills,
            "transformation": "canonicalize_and_prioritize",
            "rules_applied": ["map_to_canonical_forms", "deduplicate", ordering],
            "skills": skills,
            "format": format,
            "role_profile": self.role_profile,
        })
    }
}

/// Normalizes one resume with a fresh [`ResumeNormalizer`].
pub fn normalize_resume(
    raw: &Value,
    options: &NormalizerOptions,
) -> Result<NormalizationOutput, EngineError> {
    options
        .unknown
        .warn("normalize_resume", NormalizerOptions::NORMALIZE_RESUME_KEYS);
    let normalizer = ResumeNormalizer::new(NormalizerOptions {
        unknown: UnknownOptions::default(),
        ..options.clone()
    });
    normalizer.normalize(raw)
}

// ────────────────────────────────────────────────────────────────────────────
// Input access
// ────────────────────────────────────────────────────────────────────────────

/// `_skills_metadata.from_explicit_section`, true when absent.
fn explicit_skills_section(resume: &Map<String, Value>) -> bool {
    resume
        .get("_skills_metadata")
        .and_then(|meta| meta.get("from_explicit_section"))
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

/// A non-empty top-level string; empty strings are treated like null.
fn scalar<'a>(resume: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    resume
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn list<'a>(resume: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    resume
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// ────────────────────────────────────────────────────────────────────────────
// Explainability nodes
// ────────────────────────────────────────────────────────────────────────────

fn null_node() -> Value {
    json!({
        "source": "raw",
        "value": null,
        "transformation": "none",
        "rule_applied": "null_value",
    })
}

fn empty_list_node() -> Value {
    json!({
        "source": "raw",
        "value": [],
        "transformation": "none",
        "rule_applied": "empty_list",
    })
}

fn explain_scalar(
    resume: &Map<String, Value>,
    key: &str,
    normalized: Option<&str>,
    transformation: &str,
    rules: &[&str],
) -> Value {
    match (scalar(resume, key), normalized) {
        (Some(original), Some(normalized)) => json!({
            "source": "raw",
            "value": original,
            "transformed_value": normalized,
            "transformation": transformation,
            "rules_applied": rules,
            "changed": original != normalized,
        }),
        _ => null_node(),
    }
}

fn explain_phone(resume: &Map<String, Value>, phone: Option<&(String, PhoneFormat)>) -> Value {
    let (Some(original), Some((normalized, format))) = (scalar(resume, "phone"), phone) else {
        return null_node();
    };
    json!({
        "source": "raw",
        "value": original,
        "transformed_value": normalized,
        "transformation": "standard_format",
        "rules_applied": ["extract_digits", "format_to_standard"],
        "format_applied": format,
        "changed": original != normalized.as_str(),
    })
}

/// `{source, value, transformed_value, validated}` for both years of an entry.
fn explain_years(raw: &Value, entry: &ResumeEntry) -> Value {
    let year = |key: &str| {
        json!({
            "source": "raw",
            "value": raw.get(key).cloned().unwrap_or(Value::Null),
            "transformed_value": entry.get(key),
            "validated": entry.get(key).is_some(),
        })
    };
    json!({
        "start_year": year("start_year"),
        "end_year": year("end_year"),
    })
}

fn explain_rewrite(raw: &Value, entry: &ResumeEntry, key: &str) -> Value {
    let original = raw.get(key).cloned().unwrap_or(Value::Null);
    let normalized = entry.get(key);
    json!({
        "source": "raw",
        "value": original,
        "transformed_value": normalized,
        "changed": original.as_str() != normalized,
    })
}

/// Entry nodes listed in raw order; `position` is where the entry ended up after sorting.
fn entry_nodes(
    raw: &[Value],
    entries: &[NormalizedEntry],
    node: impl Fn(&Value, &NormalizedEntry) -> Map<String, Value>,
) -> Vec<Value> {
    let mut positioned: Vec<(usize, usize)> = entries
        .iter()
        .enumerate()
        .map(|(position, e)| (e.source_index, position))
        .collect();
    positioned.sort_unstable();
    positioned
        .into_iter()
        .map(|(index, position)| {
            let entry = &entries[position];
            let mut fields = node(&raw[index], entry);
            fields.insert("index".to_string(), json!(index));
            fields.insert("position".to_string(), json!(position));
            Value::Object(fields)
        })
        .collect()
}

fn explain_education(resume: &Map<String, Value>, entries: &[NormalizedEntry]) -> Value {
    let raw = list(resume, "education");
    if raw.is_empty() {
        return empty_list_node();
    }
    let nodes = entry_nodes(raw, entries, |item, normalized| {
        let raw_degree = item.get("degree").cloned().unwrap_or(Value::Null);
        let degree = normalized.entry.get("degree");
        let mut fields = Map::new();
        fields.insert(
            "degree".to_string(),
            json!({
                "source": "raw",
                "value": raw_degree,
                "transformed_value": degree,
                "canonicalized": raw_degree.as_str() != degree,
                "raw_preserved": normalized.entry.get("degree_raw"),
                "rule": normalized.degree.as_ref().map(|d| d.rule),
            }),
        );
        fields.insert(
            "institution".to_string(),
            explain_rewrite(item, &normalized.entry, "institution"),
        );
        fields.insert("years".to_string(), explain_years(item, &normalized.entry));
        fields
    });

    json!({
        "source": "raw",
        "value": raw,
        "transformed_value": entries.iter().map(|e| &e.entry).collect::<Vec<_>>(),
        "transformation": "canonicalize_degrees_validate_years_sort",
        "rules_applied": [
            "canonicalize_degree_names",
            "preserve_raw_degree",
            "validate_year_format",
            "sort_by_end_year_desc",
        ],
        "entries": nodes,
        "sorted": true,
        "sort_key": "end_year_desc",
    })
}

fn explain_experience(resume: &Map<String, Value>, entries: &[NormalizedEntry]) -> Value {
    let raw = list(resume, "experience");
    if raw.is_empty() {
        return empty_list_node();
    }
    let nodes = entry_nodes(raw, entries, |item, normalized| {
        let mut fields = Map::new();
        for key in ["title", "company"] {
            fields.insert(key.to_string(), explain_rewrite(item, &normalized.entry, key));
        }
        fields.insert("years".to_string(), explain_years(item, &normalized.entry));
        fields
    });

    json!({
        "source": "raw",
        "value": raw,
        "transformed_value": entries.iter().map(|e| &e.entry).collect::<Vec<_>>(),
        "transformation": "normalize_titles_companies_validate_years_sort",
        "rules_applied": [
            "normalize_job_titles",
            "normalize_company_names",
            "validate_year_format",
            "sort_by_end_year_desc",
        ],
        "entries": nodes,
        "sorted": true,
        "sort_key": "end_year_desc",
    })
}

fn explain_projects(resume: &Map<String, Value>, projects: &[ResumeEntry]) -> Value {
    let raw = list(resume, "projects");
    if raw.is_empty() {
        return empty_list_node();
    }
    json!({
        "source": "raw",
        "value": raw,
        "transformed_value": projects,
        "transformation": "title_case_names_trim_descriptions",
        "rules_applied": ["title_case_names", "trim_descriptions"],
        "entries_count": projects.len(),
    })
}
