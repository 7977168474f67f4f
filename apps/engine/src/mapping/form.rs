//! Form field descriptors and batch review of a whole form against one resume.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::confidence::MatchType;
use super::field_name::normalize_field_name;
use super::mapper::{map_one_quiet, warn_unmapped, MapOptions, MappingResult};
use super::taxonomy::CanonicalField;
use crate::models::ResumeRecord;

/// Confidence under which a non-exact mapping is flagged for human review.
const REVIEW_CONFIDENCE_FLOOR: f64 = 0.5;

/// One discovered form control, as reported by the field discoverer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    #[serde(default)]
    pub label_text: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// A discovered form: the list of its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub fields: Vec<FormField>,
}

/// Canonical field a control most likely asks for, independent of any resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSuggestion {
    pub field_name: String,
    pub normalized_field_name: String,
    pub suggested_canonical_field: Option<CanonicalField>,
    pub mapping_confidence: Option<f64>,
    pub mapping_match_type: Option<MatchType>,
}

impl FormField {
    /// Label to map with: first non-blank of label, placeholder, aria-label, name, id.
    pub fn mapping_key(&self) -> Option<&str> {
        [
            &self.label_text,
            &self.placeholder,
            &self.aria_label,
            &self.name,
            &self.id,
        ]
        .into_iter()
        .filter_map(|candidate| candidate.as_deref())
        .find(|candidate| !candidate.trim().is_empty())
    }

    /// Identifies the control against an empty resume, so only the label matters.
    pub fn suggest(&self, options: &MapOptions) -> Option<FieldSuggestion> {
        let key = self.mapping_key()?;
        let (normalized, _) = normalize_field_name(key, false);
        let quiet = MapOptions {
            explain: false,
            ..options.clone()
        };
        let mapping = map_one_quiet(key, &ResumeRecord::default(), &quiet);
        Some(FieldSuggestion {
            field_name: key.to_string(),
            normalized_field_name: normalized,
            suggested_canonical_field: mapping.as_ref().and_then(|m| m.canonical_field),
            mapping_confidence: mapping.as_ref().map(|m| m.confidence),
            mapping_match_type: mapping.as_ref().and_then(|m| m.match_type),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub ats_field_name: String,
    pub mapping: Option<MappingResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedField {
    pub field: String,
    pub match_type: Option<MatchType>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingReview {
    pub total_fields: usize,
    pub rows: Vec<ReviewRow>,
    pub flagged: Vec<FlaggedField>,
}

/// Maps every keyed control of a form and flags the rows a human should check:
/// no match, a non-exact match under 0.5 confidence, or an empty value.
pub fn review_form_fields(
    fields: &[FormField],
    resume: &ResumeRecord,
    options: &MapOptions,
) -> MappingReview {
    options.unknown.warn("review_form_fields", MapOptions::KEYS);

    let mut rows = Vec::new();
    let mut flagged = Vec::new();
    for key in fields.iter().filter_map(FormField::mapping_key) {
        let mapping = map_one_quiet(key, resume, options);
        if needs_review(mapping.as_ref()) {
            flagged.push(FlaggedField {
                field: key.to_string(),
                match_type: mapping.as_ref().and_then(|m| m.match_type),
                confidence: mapping.as_ref().map_or(0.0, |m| m.confidence),
            });
        }
        rows.push(ReviewRow {
            ats_field_name: key.to_string(),
            mapping,
        });
    }

    let flagged_names: Vec<&str> = flagged.iter().map(|f| f.field.as_str()).collect();
    warn_unmapped(&flagged_names);
    info!(
        total_fields = rows.len(),
        flagged = flagged.len(),
        "Form review complete"
    );

    MappingReview {
        total_fields: rows.len(),
        rows,
        flagged,
    }
}

fn needs_review(mapping: Option<&MappingResult>) -> bool {
    let Some(mapping) = mapping else {
        return true;
    };
    match mapping.match_type {
        None => true,
        Some(MatchType::Exact) => is_empty_value(&mapping.value),
        Some(_) => mapping.confidence < REVIEW_CONFIDENCE_FLOOR || is_empty_value(&mapping.value),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) | Value::Bool(true) => false,
    }
}
