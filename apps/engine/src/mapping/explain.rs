//! Explainability payload attached to mapping results on request.
//!
//! Only built when `explain` is set; every node is plain data so the whole tree
//! serializes deterministically.

use serde::{Deserialize, Serialize};

use super::field_name::NormalizationStep;
use super::selector::SelectionStrategy;
use super::taxonomy::{CanonicalField, SensitivityTier};
use crate::models::EntryCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingExplanation {
    pub field_name_normalization: Option<NormalizationTrace>,
    pub field_matching: Option<MatchingTrace>,
    pub confidence_calculation: Option<ConfidenceTrace>,
    pub selection: Option<SelectionTrace>,
    pub human_readable_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationTrace {
    pub original: String,
    pub normalized: String,
    pub steps: Vec<NormalizationStep>,
}

/// How the matcher resolved (or failed to resolve) a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Fuzzy,
    Ignored,
    #[serde(rename = "none")]
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingTrace {
    pub method: MatchMethod,
    /// The synonym key that won, not the canonical field.
    pub matched_field: Option<String>,
    pub similarity_score: Option<f64>,
    pub alternatives_considered: Vec<Alternative>,
    pub threshold: f64,
    pub reasoning: String,
}

/// One synonym candidate scored during a fuzzy scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub field: String,
    pub canonical: CanonicalField,
    pub similarity: f64,
    pub partial_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTrace {
    pub raw_score: f64,
    pub sensitivity_weight: f64,
    pub sensitivity_category: SensitivityTier,
    pub weighted_confidence: f64,
    pub threshold: f64,
    pub passed_threshold: bool,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTrace {
    pub category: EntryCategory,
    pub strategy: SelectionStrategy,
    pub total_entries: usize,
    pub selected_index: Option<usize>,
    pub reasoning: String,
}

/// One-sentence account of a successful mapping.
pub fn human_readable_summary(
    ats_field_name: &str,
    canonical: CanonicalField,
    exact: bool,
    confidence: f64,
    selection: Option<(usize, SelectionStrategy)>,
) -> String {
    let mut parts = Vec::with_capacity(2);
    if exact {
        parts.push(format!(
            "Field \"{ats_field_name}\" exactly matched canonical field \"{canonical}\""
        ));
    } else {
        parts.push(format!(
            "Field \"{ats_field_name}\" fuzzy matched to canonical field \"{canonical}\" with confidence {}",
            percent(confidence)
        ));
    }
    if let Some((index, strategy)) = selection {
        parts.push(format!(
            "Selected entry {index} from list using {} strategy",
            strategy.as_str()
        ));
    }
    format!("{}.", parts.join(". "))
}

/// Summary for a label whose weighted confidence fell short of the threshold.
pub fn below_threshold_summary(
    ats_field_name: &str,
    canonical: CanonicalField,
    confidence: f64,
    threshold: f64,
) -> String {
    format!(
        "Field \"{ats_field_name}\" matched to \"{canonical}\" but confidence {} below threshold {}",
        percent(confidence),
        percent(threshold)
    )
}

pub fn ignored_summary(ats_field_name: &str, pattern: &str) -> String {
    format!("Field \"{ats_field_name}\" was ignored (matches blacklist pattern: {pattern})")
}

/// `0.4815` → `"48.1%"`.
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
