use serde::{Deserialize, Serialize};

use super::explain::ConfidenceTrace;
use super::taxonomy::CanonicalField;

/// Default acceptance threshold for weighted confidence.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Fuzzy,
    Ignored,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Ignored => "ignored",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScore {
    pub raw_score: f64,
    pub sensitivity_weight: f64,
    pub confidence: f64,
    pub threshold: f64,
    pub accepted: bool,
}

/// Weighted confidence: 1.0 for exact matches, `raw_score * weight` otherwise.
/// Accepted iff `confidence >= threshold`.
pub fn score_confidence(
    match_type: MatchType,
    raw_score: f64,
    field: CanonicalField,
    threshold: f64,
) -> ConfidenceScore {
    let sensitivity_weight = field.sensitivity_weight();
    let confidence = match match_type {
        MatchType::Exact => 1.0,
        _ => raw_score * sensitivity_weight,
    };
    ConfidenceScore {
        raw_score,
        sensitivity_weight,
        confidence,
        threshold,
        accepted: confidence >= threshold,
    }
}

impl ConfidenceScore {
    pub fn trace(&self, field: CanonicalField) -> ConfidenceTrace {
        ConfidenceTrace {
            raw_score: self.raw_score,
            sensitivity_weight: self.sensitivity_weight,
            sensitivity_category: field.sensitivity_tier(),
            weighted_confidence: self.confidence,
            threshold: self.threshold,
            passed_threshold: self.accepted,
            reasoning: format!(
                "Confidence {:.3} calculated as raw_score ({:.3}) × sensitivity_weight ({:.2}). \
                 {} threshold check ({}).",
                self.confidence,
                self.raw_score,
                self.sensitivity_weight,
                if self.accepted { "Passed" } else { "Failed" },
                self.threshold
            ),
        }
    }
}
