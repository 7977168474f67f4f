use std::cmp::Ordering;

use tracing::debug;

use super::explain::{Alternative, MatchMethod, MatchingTrace, NormalizationTrace};
use super::field_name::normalize_field_name;
use super::similarity::similarity_ratio;
use super::synonyms::{lookup, ATS_FIELD_MAPPINGS};
use super::taxonomy::CanonicalField;

/// Score floor applied when the label and a synonym key contain one another.
pub const PARTIAL_MATCH_SCORE: f64 = 0.85;

/// How many scored candidates the explanation keeps.
const MAX_ALTERNATIVES: usize = 5;

/// Outcome of matching one label against the synonym table.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Resolved field, `None` when the best score is below the threshold.
    pub field: Option<CanonicalField>,
    /// Best unweighted similarity seen, 1.0 for an exact hit.
    pub raw_score: f64,
    pub normalized: String,
    pub exact: bool,
    pub explanation: Option<FuzzyExplanation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyExplanation {
    pub normalization: NormalizationTrace,
    pub matching: MatchingTrace,
}

/// Matches a raw label: exact synonym lookup first, then a full similarity scan.
///
/// The scan keeps the first key reaching the maximum score, so table order decides
/// ties.
pub fn fuzzy_match_field(field_name: &str, threshold: f64, explain: bool) -> FuzzyMatch {
    let (normalized, steps) = normalize_field_name(field_name, explain);
    let normalization = steps.map(|steps| NormalizationTrace {
        original: field_name.to_string(),
        normalized: normalized.clone(),
        steps,
    });

    if let Some(field) = lookup(&normalized) {
        debug!(field = field_name, canonical = %field, "Exact synonym match");
        let explanation = normalization.map(|normalization| FuzzyExplanation {
            normalization,
            matching: MatchingTrace {
                method: MatchMethod::Exact,
                matched_field: Some(normalized.clone()),
                similarity_score: Some(1.0),
                alternatives_considered: Vec::new(),
                threshold,
                reasoning: format!(
                    "Exact match found in mapping dictionary for \"{normalized}\""
                ),
            },
        });
        return FuzzyMatch {
            field: Some(field),
            raw_score: 1.0,
            normalized,
            exact: true,
            explanation,
        };
    }

    let mut best: Option<(&'static str, CanonicalField)> = None;
    let mut best_score = 0.0_f64;
    let mut alternatives = Vec::new();

    for &(key, canonical) in ATS_FIELD_MAPPINGS {
        let mut score = similarity_ratio(&normalized, key);
        let partial_match = key.contains(normalized.as_str()) || normalized.contains(key);
        if partial_match {
            score = score.max(PARTIAL_MATCH_SCORE);
        }
        if explain {
            alternatives.push(Alternative {
                field: key.to_string(),
                canonical,
                similarity: score,
                partial_match,
            });
        }
        if score > best_score {
            best_score = score;
            best = Some((key, canonical));
        }
    }

    let accepted = best_score >= threshold;
    debug!(
        field = field_name,
        best_key = best.map(|(k, _)| k),
        best_score,
        accepted,
        "Fuzzy scan finished"
    );

    let explanation = normalization.map(|normalization| {
        // stable: equal scores keep table order
        alternatives.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        alternatives.truncate(MAX_ALTERNATIVES);
        let matched_key = best.map(|(k, _)| k);
        let reasoning = if accepted {
            format!(
                "Fuzzy match found: \"{normalized}\" matched \"{}\" with similarity {best_score:.3}",
                matched_key.unwrap_or_default()
            )
        } else {
            format!(
                "No match found: best similarity {best_score:.3} below threshold {threshold}"
            )
        };
        FuzzyExplanation {
            normalization,
            matching: MatchingTrace {
                method: if accepted {
                    MatchMethod::Fuzzy
                } else {
                    MatchMethod::NoMatch
                },
                matched_field: matched_key.map(str::to_string),
                similarity_score: Some(best_score),
                alternatives_considered: alternatives,
                threshold,
                reasoning,
            },
        }
    });

    FuzzyMatch {
        field: if accepted { best.map(|(_, f)| f) } else { None },
        raw_score: best_score,
        normalized,
        exact: false,
        explanation,
    }
}
