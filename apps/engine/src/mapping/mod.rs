// ATS Field Mapping Engine
// Implements: label normalization, blacklist, fuzzy matching, entry selection,
// confidence scoring, orchestration and form review.
// Pure and synchronous; static tables are built once and never mutated.

pub mod blacklist;
pub mod confidence;
pub mod explain;
pub mod field_name;
pub mod form;
pub mod fuzzy;
pub mod mapper;
pub mod selector;
pub mod similarity;
pub mod synonyms;
pub mod taxonomy;

pub use blacklist::is_field_blacklisted;
pub use confidence::{score_confidence, ConfidenceScore, MatchType, DEFAULT_FUZZY_THRESHOLD};
pub use explain::MappingExplanation;
pub use field_name::{normalize_field_name, NormalizationStep};
pub use form::{review_form_fields, FormField, FormSchema, MappingReview};
pub use fuzzy::{fuzzy_match_field, FuzzyMatch};
pub use mapper::{
    map_ats_field, map_field_to_schema_path, map_multiple_fields, MapOptions, MappedFields,
    MappingResult,
};
pub use selector::{select_entry, SelectionStrategy};
pub use synonyms::{get_ats_field_variations, get_canonical_fields};
pub use taxonomy::{CanonicalField, SensitivityTier, CANONICAL_SCHEMA_VERSION};
