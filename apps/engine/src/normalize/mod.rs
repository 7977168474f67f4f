// Resume Normalizer
// Implements: strict schema validation, contact formatting, degree taxonomy,
// year validation and chronological sorting, skill canonicalization with
// role-profile prioritization, explainability tree.

pub mod contact;
pub mod degree;
pub mod entries;
pub mod normalizer;
pub mod skills;
pub mod text;
pub mod validation;

/// Version of the normalization rules; bumped whenever an output can change.
pub const NORMALIZATION_VERSION: &str = "1.1.0";

pub use degree::{canonicalize_degree, CanonicalDegree, DegreeRule};
pub use normalizer::{
    normalize_resume, NormalizationOutput, NormalizedPayload, NormalizedResume,
    NormalizerOptions, ResumeNormalizer,
};
pub use skills::{normalize_skills, NormalizedSkill, RoleProfile, ScoredSkill, SkillSource};
pub use validation::{validate_resume_schema, validate_structured_resume};
