//! Canonical field taxonomy and per-field sensitivity weights.
//!
//! Values are permanently reserved once published. New fields may be appended
//! (MINOR bump of [`CANONICAL_SCHEMA_VERSION`]); renaming or removing one is a MAJOR
//! bump. Weight tuning is a PATCH bump.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::EntryCategory;

pub const CANONICAL_SCHEMA_VERSION: &str = "1.0.0";

/// A stable identifier for one semantic slot in the target resume schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    // Personal information
    #[serde(rename = "first_name")]
    FirstName,
    #[serde(rename = "last_name")]
    LastName,
    #[serde(rename = "full_name")]
    FullName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "phone_number")]
    PhoneNumber,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "city")]
    City,
    #[serde(rename = "state")]
    State,
    #[serde(rename = "zip_code")]
    ZipCode,
    #[serde(rename = "country")]
    Country,
    #[serde(rename = "linkedin_url")]
    LinkedinUrl,
    #[serde(rename = "github_url")]
    GithubUrl,
    #[serde(rename = "portfolio_url")]
    PortfolioUrl,
    #[serde(rename = "website")]
    Website,

    // Education
    #[serde(rename = "education.degree")]
    EducationDegree,
    #[serde(rename = "education.institution")]
    EducationInstitution,
    #[serde(rename = "education.start_date")]
    EducationStartDate,
    #[serde(rename = "education.end_date")]
    EducationEndDate,
    #[serde(rename = "education.major")]
    EducationMajor,
    #[serde(rename = "education.gpa")]
    EducationGpa,

    // Experience
    #[serde(rename = "experience.title")]
    ExperienceTitle,
    #[serde(rename = "experience.company")]
    ExperienceCompany,
    #[serde(rename = "experience.start_date")]
    ExperienceStartDate,
    #[serde(rename = "experience.end_date")]
    ExperienceEndDate,
    #[serde(rename = "experience.description")]
    ExperienceDescription,
    #[serde(rename = "experience.current")]
    ExperienceCurrent,

    #[serde(rename = "skills")]
    Skills,

    // Projects
    #[serde(rename = "project.name")]
    ProjectName,
    #[serde(rename = "project.description")]
    ProjectDescription,

    // Other
    #[serde(rename = "resume_file")]
    ResumeFile,
    #[serde(rename = "cover_letter")]
    CoverLetter,
    #[serde(rename = "availability")]
    Availability,
    #[serde(rename = "salary_expectation")]
    SalaryExpectation,
    #[serde(rename = "work_authorization")]
    WorkAuthorization,
}

impl CanonicalField {
    /// Every canonical field, in publication order.
    pub const ALL: [CanonicalField; 35] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::FullName,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::PhoneNumber,
        CanonicalField::Address,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::ZipCode,
        CanonicalField::Country,
        CanonicalField::LinkedinUrl,
        CanonicalField::GithubUrl,
        CanonicalField::PortfolioUrl,
        CanonicalField::Website,
        CanonicalField::EducationDegree,
        CanonicalField::EducationInstitution,
        CanonicalField::EducationStartDate,
        CanonicalField::EducationEndDate,
        CanonicalField::EducationMajor,
        CanonicalField::EducationGpa,
        CanonicalField::ExperienceTitle,
        CanonicalField::ExperienceCompany,
        CanonicalField::ExperienceStartDate,
        CanonicalField::ExperienceEndDate,
        CanonicalField::ExperienceDescription,
        CanonicalField::ExperienceCurrent,
        CanonicalField::Skills,
        CanonicalField::ProjectName,
        CanonicalField::ProjectDescription,
        CanonicalField::ResumeFile,
        CanonicalField::CoverLetter,
        CanonicalField::Availability,
        CanonicalField::SalaryExpectation,
        CanonicalField::WorkAuthorization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "first_name",
            CanonicalField::LastName => "last_name",
            CanonicalField::FullName => "full_name",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
            CanonicalField::PhoneNumber => "phone_number",
            CanonicalField::Address => "address",
            CanonicalField::City => "city",
            CanonicalField::State => "state",
            CanonicalField::ZipCode => "zip_code",
            CanonicalField::Country => "country",
            CanonicalField::LinkedinUrl => "linkedin_url",
            CanonicalField::GithubUrl => "github_url",
            CanonicalField::PortfolioUrl => "portfolio_url",
            CanonicalField::Website => "website",
            CanonicalField::EducationDegree => "education.degree",
            CanonicalField::EducationInstitution => "education.institution",
            CanonicalField::EducationStartDate => "education.start_date",
            CanonicalField::EducationEndDate => "education.end_date",
            CanonicalField::EducationMajor => "education.major",
            CanonicalField::EducationGpa => "education.gpa",
            CanonicalField::ExperienceTitle => "experience.title",
            CanonicalField::ExperienceCompany => "experience.company",
            CanonicalField::ExperienceStartDate => "experience.start_date",
            CanonicalField::ExperienceEndDate => "experience.end_date",
            CanonicalField::ExperienceDescription => "experience.description",
            CanonicalField::ExperienceCurrent => "experience.current",
            CanonicalField::Skills => "skills",
            CanonicalField::ProjectName => "project.name",
            CanonicalField::ProjectDescription => "project.description",
            CanonicalField::ResumeFile => "resume_file",
            CanonicalField::CoverLetter => "cover_letter",
            CanonicalField::Availability => "availability",
            CanonicalField::SalaryExpectation => "salary_expectation",
            CanonicalField::WorkAuthorization => "work_authorization",
        }
    }

    pub fn sensitivity_tier(&self) -> SensitivityTier {
        match self {
            CanonicalField::Email | CanonicalField::Phone | CanonicalField::PhoneNumber => {
                SensitivityTier::Critical
            }
            CanonicalField::FirstName
            | CanonicalField::LastName
            | CanonicalField::FullName
            | CanonicalField::WorkAuthorization => SensitivityTier::High,
            CanonicalField::EducationDegree
            | CanonicalField::EducationInstitution
            | CanonicalField::EducationStartDate
            | CanonicalField::EducationEndDate
            | CanonicalField::EducationGpa
            | CanonicalField::ExperienceStartDate
            | CanonicalField::ExperienceEndDate
            | CanonicalField::ExperienceCurrent => SensitivityTier::Medium,
            _ => SensitivityTier::Standard,
        }
    }

    pub fn sensitivity_weight(&self) -> f64 {
        self.sensitivity_tier().weight()
    }

    /// The repeated-entry list a dotted field resolves into, `None` for flat fields.
    pub fn category(&self) -> Option<EntryCategory> {
        match self.as_str().split_once('.') {
            Some(("education", _)) => Some(EntryCategory::Education),
            Some(("experience", _)) => Some(EntryCategory::Experience),
            Some(("project", _)) => Some(EntryCategory::Project),
            _ => None,
        }
    }

    /// The part after the dot for category fields (`"degree"` for `education.degree`).
    pub fn sub_field(&self) -> Option<&'static str> {
        self.as_str().split_once('.').map(|(_, sub)| sub)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| EngineError::UnknownCanonicalField(s.to_string()))
    }
}

/// Sensitivity tiers. A lower weight makes fuzzy matches harder to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitivityTier {
    /// Contact identifiers: email, phone.
    Critical,
    /// Identity and legal status: name parts, work authorization.
    High,
    /// Qualification dates, GPA.
    Medium,
    Standard,
}

impl SensitivityTier {
    pub fn weight(&self) -> f64 {
        match self {
            SensitivityTier::Critical => 0.5,
            SensitivityTier::High => 0.7,
            SensitivityTier::Medium => 0.85,
            SensitivityTier::Standard => 1.0,
        }
    }
}
