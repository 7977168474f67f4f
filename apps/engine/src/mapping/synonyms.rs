//! Hand-curated ATS label → canonical field table.
//!
//! Keys are pre-normalized (see [`super::normalize_field_name`]). Iteration order is
//! part of the contract: the fuzzy matcher breaks ties by first occurrence.

use super::taxonomy::CanonicalField;
use super::taxonomy::CanonicalField::*;

pub static ATS_FIELD_MAPPINGS: &[(&str, CanonicalField)] = &[
    // Personal information
    ("first name", FirstName),
    ("firstname", FirstName),
    ("fname", FirstName),
    ("given name", FirstName),
    ("forename", FirstName),
    ("last name", LastName),
    ("lastname", LastName),
    ("lname", LastName),
    ("surname", LastName),
    ("family name", LastName),
    ("full name", FullName),
    ("fullname", FullName),
    ("name", FullName),
    ("applicant name", FullName),
    ("candidate name", FullName),
    // Contact
    ("email", Email),
    ("email address", Email),
    ("e-mail", Email),
    ("e-mail address", Email),
    ("email id", Email),
    ("contact email", Email),
    ("phone", Phone),
    ("phone number", PhoneNumber),
    ("telephone", Phone),
    ("telephone number", PhoneNumber),
    ("mobile", Phone),
    ("mobile number", PhoneNumber),
    ("cell phone", Phone),
    ("cell", Phone),
    ("contact number", Phone),
    ("phone #", Phone),
    ("address", Address),
    ("street address", Address),
    ("street", Address),
    ("address line 1", Address),
    ("address line1", Address),
    ("city", City),
    ("state", State),
    ("state/province", State),
    ("province", State),
    ("zip", ZipCode),
    ("zip code", ZipCode),
    ("postal code", ZipCode),
    ("postcode", ZipCode),
    ("zip/postal code", ZipCode),
    ("country", Country),
    // Online presence
    ("linkedin", LinkedinUrl),
    ("linkedin profile", LinkedinUrl),
    ("linkedin url", LinkedinUrl),
    ("linkedin.com", LinkedinUrl),
    ("github", GithubUrl),
    ("github profile", GithubUrl),
    ("github url", GithubUrl),
    ("github.com", GithubUrl),
    ("portfolio", PortfolioUrl),
    ("portfolio url", PortfolioUrl),
    ("portfolio website", PortfolioUrl),
    ("personal website", PortfolioUrl),
    ("website", Website),
    ("personal site", Website),
    ("homepage", Website),
    // Education
    ("degree", EducationDegree),
    ("education degree", EducationDegree),
    ("highest degree", EducationDegree),
    ("degree earned", EducationDegree),
    ("qualification", EducationDegree),
    ("school", EducationInstitution),
    ("university", EducationInstitution),
    ("college", EducationInstitution),
    ("institution", EducationInstitution),
    ("educational institution", EducationInstitution),
    ("school name", EducationInstitution),
    ("university name", EducationInstitution),
    ("college name", EducationInstitution),
    ("education start", EducationStartDate),
    ("education start date", EducationStartDate),
    ("school start date", EducationStartDate),
    ("enrollment date", EducationStartDate),
    ("education end", EducationEndDate),
    ("education end date", EducationEndDate),
    ("graduation date", EducationEndDate),
    ("graduation year", EducationEndDate),
    ("degree date", EducationEndDate),
    ("completion date", EducationEndDate),
    ("major", EducationMajor),
    ("field of study", EducationMajor),
    ("area of study", EducationMajor),
    ("concentration", EducationMajor),
    ("specialization", EducationMajor),
    ("gpa", EducationGpa),
    ("grade point average", EducationGpa),
    ("cgpa", EducationGpa),
    // Experience
    ("job title", ExperienceTitle),
    ("position", ExperienceTitle),
    ("title", ExperienceTitle),
    ("role", ExperienceTitle),
    ("position title", ExperienceTitle),
    ("job role", ExperienceTitle),
    ("company", ExperienceCompany),
    ("employer", ExperienceCompany),
    ("organization", ExperienceCompany),
    ("company name", ExperienceCompany),
    ("employer name", ExperienceCompany),
    ("organization name", ExperienceCompany),
    ("employment start", ExperienceStartDate),
    ("employment start date", ExperienceStartDate),
    // "start date" keeps this slot but resolves to availability.
    ("start date", Availability),
    ("job start date", ExperienceStartDate),
    ("work start date", ExperienceStartDate),
    ("date started", ExperienceStartDate),
    ("employment end", ExperienceEndDate),
    ("employment end date", ExperienceEndDate),
    ("end date", ExperienceEndDate),
    ("job end date", ExperienceEndDate),
    ("work end date", ExperienceEndDate),
    ("date ended", ExperienceEndDate),
    ("to date", ExperienceEndDate),
    ("job description", ExperienceDescription),
    ("work description", ExperienceDescription),
    ("responsibilities", ExperienceDescription),
    ("duties", ExperienceDescription),
    ("role description", ExperienceDescription),
    ("current position", ExperienceCurrent),
    ("current job", ExperienceCurrent),
    ("currently employed", ExperienceCurrent),
    ("still working", ExperienceCurrent),
    ("present", ExperienceCurrent),
    // Skills
    ("skills", Skills),
    ("technical skills", Skills),
    ("competencies", Skills),
    ("expertise", Skills),
    ("proficiencies", Skills),
    ("technologies", Skills),
    ("tools", Skills),
    ("programming languages", Skills),
    // Projects
    ("project name", ProjectName),
    ("project title", ProjectName),
    ("project description", ProjectDescription),
    ("project details", ProjectDescription),
    // Other
    ("resume", ResumeFile),
    ("resume file", ResumeFile),
    ("cv", ResumeFile),
    ("cv file", ResumeFile),
    ("upload resume", ResumeFile),
    ("attach resume", ResumeFile),
    ("cover letter", CoverLetter),
    ("cover letter file", CoverLetter),
    ("upload cover letter", CoverLetter),
    ("availability", Availability),
    ("available", Availability),
    ("when can you start", Availability),
    ("salary", SalaryExpectation),
    ("salary expectation", SalaryExpectation),
    ("expected salary", SalaryExpectation),
    ("desired salary", SalaryExpectation),
    ("compensation", SalaryExpectation),
    ("work authorization", WorkAuthorization),
    ("authorized to work", WorkAuthorization),
    ("work permit", WorkAuthorization),
    ("visa status", WorkAuthorization),
    ("legal right to work", WorkAuthorization),
];

/// Exact lookup of an already-normalized label.
pub fn lookup(normalized: &str) -> Option<CanonicalField> {
    ATS_FIELD_MAPPINGS
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, field)| *field)
}

/// All canonical field tags, in publication order.
pub fn get_canonical_fields() -> Vec<&'static str> {
    CanonicalField::ALL.iter().map(|f| f.as_str()).collect()
}

/// Every synonym that resolves to `field`, in table order.
pub fn get_ats_field_variations(field: CanonicalField) -> Vec<&'static str> {
    ATS_FIELD_MAPPINGS
        .iter()
        .filter(|(_, canonical)| *canonical == field)
        .map(|(key, _)| *key)
        .collect()
}
