//! Raw resume -> normalizer -> mapping engine.

use ats_engine::errors::EngineError;
use ats_engine::mapping::{map_ats_field, map_multiple_fields, CanonicalField, MapOptions};
use ats_engine::normalize::{normalize_resume, NormalizerOptions, RoleProfile};
use serde_json::{json, Value};

fn raw_resume() -> Value {
    json!({
        "name": "jane o'neil",
        "email": " Jane.ONeil@Example.com ",
        "phone": "555.123.4567",
        "education": [
            {"degree": "BS", "institution": "state univ.", "end_year": "2018"},
            {"degree": "PhD", "institution": "tech inst", "end_year": null},
            {"degree": "MS", "institution": "state univ.", "end_year": "2020"}
        ],
        "skills": ["python", "js", "python"],
        "experience": [
            {"title": "sr. software eng.", "company": "acme llc",
             "start_year": "2018", "end_year": "2021"},
            {"title": "intern", "company": "globex corp", "start_year": "2017", "end_year": "2017"}
        ],
        "projects": [{"name": "resume parser", "description": "parses resumes"}],
        "linkedin_url": "https://linkedin.com/in/jane"
    })
}

#[test]
fn test_entries_sorted_newest_first_with_open_entries_last() {
    let output = normalize_resume(&raw_resume(), &NormalizerOptions::default()).unwrap();
    let resume = output.normalized.as_resume().expect("normalized resume");

    let degrees: Vec<Option<&str>> = resume.education.iter().map(|e| e.get("degree")).collect();
    assert_eq!(
        degrees,
        vec![
            Some("Master of Science"),
            Some("Bachelor of Science"),
            Some("PhD")
        ]
    );
    assert_eq!(resume.education[2].get("end_year"), None);
    assert_eq!(resume.education[0].get("degree_raw"), Some("MS"));
    assert_eq!(resume.education[0].get("institution"), Some("State University"));
}

#[test]
fn test_contact_and_experience_rewrites() {
    let output = normalize_resume(&raw_resume(), &NormalizerOptions::default()).unwrap();
    let resume = output.normalized.as_resume().unwrap();

    assert_eq!(resume.name.as_deref(), Some("Jane O'Neil"));
    assert_eq!(resume.email.as_deref(), Some("jane.oneil@example.com"));
    assert_eq!(resume.phone.as_deref(), Some("(555) 123-4567"));
    assert_eq!(resume.experience[0].get("title"), Some("Senior Software Engineer"));
    assert_eq!(resume.experience[0].get("company"), Some("Acme LLC"));
    assert_eq!(resume.experience[1].get("company"), Some("Globex Corp."));
    assert_eq!(
        resume.extra.get("linkedin_url"),
        Some(&json!("https://linkedin.com/in/jane"))
    );
}

#[test]
fn test_normalized_resume_feeds_the_mapper() {
    let options = NormalizerOptions::default().with_skills_as_strings(true);
    let output = normalize_resume(&raw_resume(), &options).unwrap();
    let record = output.normalized.as_resume().unwrap().to_resume_record();

    let mapped = map_multiple_fields(
        &["Phone", "Degree", "LinkedIn URL", "Skills"],
        &record,
        &MapOptions::default(),
    );
    assert_eq!(mapped.get("Phone").unwrap().value, json!("(555) 123-4567"));

    let degree = mapped.get("Degree").unwrap();
    assert_eq!(degree.canonical_field, Some(CanonicalField::EducationDegree));
    assert_eq!(degree.selected_index, Some(2));
    assert_eq!(degree.value, json!("PhD"));

    assert_eq!(mapped.get("Skills").unwrap().value, json!(["Python", "JavaScript"]));
}

#[test]
fn test_mapping_title_after_normalization() {
    let output = normalize_resume(&raw_resume(), &NormalizerOptions::default()).unwrap();
    let record = output.normalized.as_resume().unwrap().to_resume_record();
    let title = map_ats_field("Job Title", &record, &MapOptions::default()).unwrap();
    assert_eq!(title.value, json!("Senior Software Engineer"));
    assert_eq!(title.selected_index, Some(0));
}

#[test]
fn test_invalid_resume_is_rejected_before_normalizing() {
    let mut raw = raw_resume();
    raw["education"][0]["end_year"] = json!(2018);
    raw.as_object_mut().unwrap().remove("projects");

    let err = normalize_resume(&raw, &NormalizerOptions::default()).unwrap_err();
    match err {
        EngineError::Validation(e) => assert_eq!(
            e.violations,
            vec![
                "Field 'education[0].end_year': expected str or None, got int".to_string(),
                "Missing required field: 'projects'".to_string(),
            ]
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_deprecated_profile_degrades_to_default() {
    let options = NormalizerOptions::default().with_profile(RoleProfile::ProductManager);
    let output = normalize_resume(&raw_resume(), &options).unwrap();
    assert_eq!(output.role_profile, Some(RoleProfile::Default));
    assert_eq!(output.original_profile, Some(RoleProfile::ProductManager));
    assert_eq!(output.profile_deprecated, Some(true));
}

#[test]
fn test_disabled_normalization_echoes_raw() {
    let raw = raw_resume();
    let options = NormalizerOptions::default().with_normalize_enabled(false);
    let output = normalize_resume(&raw, &options).unwrap();
    assert!(!output.normalization_enabled);
    assert!(output.normalized.as_resume().is_none());

    let serialized = serde_json::to_value(&output).unwrap();
    assert_eq!(serialized["normalized"], raw);
    assert!(serialized.get("role_profile").is_none());
}
