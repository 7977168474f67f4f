//! End-to-end mapping scenarios through the public API.

use ats_engine::mapping::{
    map_ats_field, map_multiple_fields, normalize_field_name, CanonicalField, MapOptions,
    MatchType, SelectionStrategy,
};
use ats_engine::models::{ResumeEntry, ResumeRecord};
use serde_json::{json, Value};

fn sample_resume() -> ResumeRecord {
    ResumeRecord {
        name: Some("Jane Doe".into()),
        email: Some("jane@example.com".into()),
        phone: Some("(555) 123-4567".into()),
        skills: vec![json!("Python"), json!("Rust")],
        education: vec![
            ResumeEntry::new()
                .with("degree", Some("BS"))
                .with("end_year", Some("2020")),
            ResumeEntry::new()
                .with("degree", Some("MS"))
                .with("end_year", Some("2022")),
            ResumeEntry::new()
                .with("degree", Some("PhD"))
                .with("end_year", None),
        ],
        ..ResumeRecord::default()
    }
}

#[test]
fn test_blacklisted_label_is_ignored() {
    let result = map_ats_field("Internal Use Only", &sample_resume(), &MapOptions::default())
        .expect("ignored labels still produce a result");
    assert!(result.is_ignored());
    assert_eq!(result.match_type, Some(MatchType::Ignored));
    assert_eq!(result.value, Value::Null);
    assert!(result.canonical_field.is_none());
    assert!(result.blacklist_reason.is_some());
}

#[test]
fn test_comment_box_is_ignored() {
    let result = map_ats_field("Comment", &sample_resume(), &MapOptions::default()).unwrap();
    assert!(result.is_ignored());
}

#[test]
fn test_exact_email() {
    let result = map_ats_field("email", &sample_resume(), &MapOptions::default()).unwrap();
    assert_eq!(result.canonical_field, Some(CanonicalField::Email));
    assert_eq!(result.match_type, Some(MatchType::Exact));
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.value, json!("jane@example.com"));
    assert_eq!(result.schema_path.as_deref(), Some("email"));
}

#[test]
fn test_typo_on_critical_field_is_rejected() {
    let resume = sample_resume();
    assert!(map_ats_field("E-Mail Addres", &resume, &MapOptions::default()).is_none());

    let diagnostic = map_ats_field(
        "E-Mail Addres",
        &resume,
        &MapOptions::default().with_explain(true),
    )
    .expect("explain mode reports the rejected candidate");
    assert_eq!(diagnostic.canonical_field, Some(CanonicalField::Email));
    assert!(diagnostic.schema_path.is_none());
    assert!(diagnostic.confidence < 0.7);

    let trace = diagnostic
        .explainability
        .and_then(|e| e.confidence_calculation)
        .expect("confidence trace");
    assert!(!trace.passed_threshold);
    assert_eq!(trace.sensitivity_weight, 0.5);
}

#[test]
fn test_most_recent_prefers_unterminated_entry() {
    let result = map_ats_field("Degree", &sample_resume(), &MapOptions::default()).unwrap();
    assert_eq!(result.canonical_field, Some(CanonicalField::EducationDegree));
    assert_eq!(result.selection_strategy, Some(SelectionStrategy::MostRecent));
    assert_eq!(result.selected_index, Some(2));
    assert_eq!(result.value, json!("PhD"));
    assert_eq!(result.schema_path.as_deref(), Some("education[2].degree"));
}

#[test]
fn test_dotted_label_reaches_education_degree() {
    let result = map_ats_field("education.degree", &sample_resume(), &MapOptions::default())
        .expect("close enough to \"education degree\"");
    assert_eq!(result.canonical_field, Some(CanonicalField::EducationDegree));
    assert_eq!(result.match_type, Some(MatchType::Fuzzy));
    assert_eq!(result.value, json!("PhD"));
}

#[test]
fn test_label_normalization() {
    let (normalized, steps) = normalize_field_name("  First Name * (required)  ", false);
    assert_eq!(normalized, "first name");
    assert!(steps.is_none());

    let (_, steps) = normalize_field_name("First Name*", true);
    assert!(!steps.unwrap_or_default().is_empty());
}

#[test]
fn test_threshold_boundary_is_inclusive() {
    let resume = sample_resume();
    let exact_ratio = 10.0 / 11.0;

    let at = MapOptions::default().with_threshold(exact_ratio);
    let accepted = map_ats_field("skill", &resume, &at).expect("accepted at the boundary");
    assert_eq!(accepted.canonical_field, Some(CanonicalField::Skills));
    assert_eq!(accepted.match_type, Some(MatchType::Fuzzy));

    let above = MapOptions::default().with_threshold(f64::from_bits(exact_ratio.to_bits() + 1));
    assert!(map_ats_field("skill", &resume, &above).is_none());
}

#[test]
fn test_results_are_deterministic() {
    let resume = sample_resume();
    let options = MapOptions::default().with_explain(true);
    let labels = ["Email Address", "Degree", "skill", "Internal Use Only", "Favourite Colour"];
    let first = map_multiple_fields(&labels, &resume, &options);
    let second = map_multiple_fields(&labels, &resume, &options);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn test_batch_keeps_request_order_and_drops_misses() {
    let labels = ["Phone", "Favourite Colour", "Email", "Internal Use Only"];
    let mapped = map_multiple_fields(&labels, &sample_resume(), &MapOptions::default());
    let keys: Vec<&str> = mapped.keys().collect();
    assert_eq!(keys, vec!["Phone", "Email", "Internal Use Only"]);
    assert_eq!(mapped.get("Phone").unwrap().value, json!("(555) 123-4567"));
    assert!(mapped.get("Favourite Colour").is_none());
}
