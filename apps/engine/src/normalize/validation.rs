use serde_json::{Map, Value};

use crate::errors::ResumeValidationError;

/// Top-level keys every raw resume must carry, with whether the value is a list.
const REQUIRED_FIELDS: &[(&str, bool)] = &[
    ("name", false),
    ("email", false),
    ("phone", false),
    ("education", true),
    ("skills", true),
    ("experience", true),
    ("projects", true),
];

const EDUCATION_ITEM_FIELDS: &[&str] = &[
    "degree",
    "degree_raw",
    "institution",
    "year",
    "start_year",
    "end_year",
    "raw_date",
];

const EXPERIENCE_ITEM_FIELDS: &[&str] = &[
    "title",
    "company",
    "duration",
    "start_year",
    "end_year",
    "raw_date",
    "description",
];

const PROJECT_ITEM_FIELDS: &[&str] = &["name", "description"];

/// Strict shape check run before any transformation.
///
/// No coercion: a year given as a number is a violation, not a year. Extra keys
/// (top-level or inside entries) are allowed and left untouched. Every violation
/// is collected, in discovery order, before failing.
pub fn validate_resume_schema(raw: &Value) -> Result<(), ResumeValidationError> {
    let Some(resume) = raw.as_object() else {
        return Err(ResumeValidationError::new(vec![format!(
            "Expected resume data to be a dictionary, got {}",
            type_name(raw)
        )]));
    };

    let mut violations = Vec::new();
    for &(field, is_list) in REQUIRED_FIELDS {
        let Some(value) = resume.get(field) else {
            violations.push(format!("Missing required field: '{field}'"));
            continue;
        };

        if !is_list {
            if !matches!(value, Value::Null | Value::String(_)) {
                violations.push(format!(
                    "Field '{field}': expected str or None, got {}",
                    type_name(value)
                ));
            }
            continue;
        }

        let Some(items) = value.as_array() else {
            violations.push(format!(
                "Field '{field}': expected list, got {}",
                type_name(value)
            ));
            continue;
        };

        match field {
            "skills" => check_skills(items, &mut violations),
            "education" => check_entries(field, items, EDUCATION_ITEM_FIELDS, &mut violations),
            "experience" => check_entries(field, items, EXPERIENCE_ITEM_FIELDS, &mut violations),
            "projects" => check_entries(field, items, PROJECT_ITEM_FIELDS, &mut violations),
            _ => {}
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ResumeValidationError::new(violations))
    }
}

/// Looser check for an already-structured resume handed straight to the mapper.
///
/// Every key is optional, but whatever is present must have the mapper's shape:
/// string-or-null contact fields, a skills list, and entry lists whose values
/// (known or extra, e.g. `gpa`) are all strings or null.
pub fn validate_structured_resume(raw: &Value) -> Result<(), ResumeValidationError> {
    let Some(resume) = raw.as_object() else {
        return Err(ResumeValidationError::new(vec![format!(
            "Expected resume data to be a dictionary, got {}",
            type_name(raw)
        )]));
    };

    let mut violations = Vec::new();
    for &(field, is_list) in REQUIRED_FIELDS {
        let Some(value) = resume.get(field) else {
            continue;
        };
        if !is_list {
            if !matches!(value, Value::Null | Value::String(_)) {
                violations.push(format!(
                    "Field '{field}': expected str or None, got {}",
                    type_name(value)
                ));
            }
            continue;
        }
        let Some(items) = value.as_array() else {
            violations.push(format!(
                "Field '{field}': expected list, got {}",
                type_name(value)
            ));
            continue;
        };
        if field == "skills" {
            continue;
        }
        for (i, item) in items.iter().enumerate() {
            let Some(entry) = item.as_object() else {
                violations.push(format!(
                    "Field '{field}[{i}]': expected dict, got {}",
                    type_name(item)
                ));
                continue;
            };
            let keys: Vec<&str> = entry.keys().map(String::as_str).collect();
            check_string_fields(field, i, entry, &keys, &mut violations);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ResumeValidationError::new(violations))
    }
}

/// Skills are plain strings or `{name, confidence?}` objects.
fn check_skills(items: &[Value], violations: &mut Vec<String>) {
    for (i, skill) in items.iter().enumerate() {
        match skill {
            Value::String(_) => {}
            Value::Object(obj) => {
                match obj.get("name") {
                    None => violations.push(format!(
                        "Field 'skills[{i}]': missing required 'name' field"
                    )),
                    Some(Value::String(_)) => {}
                    Some(other) => violations.push(format!(
                        "Field 'skills[{i}].name': expected str, got {}",
                        type_name(other)
                    )),
                }
                if let Some(confidence) = obj.get("confidence") {
                    if !confidence.is_number() {
                        violations.push(format!(
                            "Field 'skills[{i}].confidence': expected number, got {}",
                            type_name(confidence)
                        ));
                    }
                }
            }
            other => violations.push(format!(
                "Field 'skills[{i}]': expected str or dict, got {}",
                type_name(other)
            )),
        }
    }
}

fn check_entries(list: &str, items: &[Value], fields: &[&str], violations: &mut Vec<String>) {
    for (i, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            violations.push(format!(
                "Field '{list}[{i}]': expected dict, got {}",
                type_name(item)
            ));
            continue;
        };
        check_string_fields(list, i, entry, fields, violations);
    }
}

fn check_string_fields(
    list: &str,
    index: usize,
    entry: &Map<String, Value>,
    fields: &[&str],
    violations: &mut Vec<String>,
) {
    for &field in fields {
        match entry.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => violations.push(format!(
                "Field '{list}[{index}].{field}': expected str or None, got {}",
                type_name(other)
            )),
        }
    }
}

/// Type label used in violation messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
