use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EngineError;
use crate::normalize::validate_structured_resume;

/// One repeated resume sub-record (an education entry, a job, a project).
///
/// Keys are free-form; values are optional strings. Years are kept as strings and
/// only interpreted through [`validate_year`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeEntry(pub BTreeMap<String, Option<String>>);

impl ResumeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures.
    pub fn with(mut self, key: &str, value: Option<&str>) -> Self {
        self.0.insert(key.to_string(), value.map(str::to_string));
        self
    }

    pub fn insert(&mut self, key: &str, value: Option<String>) {
        self.0.insert(key.to_string(), value);
    }

    /// The string value under `key`, or `None` when the key is missing or null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// The validated year under `key` (see [`validate_year`]).
    pub fn year(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(validate_year)
    }
}

/// The three repeated-entry lists of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    Education,
    Experience,
    Project,
}

impl EntryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryCategory::Education => "education",
            EntryCategory::Experience => "experience",
            EntryCategory::Project => "project",
        }
    }

    /// Name of the list in the resume record, used as the schema-path prefix.
    pub fn list_key(&self) -> &'static str {
        match self {
            EntryCategory::Education => "education",
            EntryCategory::Experience => "experience",
            EntryCategory::Project => "projects",
        }
    }
}

/// Structured resume consumed read-only by the mapping engine.
///
/// Top-level keys other than the well-known ones (`address`, `city`,
/// `linkedin_url`, ...) are kept in `extra` so flat canonical fields can still be
/// resolved by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<Value>,
    #[serde(default)]
    pub education: Vec<ResumeEntry>,
    #[serde(default)]
    pub experience: Vec<ResumeEntry>,
    #[serde(default)]
    pub projects: Vec<ResumeEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResumeRecord {
    /// Parses an already-structured resume. Shape problems come back as one
    /// itemised validation error rather than the first serde failure.
    pub fn from_json(raw: Value) -> Result<Self, EngineError> {
        validate_structured_resume(&raw)?;
        Ok(serde_json::from_value(raw)?)
    }

    pub fn entries(&self, category: EntryCategory) -> &[ResumeEntry] {
        match category {
            EntryCategory::Education => &self.education,
            EntryCategory::Experience => &self.experience,
            EntryCategory::Project => &self.projects,
        }
    }

    /// Top-level value by key, JSON null when absent.
    pub fn top_level(&self, key: &str) -> Value {
        match key {
            "name" => opt_string(&self.name),
            "email" => opt_string(&self.email),
            "phone" => opt_string(&self.phone),
            "skills" => Value::Array(self.skills.clone()),
            other => self.extra.get(other).cloned().unwrap_or(Value::Null),
        }
    }
}

fn opt_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// Accepts a year only if it is exactly four ASCII digits within 1900..=2100.
pub fn validate_year(raw: &str) -> Option<u16> {
    let trimmed = raw.trim();
    if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: u16 = trimmed.parse().ok()?;
    (1900..=2100).contains(&year).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_year_boundaries() {
        assert_eq!(validate_year("1900"), Some(1900));
        assert_eq!(validate_year("2100"), Some(2100));
        assert_eq!(validate_year("1899"), None);
        assert_eq!(validate_year("2101"), None);
        assert_eq!(validate_year("99"), None);
        assert_eq!(validate_year("abcd"), None);
        assert_eq!(validate_year(""), None);
    }

    #[test]
    fn test_year_tolerates_surrounding_whitespace() {
        assert_eq!(validate_year(" 2020 "), Some(2020));
        assert_eq!(validate_year("+202"), None);
    }

    #[test]
    fn test_record_deserializes_extra_keys() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": null,
            "city": "Austin",
            "education": [{"degree": "BS", "end_year": null}],
            "experience": [],
            "projects": []
        }))
        .unwrap();
        assert_eq!(record.top_level("city"), json!("Austin"));
        assert_eq!(record.top_level("country"), Value::Null);
        assert_eq!(record.top_level("phone"), Value::Null);
        assert_eq!(record.education[0].get("degree"), Some("BS"));
        assert_eq!(record.education[0].get("end_year"), None);
    }

    #[test]
    fn test_from_json_reports_every_violation() {
        let err = ResumeRecord::from_json(json!({
            "name": "Jane Doe",
            "education": [{"degree": "BS", "gpa": 3.8}, {"degree": 4}]
        }))
        .unwrap_err();
        match err {
            EngineError::Validation(e) => assert_eq!(
                e.violations,
                vec![
                    "Field 'education[0].gpa': expected str or None, got float".to_string(),
                    "Field 'education[1].degree': expected str or None, got int".to_string(),
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }

        let record = ResumeRecord::from_json(json!({"name": "Jane Doe", "skills": ["Rust"]}))
            .unwrap();
        assert_eq!(record.top_level("skills"), json!(["Rust"]));
    }

    #[test]
    fn test_entry_year_reads_validated_value() {
        let entry = ResumeEntry::new()
            .with("start_year", Some("2018"))
            .with("end_year", Some("Present"));
        assert_eq!(entry.year("start_year"), Some(2018));
        assert_eq!(entry.year("end_year"), None);
    }
}
