use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::degree::{canonicalize_degree, CanonicalDegree};
use super::text::title_case;
use crate::models::{validate_year, ResumeEntry};

// ────────────────────────────────────────────────────────────────────────────
// Rewrite tables
// ────────────────────────────────────────────────────────────────────────────

/// Case-insensitive institution abbreviations. Dotted forms run first so the dot
/// is consumed together with the word.
static INSTITUTION_ABBREVIATIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bUniv\.", "University"),
        (r"(?i)\bUniv\b", "University"),
        (r"(?i)\bCol\.", "College"),
        (r"(?i)\bCol\b", "College"),
        (r"(?i)\bInst\.", "Institute"),
        (r"(?i)\bInst\b", "Institute"),
    ]
    .into_iter()
    .map(|(pattern, full)| (Regex::new(pattern).expect("valid institution pattern"), full))
    .collect()
});

/// Title abbreviations, matched after title casing.
static TITLE_ABBREVIATIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bSr\.", "Senior"),
        (r"\bJr\.", "Junior"),
        (r"\bEng\.", "Engineer"),
        (r"\bMgr\.", "Manager"),
        (r"\bDev\.", "Developer"),
        (r"\bDir\.", "Director"),
    ]
    .into_iter()
    .map(|(pattern, full)| (Regex::new(pattern).expect("valid title pattern"), full))
    .collect()
});

/// Trailing legal suffix (with or without its dot) -> canonical spelling.
const COMPANY_SUFFIXES: &[(&str, &str)] = &[
    ("inc", "Inc."),
    ("llc", "LLC"),
    ("corp", "Corp."),
    ("ltd", "Ltd."),
];

// ────────────────────────────────────────────────────────────────────────────
// Field rewrites
// ────────────────────────────────────────────────────────────────────────────

pub fn normalize_institution(institution: &str) -> String {
    let mut expanded = institution.trim().to_string();
    for (pattern, full) in INSTITUTION_ABBREVIATIONS.iter() {
        expanded = pattern.replace_all(&expanded, *full).into_owned();
    }
    title_case(&expanded)
}

pub fn normalize_job_title(title: &str) -> String {
    let mut normalized = title_case(title.trim());
    for (pattern, full) in TITLE_ABBREVIATIONS.iter() {
        normalized = pattern.replace_all(&normalized, *full).into_owned();
    }
    normalized
}

/// Title case, then the canonical legal suffix ("acme llc" -> "Acme LLC").
pub fn normalize_company(company: &str) -> String {
    let normalized = title_case(company.trim());
    let lower = normalized.to_lowercase();
    for (suffix, canonical) in COMPANY_SUFFIXES {
        let plain = format!(" {suffix}");
        let dotted = format!(" {suffix}.");
        if lower.ends_with(&plain) || lower.ends_with(&dotted) {
            if let Some((head, _)) = normalized.rsplit_once(' ') {
                return format!("{head} {canonical}");
            }
        }
    }
    normalized
}

// ────────────────────────────────────────────────────────────────────────────
// Entry lists
// ────────────────────────────────────────────────────────────────────────────

/// A normalized entry and the position it had in the raw list.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntry {
    pub source_index: usize,
    pub entry: ResumeEntry,
    pub degree: Option<CanonicalDegree>,
}

/// Canonical degree (raw degree kept in `degree_raw`), expanded institution,
/// validated years. Sorted by end year, newest first.
pub fn normalize_education(raw: &[Value]) -> Vec<NormalizedEntry> {
    let mut entries: Vec<NormalizedEntry> = objects(raw)
        .map(|(source_index, item)| {
            let raw_degree = text(item, "degree");
            let degree = raw_degree.and_then(canonicalize_degree);

            let mut entry = ResumeEntry::new();
            entry.insert("degree", degree.as_ref().map(|d| d.canonical.clone()));
            entry.insert("degree_raw", raw_degree.map(str::to_string));
            entry.insert(
                "institution",
                non_empty(item, "institution").map(normalize_institution),
            );
            insert_years(&mut entry, item);
            entry.insert("raw_date", text(item, "raw_date").map(str::to_string));
            entry.insert("year", text(item, "year").map(str::to_string));
            carry_extra_fields(&mut entry, item);

            NormalizedEntry {
                source_index,
                entry,
                degree,
            }
        })
        .collect();
    sort_by_end_year_desc(&mut entries);
    entries
}

/// Title and company rewrites, validated years. Sorted by end year, newest first,
/// so current jobs (no end year) land last.
pub fn normalize_experience(raw: &[Value]) -> Vec<NormalizedEntry> {
    let mut entries: Vec<NormalizedEntry> = objects(raw)
        .map(|(source_index, item)| {
            let mut entry = ResumeEntry::new();
            entry.insert("title", non_empty(item, "title").map(normalize_job_title));
            entry.insert("company", non_empty(item, "company").map(normalize_company));
            insert_years(&mut entry, item);
            entry.insert("raw_date", text(item, "raw_date").map(str::to_string));
            entry.insert("duration", text(item, "duration").map(str::to_string));
            carry_extra_fields(&mut entry, item);

            NormalizedEntry {
                source_index,
                entry,
                degree: None,
            }
        })
        .collect();
    sort_by_end_year_desc(&mut entries);
    entries
}

/// Title-cased names and trimmed descriptions, original order.
pub fn normalize_projects(raw: &[Value]) -> Vec<ResumeEntry> {
    objects(raw)
        .map(|(_, item)| {
            let mut entry = ResumeEntry::new();
            entry.insert(
                "name",
                non_empty(item, "name").map(|name| title_case(name.trim())),
            );
            entry.insert(
                "description",
                non_empty(item, "description").map(|d| d.trim().to_string()),
            );
            entry
        })
        .collect()
}

/// Stable sort on the validated end year, descending; a missing year counts as 0.
fn sort_by_end_year_desc(entries: &mut [NormalizedEntry]) {
    entries.sort_by_key(|e| Reverse(e.entry.year("end_year").unwrap_or(0)));
}

fn insert_years(entry: &mut ResumeEntry, item: &Map<String, Value>) {
    for key in ["start_year", "end_year"] {
        let year = text(item, key).and_then(validate_year);
        entry.insert(key, year.map(|y| y.to_string()));
    }
}

/// Keeps string (or null) keys the rewrite did not produce itself, e.g. `gpa`.
fn carry_extra_fields(entry: &mut ResumeEntry, item: &Map<String, Value>) {
    for (key, value) in item {
        if entry.0.contains_key(key) {
            continue;
        }
        match value {
            Value::String(s) => entry.insert(key, Some(s.clone())),
            Value::Null => entry.insert(key, None),
            _ => {}
        }
    }
}

fn objects(raw: &[Value]) -> impl Iterator<Item = (usize, &Map<String, Value>)> {
    raw.iter()
        .enumerate()
        .filter_map(|(i, item)| item.as_object().map(|obj| (i, obj)))
}

fn text<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

fn non_empty<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    text(item, key).filter(|s| !s.is_empty())
}
