//! Degree canonicalization against a fixed taxonomy.
//!
//! Lookup runs in tiers: exact full name, exact abbreviation, full name contained
//! in the text, abbreviation found as a word, then title-cased raw text. The two
//! partial tiers append an embedded major ("... in Computer Science").

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::text::title_case;

/// Lowercase full degree name -> canonical name, in lookup order.
pub static DEGREE_TAXONOMY: &[(&str, &str)] = &[
    // Bachelor's
    ("bachelor of science", "Bachelor of Science"),
    ("bachelor of arts", "Bachelor of Arts"),
    ("bachelor of engineering", "Bachelor of Engineering"),
    ("bachelor of technology", "Bachelor of Technology"),
    ("bachelor of business administration", "Bachelor of Business Administration"),
    ("bachelor of computer science", "Bachelor of Computer Science"),
    ("bachelor of information technology", "Bachelor of Information Technology"),
    ("bachelor of applied science", "Bachelor of Applied Science"),
    ("bachelor of fine arts", "Bachelor of Fine Arts"),
    ("bachelor of architecture", "Bachelor of Architecture"),
    ("bachelor of education", "Bachelor of Education"),
    ("bachelor of nursing", "Bachelor of Nursing"),
    ("bachelor of commerce", "Bachelor of Commerce"),
    ("bachelor of economics", "Bachelor of Economics"),
    ("bachelor of mathematics", "Bachelor of Mathematics"),
    ("bachelor of physics", "Bachelor of Physics"),
    ("bachelor of chemistry", "Bachelor of Chemistry"),
    ("bachelor of biology", "Bachelor of Biology"),
    ("bachelor of psychology", "Bachelor of Psychology"),
    ("bachelor of sociology", "Bachelor of Sociology"),
    ("bachelor of political science", "Bachelor of Political Science"),
    ("bachelor of history", "Bachelor of History"),
    ("bachelor of english", "Bachelor of English"),
    ("bachelor of philosophy", "Bachelor of Philosophy"),
    ("bachelor of law", "Bachelor of Law"),
    ("bachelor of medicine", "Bachelor of Medicine"),
    ("bachelor of surgery", "Bachelor of Surgery"),
    // Master's
    ("master of science", "Master of Science"),
    ("master of arts", "Master of Arts"),
    ("master of engineering", "Master of Engineering"),
    ("master of technology", "Master of Technology"),
    ("master of business administration", "Master of Business Administration"),
    ("master of computer science", "Master of Computer Science"),
    ("master of information technology", "Master of Information Technology"),
    ("master of applied science", "Master of Applied Science"),
    ("master of fine arts", "Master of Fine Arts"),
    ("master of architecture", "Master of Architecture"),
    ("master of education", "Master of Education"),
    ("master of public administration", "Master of Public Administration"),
    ("master of public health", "Master of Public Health"),
    ("master of social work", "Master of Social Work"),
    ("master of law", "Master of Law"),
    ("master of philosophy", "Master of Philosophy"),
    ("master of data science", "Master of Data Science"),
    ("master of information systems", "Master of Information Systems"),
    // Doctoral
    ("doctor of philosophy", "PhD"),
    ("phd", "PhD"),
    ("doctor of medicine", "Doctor of Medicine"),
    ("doctor of law", "Doctor of Law"),
    ("doctor of education", "Doctor of Education"),
    ("doctor of business administration", "Doctor of Business Administration"),
    ("doctor of engineering", "Doctor of Engineering"),
    // Associate
    ("associate of science", "Associate of Science"),
    ("associate of arts", "Associate of Arts"),
    ("associate of applied science", "Associate of Applied Science"),
    // Other
    ("certificate", "Certificate"),
    ("diploma", "Diploma"),
    ("professional certificate", "Professional Certificate"),
];

/// Lowercase abbreviation (with punctuated variants) -> canonical name, in lookup order.
pub static DEGREE_ABBREVIATIONS: &[(&str, &str)] = &[
    // Bachelor's
    ("bs", "Bachelor of Science"),
    ("b.s.", "Bachelor of Science"),
    ("b.s", "Bachelor of Science"),
    ("ba", "Bachelor of Arts"),
    ("b.a.", "Bachelor of Arts"),
    ("b.a", "Bachelor of Arts"),
    ("be", "Bachelor of Engineering"),
    ("b.e.", "Bachelor of Engineering"),
    ("b.e", "Bachelor of Engineering"),
    ("btech", "Bachelor of Technology"),
    ("b.tech", "Bachelor of Technology"),
    ("b.tech.", "Bachelor of Technology"),
    ("bba", "Bachelor of Business Administration"),
    ("b.b.a.", "Bachelor of Business Administration"),
    ("bcs", "Bachelor of Computer Science"),
    ("bscs", "Bachelor of Computer Science"),
    // Master's
    ("ms", "Master of Science"),
    ("m.s.", "Master of Science"),
    ("m.s", "Master of Science"),
    ("ma", "Master of Arts"),
    ("m.a.", "Master of Arts"),
    ("m.a", "Master of Arts"),
    ("me", "Master of Engineering"),
    ("m.e.", "Master of Engineering"),
    ("m.e", "Master of Engineering"),
    ("mtech", "Master of Technology"),
    ("m.tech", "Master of Technology"),
    ("m.tech.", "Master of Technology"),
    ("mba", "Master of Business Administration"),
    ("m.b.a.", "Master of Business Administration"),
    ("m.b.a", "Master of Business Administration"),
    ("mcs", "Master of Computer Science"),
    ("mscs", "Master of Computer Science"),
    // Doctoral
    ("phd", "PhD"),
    ("ph.d.", "PhD"),
    ("ph.d", "PhD"),
    ("d.phil", "PhD"),
    ("dphil", "PhD"),
    ("md", "Doctor of Medicine"),
    ("m.d.", "Doctor of Medicine"),
    ("jd", "Doctor of Law"),
    ("j.d.", "Doctor of Law"),
    ("edd", "Doctor of Education"),
    ("ed.d.", "Doctor of Education"),
    ("dba", "Doctor of Business Administration"),
    ("d.b.a.", "Doctor of Business Administration"),
    // Associate
    ("as", "Associate of Science"),
    ("a.s.", "Associate of Science"),
    ("aa", "Associate of Arts"),
    ("a.a.", "Associate of Arts"),
    ("aas", "Associate of Applied Science"),
    ("a.a.s.", "Associate of Applied Science"),
];

static MAJOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"in\s+(\w+(?:\s+\w+)*)").expect("valid major regex"));

/// Abbreviations as whole words; every dot is optional ("b.s." also matches "bs" and "b.s").
static ABBREVIATION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    DEGREE_ABBREVIATIONS
        .iter()
        .map(|&(abbrev, canonical)| {
            let body = regex::escape(abbrev).replace(r"\.", r"\.?");
            let pattern = Regex::new(&format!(r"\b{body}\b")).expect("valid abbreviation pattern");
            (pattern, canonical)
        })
        .collect()
});

/// Which lookup tier produced a canonical degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeRule {
    ExactTaxonomy,
    ExactAbbreviation,
    PartialTaxonomy,
    PartialAbbreviation,
    TitleCaseFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDegree {
    pub canonical: String,
    /// Trimmed input, always preserved next to the canonical form.
    pub raw: String,
    pub rule: DegreeRule,
}

/// Canonical degree for a raw degree string; `None` only for an empty input.
pub fn canonicalize_degree(degree: &str) -> Option<CanonicalDegree> {
    if degree.is_empty() {
        return None;
    }
    let raw = degree.trim().to_string();
    let lower = raw.to_lowercase();

    let (canonical, rule) = if let Some(canonical) = lookup(DEGREE_TAXONOMY, &lower) {
        (canonical.to_string(), DegreeRule::ExactTaxonomy)
    } else if let Some(canonical) = lookup(DEGREE_ABBREVIATIONS, &lower) {
        (canonical.to_string(), DegreeRule::ExactAbbreviation)
    } else if let Some(&(_, canonical)) = DEGREE_TAXONOMY
        .iter()
        .find(|(key, _)| lower.contains(*key))
    {
        (with_major(canonical, &lower), DegreeRule::PartialTaxonomy)
    } else if let Some((_, canonical)) = ABBREVIATION_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&lower))
    {
        (with_major(canonical, &lower), DegreeRule::PartialAbbreviation)
    } else {
        (title_case(&raw), DegreeRule::TitleCaseFallback)
    };

    debug!(rule = ?rule, canonical = %canonical, "Degree canonicalized");
    Some(CanonicalDegree {
        canonical,
        raw,
        rule,
    })
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|&(_, canonical)| canonical)
}

/// Appends the title-cased major following the first "in " of the degree text.
fn with_major(canonical: &str, degree_lower: &str) -> String {
    match MAJOR_RE.captures(degree_lower).and_then(|caps| caps.get(1)) {
        Some(major) => format!("{canonical} in {}", title_case(major.as_str())),
        None => canonical.to_string(),
    }
}
