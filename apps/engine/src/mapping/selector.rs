//! Entry Selector: picks one entry out of a repeated resume list.
//!
//! Pure function over the list and a strategy. Every strategy is total: a non-empty
//! list always yields an in-bounds index, an empty list always yields `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::{EntryCategory, ResumeEntry};

// ────────────────────────────────────────────────────────────────────────────
// Strategy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Unterminated entry first, otherwise the latest end year.
    #[default]
    MostRecent,
    /// Longest span for dated lists, longest description for projects.
    Longest,
    /// Education only; other lists fall back.
    HighestDegree,
}

impl SelectionStrategy {
    pub const ALL: [SelectionStrategy; 3] = [
        SelectionStrategy::MostRecent,
        SelectionStrategy::Longest,
        SelectionStrategy::HighestDegree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::MostRecent => "most_recent",
            SelectionStrategy::Longest => "longest",
            SelectionStrategy::HighestDegree => "highest_degree",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        SelectionStrategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == key)
            .ok_or_else(|| EngineError::UnknownStrategy(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Degree levels
// ────────────────────────────────────────────────────────────────────────────

const DEGREE_LEVELS: &[(u8, &[&str])] = &[
    (4, &["phd", "ph.d", "doctorate", "d.phil"]),
    (3, &["master", "m.s", "m.a", "mba", "m.tech"]),
    (2, &["bachelor", "b.s", "b.a", "b.tech", "b.e"]),
    (1, &["associate", "diploma"]),
];

const DEGREE_LEVEL_NAMES: [&str; 5] = ["Other", "Associate", "Bachelor", "Master", "PhD"];

/// Ordinal level of a degree by keyword containment: PhD=4 down to Other=0.
pub fn degree_level(degree: Option<&str>) -> u8 {
    let Some(degree) = degree.filter(|d| !d.is_empty()) else {
        return 0;
    };
    let lower = degree.to_lowercase();
    DEGREE_LEVELS
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| lower.contains(t)))
        .map(|(level, _)| *level)
        .unwrap_or(0)
}

pub fn degree_level_name(level: u8) -> &'static str {
    DEGREE_LEVEL_NAMES
        .get(level as usize)
        .copied()
        .unwrap_or("Other")
}

/// `degree`, or `degree_raw` when `degree` is missing or empty.
pub(crate) fn entry_degree(entry: &ResumeEntry) -> Option<&str> {
    entry
        .get("degree")
        .filter(|d| !d.is_empty())
        .or_else(|| entry.get("degree_raw"))
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

/// Picks one entry from `entries` according to `strategy`.
pub fn select_entry(
    category: EntryCategory,
    entries: &[ResumeEntry],
    strategy: SelectionStrategy,
) -> Option<(usize, &ResumeEntry)> {
    if entries.is_empty() {
        return None;
    }
    let index = match (category, strategy) {
        (EntryCategory::Project, SelectionStrategy::Longest) => longest_description(entries),
        (EntryCategory::Project, _) => 0,
        (_, SelectionStrategy::MostRecent) => most_recent(entries),
        (_, SelectionStrategy::Longest) => longest_span(entries),
        (EntryCategory::Education, SelectionStrategy::HighestDegree) => highest_degree(entries),
        (EntryCategory::Experience, SelectionStrategy::HighestDegree) => most_recent(entries),
    };
    Some((index, &entries[index]))
}

fn most_recent(entries: &[ResumeEntry]) -> usize {
    let mut best: Option<(usize, u16)> = None;
    for (idx, entry) in entries.iter().enumerate() {
        let Some(end) = entry.year("end_year") else {
            // unterminated entry wins outright
            return idx;
        };
        if best.map_or(true, |(_, year)| end > year) {
            best = Some((idx, end));
        }
    }
    best.map(|(idx, _)| idx).unwrap_or(0)
}

/// Largest `end - start` among fully dated entries; else the last entry that has a
/// start year but no end year; else the first entry.
fn longest_span(entries: &[ResumeEntry]) -> usize {
    let mut best_idx = 0;
    let mut best_duration: i32 = -1;
    let mut ongoing_idx = None;
    for (idx, entry) in entries.iter().enumerate() {
        match (entry.year("start_year"), entry.year("end_year")) {
            (Some(start), Some(end)) => {
                let duration = i32::from(end) - i32::from(start);
                if duration > best_duration {
                    best_duration = duration;
                    best_idx = idx;
                }
            }
            (Some(_), None) => ongoing_idx = Some(idx),
            _ => {}
        }
    }
    if best_duration >= 0 {
        best_idx
    } else {
        ongoing_idx.unwrap_or(0)
    }
}

fn highest_degree(entries: &[ResumeEntry]) -> usize {
    let mut best_idx = 0;
    let mut best_level: i16 = -1;
    for (idx, entry) in entries.iter().enumerate() {
        let level = i16::from(degree_level(entry_degree(entry)));
        if level > best_level {
            best_level = level;
            best_idx = idx;
        }
    }
    best_idx
}

fn longest_description(entries: &[ResumeEntry]) -> usize {
    let mut best_idx = 0;
    let mut best_len: Option<usize> = None;
    for (idx, entry) in entries.iter().enumerate() {
        let len = entry.get("description").map_or(0, |d| d.chars().count());
        if best_len.map_or(true, |best| len > best) {
            best_len = Some(len);
            best_idx = idx;
        }
    }
    best_idx
}

// ────────────────────────────────────────────────────────────────────────────
// Reasoning
// ────────────────────────────────────────────────────────────────────────────

/// Human-readable justification of a selection, for explainability output.
pub fn selection_reasoning(
    category: EntryCategory,
    entries: &[ResumeEntry],
    selected: Option<usize>,
    strategy: SelectionStrategy,
) -> String {
    let Some(index) = selected.filter(|i| *i < entries.len()) else {
        return format!("No entries available in {} list", category.as_str());
    };
    if entries.len() == 1 {
        return "Only one entry available, selected automatically".to_string();
    }
    let entry = &entries[index];

    match strategy {
        SelectionStrategy::MostRecent => match category {
            EntryCategory::Education | EntryCategory::Experience => {
                match entry.get("end_year") {
                    Some(raw) => {
                        format!("Selected entry {index} with most recent end year ({raw})")
                    }
                    None if category == EntryCategory::Education => {
                        format!("Selected entry {index} (ongoing/current education)")
                    }
                    None => format!("Selected entry {index} (current position)"),
                }
            }
            EntryCategory::Project => format!("Selected entry {index} (most_recent strategy)"),
        },
        SelectionStrategy::Longest => match category {
            EntryCategory::Project => {
                let len = entry.get("description").map_or(0, |d| d.chars().count());
                format!("Selected entry {index} with longest description ({len} characters)")
            }
            _ => match (entry.year("start_year"), entry.year("end_year")) {
                (Some(start), Some(end)) => format!(
                    "Selected entry {index} with longest duration ({} years)",
                    i32::from(end) - i32::from(start)
                ),
                (_, None) => format!("Selected entry {index} (ongoing, treated as longest)"),
                _ => format!("Selected entry {index} (longest strategy)"),
            },
        },
        SelectionStrategy::HighestDegree => {
            let level = degree_level(entry_degree(entry));
            format!(
                "Selected entry {index} with highest degree level ({})",
                degree_level_name(level)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edu(degree: &str, start: Option<&str>, end: Option<&str>) -> ResumeEntry {
        ResumeEntry::new()
            .with("degree", Some(degree))
            .with("start_year", start)
            .with("end_year", end)
    }

    fn job(start: Option<&str>, end: Option<&str>) -> ResumeEntry {
        ResumeEntry::new()
            .with("title", Some("Engineer"))
            .with("start_year", start)
            .with("end_year", end)
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "most_recent".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::MostRecent
        );
        assert_eq!(
            "HIGHEST_DEGREE".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::HighestDegree
        );
        assert_eq!(
            "longest".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::Longest
        );
        assert!("newest".parse::<SelectionStrategy>().is_err());
        assert_eq!(SelectionStrategy::default(), SelectionStrategy::MostRecent);
    }

    #[test]
    fn test_most_recent_unterminated_short_circuits() {
        let list = vec![
            edu("BS", None, Some("2020")),
            edu("MS", None, Some("2022")),
            edu("PhD", None, None),
        ];
        let (idx, entry) =
            select_entry(EntryCategory::Education, &list, SelectionStrategy::MostRecent).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(entry.get("degree"), Some("PhD"));
    }

    #[test]
    fn test_most_recent_first_wins_ties_and_invalid_years_count_as_current() {
        let list = vec![job(None, Some("2021")), job(None, Some("2021"))];
        assert_eq!(most_recent(&list), 0);

        let list = vec![job(None, Some("2019")), job(None, Some("Present"))];
        assert_eq!(most_recent(&list), 1);
    }

    #[test]
    fn test_longest_prefers_completed_span() {
        let list = vec![
            job(Some("2015"), Some("2017")),
            job(Some("2017"), Some("2022")),
            job(Some("2022"), None),
        ];
        assert_eq!(
            select_entry(EntryCategory::Experience, &list, SelectionStrategy::Longest)
                .unwrap()
                .0,
            1
        );
    }

    #[test]
    fn test_longest_falls_back_to_last_ongoing_then_first() {
        let list = vec![
            job(Some("2018"), None),
            job(None, Some("2020")),
            job(Some("2020"), None),
        ];
        assert_eq!(longest_span(&list), 2);

        let list = vec![job(None, None), job(None, Some("2020"))];
        assert_eq!(longest_span(&list), 0);
    }

    #[test]
    fn test_highest_degree_for_education_and_fallback_for_experience() {
        let list = vec![
            edu("Bachelor of Science", None, Some("2016")),
            edu("Master of Science", None, Some("2018")),
            edu("Diploma", None, Some("2012")),
        ];
        assert_eq!(
            select_entry(
                EntryCategory::Education,
                &list,
                SelectionStrategy::HighestDegree
            )
            .unwrap()
            .0,
            1
        );

        let jobs = vec![job(None, Some("2019")), job(None, None)];
        assert_eq!(
            select_entry(
                EntryCategory::Experience,
                &jobs,
                SelectionStrategy::HighestDegree
            )
            .unwrap()
            .0,
            1
        );
    }

    #[test]
    fn test_degree_levels() {
        assert_eq!(degree_level(Some("Ph.D. in Physics")), 4);
        assert_eq!(degree_level(Some("MBA")), 3);
        assert_eq!(degree_level(Some("B.Tech")), 2);
        assert_eq!(degree_level(Some("Associate of Arts")), 1);
        assert_eq!(degree_level(Some("High School")), 0);
        assert_eq!(degree_level(None), 0);
    }

    #[test]
    fn test_degree_raw_used_when_degree_missing() {
        let list = vec![
            ResumeEntry::new().with("degree_raw", Some("BS")),
            ResumeEntry::new()
                .with("degree", None)
                .with("degree_raw", Some("PhD")),
        ];
        assert_eq!(highest_degree(&list), 1);
    }

    #[test]
    fn test_projects_use_description_length_or_first() {
        let list = vec![
            ResumeEntry::new().with("name", Some("a")).with("description", Some("short")),
            ResumeEntry::new()
                .with("name", Some("b"))
                .with("description", Some("a much longer text")),
        ];
        let longest = select_entry(EntryCategory::Project, &list, SelectionStrategy::Longest);
        assert_eq!(longest.unwrap().0, 1);
        let recent = select_entry(EntryCategory::Project, &list, SelectionStrategy::MostRecent);
        assert_eq!(recent.unwrap().0, 0);
    }

    #[test]
    fn test_selector_is_total() {
        let lists = vec![
            vec![],
            vec![ResumeEntry::new()],
            vec![job(Some("abcd"), Some("99")), job(None, None), job(Some("2100"), Some("1900"))],
        ];
        for list in &lists {
            for category in [
                EntryCategory::Education,
                EntryCategory::Experience,
                EntryCategory::Project,
            ] {
                for strategy in SelectionStrategy::ALL {
                    match select_entry(category, list, strategy) {
                        Some((idx, _)) => assert!(idx < list.len()),
                        None => assert!(list.is_empty()),
                    }
                }
            }
        }
    }

    #[test]
    fn test_reasoning_strings() {
        let list = vec![
            edu("BS", Some("2012"), Some("2016")),
            edu("MS", Some("2016"), None),
        ];
        assert_eq!(
            selection_reasoning(
                EntryCategory::Education,
                &list,
                Some(1),
                SelectionStrategy::MostRecent
            ),
            "Selected entry 1 (ongoing/current education)"
        );
        assert_eq!(
            selection_reasoning(EntryCategory::Education, &list, Some(0), SelectionStrategy::Longest),
            "Selected entry 0 with longest duration (4 years)"
        );
        assert_eq!(
            selection_reasoning(
                EntryCategory::Education,
                &list,
                Some(1),
                SelectionStrategy::HighestDegree
            ),
            "Selected entry 1 with highest degree level (Other)"
        );
        assert_eq!(
            selection_reasoning(EntryCategory::Experience, &[], None, SelectionStrategy::Longest),
            "No entries available in experience list"
        );
        assert_eq!(
            selection_reasoning(
                EntryCategory::Project,
                &list[..1],
                Some(0),
                SelectionStrategy::Longest
            ),
            "Only one entry available, selected automatically"
        );
    }
}
