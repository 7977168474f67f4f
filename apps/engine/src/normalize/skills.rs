use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::text::{contains_word, title_case};
use crate::errors::EngineError;

// ────────────────────────────────────────────────────────────────────────────
// Role profiles
// ────────────────────────────────────────────────────────────────────────────

const SOFTWARE_ENGINEER_HIGH: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "C++",
    "SQL",
    "Git",
    "REST API",
    "Microservices",
];
const SOFTWARE_ENGINEER_MEDIUM: &[&str] = &["Docker", "Kubernetes", "AWS", "CI/CD", "Agile", "Scrum"];

const DATA_SCIENTIST_HIGH: &[&str] = &[
    "Python",
    "R",
    "SQL",
    "Machine Learning",
    "Data Science",
    "Pandas",
    "NumPy",
    "TensorFlow",
    "PyTorch",
];
const DATA_SCIENTIST_MEDIUM: &[&str] = &[
    "Statistics",
    "NLP",
    "Deep Learning",
    "Jupyter",
    "Tableau",
    "Power BI",
];

/// Role a resume is being normalized for. Only the active profiles change
/// behavior; deprecated ones are accepted and degrade to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleProfile {
    SoftwareEngineer,
    DataScientist,
    #[default]
    Default,
    ProductManager,
    DevopsEngineer,
    FrontendDeveloper,
    BackendDeveloper,
    FullStackDeveloper,
    MachineLearningEngineer,
}

impl RoleProfile {
    pub const ALL: [RoleProfile; 9] = [
        RoleProfile::SoftwareEngineer,
        RoleProfile::DataScientist,
        RoleProfile::Default,
        RoleProfile::ProductManager,
        RoleProfile::DevopsEngineer,
        RoleProfile::FrontendDeveloper,
        RoleProfile::BackendDeveloper,
        RoleProfile::FullStackDeveloper,
        RoleProfile::MachineLearningEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleProfile::SoftwareEngineer => "software_engineer",
            RoleProfile::DataScientist => "data_scientist",
            RoleProfile::Default => "default",
            RoleProfile::ProductManager => "product_manager",
            RoleProfile::DevopsEngineer => "devops_engineer",
            RoleProfile::FrontendDeveloper => "frontend_developer",
            RoleProfile::BackendDeveloper => "backend_developer",
            RoleProfile::FullStackDeveloper => "full_stack_developer",
            RoleProfile::MachineLearningEngineer => "machine_learning_engineer",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RoleProfile::SoftwareEngineer | RoleProfile::DataScientist | RoleProfile::Default
        )
    }

    /// (high, medium) priority skill names used to reorder skills.
    fn priorities(&self) -> Option<(&'static [&'static str], &'static [&'static str])> {
        match self {
            RoleProfile::SoftwareEngineer => Some((SOFTWARE_ENGINEER_HIGH, SOFTWARE_ENGINEER_MEDIUM)),
            RoleProfile::DataScientist => Some((DATA_SCIENTIST_HIGH, DATA_SCIENTIST_MEDIUM)),
            _ => None,
        }
    }

    /// 0 for high priority, 1 for medium, 2 otherwise.
    fn tier(&self, skill: &str) -> u8 {
        let Some((high, medium)) = self.priorities() else {
            return 2;
        };
        let is_in = |list: &[&str]| list.iter().any(|s| s.eq_ignore_ascii_case(skill));
        if is_in(high) {
            0
        } else if is_in(medium) {
            1
        } else {
            2
        }
    }
}

impl fmt::Display for RoleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleProfile {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        RoleProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str() == key)
            .ok_or_else(|| EngineError::UnknownProfile(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill table
// ────────────────────────────────────────────────────────────────────────────

/// Lowercase spelling -> canonical skill name, in lookup order.
pub static ATS_SKILL_MAPPINGS: &[(&str, &str)] = &[
    // Languages
    ("js", "JavaScript"),
    ("javascript", "JavaScript"),
    ("js/ts", "JavaScript/TypeScript"),
    ("ts", "TypeScript"),
    ("typescript", "TypeScript"),
    ("c++", "C++"),
    ("cpp", "C++"),
    ("c plus plus", "C++"),
    ("c#", "C#"),
    ("csharp", "C#"),
    ("c sharp", "C#"),
    ("python", "Python"),
    ("py", "Python"),
    ("java", "Java"),
    ("go", "Go"),
    ("golang", "Go"),
    ("rust", "Rust"),
    ("ruby", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    ("scala", "Scala"),
    ("r", "R"),
    // Frameworks
    ("react", "React"),
    ("react.js", "React"),
    ("reactjs", "React"),
    ("angular", "Angular"),
    ("angular.js", "Angular"),
    ("angularjs", "Angular"),
    ("vue", "Vue.js"),
    ("vue.js", "Vue.js"),
    ("vuejs", "Vue.js"),
    ("node", "Node.js"),
    ("node.js", "Node.js"),
    ("nodejs", "Node.js"),
    ("express", "Express.js"),
    ("express.js", "Express.js"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("spring", "Spring"),
    ("spring boot", "Spring Boot"),
    // Databases
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("postgres", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("mongo", "MongoDB"),
    ("redis", "Redis"),
    // Cloud and DevOps
    ("aws", "AWS"),
    ("amazon web services", "AWS"),
    ("azure", "Azure"),
    ("gcp", "GCP"),
    ("google cloud", "GCP"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("k8s", "Kubernetes"),
    ("git", "Git"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    // Data and ML
    ("ml", "Machine Learning"),
    ("machine learning", "Machine Learning"),
    ("dl", "Deep Learning"),
    ("deep learning", "Deep Learning"),
    ("ds", "Data Science"),
    ("data science", "Data Science"),
    ("nlp", "NLP"),
    ("natural language processing", "NLP"),
    ("tensorflow", "TensorFlow"),
    ("tf", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
];

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Where the skills list came from; sets the base confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    ExplicitSection,
    Inferred,
}

impl SkillSource {
    pub fn base_confidence(&self) -> f64 {
        match self {
            SkillSource::ExplicitSection => 0.9,
            SkillSource::Inferred => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillResolution {
    Exact,
    Partial,
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSkill {
    pub name: String,
    pub confidence: f64,
    pub source: SkillSource,
}

/// A skill as rendered in the normalized resume: a bare name or a scored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedSkill {
    Name(String),
    Scored(ScoredSkill),
}

impl NormalizedSkill {
    pub fn name(&self) -> &str {
        match self {
            NormalizedSkill::Name(name) => name,
            NormalizedSkill::Scored(skill) => &skill.name,
        }
    }
}

/// How one raw skill was resolved, kept for the explainability tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillOutcome {
    pub input: String,
    pub canonical: String,
    pub resolution: SkillResolution,
    pub confidence: f64,
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillNormalization {
    pub skills: Vec<NormalizedSkill>,
    pub outcomes: Vec<SkillOutcome>,
}

/// Canonical name for one raw skill.
///
/// Exact table hits win. Otherwise the longest table key that contains the skill,
/// or is contained in it, with no letter attached on either side is used (table
/// order breaks ties), so "python3" resolves to Python but "terraform" never to R.
/// Unknown skills are title-cased.
pub fn canonicalize_skill(skill: &str) -> (String, SkillResolution) {
    let trimmed = skill.trim();
    let lower = trimmed.to_lowercase();

    if let Some(&(_, canonical)) = ATS_SKILL_MAPPINGS.iter().find(|(key, _)| *key == lower) {
        return (canonical.to_string(), SkillResolution::Exact);
    }

    let mut best: Option<(&str, &str)> = None;
    for &(key, canonical) in ATS_SKILL_MAPPINGS {
        if !(contains_word(&lower, key) || contains_word(key, &lower)) {
            continue;
        }
        if best.map_or(true, |(best_key, _)| key.len() > best_key.len()) {
            best = Some((key, canonical));
        }
    }
    match best {
        Some((_, canonical)) => (canonical.to_string(), SkillResolution::Partial),
        None => (title_case(trimmed), SkillResolution::Unmapped),
    }
}

/// Canonicalizes, scores and deduplicates (case-insensitively, first wins) a raw
/// skills list, then reorders it for `profile` when that profile has priorities.
///
/// Accepts plain strings and `{name, ..}` objects; blank names are dropped.
pub fn normalize_skills(
    raw: &[Value],
    profile: RoleProfile,
    source: SkillSource,
    as_strings: bool,
) -> SkillNormalization {
    let base = source.base_confidence();
    let mut seen = HashSet::new();
    let mut result = SkillNormalization::default();

    for item in raw {
        let Some(input) = skill_text(item) else {
            continue;
        };
        if input.trim().is_empty() {
            debug!("Skipping blank skill");
            continue;
        }

        let (canonical, resolution) = canonicalize_skill(input);
        let confidence = round2(match resolution {
            SkillResolution::Exact => (base + 0.05).min(1.0),
            SkillResolution::Partial => (base - 0.1).max(0.5),
            SkillResolution::Unmapped => (base - 0.2).max(0.3),
        });
        let duplicate = !seen.insert(canonical.to_lowercase());

        if !duplicate {
            result.skills.push(if as_strings {
                NormalizedSkill::Name(canonical.clone())
            } else {
                NormalizedSkill::Scored(ScoredSkill {
                    name: canonical.clone(),
                    confidence,
                    source,
                })
            });
        }
        result.outcomes.push(SkillOutcome {
            input: input.to_string(),
            canonical,
            resolution,
            confidence,
            duplicate,
        });
    }

    prioritize(&mut result.skills, profile);
    result
}

/// Priority tier, then confidence descending, then name. No-op without priorities.
fn prioritize(skills: &mut [NormalizedSkill], profile: RoleProfile) {
    if profile.priorities().is_none() {
        return;
    }
    skills.sort_by(|a, b| {
        profile
            .tier(a.name())
            .cmp(&profile.tier(b.name()))
            .then_with(|| confidence_of(b).total_cmp(&confidence_of(a)))
            .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
    });
}

fn confidence_of(skill: &NormalizedSkill) -> f64 {
    match skill {
        NormalizedSkill::Name(_) => 0.0,
        NormalizedSkill::Scored(s) => s.confidence,
    }
}

fn skill_text(item: &Value) -> Option<&str> {
    match item {
        Value::String(s) => Some(s),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(result: &SkillNormalization) -> Vec<&str> {
        result.skills.iter().map(NormalizedSkill::name).collect()
    }

    fn raw(value: Value) -> Vec<Value> {
        value.as_array().cloned().unwrap()
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("software_engineer".parse::<RoleProfile>().unwrap(), RoleProfile::SoftwareEngineer);
        assert_eq!("Data-Scientist".parse::<RoleProfile>().unwrap(), RoleProfile::DataScientist);
        assert!("astronaut".parse::<RoleProfile>().is_err());
        assert!(!RoleProfile::DevopsEngineer.is_active());
        assert!(RoleProfile::default().is_active());
    }

    #[test]
    fn test_canonicalize_skill_tiers() {
        assert_eq!(canonicalize_skill(" JS "), ("JavaScript".to_string(), SkillResolution::Exact));
        assert_eq!(
            canonicalize_skill("React.js developer"),
            ("React".to_string(), SkillResolution::Partial)
        );
        assert_eq!(
            canonicalize_skill("python 3"),
            ("Python".to_string(), SkillResolution::Partial)
        );
        assert_eq!(
            canonicalize_skill("terraform"),
            ("Terraform".to_string(), SkillResolution::Unmapped)
        );
    }

    #[test]
    fn test_attached_digits_still_match_partially() {
        assert_eq!(
            canonicalize_skill("python3"),
            ("Python".to_string(), SkillResolution::Partial)
        );
        assert_eq!(
            canonicalize_skill("Java8"),
            ("Java".to_string(), SkillResolution::Partial)
        );
        assert_eq!(
            canonicalize_skill("ReactJS developer"),
            ("React".to_string(), SkillResolution::Partial)
        );
        assert_eq!(
            canonicalize_skill("algorithms"),
            ("Algorithms".to_string(), SkillResolution::Unmapped)
        );

        let result = normalize_skills(
            &raw(json!(["js", "python3", "Java8", "terraform"])),
            RoleProfile::Default,
            SkillSource::ExplicitSection,
            false,
        );
        assert_eq!(names(&result), vec!["JavaScript", "Python", "Java", "Terraform"]);
        let confidences: Vec<f64> = result.outcomes.iter().map(|o| o.confidence).collect();
        assert_eq!(confidences, vec![0.95, 0.8, 0.8, 0.7]);
    }

    #[test]
    fn test_confidence_and_dedup() {
        let result = normalize_skills(
            &raw(json!(["js", "JavaScript", "python 3", "terraform", "  "])),
            RoleProfile::Default,
            SkillSource::ExplicitSection,
            false,
        );
        assert_eq!(names(&result), vec!["JavaScript", "Python", "Terraform"]);
        let confidences: Vec<f64> = result.outcomes.iter().map(|o| o.confidence).collect();
        assert_eq!(confidences, vec![0.95, 0.95, 0.8, 0.7]);
        assert!(result.outcomes[1].duplicate);
    }

    #[test]
    fn test_inferred_confidence_floors() {
        let result = normalize_skills(
            &raw(json!(["rust", "python 3", "terraform"])),
            RoleProfile::Default,
            SkillSource::Inferred,
            false,
        );
        let confidences: Vec<f64> = result.outcomes.iter().map(|o| o.confidence).collect();
        assert_eq!(confidences, vec![0.65, 0.5, 0.4]);
    }

    #[test]
    fn test_role_prioritisation() {
        let result = normalize_skills(
            &raw(json!(["terraform", "docker", "python", "sql"])),
            RoleProfile::SoftwareEngineer,
            SkillSource::ExplicitSection,
            true,
        );
        assert_eq!(names(&result), vec!["Python", "SQL", "Docker", "Terraform"]);

        let unchanged = normalize_skills(
            &raw(json!(["terraform", "docker", "python"])),
            RoleProfile::Default,
            SkillSource::ExplicitSection,
            true,
        );
        assert_eq!(names(&unchanged), vec!["Terraform", "Docker", "Python"]);
    }

    #[test]
    fn test_object_skills_use_their_name() {
        let result = normalize_skills(
            &raw(json!([{"name": "k8s", "confidence": 0.2}])),
            RoleProfile::Default,
            SkillSource::ExplicitSection,
            false,
        );
        assert_eq!(
            result.skills,
            vec![NormalizedSkill::Scored(ScoredSkill {
                name: "Kubernetes".to_string(),
                confidence: 0.95,
                source: SkillSource::ExplicitSection,
            })]
        );
    }
}
