//! ats-map: maps ATS form labels onto structured resume data from the command line.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_engine::config::Config;
use ats_engine::errors::EngineError;
use ats_engine::mapping::{
    get_ats_field_variations, map_multiple_fields, review_form_fields, CanonicalField, FormField,
    FormSchema, MapOptions, SelectionStrategy, SensitivityTier, CANONICAL_SCHEMA_VERSION,
};
use ats_engine::models::ResumeRecord;
use ats_engine::normalize::{
    normalize_resume, NormalizerOptions, RoleProfile, NORMALIZATION_VERSION,
};

#[derive(Parser)]
#[command(name = "ats-map")]
#[command(version, about = "Deterministic ATS form-field mapping for structured resumes")]
#[command(propagate_version = true)]
struct Cli {
    /// Minimum weighted confidence for fuzzy matches, within [0, 1] (overrides ATS_FUZZY_THRESHOLD)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Entry selection strategy: most_recent, longest or highest_degree (overrides ATS_SELECTION_STRATEGY)
    #[arg(long, global = true)]
    strategy: Option<SelectionStrategy>,

    /// Attach explainability traces to every mapping (overrides ATS_EXPLAIN)
    #[arg(long, global = true)]
    explain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map form field labels against a resume
    Map {
        /// Resume JSON file
        #[arg(short, long)]
        resume: PathBuf,

        /// Run the resume through the normalizer before mapping
        #[arg(long)]
        normalized: bool,

        /// Form field labels, mapped in the given order
        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,
    },

    /// Map every control of a discovered form and flag the ones needing review
    Review {
        /// Resume JSON file
        #[arg(short, long)]
        resume: PathBuf,

        /// Form JSON file: `{"fields": [...]}` or a bare list of field descriptors
        #[arg(short, long)]
        form: PathBuf,

        /// Run the resume through the normalizer before mapping
        #[arg(long)]
        normalized: bool,
    },

    /// Normalize a raw parsed resume
    Normalize {
        /// Raw resume JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Role profile (overrides ATS_ROLE_PROFILE)
        #[arg(short, long)]
        profile: Option<RoleProfile>,

        /// Render skills as plain strings instead of scored objects
        #[arg(long)]
        skills_as_strings: bool,

        /// Include the explainability tree
        #[arg(long)]
        debug: bool,

        /// Validate only and echo the raw resume back
        #[arg(long)]
        disabled: bool,
    },

    /// List the canonical fields
    Fields {
        /// Include every ATS label variation per field
        #[arg(long)]
        variations: bool,
    },
}

#[derive(Serialize)]
struct FieldListing {
    canonical_schema_version: &'static str,
    fields: Vec<FieldInfo>,
}

#[derive(Serialize)]
struct FieldInfo {
    field: &'static str,
    sensitivity: SensitivityTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    variations: Option<Vec<&'static str>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging on stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "ats_engine={0},ats_map={0}",
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "ats-map v{} (canonical schema {}, normalization {})",
        env!("CARGO_PKG_VERSION"),
        CANONICAL_SCHEMA_VERSION,
        NORMALIZATION_VERSION
    );

    let options = map_options(&cli, &config)?;
    match cli.command {
        Commands::Map {
            resume,
            normalized,
            fields,
        } => {
            let resume = load_resume(&resume, normalized, config.role_profile)?;
            let mapped = map_multiple_fields(&fields, &resume, &options);
            info!(requested = fields.len(), mapped = mapped.len(), "Mapping complete");
            print_json(&mapped)
        }
        Commands::Review {
            resume,
            form,
            normalized,
        } => {
            let resume = load_resume(&resume, normalized, config.role_profile)?;
            let fields = load_form(&form)?;
            print_json(&review_form_fields(&fields, &resume, &options))
        }
        Commands::Normalize {
            input,
            profile,
            skills_as_strings,
            debug,
            disabled,
        } => {
            let raw = read_json(&input)?;
            let options = NormalizerOptions::default()
                .with_profile(profile.unwrap_or(config.role_profile))
                .with_skills_as_strings(skills_as_strings)
                .with_debug(debug)
                .with_normalize_enabled(!disabled);
            print_json(&normalize_resume(&raw, &options)?)
        }
        Commands::Fields { variations } => {
            let fields = CanonicalField::ALL
                .into_iter()
                .map(|field| FieldInfo {
                    field: field.as_str(),
                    sensitivity: field.sensitivity_tier(),
                    variations: variations.then(|| get_ats_field_variations(field)),
                })
                .collect();
            print_json(&FieldListing {
                canonical_schema_version: CANONICAL_SCHEMA_VERSION,
                fields,
            })
        }
    }
}

/// CLI flags win over environment configuration.
fn map_options(cli: &Cli, config: &Config) -> Result<MapOptions> {
    let threshold = cli.threshold.unwrap_or(config.fuzzy_threshold);
    anyhow::ensure!(
        (0.0..=1.0).contains(&threshold),
        EngineError::InvalidThreshold(threshold)
    );
    Ok(MapOptions::default()
        .with_strategy(cli.strategy.unwrap_or(config.selection_strategy))
        .with_threshold(threshold)
        .with_explain(cli.explain || config.explain))
}

fn load_resume(path: &Path, normalized: bool, profile: RoleProfile) -> Result<ResumeRecord> {
    let raw = read_json(path)?;
    if !normalized {
        return ResumeRecord::from_json(raw)
            .with_context(|| format!("{} is not a structured resume", path.display()));
    }

    let options = NormalizerOptions::default().with_profile(profile);
    let output = normalize_resume(&raw, &options)?;
    let resume = output
        .normalized
        .as_resume()
        .context("normalizer did not produce a normalized resume")?;
    Ok(resume.to_resume_record())
}

fn load_form(path: &Path) -> Result<Vec<FormField>> {
    let form = read_json(path)?;
    let fields = match form {
        Value::Array(_) => serde_json::from_value(form),
        other => serde_json::from_value::<FormSchema>(other).map(|schema| schema.fields),
    };
    fields.with_context(|| format!("{} is not a form field list", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .map_err(EngineError::from)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(EngineError::from)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_surfaces_engine_errors() {
        let missing = Path::new("does-not-exist/resume.json");
        let err = read_json(missing).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::Io(_))
        ));
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn test_cli_threshold_is_range_checked() {
        let cli = Cli::parse_from(["ats-map", "--threshold", "1.5", "fields"]);
        let config = Config {
            fuzzy_threshold: 0.7,
            selection_strategy: SelectionStrategy::MostRecent,
            explain: false,
            role_profile: RoleProfile::Default,
            rust_log: "info".to_string(),
        };
        let err = map_options(&cli, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::InvalidThreshold(_))
        ));
    }
}
