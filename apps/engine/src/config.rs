use anyhow::{Context, Result};
use tracing::warn;

use crate::mapping::SelectionStrategy;
use crate::normalize::RoleProfile;

/// Runtime configuration for the `ats-map` binary, loaded from environment variables.
/// Every value has a default; CLI flags override whatever is loaded here.
#[derive(Debug, Clone)]
pub struct Config {
    pub fuzzy_threshold: f64,
    pub selection_strategy: SelectionStrategy,
    pub explain: bool,
    pub role_profile: RoleProfile,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            fuzzy_threshold: optional_env("ATS_FUZZY_THRESHOLD")
                .map(|v| v.parse::<f64>())
                .transpose()
                .context("ATS_FUZZY_THRESHOLD must be a number")?
                .unwrap_or(0.7),
            selection_strategy: optional_env("ATS_SELECTION_STRATEGY")
                .map(|v| v.parse::<SelectionStrategy>())
                .transpose()
                .context("ATS_SELECTION_STRATEGY is not a known strategy")?
                .unwrap_or_default(),
            explain: optional_env("ATS_EXPLAIN")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("ATS_EXPLAIN must be true/false")?
                .unwrap_or(false),
            role_profile: optional_env("ATS_ROLE_PROFILE")
                .map(|v| v.parse::<RoleProfile>())
                .transpose()
                .context("ATS_ROLE_PROFILE is not a known role profile")?
                .unwrap_or_default(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean flag"),
    }
}

/// Collection point for options an entry point does not recognise.
///
/// Unknown options never fail a call. They are kept here so the entry point can
/// report them through `tracing` once it runs, and are otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownOptions {
    keys: Vec<String>,
}

impl UnknownOptions {
    pub fn push(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Emits one warning per unknown option and returns how many were emitted.
    pub fn warn(&self, entry_point: &str, valid: &[&str]) -> usize {
        for key in &self.keys {
            warn!(
                entry_point,
                option = %key,
                "Unexpected parameter '{}' passed to {}(). Valid parameters are: {}. \
                 This parameter will be ignored.",
                key,
                entry_point,
                valid.join(", ")
            );
        }
        self.keys.len()
    }
}
