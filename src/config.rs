//! Configuration handling

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_ADDRESS;
use crate::state::{GovernanceSchema, PollSchema, SubmissionThresholds};

/// Prefix of every environment override
const ENV_PREFIX: &str = "GOVSUBMIT_";

/// User configuration for proposal submission
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Governance API base URL
    pub api_url: Option<String>,
    /// Snapshot space voting power is measured in
    pub snapshot_space: Option<String>,
    /// Minimum voting power per proposal type
    pub thresholds: SubmissionThresholds,
    /// Field constraints for governance proposals
    pub governance_schema: GovernanceSchema,
    /// Field constraints for polls
    pub poll_schema: PollSchema,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "governance", "govsubmit")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::read(&path)?,
            _ => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Apply `GOVSUBMIT_*` overrides read through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.is_empty());

        if let Some(url) = var("API_URL") {
            self.api_url = Some(url);
        }
        if let Some(space) = var("SNAPSHOT_SPACE") {
            self.snapshot_space = Some(space);
        }
        if let Some(value) = var("SUBMISSION_THRESHOLD_GOVERNANCE") {
            self.thresholds.governance = parse_threshold("SUBMISSION_THRESHOLD_GOVERNANCE", &value)?;
        }
        if let Some(value) = var("SUBMISSION_THRESHOLD_POLL") {
            self.thresholds.poll = parse_threshold("SUBMISSION_THRESHOLD_POLL", &value)?;
        }
        Ok(self)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_ADDRESS)
    }

    pub fn snapshot_space(&self) -> &str {
        self.snapshot_space.as_deref().unwrap_or_default()
    }
}

fn parse_threshold(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .with_context(|| format!("{ENV_PREFIX}{name} must be a number, got {value:?}"))
}
