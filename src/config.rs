//! Workflow configuration, persisted in `cottonflow.toml` in the data directory.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::{Role, UserId};

/// TDS withheld from every invoice: 0.10 %
pub fn default_tds_rate() -> Decimal {
    Decimal::new(1, 3)
}

fn default_payment_mode() -> String {
    "RTGS".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    #[serde(default = "default_tds_rate")]
    pub tds_rate: Decimal,

    #[serde(default = "default_payment_mode")]
    pub default_payment_mode: String,

    /// Reject CTS submissions whose trash samples leave part of the sampling
    /// range uncovered. When false, gaps are only logged.
    #[serde(default)]
    pub require_full_trash_coverage: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            tds_rate: default_tds_rate(),
            default_payment_mode: default_payment_mode(),
            require_full_trash_coverage: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A user allowed to act on the workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
}

fn default_users() -> Vec<UserEntry> {
    vec![
        UserEntry {
            id: UserId::new(1),
            username: "manager".to_string(),
            full_name: Some("Manager".to_string()),
            role: Role::Manager,
        },
        UserEntry {
            id: UserId::new(2),
            username: "chairman".to_string(),
            full_name: Some("Chairman".to_string()),
            role: Role::Chairman,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workflow: WorkflowSettings,

    #[serde(default)]
    pub log: LogSettings,

    #[serde(default = "default_users")]
    pub users: Vec<UserEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workflow: WorkflowSettings::default(),
            log: LogSettings::default(),
            users: default_users(),
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }
}
