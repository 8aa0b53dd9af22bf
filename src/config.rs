//! User configuration file
//!
//! `~/.config/psdelta/config.toml`. Everything here has a working default;
//! a missing file is not an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("psdelta"))
}

/// Critical entities no delta action should ever touch. Merged into every
/// exclude set; operators can extend the list in the config file.
fn default_excludes() -> Vec<String> {
    [
        "systemd",
        "systemd-*",
        "init",
        "kthreadd",
        "dbus-daemon",
        "dbus.service",
        "init.scope",
        "System",
        "System Idle Process",
        "csrss.exe",
        "wininit.exe",
        "winlogon.exe",
        "services.exe",
        "lsass.exe",
        "svchost.exe",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Glob patterns excluded from every action, on top of `--exclude`
    #[serde(default = "default_excludes")]
    pub default_excludes: Vec<String>,

    /// Delay between actions when `-d` is not given, in milliseconds
    #[serde(default)]
    pub default_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_excludes: default_excludes(),
            default_delay_ms: 0,
        }
    }
}

impl Config {
    /// Load config.toml, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Exclude patterns for one invocation: CLI excludes plus the defaults
    pub fn merged_excludes(&self, cli_excludes: &[String]) -> Vec<String> {
        let mut merged = cli_excludes.to_vec();
        for pattern in &self.default_excludes {
            if !merged.contains(pattern) {
                merged.push(pattern.clone());
            }
        }
        merged
    }
}
