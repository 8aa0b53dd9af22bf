//! systemd backend using `systemctl` commands

use crate::backend::{ServiceBackend, ServiceUnit};
use crate::error::{Error, Result};
use deltakit::ServiceState;
use std::collections::BTreeSet;
use std::process::Command;

/// Backend that executes real `systemctl` commands
pub struct SystemctlBackend {
    systemctl_path: String,
}

impl SystemctlBackend {
    pub fn new() -> Self {
        Self {
            systemctl_path: "systemctl".to_string(),
        }
    }

    /// Run a systemctl command and return its output
    fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = Command::new(&self.systemctl_path)
            .args(args)
            .output()
            .map_err(|e| Error::CommandFailed {
                message: format!("failed to execute systemctl: {e}"),
                stderr: String::new(),
            })?;
        Ok(output)
    }

    /// Run a systemctl command and check for success
    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::CommandFailed {
                message: format!("systemctl {} failed", args.join(" ")),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for SystemctlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceBackend for SystemctlBackend {
    fn is_available(&self) -> bool {
        self.run(&["--version"])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn list_units(&self) -> Result<Vec<ServiceUnit>> {
        let stdout = self.run_checked(&[
            "list-units",
            "--type=service",
            "--all",
            "--no-legend",
            "--plain",
            "--no-pager",
        ])?;
        Ok(parse_list_units(&stdout))
    }

    fn dependencies(&self, name: &str) -> Result<BTreeSet<String>> {
        let stdout = self.run_checked(&[
            "show",
            name,
            "--property=Requires,Wants,After",
            "--no-pager",
        ])?;
        Ok(parse_dependencies(&stdout))
    }

    fn start(&self, name: &str) -> Result<()> {
        self.run_checked(&["start", name]).map(|_| ())
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.run_checked(&["stop", name]).map(|_| ())
    }

    fn is_active(&self, name: &str) -> Result<bool> {
        // `is-active` exits non-zero for inactive units; that is an answer,
        // not a failure.
        let output = self.run(&["is-active", "--quiet", name])?;
        Ok(output.status.success())
    }
}

/// Parse `systemctl list-units --plain --no-legend` output.
///
/// Columns: UNIT LOAD ACTIVE SUB DESCRIPTION. The unit name keeps its
/// `.service` suffix so names round-trip through start/stop unchanged.
fn parse_list_units(stdout: &str) -> Vec<ServiceUnit> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let name = cols.next()?;
            let _load = cols.next()?;
            let active = cols.next()?;
            Some(ServiceUnit {
                name: name.to_string(),
                state: match active {
                    "active" | "activating" | "reloading" => ServiceState::Running,
                    "inactive" | "deactivating" | "failed" => ServiceState::Stopped,
                    _ => ServiceState::Unknown,
                },
            })
        })
        .collect()
}

/// Parse `systemctl show --property=Requires,Wants,After` output, keeping
/// only `.service` units. `After` captures ordering-only dependencies that
/// `Requires`/`Wants` miss.
fn parse_dependencies(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('='))
        .flat_map(|(_, value)| value.split_whitespace())
        .filter(|unit| unit.ends_with(".service"))
        .map(ToString::to_string)
        .collect()
}
