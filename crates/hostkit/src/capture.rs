//! Host capture - enumerate processes and services into snapshot entities

use crate::backend::ServiceBackend;
use anyhow::{Context, Result};
use deltakit::{CaptureProvider, Entity};
use std::collections::BTreeMap;
use sysinfo::{ProcessesToUpdate, System};

/// Capture provider backed by sysinfo and a service manager backend
pub struct HostCapture {
    system: System,
    backend: Box<dyn ServiceBackend>,
}

impl HostCapture {
    pub fn new(backend: Box<dyn ServiceBackend>) -> Self {
        Self {
            system: System::new(),
            backend,
        }
    }
}

impl CaptureProvider for HostCapture {
    /// One entity per executable name, ordered by name for reproducible
    /// snapshots. Where several pids share a name, the lowest pid's command
    /// line is recorded - deltas match on name, not pid.
    fn processes(&mut self) -> Result<Vec<Entity>> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let mut by_name: BTreeMap<String, (u32, Vec<String>)> = BTreeMap::new();
        for (pid, process) in self.system.processes() {
            let name = process.name().to_string_lossy().to_string();
            if name.is_empty() {
                continue;
            }
            let cmdline: Vec<String> = process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().to_string())
                .collect();

            let pid = pid.as_u32();
            match by_name.get(&name) {
                Some((existing, _)) if *existing <= pid => {}
                _ => {
                    by_name.insert(name, (pid, cmdline));
                }
            }
        }

        Ok(by_name
            .into_iter()
            .map(|(name, (pid, cmdline))| {
                let command_line = if cmdline.is_empty() { None } else { Some(cmdline) };
                Entity::process(&name, Some(pid), command_line)
            })
            .collect())
    }

    /// All service units with dependency edges resolved where the manager
    /// supports it. A host without a service manager yields an empty set,
    /// not an error.
    fn services(&mut self) -> Result<Vec<Entity>> {
        if !self.backend.is_available() {
            log::warn!("no service manager available; capturing processes only");
            return Ok(Vec::new());
        }

        let units = self
            .backend
            .list_units()
            .context("could not enumerate services")?;

        let mut entities = Vec::with_capacity(units.len());
        for unit in units {
            let depends_on = self.backend.dependencies(&unit.name).unwrap_or_else(|e| {
                log::debug!("no dependency info for '{}': {e}", unit.name);
                Default::default()
            });
            entities.push(Entity::service(&unit.name, unit.state, depends_on));
        }
        Ok(entities)
    }
}
