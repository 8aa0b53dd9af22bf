//! Primitive start/stop execution for processes and services

use crate::backend::ServiceBackend;
use crate::error::Error;
use anyhow::Result;
use deltakit::{EntityKind, PrimitiveRunner};
use std::process::{Command, Stdio};
use sysinfo::{ProcessesToUpdate, System};

/// Platform runner: services go through the service backend, processes are
/// spawned and terminated directly.
pub struct HostRunner {
    system: System,
    backend: Box<dyn ServiceBackend>,
}

impl HostRunner {
    pub fn new(backend: Box<dyn ServiceBackend>) -> Self {
        Self {
            system: System::new(),
            backend,
        }
    }

    fn spawn_process(&self, name: &str, command_line: Option<&[String]>) -> Result<()> {
        let (program, args) = match command_line {
            Some([program, args @ ..]) if !program.is_empty() => (program.as_str(), args),
            // Executable identity only - the fallback form, and the only
            // form when no command line was captured.
            _ => (name, &[] as &[String]),
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::CommandFailed {
                message: format!("could not spawn '{program}': {e}"),
                stderr: String::new(),
            })?;

        log::debug!("spawned '{program}' with pid {}", child.id());
        Ok(())
    }

    fn terminate_processes(&mut self, name: &str) -> Result<()> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let matches: Vec<_> = self
            .system
            .processes()
            .values()
            .filter(|p| p.name().to_string_lossy() == name)
            .collect();

        if matches.is_empty() {
            // Already gone: the desired state, not a failure.
            log::info!("process '{name}' is not running");
            return Ok(());
        }

        for process in matches {
            if !process.kill() {
                return Err(Error::CommandFailed {
                    message: format!(
                        "could not terminate '{name}' (pid {})",
                        process.pid().as_u32()
                    ),
                    stderr: String::new(),
                }
                .into());
            }
            log::debug!("terminated '{name}' (pid {})", process.pid().as_u32());
        }
        Ok(())
    }
}

impl PrimitiveRunner for HostRunner {
    fn start(
        &mut self,
        kind: EntityKind,
        name: &str,
        command_line: Option<&[String]>,
    ) -> Result<()> {
        match kind {
            EntityKind::Process => self.spawn_process(name, command_line),
            EntityKind::Service => Ok(self.backend.start(name)?),
        }
    }

    fn stop(&mut self, kind: EntityKind, name: &str) -> Result<()> {
        match kind {
            EntityKind::Process => self.terminate_processes(name),
            EntityKind::Service => Ok(self.backend.stop(name)?),
        }
    }

    fn is_running(&mut self, kind: EntityKind, name: &str) -> Result<bool> {
        match kind {
            EntityKind::Process => {
                self.system.refresh_processes(ProcessesToUpdate::All, true);
                Ok(self
                    .system
                    .processes()
                    .values()
                    .any(|p| p.name().to_string_lossy() == name))
            }
            EntityKind::Service => Ok(self.backend.is_active(name)?),
        }
    }
}
