//! Provider traits for the external collaborators
//!
//! The core never touches the platform directly. Capture, primitive
//! start/stop, and interactive confirmation are injected behind these
//! traits so the engine is testable without a terminal or a live host.

use crate::snapshot::{Entity, EntityKind};
use anyhow::Result;

/// Enumerates the host's processes and services.
///
/// A capture failure is fatal to the invocation - a partial snapshot is
/// never trusted.
pub trait CaptureProvider {
    /// All running processes, one entity per executable name
    fn processes(&mut self) -> Result<Vec<Entity>>;

    /// All known services, with `depends_on` resolved where the platform
    /// supports it (empty sets elsewhere)
    fn services(&mut self) -> Result<Vec<Entity>>;
}

/// Platform-specific start/stop primitives plus the point probe used by the
/// once-only skip policy.
pub trait PrimitiveRunner {
    /// Start the target, optionally with a captured command line. `None`
    /// starts by executable identity alone.
    fn start(&mut self, kind: EntityKind, name: &str, command_line: Option<&[String]>)
    -> Result<()>;

    /// Stop the target
    fn stop(&mut self, kind: EntityKind, name: &str) -> Result<()>;

    /// Whether an entity matching the target is currently running
    fn is_running(&mut self, kind: EntityKind, name: &str) -> Result<bool>;
}

/// Confirmation gate invoked before each action when confirmation mode is
/// enabled. Declining skips the action.
pub trait ConfirmCallback {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Always confirms - the default when confirmation mode is off
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Always declines
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
