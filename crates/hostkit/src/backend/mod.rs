//! Service manager abstraction
//!
//! The [`ServiceBackend`] trait defines the interface to the host's service
//! manager, allowing a real systemctl implementation and mocks for testing.
//! Hosts without a supported manager get [`NullBackend`], which reports no
//! services rather than failing capture outright.

pub mod systemctl;

use crate::error::Result;
use deltakit::ServiceState;
use std::collections::BTreeSet;

/// One unit as reported by the service manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    pub name: String,
    pub state: ServiceState,
}

/// Backend trait for service manager operations
pub trait ServiceBackend: Send + Sync {
    /// Check if the service manager can be talked to
    fn is_available(&self) -> bool;

    /// Enumerate all known service units
    fn list_units(&self) -> Result<Vec<ServiceUnit>>;

    /// Dependency names for one unit; empty where the platform cannot say
    fn dependencies(&self, name: &str) -> Result<BTreeSet<String>>;

    /// Start a unit
    fn start(&self, name: &str) -> Result<()>;

    /// Stop a unit
    fn stop(&self, name: &str) -> Result<()>;

    /// Whether a unit is currently active
    fn is_active(&self, name: &str) -> Result<bool>;
}

/// Backend for hosts without a supported service manager: captures nothing
/// and refuses control operations.
pub struct NullBackend;

impl ServiceBackend for NullBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn list_units(&self) -> Result<Vec<ServiceUnit>> {
        Ok(Vec::new())
    }

    fn dependencies(&self, _name: &str) -> Result<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }

    fn start(&self, name: &str) -> Result<()> {
        Err(crate::error::Error::ServiceManagerUnavailable(format!(
            "cannot start '{name}'"
        )))
    }

    fn stop(&self, name: &str) -> Result<()> {
        Err(crate::error::Error::ServiceManagerUnavailable(format!(
            "cannot stop '{name}'"
        )))
    }

    fn is_active(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }
}
