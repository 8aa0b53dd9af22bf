//! # hostkit
//!
//! Platform backends for psdelta: process enumeration via sysinfo and
//! service control via the host's service manager.
//!
//! This crate implements the provider traits deltakit defines:
//! [`HostCapture`] is the capture provider, [`HostRunner`] the primitive
//! start/stop runner. Service manager access sits behind the
//! [`backend::ServiceBackend`] trait with a systemctl implementation and a
//! null fallback for unsupported hosts.
//!
//! ## Example
//!
//! ```no_run
//! use hostkit::{default_backend, HostCapture};
//! use deltakit::CaptureProvider;
//!
//! let mut capture = HostCapture::new(default_backend());
//! let processes = capture.processes().expect("capture failed");
//! println!("{} processes running", processes.len());
//! ```

pub mod backend;
pub mod capture;
pub mod error;
pub mod runner;

pub use capture::HostCapture;
pub use error::{Error, Result};
pub use runner::HostRunner;

use backend::systemctl::SystemctlBackend;
use backend::{NullBackend, ServiceBackend};

/// Pick the service backend for this host: systemctl when it answers,
/// otherwise the null backend (processes still capture fine).
pub fn default_backend() -> Box<dyn ServiceBackend> {
    let systemctl = SystemctlBackend::new();
    if systemctl.is_available() {
        Box::new(systemctl)
    } else {
        Box::new(NullBackend)
    }
}
