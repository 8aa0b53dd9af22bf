//! Command implementations

pub mod compare;
pub mod delta;
pub mod load;
pub mod save;

use anyhow::{Context, Result};
use deltakit::{CaptureProvider, Snapshot};
use hostkit::HostCapture;
use std::path::Path;

/// Capture a full snapshot of the host: processes first, then services
pub fn capture_snapshot(label: &str) -> Result<Snapshot> {
    let mut capture = HostCapture::new(hostkit::default_backend());

    let mut entities = capture
        .processes()
        .context("Could not enumerate processes")?;
    entities.extend(
        capture
            .services()
            .context("Could not enumerate services")?,
    );

    log::info!("captured {} entities as '{label}'", entities.len());
    Ok(Snapshot::new(label, entities))
}

/// Label a snapshot after the file it is stored in
pub fn label_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "snapshot".to_string())
}
