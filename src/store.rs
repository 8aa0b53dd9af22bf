//! Snapshot and delta file persistence
//!
//! JSON documents with a `type` tag so a snapshot handed to `load` fails
//! loudly instead of being treated as an empty delta. Round-tripping
//! preserves every entity and delta item attribute exactly.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use deltakit::{Delta, DeltaItem, Entity, Snapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct SnapshotDoc {
    #[serde(rename = "type")]
    doc_type: String,
    timestamp: DateTime<Utc>,
    label: String,
    entities: Vec<Entity>,
}

#[derive(Serialize, Deserialize)]
struct DeltaDoc {
    #[serde(rename = "type")]
    doc_type: String,
    baseline_ref: String,
    comparison_ref: String,
    items: Vec<DeltaItem>,
}

/// Write a snapshot file
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let doc = SnapshotDoc {
        doc_type: "snapshot".to_string(),
        timestamp: snapshot.captured_at,
        label: snapshot.label.clone(),
        entities: snapshot.entities.clone(),
    };
    write_json(path, &doc).with_context(|| format!("Could not save snapshot to {}", path.display()))
}

/// Read a snapshot file
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let doc: SnapshotDoc = read_json(path)
        .with_context(|| format!("Could not load snapshot from {}", path.display()))?;
    if doc.doc_type != "snapshot" {
        bail!(
            "{} is a '{}' file, expected a snapshot",
            path.display(),
            doc.doc_type
        );
    }
    Ok(Snapshot {
        label: doc.label,
        captured_at: doc.timestamp,
        entities: doc.entities,
    })
}

/// Write a delta file
pub fn save_delta(path: &Path, delta: &Delta) -> Result<()> {
    let doc = DeltaDoc {
        doc_type: "delta".to_string(),
        baseline_ref: delta.baseline_ref.clone(),
        comparison_ref: delta.comparison_ref.clone(),
        items: delta.items.clone(),
    };
    write_json(path, &doc).with_context(|| format!("Could not save delta to {}", path.display()))
}

/// Read and validate a delta file
pub fn load_delta(path: &Path) -> Result<Delta> {
    let doc: DeltaDoc =
        read_json(path).with_context(|| format!("Could not load delta from {}", path.display()))?;
    if doc.doc_type != "delta" {
        bail!(
            "{} is a '{}' file, expected a delta",
            path.display(),
            doc.doc_type
        );
    }
    let delta = Delta {
        baseline_ref: doc.baseline_ref,
        comparison_ref: doc.comparison_ref,
        items: doc.items,
    };
    delta
        .validate()
        .with_context(|| format!("Malformed delta in {}", path.display()))?;
    Ok(delta)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
