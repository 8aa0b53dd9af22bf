//! Snapshot model - what processes and services existed at one instant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of observed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Process,
    Service,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Service => "service",
        }
    }
}

/// Observed state of a service at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Running,
    Stopped,
    Unknown,
}

/// A single process or service observed in a snapshot.
///
/// Entities are immutable once captured. `name` is the executable name for
/// processes and the service identifier for services; pids are recorded for
/// display only and never used for matching across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServiceState>,
    /// Service dependency names; may reference services absent from the
    /// snapshot. Always empty for processes.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub depends_on: BTreeSet<String>,
}

impl Entity {
    /// Create a process entity
    pub fn process(name: &str, pid: Option<u32>, command_line: Option<Vec<String>>) -> Self {
        Self {
            kind: EntityKind::Process,
            name: name.to_string(),
            pid,
            command_line,
            state: None,
            depends_on: BTreeSet::new(),
        }
    }

    /// Create a service entity
    pub fn service(name: &str, state: ServiceState, depends_on: BTreeSet<String>) -> Self {
        Self {
            kind: EntityKind::Service,
            name: name.to_string(),
            pid: None,
            command_line: None,
            state: Some(state),
            depends_on,
        }
    }

    /// Whether this entity counts as present: always for processes, only in
    /// the `Running` state for services. This is the presence notion the
    /// diff uses, so a service's state transitions show up as
    /// appearance/disappearance.
    pub fn is_running(&self) -> bool {
        match self.kind {
            EntityKind::Process => true,
            EntityKind::Service => self.state == Some(ServiceState::Running),
        }
    }
}

/// A named, timestamped set of entities. Read-only once captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub label: String,
    pub captured_at: DateTime<Utc>,
    pub entities: Vec<Entity>,
}

impl Snapshot {
    /// Build a snapshot, deduplicating on `(kind, name)`.
    ///
    /// The first occurrence wins; duplicate pids of the same executable
    /// collapse into one entity, matching how deltas key entities.
    pub fn new(label: &str, entities: Vec<Entity>) -> Self {
        let mut seen: BTreeSet<(EntityKind, String)> = BTreeSet::new();
        let entities = entities
            .into_iter()
            .filter(|e| seen.insert((e.kind, e.name.clone())))
            .collect();

        Self {
            label: label.to_string(),
            captured_at: Utc::now(),
            entities,
        }
    }

    /// Entities of a single kind, in capture order
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// Look up an entity by kind and name
    pub fn get(&self, kind: EntityKind, name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.kind == kind && e.name == name)
    }
}
