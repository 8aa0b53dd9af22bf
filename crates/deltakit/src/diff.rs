//! Delta engine - structural diff between two snapshots

use crate::error::{Error, Result};
use crate::snapshot::{Entity, EntityKind, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of change detected between baseline and comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only in the comparison snapshot
    Appeared,
    /// Present only in the baseline snapshot
    Disappeared,
    /// Present in both with a different command line
    CommandLineChanged,
}

/// One detected change between a baseline and comparison snapshot.
///
/// Exactly one of `baseline`/`comparison` is absent for appeared/disappeared
/// items; both are present for command-line changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaItem {
    pub kind: EntityKind,
    pub name: String,
    pub change: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Entity>,
}

impl DeltaItem {
    /// The entity to act on, preferring the comparison-side capture
    pub fn entity(&self) -> Option<&Entity> {
        self.comparison.as_ref().or(self.baseline.as_ref())
    }

    /// Check the one-side-absent invariant
    pub fn validate(&self) -> Result<()> {
        let ok = match self.change {
            ChangeKind::Appeared => self.baseline.is_none() && self.comparison.is_some(),
            ChangeKind::Disappeared => self.baseline.is_some() && self.comparison.is_none(),
            ChangeKind::CommandLineChanged => {
                self.baseline.is_some() && self.comparison.is_some()
            }
        };
        if ok {
            Ok(())
        } else {
            Err(Error::MalformedItem {
                kind: self.kind.label(),
                name: self.name.clone(),
                reason: "entity sides do not match the change kind",
            })
        }
    }
}

/// An ordered sequence of changes plus the two source snapshot labels.
///
/// Immutable once computed; serializable so capture time and action time can
/// be decoupled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub baseline_ref: String,
    pub comparison_ref: String,
    pub items: Vec<DeltaItem>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Validate every item's invariant, typically after loading from a file
    pub fn validate(&self) -> Result<()> {
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

/// Compare two snapshots and produce a structured list of typed changes.
///
/// Pure function of its inputs. Entities match on `(kind, name)` - pids are
/// ephemeral and ignored. An entity counts as present when it is running:
/// capture records every service unit the manager knows, so a unit that
/// transitioned Running to Stopped between the snapshots diffs as
/// disappeared, and Stopped to Running as appeared (with the baseline side
/// omitted, as for any appearance). Output is grouped by kind (processes
/// first), and within a kind lists disappeared items in baseline order
/// followed by appeared and changed items in comparison order, so repeated
/// runs on identical snapshots produce identical deltas.
pub fn diff(baseline: &Snapshot, comparison: &Snapshot) -> Delta {
    let mut items = Vec::new();

    for kind in [EntityKind::Process, EntityKind::Service] {
        let base: HashMap<&str, &Entity> = present(baseline, kind)
            .map(|e| (e.name.as_str(), e))
            .collect();
        let comp: HashMap<&str, &Entity> = present(comparison, kind)
            .map(|e| (e.name.as_str(), e))
            .collect();

        for entity in present(baseline, kind) {
            if !comp.contains_key(entity.name.as_str()) {
                items.push(DeltaItem {
                    kind,
                    name: entity.name.clone(),
                    change: ChangeKind::Disappeared,
                    baseline: Some(entity.clone()),
                    comparison: None,
                });
            }
        }

        for entity in present(comparison, kind) {
            match base.get(entity.name.as_str()) {
                None => items.push(DeltaItem {
                    kind,
                    name: entity.name.clone(),
                    change: ChangeKind::Appeared,
                    baseline: None,
                    comparison: Some(entity.clone()),
                }),
                Some(before) if before.command_line != entity.command_line => {
                    items.push(DeltaItem {
                        kind,
                        name: entity.name.clone(),
                        change: ChangeKind::CommandLineChanged,
                        baseline: Some((*before).clone()),
                        comparison: Some(entity.clone()),
                    });
                }
                Some(_) => {}
            }
        }
    }

    Delta {
        baseline_ref: baseline.label.clone(),
        comparison_ref: comparison.label.clone(),
        items,
    }
}

/// Entities of one kind that were actually running at capture time
fn present(snapshot: &Snapshot, kind: EntityKind) -> impl Iterator<Item = &Entity> {
    snapshot.of_kind(kind).filter(|e| e.is_running())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ServiceState;
    use std::collections::BTreeSet;

    fn proc(name: &str, cmdline: &[&str]) -> Entity {
        let cmdline: Vec<String> = cmdline.iter().map(ToString::to_string).collect();
        Entity::process(name, None, if cmdline.is_empty() { None } else { Some(cmdline) })
    }

    fn snap(label: &str, entities: Vec<Entity>) -> Snapshot {
        Snapshot::new(label, entities)
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty() {
        let a = snap("a", vec![proc("a.exe", &["a.exe", "-x"])]);
        let b = snap("b", a.entities.clone());
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn appeared_and_disappeared_detected_per_kind() {
        let base = snap(
            "base",
            vec![
                proc("a.exe", &[]),
                Entity::service("svc1", ServiceState::Running, BTreeSet::new()),
            ],
        );
        let comp = snap(
            "comp",
            vec![
                proc("b.exe", &[]),
                Entity::service("svc1", ServiceState::Running, BTreeSet::new()),
            ],
        );

        let delta = diff(&base, &comp);
        assert_eq!(delta.items.len(), 2);
        assert_eq!(delta.items[0].change, ChangeKind::Disappeared);
        assert_eq!(delta.items[0].name, "a.exe");
        assert_eq!(delta.items[1].change, ChangeKind::Appeared);
        assert_eq!(delta.items[1].name, "b.exe");
    }

    #[test]
    fn command_line_change_detected_with_both_sides() {
        let base = snap("base", vec![proc("a.exe", &["a.exe", "--old"])]);
        let comp = snap("comp", vec![proc("a.exe", &["a.exe", "--new"])]);

        let delta = diff(&base, &comp);
        assert_eq!(delta.items.len(), 1);
        let item = &delta.items[0];
        assert_eq!(item.change, ChangeKind::CommandLineChanged);
        assert!(item.baseline.is_some() && item.comparison.is_some());
        item.validate().unwrap();
    }

    #[test]
    fn pids_do_not_affect_matching() {
        let base = snap("base", vec![Entity::process("a.exe", Some(1), None)]);
        let comp = snap("comp", vec![Entity::process("a.exe", Some(999), None)]);
        assert!(diff(&base, &comp).is_empty());
    }

    #[test]
    fn service_stopping_diffs_as_disappeared() {
        let base = snap(
            "base",
            vec![Entity::service("sshd.service", ServiceState::Running, BTreeSet::new())],
        );
        let comp = snap(
            "comp",
            vec![Entity::service("sshd.service", ServiceState::Stopped, BTreeSet::new())],
        );

        let delta = diff(&base, &comp);
        assert_eq!(delta.items.len(), 1);
        let item = &delta.items[0];
        assert_eq!(item.change, ChangeKind::Disappeared);
        assert_eq!(item.name, "sshd.service");
        item.validate().unwrap();
    }

    #[test]
    fn service_starting_diffs_as_appeared() {
        let base = snap(
            "base",
            vec![Entity::service("cups.service", ServiceState::Stopped, BTreeSet::new())],
        );
        let comp = snap(
            "comp",
            vec![Entity::service("cups.service", ServiceState::Running, BTreeSet::new())],
        );

        let delta = diff(&base, &comp);
        assert_eq!(delta.items.len(), 1);
        let item = &delta.items[0];
        assert_eq!(item.change, ChangeKind::Appeared);
        // The non-running baseline capture is dropped, as for any appearance.
        assert!(item.baseline.is_none());
        item.validate().unwrap();
    }

    #[test]
    fn services_stopped_on_both_sides_are_invisible() {
        let base = snap(
            "base",
            vec![Entity::service("cups.service", ServiceState::Stopped, BTreeSet::new())],
        );
        let comp = snap("comp", base.entities.clone());
        assert!(diff(&base, &comp).is_empty());
    }

    #[test]
    fn diff_is_symmetric_under_swap() {
        let base = snap(
            "base",
            vec![proc("gone.exe", &[]), proc("both.exe", &["both.exe", "-a"])],
        );
        let comp = snap(
            "comp",
            vec![proc("new.exe", &[]), proc("both.exe", &["both.exe", "-b"])],
        );

        let fwd = diff(&base, &comp);
        let rev = diff(&comp, &base);

        let changed = |d: &Delta, c: ChangeKind| -> Vec<String> {
            let mut names: Vec<String> = d
                .items
                .iter()
                .filter(|i| i.change == c)
                .map(|i| i.name.clone())
                .collect();
            names.sort();
            names
        };

        assert_eq!(changed(&fwd, ChangeKind::Appeared), changed(&rev, ChangeKind::Disappeared));
        assert_eq!(changed(&fwd, ChangeKind::Disappeared), changed(&rev, ChangeKind::Appeared));
        assert_eq!(
            changed(&fwd, ChangeKind::CommandLineChanged),
            changed(&rev, ChangeKind::CommandLineChanged)
        );
    }

    #[test]
    fn processes_grouped_before_services() {
        let base = snap(
            "base",
            vec![Entity::service("svc", ServiceState::Running, BTreeSet::new())],
        );
        let comp = snap("comp", vec![proc("p.exe", &[])]);

        let delta = diff(&base, &comp);
        assert_eq!(delta.items[0].kind, EntityKind::Process);
        assert_eq!(delta.items[1].kind, EntityKind::Service);
    }
}
