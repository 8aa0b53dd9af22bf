//! Action planner - map a delta and a verb onto an ordered action list
//!
//! Revert is a pure transform on which delta items are eligible, not a flag
//! threaded through execution: `--revert` swaps the appeared/disappeared
//! interpretation so one delta file expresses both "apply" and "undo".

use crate::depgraph::{self, CycleWarning};
use crate::diff::{ChangeKind, Delta, DeltaItem};
use crate::filter::NameFilter;
use crate::snapshot::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

/// Operator-facing verb selecting which delta items to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Stop what showed up between the snapshots
    Close,
    /// Start what went missing between the snapshots
    Run,
    /// Stop-then-start entities whose command line changed
    Restart,
}

impl Verb {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Run => "run",
            Self::Restart => "restart",
        }
    }
}

/// Concrete primitive verb carried by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionVerb {
    Stop,
    Start,
}

/// One concrete step of an action plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: EntityKind,
    pub name: String,
    pub verb: ActionVerb,
    /// Captured command line for start actions; `None` starts by executable
    /// identity alone
    pub command_line: Option<Vec<String>>,
}

/// Ordered, filtered list of actions derived from one delta + verb
#[derive(Debug, Clone, Default)]
pub struct ActionPlan {
    pub actions: Vec<Action>,
    pub cycle_warnings: Vec<CycleWarning>,
}

impl ActionPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Planning knobs that shape the emitted actions
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Swap appeared/disappeared eligibility (restart is symmetric and
    /// unaffected)
    pub revert: bool,
    /// Discard captured command lines; start actions use the executable
    /// identity only
    pub skip_cmdline: bool,
}

/// Build an ordered action plan from a delta.
///
/// Service actions pass through the dependency resolver - stop order for
/// `close`, start order for `run`, per-item stop/start pairs in stop order
/// for `restart`. Process actions follow the service batch in delta order
/// (processes carry no dependency edges, so any relative order is safe).
/// An empty eligible set yields an empty plan, not an error.
pub fn plan(delta: &Delta, verb: Verb, opts: &PlanOptions, filter: &NameFilter) -> ActionPlan {
    let wanted = eligible_change(verb, opts.revert);
    let items: Vec<&DeltaItem> = delta
        .items
        .iter()
        .filter(|item| item.change == wanted && filter.matches(&item.name))
        .collect();

    let services: Vec<&DeltaItem> = items
        .iter()
        .copied()
        .filter(|i| i.kind == EntityKind::Service)
        .collect();
    let processes: Vec<&DeltaItem> = items
        .iter()
        .copied()
        .filter(|i| i.kind == EntityKind::Process)
        .collect();

    let service_entities: Vec<&Entity> =
        services.iter().filter_map(|i| i.entity()).collect();
    let resolution = depgraph::resolve(&service_entities);

    let mut actions = Vec::new();
    let by_order = |order: &[String]| -> Vec<&DeltaItem> {
        order
            .iter()
            .filter_map(|name| services.iter().find(|i| i.name == *name).copied())
            .collect()
    };

    match verb {
        Verb::Close => {
            for item in by_order(&resolution.stop_order()) {
                actions.push(stop_action(item));
            }
            for item in &processes {
                actions.push(stop_action(item));
            }
        }
        Verb::Run => {
            for item in by_order(&resolution.start_order) {
                actions.push(start_action(item, opts));
            }
            for item in &processes {
                actions.push(start_action(item, opts));
            }
        }
        Verb::Restart => {
            for item in by_order(&resolution.stop_order()) {
                actions.push(stop_action(item));
                actions.push(start_action(item, opts));
            }
            for item in &processes {
                actions.push(stop_action(item));
                actions.push(start_action(item, opts));
            }
        }
    }

    ActionPlan {
        actions,
        cycle_warnings: resolution.warnings,
    }
}

fn eligible_change(verb: Verb, revert: bool) -> ChangeKind {
    match (verb, revert) {
        (Verb::Close, false) | (Verb::Run, true) => ChangeKind::Appeared,
        (Verb::Close, true) | (Verb::Run, false) => ChangeKind::Disappeared,
        (Verb::Restart, _) => ChangeKind::CommandLineChanged,
    }
}

fn stop_action(item: &DeltaItem) -> Action {
    Action {
        kind: item.kind,
        name: item.name.clone(),
        verb: ActionVerb::Stop,
        command_line: None,
    }
}

fn start_action(item: &DeltaItem, opts: &PlanOptions) -> Action {
    let command_line = if opts.skip_cmdline {
        None
    } else {
        item.entity().and_then(|e| e.command_line.clone())
    };
    Action {
        kind: item.kind,
        name: item.name.clone(),
        verb: ActionVerb::Start,
        command_line,
    }
}
