//! # Deltakit
//!
//! Core engine for snapshot-based process and service management: capture a
//! snapshot of what is running, diff two snapshots into a typed delta, turn
//! the delta into a dependency-safe action plan, and execute it.
//!
//! ## Core Concepts
//!
//! - **Entity**: one observed process or service, keyed by `(kind, name)`
//! - **Snapshot**: a named, timestamped set of entities
//! - **Delta**: the typed differences between two snapshots
//!   (appeared / disappeared / command-line changed)
//! - **ActionPlan**: an ordered, filtered list of stop/start actions derived
//!   from a delta and a verb, with service actions in dependency-safe order
//! - **RunReport**: one outcome record per executed action
//!
//! ## Pipeline
//!
//! ```ignore
//! use deltakit::{diff, plan, execute, NameFilter, PlanOptions, Verb, ExecuteOptions};
//! use deltakit::context::AutoConfirm;
//!
//! let delta = diff(&baseline, &comparison);
//! let filter = NameFilter::new(&includes, &excludes)?;
//! let plan = plan(&delta, Verb::Close, &PlanOptions::default(), &filter);
//! let report = execute(&plan, &mut runner, &mut AutoConfirm, &ExecuteOptions::default());
//! std::process::exit(if report.is_success() { 0 } else { 1 });
//! ```
//!
//! ## Provider Traits
//!
//! Platform access is injected through traits in [`context`]:
//! [`CaptureProvider`] enumerates the host, [`PrimitiveRunner`] starts and
//! stops entities, [`ConfirmCallback`] gates actions interactively. The
//! engine itself is pure and single-threaded by design - action ordering
//! correctness depends on strict sequencing.

pub mod context;
pub mod depgraph;
pub mod diff;
pub mod error;
pub mod executor;
pub mod filter;
pub mod planner;
pub mod snapshot;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, CaptureProvider, ConfirmCallback, PrimitiveRunner};
pub use depgraph::{CycleWarning, Resolution, resolve};
pub use diff::{ChangeKind, Delta, DeltaItem, diff};
pub use error::{Error, Result};
pub use executor::{ActionOutcome, ActionRecord, ExecuteOptions, RunReport, execute};
pub use filter::NameFilter;
pub use planner::{Action, ActionPlan, ActionVerb, PlanOptions, Verb, plan};
pub use snapshot::{Entity, EntityKind, ServiceState, Snapshot};
