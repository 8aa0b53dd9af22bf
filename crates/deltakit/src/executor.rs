//! Action executor - run a plan sequentially with per-item isolation
//!
//! Actions run one at a time, in plan order, with an optional delay between
//! them; service start order correctness depends on strict sequencing, so
//! there is no parallel dispatch. One action failing never aborts the rest
//! of the plan.

use crate::context::{ConfirmCallback, PrimitiveRunner};
use crate::planner::{Action, ActionPlan, ActionVerb};
use crate::snapshot::EntityKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal state of one executed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Succeeded,
    Failed { error: String },
    Skipped { reason: String },
}

impl ActionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome record for one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub kind: EntityKind,
    pub name: String,
    pub verb: ActionVerb,
    pub outcome: ActionOutcome,
    pub fallback_used: bool,
}

/// One outcome record per action, appended to during execution and never
/// mutated afterwards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub entries: Vec<ActionRecord>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Skipped { .. }))
    }

    /// True when no action ended `Failed`; drives the process exit status
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&ActionOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Execution knobs
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Gate every action on the confirmation callback
    pub confirm: bool,
    /// Sleep between actions to pace service managers that need settling
    /// time
    pub delay: Duration,
    /// Record every action as skipped without invoking any primitive
    pub dry_run: bool,
    /// Retry a failed start once with the executable identity only
    pub fallback_exe: bool,
    /// Skip start actions whose target is already running
    pub once_only: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            confirm: false,
            delay: Duration::ZERO,
            dry_run: false,
            fallback_exe: false,
            once_only: false,
        }
    }
}

/// Execute every action in the plan and aggregate the outcomes.
///
/// Each action walks Pending -> Running -> {Succeeded, Failed, Skipped};
/// capture and configuration problems were rejected before planning, so the
/// only failures seen here are per-action primitive failures, which are
/// isolated to their own record.
pub fn execute(
    plan: &ActionPlan,
    runner: &mut dyn PrimitiveRunner,
    confirm: &mut dyn ConfirmCallback,
    opts: &ExecuteOptions,
) -> RunReport {
    let mut report = RunReport::default();

    for (i, action) in plan.actions.iter().enumerate() {
        let (outcome, fallback_used) = run_one(action, runner, confirm, opts);

        match &outcome {
            ActionOutcome::Succeeded => log::info!(
                "{} {} '{}'{}",
                past_tense(action.verb),
                action.kind.label(),
                action.name,
                if fallback_used { " (via fallback)" } else { "" }
            ),
            ActionOutcome::Failed { error } => log::error!(
                "could not {} {} '{}': {}",
                verb_label(action.verb),
                action.kind.label(),
                action.name,
                error
            ),
            ActionOutcome::Skipped { reason } => log::info!(
                "skipped {} of {} '{}': {}",
                verb_label(action.verb),
                action.kind.label(),
                action.name,
                reason
            ),
        }

        report.entries.push(ActionRecord {
            kind: action.kind,
            name: action.name.clone(),
            verb: action.verb,
            outcome,
            fallback_used,
        });

        if i + 1 < plan.actions.len() && !opts.delay.is_zero() {
            log::debug!("waiting {:?} before the next action", opts.delay);
            std::thread::sleep(opts.delay);
        }
    }

    report
}

fn run_one(
    action: &Action,
    runner: &mut dyn PrimitiveRunner,
    confirm: &mut dyn ConfirmCallback,
    opts: &ExecuteOptions,
) -> (ActionOutcome, bool) {
    if opts.dry_run {
        return (skip("dry run"), false);
    }

    if opts.confirm {
        let prompt = format!(
            "{} {} '{}'?",
            capitalized(verb_label(action.verb)),
            action.kind.label(),
            action.name
        );
        match confirm.confirm(&prompt) {
            Ok(true) => {}
            Ok(false) => return (skip("declined"), false),
            Err(e) => {
                log::warn!("confirmation unavailable, treating as declined: {e}");
                return (skip("confirmation unavailable"), false);
            }
        }
    }

    if opts.once_only && action.verb == ActionVerb::Start {
        match runner.is_running(action.kind, &action.name) {
            Ok(true) => return (skip("already running"), false),
            Ok(false) => {}
            Err(e) => log::debug!("running probe failed for '{}': {e}", action.name),
        }
    }

    let primary = attempt(action, runner, action.command_line.as_deref());
    match primary {
        Ok(()) => (ActionOutcome::Succeeded, false),
        Err(primary_err) => {
            let retryable = opts.fallback_exe
                && action.verb == ActionVerb::Start
                && action.command_line.is_some();
            if retryable {
                log::warn!(
                    "start of '{}' with captured command line failed ({primary_err}), retrying executable-only",
                    action.name
                );
                match attempt(action, runner, None) {
                    Ok(()) => return (ActionOutcome::Succeeded, true),
                    Err(fallback_err) => {
                        return (
                            ActionOutcome::Failed {
                                error: format!("{primary_err} (fallback: {fallback_err})"),
                            },
                            false,
                        );
                    }
                }
            }
            (
                ActionOutcome::Failed {
                    error: primary_err.to_string(),
                },
                false,
            )
        }
    }
}

fn attempt(
    action: &Action,
    runner: &mut dyn PrimitiveRunner,
    command_line: Option<&[String]>,
) -> anyhow::Result<()> {
    match action.verb {
        ActionVerb::Start => runner.start(action.kind, &action.name, command_line),
        ActionVerb::Stop => runner.stop(action.kind, &action.name),
    }
}

fn skip(reason: &str) -> ActionOutcome {
    ActionOutcome::Skipped {
        reason: reason.to_string(),
    }
}

fn verb_label(verb: ActionVerb) -> &'static str {
    match verb {
        ActionVerb::Stop => "stop",
        ActionVerb::Start => "start",
    }
}

fn past_tense(verb: ActionVerb) -> &'static str {
    match verb {
        ActionVerb::Stop => "stopped",
        ActionVerb::Start => "started",
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AutoConfirm, AutoDecline};
    use crate::planner::Action;
    use anyhow::anyhow;
    use std::collections::{HashMap, HashSet};

    /// Scripted primitive runner recording every call
    #[derive(Default)]
    struct MockRunner {
        calls: Vec<String>,
        running: HashSet<String>,
        /// name -> number of times start should fail before succeeding
        start_failures: HashMap<String, usize>,
        fail_stops: bool,
    }

    impl PrimitiveRunner for MockRunner {
        fn start(
            &mut self,
            _kind: EntityKind,
            name: &str,
            command_line: Option<&[String]>,
        ) -> anyhow::Result<()> {
            self.calls.push(format!(
                "start {name} {}",
                if command_line.is_some() { "cmdline" } else { "exe" }
            ));
            if let Some(left) = self.start_failures.get_mut(name) {
                if *left > 0 {
                    *left -= 1;
                    return Err(anyhow!("spawn failed"));
                }
            }
            Ok(())
        }

        fn stop(&mut self, _kind: EntityKind, name: &str) -> anyhow::Result<()> {
            self.calls.push(format!("stop {name}"));
            if self.fail_stops {
                return Err(anyhow!("stop failed"));
            }
            Ok(())
        }

        fn is_running(&mut self, _kind: EntityKind, name: &str) -> anyhow::Result<bool> {
            self.calls.push(format!("probe {name}"));
            Ok(self.running.contains(name))
        }
    }

    fn start(name: &str, cmdline: Option<&[&str]>) -> Action {
        Action {
            kind: EntityKind::Process,
            name: name.to_string(),
            verb: ActionVerb::Start,
            command_line: cmdline.map(|c| c.iter().map(ToString::to_string).collect()),
        }
    }

    fn stop(name: &str) -> Action {
        Action {
            kind: EntityKind::Process,
            name: name.to_string(),
            verb: ActionVerb::Stop,
            command_line: None,
        }
    }

    fn plan_of(actions: Vec<Action>) -> ActionPlan {
        ActionPlan {
            actions,
            cycle_warnings: Vec::new(),
        }
    }

    #[test]
    fn successful_plan_reports_every_action() {
        let plan = plan_of(vec![stop("a.exe"), start("b.exe", None)]);
        let mut runner = MockRunner::default();

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions::default(),
        );
        assert_eq!(report.entries.len(), 2);
        assert!(report.is_success());
        assert_eq!(runner.calls, vec!["stop a.exe", "start b.exe exe"]);
    }

    #[test]
    fn once_only_skips_running_targets_without_primitive_call() {
        let plan = plan_of(vec![start("b.exe", None)]);
        let mut runner = MockRunner::default();
        runner.running.insert("b.exe".to_string());

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions {
                once_only: true,
                ..Default::default()
            },
        );

        assert_eq!(
            report.entries[0].outcome,
            ActionOutcome::Skipped {
                reason: "already running".to_string()
            }
        );
        // Only the probe ran; no start primitive was issued.
        assert_eq!(runner.calls, vec!["probe b.exe"]);
    }

    #[test]
    fn fallback_retries_executable_only_and_records_it() {
        let plan = plan_of(vec![start("b.exe", Some(&["b.exe", "--flag"]))]);
        let mut runner = MockRunner::default();
        runner.start_failures.insert("b.exe".to_string(), 1);

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions {
                fallback_exe: true,
                ..Default::default()
            },
        );

        assert_eq!(report.entries[0].outcome, ActionOutcome::Succeeded);
        assert!(report.entries[0].fallback_used);
        assert_eq!(runner.calls, vec!["start b.exe cmdline", "start b.exe exe"]);
    }

    #[test]
    fn exhausted_fallback_records_failure_without_fallback_flag() {
        let plan = plan_of(vec![start("b.exe", Some(&["b.exe", "--flag"]))]);
        let mut runner = MockRunner::default();
        runner.start_failures.insert("b.exe".to_string(), 2);

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions {
                fallback_exe: true,
                ..Default::default()
            },
        );

        assert!(report.entries[0].outcome.is_failure());
        assert!(!report.entries[0].fallback_used);
    }

    #[test]
    fn no_fallback_without_command_line() {
        let plan = plan_of(vec![start("b.exe", None)]);
        let mut runner = MockRunner::default();
        runner.start_failures.insert("b.exe".to_string(), 1);

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions {
                fallback_exe: true,
                ..Default::default()
            },
        );

        assert!(report.entries[0].outcome.is_failure());
        assert_eq!(runner.calls, vec!["start b.exe exe"]);
    }

    #[test]
    fn one_failure_does_not_abort_the_rest() {
        let plan = plan_of(vec![stop("a.exe"), stop("b.exe"), start("c.exe", None)]);
        let mut runner = MockRunner {
            fail_stops: true,
            ..Default::default()
        };

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions::default(),
        );

        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.succeeded(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn declined_confirmation_skips_the_action() {
        let plan = plan_of(vec![stop("a.exe")]);
        let mut runner = MockRunner::default();

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoDecline,
            &ExecuteOptions {
                confirm: true,
                ..Default::default()
            },
        );

        assert_eq!(
            report.entries[0].outcome,
            ActionOutcome::Skipped {
                reason: "declined".to_string()
            }
        );
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn dry_run_issues_no_primitive_calls() {
        let plan = plan_of(vec![stop("a.exe"), start("b.exe", None)]);
        let mut runner = MockRunner::default();

        let report = execute(
            &plan,
            &mut runner,
            &mut AutoConfirm,
            &ExecuteOptions {
                dry_run: true,
                ..Default::default()
            },
        );

        assert_eq!(report.skipped(), 2);
        assert!(runner.calls.is_empty());
    }
}
