//! `psdelta load` - plan and execute actions from a saved delta

use crate::cli::LoadArgs;
use crate::config::Config;
use crate::{store, ui};
use anyhow::{Result, bail};
use deltakit::{
    AutoConfirm, ConfirmCallback, ExecuteOptions, NameFilter, PlanOptions, Verb, execute, plan,
};
use hostkit::HostRunner;
use std::time::Duration;

/// Interactive confirmation via the terminal
struct TerminalConfirm;

impl ConfirmCallback for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}

pub fn run(args: &LoadArgs, config: &Config) -> Result<()> {
    let filter = NameFilter::new(&args.include, &config.merged_excludes(&args.exclude))?;
    let delta = store::load_delta(&args.input)?;

    let plan_opts = PlanOptions {
        revert: args.revert,
        skip_cmdline: args.skip_cmdline,
    };
    let delay_ms = if args.delay > 0 {
        args.delay
    } else {
        config.default_delay_ms
    };
    let exec_opts = ExecuteOptions {
        confirm: args.confirm,
        delay: Duration::from_millis(delay_ms),
        dry_run: args.dry_run,
        fallback_exe: args.fallback_exe,
        once_only: args.once_only,
    };

    let mut runner = HostRunner::new(hostkit::default_backend());
    let mut failed = 0usize;

    for action in &args.actions {
        let verb: Verb = (*action).into();
        let action_plan = plan(&delta, verb, &plan_opts, &filter);
        ui::display_cycle_warnings(&action_plan.cycle_warnings);

        if action_plan.is_empty() {
            ui::info(&format!("Nothing eligible for '{}'", verb.label()));
            continue;
        }

        ui::info(&format!(
            "Executing {} actions for '{}'",
            action_plan.actions.len(),
            verb.label()
        ));

        let report = if args.confirm {
            execute(&action_plan, &mut runner, &mut TerminalConfirm, &exec_opts)
        } else {
            execute(&action_plan, &mut runner, &mut AutoConfirm, &exec_opts)
        };

        ui::display_report(&report);
        failed += report.failed();
    }

    if failed > 0 {
        bail!("{failed} actions failed");
    }
    Ok(())
}
