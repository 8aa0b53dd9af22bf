//! Terminal rendering for deltas, plans, and run reports

use colored::Colorize;
use deltakit::{ActionOutcome, ChangeKind, CycleWarning, Delta, RunReport};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Display a delta's changes, grouped the way they are ordered: processes
/// then services
pub fn display_delta(delta: &Delta) {
    if delta.is_empty() {
        println!();
        println!("  {} No changes between snapshots", "✓".green());
        return;
    }

    println!();
    println!(
        "  {} ({} → {})",
        "Snapshot delta".bold(),
        delta.baseline_ref,
        delta.comparison_ref
    );

    for item in &delta.items {
        let (symbol, desc) = match item.change {
            ChangeKind::Appeared => ("+".green(), "appeared"),
            ChangeKind::Disappeared => ("-".red(), "disappeared"),
            ChangeKind::CommandLineChanged => ("~".yellow(), "command line changed"),
        };
        println!(
            "  {} {:<30} {} {}",
            symbol,
            item.name,
            item.kind.label().dimmed(),
            desc.dimmed()
        );
    }

    println!();
    println!("  {} changes", delta.items.len().to_string().bold());
}

/// Surface dependency cycles the resolver had to break
pub fn display_cycle_warnings(warnings: &[CycleWarning]) {
    for warning in warnings {
        warn(&format!("{warning} (order is best-effort)"));
    }
}

/// Print every action's outcome and the summary line
pub fn display_report(report: &RunReport) {
    println!();
    for entry in &report.entries {
        let verb = match entry.verb {
            deltakit::ActionVerb::Stop => "stop",
            deltakit::ActionVerb::Start => "start",
        };
        let target = format!("{} {}", entry.kind.label(), entry.name);
        match &entry.outcome {
            ActionOutcome::Succeeded => {
                let fallback = if entry.fallback_used {
                    " (fallback)".yellow().to_string()
                } else {
                    String::new()
                };
                println!("  {} {} {}{}", "✓".green(), verb, target, fallback);
            }
            ActionOutcome::Failed { error } => {
                println!("  {} {} {}: {}", "✗".red(), verb, target, error.red());
            }
            ActionOutcome::Skipped { reason } => {
                println!("  {} {} {} ({})", "⊘".dimmed(), verb, target, reason.dimmed());
            }
        }
    }

    println!();
    let line = format!(
        "{} succeeded, {} failed, {} skipped",
        report.succeeded(),
        report.failed(),
        report.skipped()
    );
    if report.is_success() {
        success(&line);
    } else {
        warn(&line);
    }
}
