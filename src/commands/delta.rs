//! `psdelta delta` - capture, pause, capture again, write the difference

use crate::cli::DeltaArgs;
use crate::config::Config;
use crate::{store, ui};
use anyhow::{Context, Result};
use deltakit::NameFilter;
use std::io::{BufRead, Write};
use std::time::Duration;

pub fn run(args: &DeltaArgs, config: &Config) -> Result<()> {
    let filter = NameFilter::new(&args.include, &config.merged_excludes(&args.exclude))?;

    ui::info("Capturing initial snapshot...");
    let initial = super::capture_snapshot("initial")?;
    if let Some(path) = &args.save_initial {
        store::save_snapshot(path, &initial)?;
        ui::success(&format!("Initial snapshot saved to {}", path.display()));
    }

    if args.wait {
        print!("Press Enter to capture the modified snapshot... ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Could not read from stdin")?;
    } else if let Some(seconds) = args.delay {
        ui::info(&format!("Waiting {seconds} seconds..."));
        std::thread::sleep(Duration::from_secs(seconds));
    }

    ui::info("Capturing modified snapshot...");
    let modified = super::capture_snapshot("modified")?;
    if let Some(path) = &args.save_modified {
        store::save_snapshot(path, &modified)?;
        ui::success(&format!("Modified snapshot saved to {}", path.display()));
    }

    let mut delta = deltakit::diff(&initial, &modified);
    delta.items.retain(|item| filter.matches(&item.name));

    ui::display_delta(&delta);
    store::save_delta(&args.output, &delta)?;
    ui::success(&format!("Delta saved to {}", args.output.display()));
    Ok(())
}
