//! `psdelta compare` - diff two saved snapshots into a delta file

use crate::cli::CompareArgs;
use crate::config::Config;
use crate::{store, ui};
use anyhow::Result;
use deltakit::NameFilter;

pub fn run(args: &CompareArgs, config: &Config) -> Result<()> {
    let filter = NameFilter::new(&args.include, &config.merged_excludes(&args.exclude))?;

    let baseline = store::load_snapshot(&args.baseline)?;
    let comparison = store::load_snapshot(&args.comparison)?;

    let mut delta = deltakit::diff(&baseline, &comparison);
    delta.items.retain(|item| filter.matches(&item.name));

    ui::display_delta(&delta);
    store::save_delta(&args.output, &delta)?;
    ui::success(&format!("Delta saved to {}", args.output.display()));
    Ok(())
}
