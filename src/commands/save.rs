//! `psdelta save` - capture and persist one snapshot

use crate::cli::SaveArgs;
use crate::{store, ui};
use anyhow::Result;

pub fn run(args: &SaveArgs) -> Result<()> {
    let label = super::label_for(&args.output);
    let snapshot = super::capture_snapshot(&label)?;

    store::save_snapshot(&args.output, &snapshot)?;
    ui::success(&format!(
        "Saved {} entities to {}",
        snapshot.entities.len(),
        args.output.display()
    ));
    Ok(())
}
