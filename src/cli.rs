use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "psdelta")]
#[command(version)]
#[command(about = "Snapshot processes and services, diff snapshots, replay or revert the changes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write log output to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save a snapshot of current processes and services
    Save(SaveArgs),

    /// Compare two snapshot files into a delta file
    Compare(CompareArgs),

    /// Capture two snapshots with a pause between them and write the delta
    Delta(DeltaArgs),

    /// Load a delta file and perform actions
    Load(LoadArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct SaveArgs {
    /// Output snapshot file
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Baseline snapshot file
    #[arg(short = '1', long)]
    pub baseline: PathBuf,

    /// Comparison snapshot file
    #[arg(short = '2', long)]
    pub comparison: PathBuf,

    /// Output delta file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep only matching processes/services (glob patterns)
    #[arg(long, num_args = 1..)]
    pub include: Vec<String>,

    /// Drop matching processes/services (glob patterns)
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,
}

#[derive(Parser)]
pub struct DeltaArgs {
    /// Output delta file
    #[arg(short, long)]
    pub output: PathBuf,

    /// File to save the initial snapshot
    #[arg(long)]
    pub save_initial: Option<PathBuf>,

    /// File to save the modified snapshot
    #[arg(long)]
    pub save_modified: Option<PathBuf>,

    /// Wait for Enter between the two snapshots
    #[arg(long, conflicts_with = "delay")]
    pub wait: bool,

    /// Delay in seconds between the two snapshots
    #[arg(long)]
    pub delay: Option<u64>,

    /// Keep only matching processes/services (glob patterns)
    #[arg(long, num_args = 1..)]
    pub include: Vec<String>,

    /// Drop matching processes/services (glob patterns)
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Input delta file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Actions to perform, in order
    #[arg(short, long, num_args = 1.., required = true, value_enum)]
    pub actions: Vec<ActionArg>,

    /// Delay between actions in milliseconds
    #[arg(short, long, default_value = "0")]
    pub delay: u64,

    /// Keep only matching processes/services (glob patterns)
    #[arg(long, num_args = 1..)]
    pub include: Vec<String>,

    /// Drop matching processes/services (glob patterns)
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Prompt for confirmation before each action
    #[arg(long)]
    pub confirm: bool,

    /// Revert the changes captured in the delta
    #[arg(long)]
    pub revert: bool,

    /// Retry a failed start once with the executable only
    #[arg(long)]
    pub fallback_exe: bool,

    /// Start by executable identity, discarding captured command lines
    #[arg(long)]
    pub skip_cmdline: bool,

    /// Skip start actions whose target is already running
    #[arg(long)]
    pub once_only: bool,

    /// Show what would be done without touching anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Close,
    Run,
    Restart,
}

impl From<ActionArg> for deltakit::Verb {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Close => Self::Close,
            ActionArg::Run => Self::Run,
            ActionArg::Restart => Self::Restart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_file_is_a_global_option() {
        let cli = Cli::parse_from([
            "psdelta",
            "save",
            "-o",
            "snap.json",
            "--log-file",
            "psdelta.log",
        ]);
        assert_eq!(cli.log_file.as_deref(), Some(Path::new("psdelta.log")));
    }
}
