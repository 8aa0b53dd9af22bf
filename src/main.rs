mod cli;
mod commands;
mod config;
mod store;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut logger = env_logger::Builder::new();
    logger
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None);
    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        // File logs keep timestamps; terminal output drops them.
        logger
            .target(env_logger::Target::Pipe(Box::new(file)))
            .format_timestamp_secs();
    }
    logger.init();

    let config = Config::load()?;

    match cli.command {
        Command::Save(args) => commands::save::run(&args),
        Command::Compare(args) => commands::compare::run(&args, &config),
        Command::Delta(args) => commands::delta::run(&args, &config),
        Command::Load(args) => commands::load::run(&args, &config),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
