//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, ForestArgs, RunArgs};
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ForestContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run(args)) => cmd_run(cli, args),
        Some(Commands::Tree(args)) => cmd_tree(cli, args),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "fallforest", &mut io::stdout());
            Ok(())
        }
        None => cmd_run(cli, &RunArgs::default()),
    }
}

#[instrument(level = "debug", skip(cli))]
fn cmd_run(cli: &Cli, args: &RunArgs) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?.merge_with(&args.overrides());
    debug!(?settings, "effective settings");

    // validate everything before the first event is written
    let capacity = settings.forest.capacity()?;
    let mut container = ForestContainer::new(settings);
    let mut tree = container.build_tree()?;
    let mut sink = container.open_sink()?;

    let branches = tree.node_count();
    let report = container
        .simulator()
        .run_cycle(&mut tree, capacity, &mut sink)?;

    output::success(&format!(
        "{} leaves fell and {} grew back across {} branches",
        report.fall.len(),
        report.grow.len(),
        branches
    ));
    if let Some(path) = &container.settings.log.file {
        output::detail(&format!("log: {}", path.display()));
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_tree(cli: &Cli, args: &ForestArgs) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?.merge_with(&args.overrides());
    let mut container = ForestContainer::new(settings);
    let tree = container.build_tree()?;

    output::header(&format!(
        "{} branches, {} leaves, {} levels, wind strength {}",
        tree.node_count(),
        tree.total_leaves(),
        tree.depth(),
        tree.wind_strength()
    ));
    output::info(&tree.to_display_tree());
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) if path.exists() => output::detail(&format!("global: {}", path.display())),
                Some(path) => output::detail(&format!("global: {} (not found)", path.display())),
                None => output::detail(&"global: unavailable (no home directory)"),
            }
            if let Some(path) = &cli.config {
                output::detail(&format!("file:   {}", path.display()));
            }
        }
    }
    Ok(())
}
