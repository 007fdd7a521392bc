//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::{RawForestConfig, RawLogConfig, RawPacingConfig, RawSettings};

/// Seasonal leaf-fall simulation: leaves drop from a random branch tree in autumn and regrow in spring
#[derive(Parser, Debug)]
#[command(name = "fallforest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Diagnostics on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one autumn-to-spring cycle
    Run(RunArgs),

    /// Show the generated tree without simulating
    Tree(ForestArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Tree shape overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ForestArgs {
    /// Seed for a reproducible tree
    #[arg(long)]
    pub seed: Option<u64>,

    /// Leaves on the root branch
    #[arg(long, allow_negative_numbers = true)]
    pub leaves: Option<i64>,

    /// Children of the root branch
    #[arg(long, allow_negative_numbers = true)]
    pub branches: Option<i64>,

    /// Leaves shed per gust (values below 1 are raised to 1)
    #[arg(long, allow_negative_numbers = true)]
    pub wind: Option<i64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub forest: ForestArgs,

    /// Leaves per branch after spring
    #[arg(long, allow_negative_numbers = true)]
    pub capacity: Option<i64>,

    /// Delay after each leaf event in milliseconds (0 = none)
    #[arg(long)]
    pub pace_ms: Option<u64>,

    /// Event log file
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "no_log")]
    pub log_file: Option<PathBuf>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Write events to the console only
    #[arg(long)]
    pub no_log: bool,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,
    /// Print a commented config template
    Template,
    /// Show config paths
    Path,
}

impl ForestArgs {
    /// Flags as a settings overlay; unset flags keep the configured value.
    pub fn overrides(&self) -> RawSettings {
        RawSettings {
            forest: RawForestConfig {
                root_leaves: self.leaves,
                root_branches: self.branches,
                wind_strength: self.wind,
                spring_capacity: None,
                seed: self.seed,
            },
            ..Default::default()
        }
    }
}

impl RunArgs {
    pub fn overrides(&self) -> RawSettings {
        let mut raw = self.forest.overrides();
        raw.forest.spring_capacity = self.capacity;
        raw.pacing = RawPacingConfig {
            interval_ms: self.pace_ms,
        };
        raw.log = RawLogConfig {
            file: self.log_file.clone(),
            append: self.append.then_some(true),
            disabled: self.no_log,
        };
        raw
    }
}
