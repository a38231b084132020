//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// Skill graph - keep skill prerequisites acyclic and learning plans in order
#[derive(Parser, Debug)]
#[command(name = "sg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable JSON output for machine consumption
    #[arg(long, global = true)]
    pub robot: bool,

    /// Shorthand for --output-format=json
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Output format (human, json)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: <root>/config.toml)
    #[arg(long, global = true, env = "SG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format: `--output-format`, then `--machine` or
    /// `--robot`, then human.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        if self.machine || self.robot {
            return OutputFormat::Json;
        }
        OutputFormat::Human
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the sg root, default config and database
    Init(commands::init::InitArgs),

    /// Manage skills in the catalog
    Skill(commands::skill::SkillArgs),

    /// Set, inspect and bulk-link prerequisites
    Prereq(commands::prereq::PrereqArgs),

    /// Validate or reorder a learning plan against the prerequisite graph
    Plan(commands::plan::PlanArgs),

    /// Inspect the stored prerequisite graph
    Graph(commands::graph::GraphArgs),
}
