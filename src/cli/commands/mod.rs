//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod graph;
pub mod init;
pub mod plan;
pub mod prereq;
pub mod skill;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        // Handled in main before a context exists
        Commands::Init(args) => init::run_without_context(ctx.output_format, args),
        Commands::Skill(args) => skill::run(ctx, args),
        Commands::Prereq(args) => prereq::run(ctx, args),
        Commands::Plan(args) => plan::run(ctx, args),
        Commands::Graph(args) => graph::run(ctx, args),
    }
}
