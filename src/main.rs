//! sg - Skill graph CLI
//!
//! Keep skill prerequisites acyclic and learning plans in prerequisite order.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skillgraph::Result;
use skillgraph::app::AppContext;
use skillgraph::cli::output::{emit_robot, robot_error_structured};
use skillgraph::cli::{Cli, Commands};
use skillgraph::error::suggest_for_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.output_format().is_machine_readable() {
                // Robot mode: structured error on stdout
                if emit_robot(&robot_error_structured(&e)).is_err() {
                    eprintln!("Error: {e}");
                }
            } else {
                eprintln!("Error: {e}");
                eprintln!("  hint: {}", suggest_for_error(e.code(), e.context().as_ref()));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Init(args) = &cli.command {
        return skillgraph::cli::commands::init::run_without_context(cli.output_format(), args);
    }
    let ctx = AppContext::from_cli(cli)?;
    skillgraph::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,skillgraph=info",
        1 => "info,skillgraph=debug",
        2 => "debug,skillgraph=trace",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.output_format().is_machine_readable() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
