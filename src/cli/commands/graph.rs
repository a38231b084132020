//! sg graph - Inspect the stored prerequisite graph

use clap::{Args, Subcommand};
use console::style;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::{Result, SgError};

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub command: GraphCommand,
}

#[derive(Subcommand, Debug)]
pub enum GraphCommand {
    /// Check the stored graph is acyclic and the database is intact
    Check,
}

pub fn run(ctx: &AppContext, args: &GraphArgs) -> Result<()> {
    match args.command {
        GraphCommand::Check => run_check(ctx),
    }
}

fn run_check(ctx: &AppContext) -> Result<()> {
    let skills = ctx.store.list_skills()?.len();
    let graph = ctx.store.adjacency()?;
    let edges: usize = graph.values().map(Vec::len).sum();
    let cycle = ctx.store.find_cycle()?;
    let intact = ctx.store.integrity_check()?;

    if ctx.robot_mode && cycle.is_none() && intact {
        return emit_robot(&robot_ok(serde_json::json!({
            "skills": skills,
            "edges": edges,
            "acyclic": true,
            "integrity_ok": true,
        })));
    }

    if !ctx.robot_mode {
        let mut layout = HumanLayout::new();
        layout
            .title("Prerequisite graph")
            .kv("skills", &skills.to_string())
            .kv("edges", &edges.to_string());
        let mark = |ok: bool| {
            if ok {
                style("ok").green().to_string()
            } else {
                style("FAILED").red().bold().to_string()
            }
        };
        layout
            .kv("acyclic", &mark(cycle.is_none()))
            .kv("integrity", &mark(intact));
        emit_human(layout);
    }

    if let Some(at) = cycle {
        return Err(SgError::ValidationFailed(format!(
            "stored prerequisite graph contains a cycle through '{at}'"
        )));
    }
    if !intact {
        return Err(SgError::ValidationFailed(
            "database integrity check failed".to_string(),
        ));
    }
    Ok(())
}
