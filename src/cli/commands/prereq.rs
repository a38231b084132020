//! sg prereq - Set, inspect and bulk-link prerequisites

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use crate::app::AppContext;
use crate::cli::output::{emit_human, emit_robot, robot_ok};
use crate::core::PrerequisiteLink;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct PrereqArgs {
    #[command(subcommand)]
    pub command: PrereqCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrereqCommand {
    /// Replace a skill's prerequisites (no prerequisites clears them)
    Set(SetArgs),
    /// Show a skill's direct prerequisites
    Get(GetArgs),
    /// Apply code-based links from a JSON file
    Link(LinkArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Skill id or code
    pub skill: String,

    /// Prerequisite ids or codes
    pub prerequisites: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Skill id or code
    pub skill: String,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// JSON array of {"skillCode": "...", "prerequisiteCodes": [...]}
    pub file: PathBuf,
}

pub fn run(ctx: &AppContext, args: &PrereqArgs) -> Result<()> {
    match &args.command {
        PrereqCommand::Set(set) => run_set(ctx, set),
        PrereqCommand::Get(get) => run_get(ctx, get),
        PrereqCommand::Link(link) => run_link(ctx, link),
    }
}

fn run_set(ctx: &AppContext, args: &SetArgs) -> Result<()> {
    let skill = ctx.store.find_skill(&args.skill)?;
    let candidates = ctx.store.resolve_references(&args.prerequisites)?;
    let updated = ctx.store.set_prerequisites(&skill.id, &candidates)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&updated));
    }
    println!(
        "{} {} now has {} prerequisite(s)",
        style("✓").green(),
        style(&updated.code).bold(),
        updated.prerequisites.len()
    );
    Ok(())
}

fn run_get(ctx: &AppContext, args: &GetArgs) -> Result<()> {
    let skill = ctx.store.find_skill(&args.skill)?;
    let prerequisites = ctx.store.get_prerequisites(&skill.id)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "skill_id": skill.id,
            "prerequisites": prerequisites
                .iter()
                .map(crate::core::Skill::summary)
                .collect::<Vec<_>>(),
        })));
    }
    emit_human(super::skill::describe(&skill, &prerequisites));
    Ok(())
}

fn run_link(ctx: &AppContext, args: &LinkArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)?;
    let links: Vec<PrerequisiteLink> = serde_json::from_str(&raw)?;
    let report = ctx.store.link_by_code(&links)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&report));
    }

    println!(
        "{} Linked {} skill(s)",
        style("✓").green(),
        report.linked.len()
    );
    for code in &report.unknown_skills {
        println!("  {} unknown skill code {code}, skipped", style("!").yellow());
    }
    for code in &report.unknown_prerequisites {
        println!("  {} unknown prerequisite code {code}, dropped", style("!").yellow());
    }
    for rejection in &report.rejected {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            rejection.skill_code,
            rejection.reason
        );
    }
    Ok(())
}
