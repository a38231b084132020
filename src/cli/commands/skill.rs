//! sg skill - Manage skills in the catalog

use clap::{Args, Subcommand};
use console::style;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::core::{NewSkill, Skill, SkillPatch};
use crate::error::{Result, SgError};

#[derive(Args, Debug)]
pub struct SkillArgs {
    #[command(subcommand)]
    pub command: SkillCommand,
}

#[derive(Subcommand, Debug)]
pub enum SkillCommand {
    /// Add a skill
    Add(AddArgs),
    /// List all skills
    List,
    /// Show one skill and its direct prerequisites
    Show(SkillRef),
    /// Change a skill's name, description or level
    Update(UpdateArgs),
    /// Remove a skill and every edge touching it
    Remove(SkillRef),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Unique short code, e.g. ALG-101
    #[arg(long)]
    pub code: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Free-form level label
    #[arg(long)]
    pub level: Option<String>,

    /// Explicit id (default: random UUID)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Skill id or code
    pub skill: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Free-form level label; an empty value clears it
    #[arg(long)]
    pub level: Option<String>,
}

#[derive(Args, Debug)]
pub struct SkillRef {
    /// Skill id or code
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &SkillArgs) -> Result<()> {
    match &args.command {
        SkillCommand::Add(add) => run_add(ctx, add),
        SkillCommand::List => run_list(ctx),
        SkillCommand::Show(target) => run_show(ctx, target),
        SkillCommand::Update(update) => run_update(ctx, update),
        SkillCommand::Remove(target) => run_remove(ctx, target),
    }
}

fn run_add(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let new = NewSkill {
        id: args.id.clone(),
        code: args.code.clone(),
        name: args.name.clone(),
        description: args.description.clone(),
        level: args.level.clone(),
    };
    let skill = ctx.store.create_skill(new)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&skill));
    }
    println!(
        "{} Added {} ({})",
        style("✓").green(),
        style(&skill.code).bold(),
        skill.id
    );
    Ok(())
}

fn run_list(ctx: &AppContext) -> Result<()> {
    let skills = ctx.store.list_skills()?;
    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "count": skills.len(),
            "skills": skills,
        })));
    }

    if skills.is_empty() {
        println!("No skills yet. Add one with `sg skill add --code <CODE> --name <NAME>`");
        return Ok(());
    }
    let width = skills.iter().map(|s| s.code.len()).max().unwrap_or(0);
    for skill in &skills {
        let prereqs = if skill.prerequisites.is_empty() {
            String::new()
        } else {
            style(format!("  ({} prerequisites)", skill.prerequisites.len()))
                .dim()
                .to_string()
        };
        println!(
            "{:width$}  {}{prereqs}",
            skill.code,
            skill.name,
        );
    }
    Ok(())
}

fn run_show(ctx: &AppContext, target: &SkillRef) -> Result<()> {
    let skill = ctx.store.find_skill(&target.skill)?;
    let prerequisites = ctx.store.get_prerequisites(&skill.id)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "skill": skill,
            "prerequisites": prerequisites,
        })));
    }

    emit_human(describe(&skill, &prerequisites));
    Ok(())
}

fn run_update(ctx: &AppContext, args: &UpdateArgs) -> Result<()> {
    let patch = SkillPatch {
        name: args.name.clone(),
        description: args.description.clone(),
        level: args.level.clone(),
    };
    if patch.is_empty() {
        return Err(SgError::ValidationFailed(
            "nothing to update: pass --name, --description or --level".to_string(),
        ));
    }
    let skill = ctx.store.find_skill(&args.skill)?;
    let updated = ctx.store.update_skill(&skill.id, patch)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&updated));
    }
    println!(
        "{} Updated {} ({})",
        style("✓").green(),
        style(&updated.code).bold(),
        updated.name
    );
    Ok(())
}

fn run_remove(ctx: &AppContext, target: &SkillRef) -> Result<()> {
    let skill = ctx.store.find_skill(&target.skill)?;
    ctx.store.delete_skill(&skill.id)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(serde_json::json!({
            "removed": skill.id,
            "code": skill.code,
        })));
    }
    println!("{} Removed {}", style("✓").green(), style(&skill.code).bold());
    Ok(())
}

pub(crate) fn describe(skill: &Skill, prerequisites: &[Skill]) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("{} - {}", skill.code, skill.name))
        .kv("id", &skill.id)
        .kv("level", skill.level.as_deref().unwrap_or("-"))
        .kv("updated", &skill.updated_at);
    if !skill.description.is_empty() {
        layout.kv("description", &skill.description);
    }
    layout.blank().section("Prerequisites");
    if prerequisites.is_empty() {
        layout.push_line(style("none").dim().to_string());
    }
    for prereq in prerequisites {
        layout.bullet(&format!("{} - {} ({})", prereq.code, prereq.name, prereq.id));
    }
    layout
}
