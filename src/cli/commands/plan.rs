//! sg plan - Validate or reorder a learning plan against the prerequisite graph

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use crate::app::AppContext;
use crate::catalog::GraphClient;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::config::GraphClientConfig;
use crate::error::Result;
use crate::planning::{
    GraphSource, PlanOrderValidator, PlanSegment, PrerequisiteChecker, parse_plan,
};

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(subcommand)]
    pub command: PlanCommand,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Report segments scheduled before their prerequisites
    Validate(ValidateArgs),
    /// Reorder a plan so prerequisites come first
    Reorder(ReorderArgs),
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Fetch prerequisites from this catalog service instead of the local store
    #[arg(long, value_name = "URL", conflicts_with = "use_remote")]
    pub remote: Option<String>,

    /// Fetch prerequisites from the configured graph_client.base_url
    #[arg(long)]
    pub use_remote: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Plan JSON: a segment array or {"segments": [...]}
    pub file: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Plan JSON: a segment array or {"segments": [...]}
    pub file: PathBuf,

    /// Write the reordered plan here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(ctx: &AppContext, args: &PlanArgs) -> Result<()> {
    let (file, source) = match &args.command {
        PlanCommand::Validate(a) => (&a.file, &a.source),
        PlanCommand::Reorder(a) => (&a.file, &a.source),
    };
    let plan = parse_plan(&std::fs::read_to_string(file)?)?;

    let remote = match (&source.remote, source.use_remote) {
        (Some(url), _) => Some(GraphClientConfig {
            base_url: Some(url.clone()),
            ..ctx.config.graph_client.clone()
        }),
        (None, true) => Some(ctx.config.graph_client.clone()),
        (None, false) => None,
    };

    match remote {
        Some(config) => {
            let client = GraphClient::from_config(&config)?;
            tracing::debug!(base_url = client.base_url(), "checking plan against remote catalog");
            dispatch(ctx, &args.command, &plan, client)
        }
        None => dispatch(ctx, &args.command, &plan, ctx.store.as_ref()),
    }
}

fn dispatch<S: GraphSource>(
    ctx: &AppContext,
    command: &PlanCommand,
    plan: &[PlanSegment],
    source: S,
) -> Result<()> {
    let checker = PrerequisiteChecker::new(source)
        .with_validator(PlanOrderValidator::from_config(&ctx.config.planning));
    match command {
        PlanCommand::Validate(_) => run_validate(ctx, plan, &checker),
        PlanCommand::Reorder(args) => run_reorder(ctx, plan, &checker, args),
    }
}

fn run_validate<S: GraphSource>(
    ctx: &AppContext,
    plan: &[PlanSegment],
    checker: &PrerequisiteChecker<S>,
) -> Result<()> {
    let report = checker.check(plan)?;

    if ctx.robot_mode {
        let warnings = degraded_warnings(&report.degraded);
        return emit_robot(
            &robot_ok(serde_json::json!({
                "clean": report.is_clean(),
                "skills_checked": report.skills_checked,
                "violations": report.violations,
                "degraded": report.degraded,
            }))
            .with_warnings(warnings),
        );
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Plan validation")
        .kv("segments", &plan.len().to_string())
        .kv("skills checked", &report.skills_checked.to_string());
    if report.is_clean() {
        layout.push_line(format!(
            "{} All prerequisites are scheduled first",
            style("✓").green()
        ));
    } else {
        layout
            .blank()
            .section(&format!("Violations ({})", report.violations.len()));
        for violation in &report.violations {
            layout.bullet(&violation.message);
        }
    }
    push_degraded(&mut layout, &report.degraded);
    emit_human(layout);
    Ok(())
}

fn run_reorder<S: GraphSource>(
    ctx: &AppContext,
    plan: &[PlanSegment],
    checker: &PrerequisiteChecker<S>,
    args: &ReorderArgs,
) -> Result<()> {
    let outcome = checker.repair(plan)?;

    if let Some(path) = &args.output {
        std::fs::write(
            path,
            serde_json::to_string_pretty(&serde_json::json!({ "segments": outcome.segments }))?,
        )?;
    }

    if ctx.robot_mode {
        let warnings = degraded_warnings(&outcome.degraded);
        return emit_robot(
            &robot_ok(serde_json::json!({
                "changed": outcome.changed,
                "violations_before": outcome.violations_before,
                "segments": outcome.segments,
                "output": args.output.as_ref().map(|p| p.display().to_string()),
                "degraded": outcome.degraded,
            }))
            .with_warnings(warnings),
        );
    }

    let mut layout = HumanLayout::new();
    layout.title("Plan reorder");
    if outcome.changed {
        layout.kv(
            "fixed",
            &format!("{} violation(s)", outcome.violations_before.len()),
        );
    } else {
        layout.push_line(format!("{} Already in prerequisite order", style("✓").green()));
    }
    if let Some(path) = &args.output {
        layout.kv("written", &path.display().to_string());
    } else {
        layout.blank().section("Order");
        for segment in &outcome.segments {
            let label = segment
                .title
                .as_deref()
                .or(segment.skill_id.as_deref())
                .unwrap_or("(untitled)");
            layout.push_line(format!("  {:>3}. {label}", segment.position));
        }
    }
    push_degraded(&mut layout, &outcome.degraded);
    emit_human(layout);
    Ok(())
}

fn degraded_warnings(degraded: &BTreeMap<String, String>) -> Vec<String> {
    degraded
        .iter()
        .map(|(skill, reason)| format!("prerequisites of {skill} unavailable: {reason}"))
        .collect()
}

fn push_degraded(layout: &mut HumanLayout, degraded: &BTreeMap<String, String>) {
    if degraded.is_empty() {
        return;
    }
    layout
        .blank()
        .section(&format!("Unchecked skills ({})", degraded.len()));
    for (skill, reason) in degraded {
        layout.bullet(&format!("{}: {}", style(skill).yellow(), reason));
    }
}
