//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints that
//! mention the ids involved in the failure.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::SkillNotFound => suggest_skill_not_found(context),
        ErrorCode::PrerequisiteUnknown => suggest_prerequisite_unknown(context),
        ErrorCode::PrerequisiteCycle => suggest_prerequisite_cycle(context),
        ErrorCode::PlanReorderImpossible => suggest_reorder_impossible(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        _ => code.suggestion().to_string(),
    }
}

fn context_str<'a>(context: Option<&'a Value>, key: &str) -> Option<&'a str> {
    context.and_then(|c| c.get(key)).and_then(Value::as_str)
}

fn suggest_skill_not_found(context: Option<&Value>) -> String {
    match context_str(context, "skill_id") {
        Some(id) => format!(
            "Skill '{id}' not found. Try:\n  - `sg skill list` to see all skills\n  - `sg skill add --code {id} --name <name>` to create it"
        ),
        None => ErrorCode::SkillNotFound.suggestion().to_string(),
    }
}

fn suggest_prerequisite_unknown(context: Option<&Value>) -> String {
    let missing: Vec<&str> = context
        .and_then(|c| c.get("missing"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if missing.is_empty() {
        return ErrorCode::PrerequisiteUnknown.suggestion().to_string();
    }
    format!(
        "These prerequisite ids do not exist: {}. Create them first or fix the ids; nothing was changed",
        missing.join(", ")
    )
}

fn suggest_prerequisite_cycle(context: Option<&Value>) -> String {
    match (
        context_str(context, "skill_id"),
        context_str(context, "detected_at"),
    ) {
        (Some(skill), Some(at)) => format!(
            "'{at}' already depends (directly or transitively) on '{skill}'. Remove it from the list, or run `sg prereq get {at}` to inspect the chain"
        ),
        _ => ErrorCode::PrerequisiteCycle.suggestion().to_string(),
    }
}

fn suggest_reorder_impossible(context: Option<&Value>) -> String {
    match context_str(context, "skill_id") {
        Some(id) => format!(
            "The prerequisite graph around '{id}' is cyclic. Run `sg graph check` and repair the edges with `sg prereq set`"
        ),
        None => ErrorCode::PlanReorderImpossible.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    match context_str(context, "config_key") {
        Some(key) => format!("Set `{key}` in config.toml or through its SG_* environment variable"),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}
