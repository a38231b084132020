//! sg init - Create the sg root, default config and database

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use crate::cli::OutputFormat;
use crate::cli::output::{emit_robot, robot_ok};
use crate::config::Config;
use crate::error::{Result, SgError};
use crate::storage::Database;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Initialize globally (<data_dir>/sg) instead of locally (.sg/)
    #[arg(long)]
    pub global: bool,

    /// Rewrite the default config even if one exists
    #[arg(long, short)]
    pub force: bool,
}

/// Runs before an `AppContext` exists, since the root may not yet.
pub fn run_without_context(format: OutputFormat, args: &InitArgs) -> Result<()> {
    let target = if args.global {
        global_sg_root()?
    } else if let Ok(root) = std::env::var("SG_ROOT") {
        PathBuf::from(root)
    } else {
        std::env::current_dir()?.join(".sg")
    };

    let already = target.join("config.toml").exists();
    fs::create_dir_all(&target)?;

    let config_path = target.join("config.toml");
    let wrote_config = write_default_config(&config_path, args.force)?;

    let config = Config::load(Some(&config_path), &target)?;
    let db_path = config.catalog.database_path(&target);
    let db = Database::open(&db_path)?;

    if format.is_machine_readable() {
        return emit_robot(&robot_ok(serde_json::json!({
            "path": target.display().to_string(),
            "config": config_path.display().to_string(),
            "database": db_path.display().to_string(),
            "schema_version": db.schema_version(),
            "config_written": wrote_config,
        })));
    }

    if already && !wrote_config {
        println!(
            "{} Already initialized at {}",
            style("!").yellow(),
            target.display()
        );
        println!("  Use --force to rewrite the default config");
        return Ok(());
    }

    println!("{} Initialized at {}", style("✓").green().bold(), target.display());
    println!("  config:   {}", config_path.display());
    println!("  database: {}", db_path.display());
    println!();
    println!("Add skills with:");
    println!("  sg skill add --code ALG-1 --name \"Linear equations\"");
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    let body = Config::default().to_toml()?;
    fs::write(
        path,
        format!(
            "# sg configuration\n#\n# Set [graph_client] base_url to validate plans against a remote catalog.\n\n{body}"
        ),
    )?;
    Ok(true)
}

fn global_sg_root() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| SgError::MissingConfig("data directory not found".to_string()))?;
    Ok(data_dir.join("sg"))
}
