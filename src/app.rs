use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::core::GraphStore;
use crate::error::{Result, SgError};

/// Everything a command needs once the root and store are resolved.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<GraphStore>,
    pub robot_mode: bool,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let sg_root = find_sg_root()?;
        let config = Config::load(cli.config.as_deref(), &sg_root)?;
        let database = config.catalog.database_path(&sg_root);
        tracing::debug!(root = %sg_root.display(), database = %database.display(), "opening catalog");

        let output_format = cli.output_format();
        Ok(Self {
            store: Arc::new(GraphStore::open(&database)?),
            config,
            robot_mode: output_format.is_machine_readable(),
            output_format,
        })
    }
}

/// `SG_ROOT`, else the nearest `.sg` directory above the working directory,
/// else `<data_dir>/sg`.
pub fn find_sg_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("SG_ROOT") {
        return Ok(PathBuf::from(root));
    }
    let cwd = std::env::current_dir()?;
    if let Some(found) = find_upwards(&cwd, ".sg") {
        return Ok(found);
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| SgError::MissingConfig("data directory not found".to_string()))?;
    Ok(data_dir.join("sg"))
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_dir())
}
