use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SgError};

/// Resolved configuration.
///
/// Layers, lowest to highest priority: built-in defaults, the global file
/// (`<config_dir>/sg/config.toml`), the project file (`<root>/config.toml`),
/// then `SG_*` environment variables. An explicit `--config` path (or
/// `SG_CONFIG`) replaces both files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub graph_client: GraphClientConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, sg_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SG_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(SgError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(sg_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Path of the global config file, if the platform has a config dir.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sg").join("config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_project(sg_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&sg_root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SgError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SgError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.catalog {
            self.catalog.merge(patch);
        }
        if let Some(patch) = patch.graph_client {
            self.graph_client.merge(patch);
        }
        if let Some(patch) = patch.planning {
            self.planning.merge(patch);
        }
    }

    /// Apply `SG_*` overrides read through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = env_string(&lookup, "SG_CATALOG_DATABASE") {
            self.catalog.database = value;
        }

        if let Some(value) = env_string(&lookup, "SG_GRAPH_BASE_URL") {
            self.graph_client.base_url = Some(value);
        }
        if let Some(value) = env_u64(&lookup, "SG_GRAPH_TIMEOUT_SECS")? {
            self.graph_client.timeout_secs = value;
        }
        if let Some(value) = env_u64(&lookup, "SG_GRAPH_CONNECT_TIMEOUT_SECS")? {
            self.graph_client.connect_timeout_secs = value;
        }

        if let Some(value) = env_bool(&lookup, "SG_PLANNING_SORT_VIOLATIONS") {
            self.planning.sort_violations = value;
        }

        Ok(())
    }

    /// Render as TOML, e.g. for `sg init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| SgError::Config(format!("serialize config: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Database file, relative to the sg root unless absolute
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl CatalogConfig {
    fn merge(&mut self, patch: CatalogPatch) {
        if let Some(value) = patch.database {
            self.database = value;
        }
    }

    /// Absolute database path under `sg_root`.
    pub fn database_path(&self, sg_root: &Path) -> PathBuf {
        let path = Path::new(&self.database);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            sg_root.join(path)
        }
    }
}

fn default_database() -> String {
    "skills.db".to_string()
}

/// Settings for the remote catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Whole-request timeout; values below 1 are raised to 1
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Environment variable holding a bearer token for the catalog
    #[serde(default = "default_bearer_token_env")]
    pub bearer_token_env: String,
}

impl Default for GraphClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            bearer_token_env: default_bearer_token_env(),
        }
    }
}

impl GraphClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    fn merge(&mut self, patch: GraphClientPatch) {
        if let Some(value) = patch.base_url {
            self.base_url = Some(value);
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.connect_timeout_secs {
            self.connect_timeout_secs = value;
        }
        if let Some(value) = patch.bearer_token_env {
            self.bearer_token_env = value;
        }
    }

    /// The configured base URL, or `MissingConfig`.
    pub fn require_base_url(&self) -> Result<&str> {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SgError::MissingConfig("graph_client.base_url".to_string()))
    }
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_connect_timeout_secs() -> u64 {
    2
}

fn default_bearer_token_env() -> String {
    "SG_CATALOG_TOKEN".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Sort violations by position instead of discovery order
    #[serde(default = "default_true")]
    pub sort_violations: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            sort_violations: true,
        }
    }
}

impl PlanningConfig {
    fn merge(&mut self, patch: PlanningPatch) {
        if let Some(value) = patch.sort_violations {
            self.sort_violations = value;
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub catalog: Option<CatalogPatch>,
    pub graph_client: Option<GraphClientPatch>,
    pub planning: Option<PlanningPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogPatch {
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GraphClientPatch {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub bearer_token_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PlanningPatch {
    pub sort_violations: Option<bool>,
}

fn env_string(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key) {
        Some(value) => value.trim().parse::<u64>().map(Some).map_err(|err| {
            SgError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}
