//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Skill graph errors
//! - 2xx: Plan errors
//! - 3xx: Config errors
//! - 5xx: Network errors
//! - 6xx: Storage errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `SkillNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Skill graph errors (1xx)
    // ========================================
    /// E101: Requested skill does not exist in the catalog
    SkillNotFound,
    /// E102: A skill was proposed as its own prerequisite
    PrerequisiteSelfReference,
    /// E103: A proposed prerequisite does not resolve to a skill
    PrerequisiteUnknown,
    /// E104: Committing the prerequisites would make the graph cyclic
    PrerequisiteCycle,

    // ========================================
    // Plan errors (2xx)
    // ========================================
    /// E201: Prerequisites among the plan's skills are cyclic
    PlanReorderImpossible,
    /// E202: Plan segments are malformed (positions not 1..N)
    PlanInvalid,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file has invalid syntax or values
    ConfigInvalid,
    /// E302: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Network errors (5xx)
    // ========================================
    /// E501: Catalog service could not be reached or parsed
    GraphUnavailable,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    DatabaseError,
    SerializationError,
    TransactionFailed,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    ValidationFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    IoError,
}

impl ErrorCode {
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SkillNotFound => 101,
            Self::PrerequisiteSelfReference => 102,
            Self::PrerequisiteUnknown => 103,
            Self::PrerequisiteCycle => 104,

            Self::PlanReorderImpossible => 201,
            Self::PlanInvalid => 202,

            Self::ConfigInvalid => 301,
            Self::ConfigMissingRequired => 302,

            Self::GraphUnavailable => 501,

            Self::DatabaseError => 601,
            Self::SerializationError => 602,
            Self::TransactionFailed => 603,

            Self::ValidationFailed => 801,

            Self::IoError => 901,
        }
    }

    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SkillNotFound => "Run `sg skill list` to see the skills in the catalog",
            Self::PrerequisiteSelfReference => "Remove the skill itself from its prerequisite list",
            Self::PrerequisiteUnknown => "Create the missing skills with `sg skill add` or fix the ids",
            Self::PrerequisiteCycle => "Drop one of the prerequisites on the chain back to this skill. Run `sg prereq get <skill>` to inspect it",

            Self::PlanReorderImpossible => "The stored prerequisite graph is corrupted. Run `sg graph check` to locate the cycle",
            Self::PlanInvalid => "Segment positions must be unique and numbered 1..N",

            Self::ConfigInvalid => "Check TOML syntax and value types in the config file",
            Self::ConfigMissingRequired => "Set the required value in config.toml or via its SG_* environment variable",

            Self::GraphUnavailable => "Check that the catalog service is reachable at graph_client.base_url",

            Self::DatabaseError => "Check the database file is readable. Run `sg init` to recreate an empty catalog",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::TransactionFailed => "The operation was rolled back. Check error details and retry",

            Self::ValidationFailed => "Review the validation errors and fix each issue",

            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::SkillNotFound
            | Self::PrerequisiteSelfReference
            | Self::PrerequisiteUnknown
            | Self::PrerequisiteCycle
            | Self::PlanInvalid
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::GraphUnavailable
            | Self::TransactionFailed
            | Self::ValidationFailed
            | Self::IoError => true,

            // Data-integrity defects, not user input
            Self::PlanReorderImpossible | Self::DatabaseError | Self::SerializationError => false,
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "graph",
            2 => "plan",
            3 => "config",
            5 => "network",
            6 => "storage",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SkillNotFound,
            Self::PrerequisiteSelfReference,
            Self::PrerequisiteUnknown,
            Self::PrerequisiteCycle,
            Self::PlanReorderImpossible,
            Self::PlanInvalid,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::GraphUnavailable,
            Self::DatabaseError,
            Self::SerializationError,
            Self::TransactionFailed,
            Self::ValidationFailed,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
