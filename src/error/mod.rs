//! Error handling for skillgraph.
//!
//! This module provides:
//! - [`SgError`]: The main error enum for all graph and planning operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context
//! - Suggestion helpers for context-aware error recovery hints

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for skillgraph operations.
#[derive(Error, Debug)]
pub enum SgError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Skill '{skill_id}' cannot be its own prerequisite")]
    SelfReference { skill_id: String },

    #[error("Unknown prerequisite skill(s) for '{skill_id}': {}", .missing.join(", "))]
    UnknownSkill {
        skill_id: String,
        missing: Vec<String>,
    },

    #[error("Prerequisites for '{skill_id}' would create a cycle (detected at '{detected_at}')")]
    Cycle {
        skill_id: String,
        detected_at: String,
    },

    #[error("Skill graph unavailable: {0}")]
    GraphUnavailable(String),

    #[error("Plan cannot be reordered: cyclic prerequisites involving skill '{skill_id}'")]
    ReorderImpossible { skill_id: String },

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl SgError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::SkillNotFound(_) => ErrorCode::SkillNotFound,
            Self::SelfReference { .. } => ErrorCode::PrerequisiteSelfReference,
            Self::UnknownSkill { .. } => ErrorCode::PrerequisiteUnknown,
            Self::Cycle { .. } => ErrorCode::PrerequisiteCycle,
            Self::GraphUnavailable(_) => ErrorCode::GraphUnavailable,
            Self::ReorderImpossible { .. } => ErrorCode::PlanReorderImpossible,
            Self::InvalidPlan(_) => ErrorCode::PlanInvalid,
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::TransactionFailed(_) => ErrorCode::TransactionFailed,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::SkillNotFound(id) => Some(serde_json::json!({ "skill_id": id })),
            Self::SelfReference { skill_id } => Some(serde_json::json!({ "skill_id": skill_id })),
            Self::UnknownSkill { skill_id, missing } => {
                Some(serde_json::json!({ "skill_id": skill_id, "missing": missing }))
            }
            Self::Cycle {
                skill_id,
                detected_at,
            } => Some(serde_json::json!({ "skill_id": skill_id, "detected_at": detected_at })),
            Self::ReorderImpossible { skill_id } => {
                Some(serde_json::json!({ "skill_id": skill_id }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_sg_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted in robot mode so scripts can branch on `code` instead of parsing
/// the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "PREREQUISITE_CYCLE")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 103)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "graph", "plan", "network")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from an `SgError`.
    #[must_use]
    pub fn from_sg_error(err: &SgError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        // Regenerate suggestion with new context
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<SgError> for StructuredError {
    fn from(err: SgError) -> Self {
        Self::from_sg_error(&err)
    }
}

impl From<&SgError> for StructuredError {
    fn from(err: &SgError) -> Self {
        Self::from_sg_error(err)
    }
}

/// Result type alias using `SgError`.
pub type Result<T> = std::result::Result<T, SgError>;
