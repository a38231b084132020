//! Skill data structures

use serde::{Deserialize, Serialize};

/// A skill in the catalog, together with its direct prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Opaque unique skill ID
    pub id: String,
    /// Short unique code (e.g. "ALG-101")
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Free-form level label ("beginner", "B2", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Ids of direct prerequisites, sorted
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Skill {
    /// Wire summary of this skill, as served to the planning side.
    #[must_use]
    pub fn summary(&self) -> SkillSummary {
        SkillSummary {
            id: self.id.clone(),
            code: Some(self.code.clone()),
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            level: self.level.clone(),
        }
    }
}

/// Skill summary returned per prerequisite by the catalog service.
///
/// Every field except `id` is optional on the wire; the catalog has shipped
/// responses without `code` before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Input for creating a skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSkill {
    /// Explicit id; a v4 UUID is generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: Option<String>,
}

impl NewSkill {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Field changes for an existing skill. `None` leaves a field as it is;
/// an empty `level` clears it. Code, id and prerequisites never change here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl SkillPatch {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.level.is_none()
    }
}
