//! Plan and graph-snapshot data structures

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SgError};

/// One ordered unit of a learning plan.
///
/// A segment without a `skill_id` is not constrained by the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSegment {
    /// 1-based, contiguous, unique within a plan
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PlanSegment {
    pub fn new(position: u32, skill_id: impl Into<String>) -> Self {
        Self {
            position,
            skill_id: Some(skill_id.into()),
            title: None,
        }
    }

    /// A segment that targets no skill.
    pub fn untagged(position: u32, title: impl Into<String>) -> Self {
        Self {
            position,
            skill_id: None,
            title: Some(title.into()),
        }
    }

    /// Build a segment from a module carrying several target skills.
    ///
    /// Only the first target constrains ordering; blank references are
    /// treated as absent.
    pub fn from_target_skills<S: AsRef<str>>(
        position: u32,
        title: Option<String>,
        targets: &[S],
    ) -> Self {
        let skill_id = targets
            .first()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            position,
            skill_id,
            title,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn skill(&self) -> Option<&str> {
        self.skill_id.as_deref()
    }
}

/// A prerequisite scheduled at or after the skill that depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub dependent_skill_id: String,
    pub dependent_skill_name: String,
    pub dependent_position: u32,
    pub prerequisite_skill_id: String,
    pub prerequisite_skill_name: String,
    /// Always present for violations this crate emits; prerequisites
    /// missing from the plan never produce one
    pub prerequisite_position: Option<u32>,
    pub message: String,
}

/// Skill id -> direct prerequisite ids, scoped to the skills of interest.
///
/// Disposable: built per call, possibly stale or incomplete. `degraded`
/// records the skills whose prerequisites could not be looked up, so "no
/// prerequisites" and "couldn't check" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGraphSnapshot {
    pub prerequisites: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,
    /// Skill id -> reason the lookup degraded
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub degraded: BTreeMap<String, String>,
}

impl SkillGraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(skill, prerequisites)` pairs.
    pub fn from_edges<I, K, V>(edges: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let prerequisites = edges
            .into_iter()
            .map(|(skill, prereqs)| (skill.into(), prereqs.into_iter().map(Into::into).collect()))
            .collect();
        Self {
            prerequisites,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, skill_id: impl Into<String>, prerequisites: Vec<String>) {
        self.prerequisites.insert(skill_id.into(), prerequisites);
    }

    pub fn record_name(&mut self, skill_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(skill_id.into(), name.into());
    }

    pub fn mark_degraded(&mut self, skill_id: impl Into<String>, reason: impl Into<String>) {
        self.degraded.insert(skill_id.into(), reason.into());
    }

    /// Direct prerequisites of `skill_id`; empty when unknown.
    pub fn prerequisites_of(&self, skill_id: &str) -> &[String] {
        self.prerequisites
            .get(skill_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Display name, falling back to the id.
    pub fn name_of<'a>(&'a self, skill_id: &'a str) -> &'a str {
        self.names.get(skill_id).map_or(skill_id, String::as_str)
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.prerequisites.values().map(Vec::len).sum()
    }
}

/// Anything that can produce a [`SkillGraphSnapshot`] for a set of skills.
pub trait GraphSource {
    fn snapshot(&self, skill_ids: &[String]) -> Result<SkillGraphSnapshot>;
}

impl<T: GraphSource + ?Sized> GraphSource for &T {
    fn snapshot(&self, skill_ids: &[String]) -> Result<SkillGraphSnapshot> {
        (**self).snapshot(skill_ids)
    }
}

/// Distinct skill ids referenced by `plan`, in position order.
pub fn skill_ids(plan: &[PlanSegment]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    in_position_order(plan)
        .into_iter()
        .filter_map(PlanSegment::skill)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Segments sorted by position, without cloning.
pub fn in_position_order(plan: &[PlanSegment]) -> Vec<&PlanSegment> {
    let mut ordered: Vec<&PlanSegment> = plan.iter().collect();
    ordered.sort_by_key(|segment| segment.position);
    ordered
}

/// Check that positions are exactly `1..=N`.
pub fn ensure_contiguous(plan: &[PlanSegment]) -> Result<()> {
    let mut positions: Vec<u32> = plan.iter().map(|s| s.position).collect();
    positions.sort_unstable();
    for (expected, actual) in (1u32..).zip(&positions) {
        if *actual != expected {
            return Err(SgError::InvalidPlan(format!(
                "segment positions must be 1..{} without gaps or duplicates (found {actual} where {expected} was expected)",
                positions.len()
            )));
        }
    }
    Ok(())
}

/// On-disk plan: either `{"segments": [...]}` or a bare segment array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlanDocument {
    Wrapped { segments: Vec<PlanSegment> },
    Bare(Vec<PlanSegment>),
}

impl PlanDocument {
    pub fn into_segments(self) -> Vec<PlanSegment> {
        match self {
            Self::Wrapped { segments } | Self::Bare(segments) => segments,
        }
    }
}

/// Parse a JSON plan and check its positions.
pub fn parse_plan(json: &str) -> Result<Vec<PlanSegment>> {
    let segments = serde_json::from_str::<PlanDocument>(json)?.into_segments();
    ensure_contiguous(&segments)?;
    Ok(segments)
}
