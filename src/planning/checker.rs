//! Check-and-repair over a pluggable graph source.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;

use super::reorder::PlanReorderer;
use super::types::{
    GraphSource, PlanSegment, Violation, ensure_contiguous, in_position_order, skill_ids,
};
use super::validator::PlanOrderValidator;

/// Outcome of [`PrerequisiteChecker::check`].
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub violations: Vec<Violation>,
    /// Skills whose prerequisites could not be looked up, with the reason.
    /// A clean report with entries here was checked against partial data.
    pub degraded: BTreeMap<String, String>,
    pub skills_checked: usize,
}

impl PlanReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Outcome of [`PrerequisiteChecker::repair`].
#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    /// The plan in prerequisite order, positions `1..=N`
    pub segments: Vec<PlanSegment>,
    /// Violations found before reordering
    pub violations_before: Vec<Violation>,
    /// Whether any segment moved
    pub changed: bool,
    pub degraded: BTreeMap<String, String>,
}

/// Fetches a snapshot for a plan's skills and validates or repairs the plan.
#[derive(Debug, Clone)]
pub struct PrerequisiteChecker<S> {
    source: S,
    validator: PlanOrderValidator,
    reorderer: PlanReorderer,
}

impl<S: GraphSource> PrerequisiteChecker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            validator: PlanOrderValidator::new(),
            reorderer: PlanReorderer::new(),
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: PlanOrderValidator) -> Self {
        self.validator = validator;
        self
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub fn check(&self, plan: &[PlanSegment]) -> Result<PlanReport> {
        ensure_contiguous(plan)?;
        let skills = skill_ids(plan);
        let graph = self.source.snapshot(&skills)?;
        let violations = self.validator.validate(plan, &graph);

        Ok(PlanReport {
            violations,
            degraded: graph.degraded,
            skills_checked: skills.len(),
        })
    }

    /// Validate, and reorder only if something is out of order.
    pub fn repair(&self, plan: &[PlanSegment]) -> Result<RepairOutcome> {
        ensure_contiguous(plan)?;
        let skills = skill_ids(plan);
        let graph = self.source.snapshot(&skills)?;
        let violations_before = self.validator.validate(plan, &graph);

        if violations_before.is_empty() {
            debug!("plan has no violations, leaving order untouched");
            return Ok(RepairOutcome {
                segments: in_position_order(plan).into_iter().cloned().collect(),
                violations_before,
                changed: false,
                degraded: graph.degraded,
            });
        }

        let segments = self.reorderer.reorder(plan, &graph)?;
        let changed = in_position_order(plan)
            .into_iter()
            .zip(&segments)
            .any(|(old, new)| old.skill_id != new.skill_id || old.title != new.title);

        Ok(RepairOutcome {
            segments,
            violations_before,
            changed,
            degraded: graph.degraded,
        })
    }
}
