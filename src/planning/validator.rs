//! Detects prerequisites scheduled at or after the skills that need them.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::PlanningConfig;

use super::types::{PlanSegment, SkillGraphSnapshot, Violation, in_position_order};

/// Checks a plan against a graph snapshot.
///
/// When a skill occurs in several segments its earliest position counts.
/// Prerequisites that are not in the plan at all are assumed to be known
/// already and never produce a violation.
#[derive(Debug, Clone, Copy)]
pub struct PlanOrderValidator {
    sort_violations: bool,
}

impl Default for PlanOrderValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanOrderValidator {
    pub const fn new() -> Self {
        Self {
            sort_violations: true,
        }
    }

    pub const fn from_config(config: &PlanningConfig) -> Self {
        Self {
            sort_violations: config.sort_violations,
        }
    }

    /// Sort output by (dependent position, prerequisite position,
    /// prerequisite id). Off means discovery order: dependents by first
    /// occurrence, prerequisites in snapshot order.
    #[must_use]
    pub const fn sort_violations(mut self, enabled: bool) -> Self {
        self.sort_violations = enabled;
        self
    }

    pub fn validate(&self, plan: &[PlanSegment], graph: &SkillGraphSnapshot) -> Vec<Violation> {
        if plan.is_empty() {
            debug!("plan has no segments, skipping prerequisite validation");
            return Vec::new();
        }

        let (first_seen, positions) = first_positions(plan);

        let mut violations = Vec::new();
        for (skill_id, position) in first_seen {
            for prereq_id in graph.prerequisites_of(skill_id) {
                let Some(&prereq_position) = positions.get(prereq_id.as_str()) else {
                    continue;
                };
                if prereq_position < position {
                    continue;
                }

                let dependent_name = graph.name_of(skill_id);
                let prereq_name = graph.name_of(prereq_id);
                let violation = Violation {
                    dependent_skill_id: skill_id.to_string(),
                    dependent_skill_name: dependent_name.to_string(),
                    dependent_position: position,
                    prerequisite_skill_id: prereq_id.clone(),
                    prerequisite_skill_name: prereq_name.to_string(),
                    prerequisite_position: Some(prereq_position),
                    message: format!(
                        "Skill {dependent_name} at position {position} requires prerequisite {prereq_name} which appears at position {prereq_position}"
                    ),
                };
                warn!("prerequisite violation: {}", violation.message);
                violations.push(violation);
            }
        }

        if self.sort_violations {
            violations.sort_by(|a, b| {
                (a.dependent_position, a.prerequisite_position, &a.prerequisite_skill_id).cmp(&(
                    b.dependent_position,
                    b.prerequisite_position,
                    &b.prerequisite_skill_id,
                ))
            });
        }

        info!(
            violations = violations.len(),
            "prerequisite validation complete"
        );
        violations
    }
}

/// Skill -> earliest position, plus the skills in first-occurrence order.
fn first_positions(plan: &[PlanSegment]) -> (Vec<(&str, u32)>, HashMap<&str, u32>) {
    let mut order = Vec::new();
    let mut positions = HashMap::new();
    for segment in in_position_order(plan) {
        if let Some(skill_id) = segment.skill() {
            positions.entry(skill_id).or_insert_with(|| {
                order.push((skill_id, segment.position));
                segment.position
            });
        }
    }
    (order, positions)
}
