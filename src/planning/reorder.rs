//! Reorders a plan so every prerequisite comes before its dependents.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{Result, SgError};

use super::types::{PlanSegment, SkillGraphSnapshot, in_position_order, skill_ids};
use super::validator::PlanOrderValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Topological reordering of plan segments.
///
/// Only edges between skills present in the plan are considered. Skills
/// are explored in first-occurrence order and each skill's prerequisites in
/// plan order. A plan with no violations comes back unchanged, repeated
/// skills included. Otherwise segments without a skill sort last, every tie
/// keeps its relative order, and repeated segments for one skill share a
/// rank and end up grouped behind the first of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanReorderer;

impl PlanReorderer {
    pub const fn new() -> Self {
        Self
    }

    /// Return the segments in prerequisite order, renumbered `1..=N`.
    ///
    /// Fails with `ReorderImpossible` if the prerequisites among the plan's
    /// skills are cyclic; no partial order is returned.
    pub fn reorder(
        &self,
        plan: &[PlanSegment],
        graph: &SkillGraphSnapshot,
    ) -> Result<Vec<PlanSegment>> {
        if plan.is_empty() {
            return Ok(Vec::new());
        }

        if PlanOrderValidator::new().validate(plan, graph).is_empty() {
            debug!(segments = plan.len(), "plan already in prerequisite order");
            return Ok(renumber(in_position_order(plan)));
        }

        let skills = skill_ids(plan);
        let index: HashMap<&str, usize> = skills
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        // Filtered subgraph over plan indices, prerequisites in plan order.
        let edges: Vec<Vec<usize>> = skills
            .iter()
            .map(|id| {
                let mut prereqs: Vec<usize> = graph
                    .prerequisites_of(id)
                    .iter()
                    .filter_map(|p| index.get(p.as_str()).copied())
                    .collect();
                prereqs.sort_unstable();
                prereqs.dedup();
                prereqs
            })
            .collect();

        let order = topological_order(&edges).map_err(|at| SgError::ReorderImpossible {
            skill_id: skills[at].clone(),
        })?;

        let mut rank = vec![0usize; skills.len()];
        for (position, &node) in order.iter().enumerate() {
            rank[node] = position;
        }

        let mut ordered = in_position_order(plan);
        ordered.sort_by_key(|segment| {
            segment
                .skill()
                .and_then(|id| index.get(id))
                .map_or(usize::MAX, |&i| rank[i])
        });

        let reordered = renumber(ordered);
        info!(
            segments = reordered.len(),
            moved = plan_moves(plan, &reordered),
            "reordered plan to satisfy prerequisites"
        );
        Ok(reordered)
    }
}

fn renumber(segments: Vec<&PlanSegment>) -> Vec<PlanSegment> {
    (1u32..)
        .zip(segments)
        .map(|(position, segment)| PlanSegment {
            position,
            ..segment.clone()
        })
        .collect()
}

/// Postorder DFS over `edges` (node -> prerequisites), roots in index order.
///
/// Returns nodes prerequisites-first, or the node that was reached again
/// while still on the DFS path.
fn topological_order(edges: &[Vec<usize>]) -> std::result::Result<Vec<usize>, usize> {
    let mut marks = vec![Mark::Unvisited; edges.len()];
    let mut order = Vec::with_capacity(edges.len());
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..edges.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::Visiting;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            frame.1 += 1;

            match edges[node].get(cursor) {
                Some(&next) => match marks[next] {
                    Mark::Visiting => return Err(next),
                    Mark::Done => {}
                    Mark::Unvisited => {
                        marks[next] = Mark::Visiting;
                        stack.push((next, 0));
                    }
                },
                None => {
                    marks[node] = Mark::Done;
                    order.push(node);
                    stack.pop();
                }
            }
        }
    }

    Ok(order)
}

/// Number of segments whose position changed.
fn plan_moves(before: &[PlanSegment], after: &[PlanSegment]) -> usize {
    in_position_order(before)
        .iter()
        .zip(after)
        .filter(|(old, new)| old.skill_id != new.skill_id || old.title != new.title)
        .count()
}
