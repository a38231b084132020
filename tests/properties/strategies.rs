//! Shared generators for graph and plan properties.

use proptest::prelude::*;
use proptest::sample::Index;

use skillgraph::planning::{PlanSegment, SkillGraphSnapshot};

/// Acyclic graph over `s0..s{n}`: each skill depends only on lower indices.
pub fn arb_dag() -> impl Strategy<Value = SkillGraphSnapshot> {
    (1usize..10)
        .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(any::<bool>(), n), n))
        .prop_map(|matrix| {
            SkillGraphSnapshot::from_edges(matrix.iter().enumerate().map(|(i, row)| {
                let prereqs: Vec<String> = row
                    .iter()
                    .take(i)
                    .enumerate()
                    .filter(|(_, edge)| **edge)
                    .map(|(j, _)| format!("s{j}"))
                    .collect();
                (format!("s{i}"), prereqs)
            }))
        })
}

fn numbered(entries: Vec<Option<String>>) -> Vec<PlanSegment> {
    (1u32..)
        .zip(entries)
        .map(|(position, entry)| match entry {
            Some(id) => PlanSegment::new(position, id),
            None => PlanSegment::untagged(position, "Review"),
        })
        .collect()
}

/// A graph with a plan over a shuffled subset of its skills, possibly with
/// untagged segments mixed in.
pub fn arb_graph_and_plan() -> impl Strategy<Value = (SkillGraphSnapshot, Vec<PlanSegment>)> {
    arb_dag().prop_flat_map(|graph| {
        let ids: Vec<String> = graph.prerequisites.keys().cloned().collect();
        let len = ids.len();
        (
            Just(graph),
            prop::sample::subsequence(ids, 0..=len).prop_shuffle(),
            0usize..3,
        )
            .prop_map(|(graph, ids, untagged)| {
                let mut entries: Vec<Option<String>> = vec![None; untagged];
                entries.extend(ids.into_iter().map(Some));
                (graph, numbered(entries))
            })
    })
}

/// A graph with a plan that already satisfies it. Skills appear in index
/// order; repeats of a skill are inserted anywhere after its first segment
/// and untagged segments anywhere at all.
pub fn arb_graph_and_valid_plan() -> impl Strategy<Value = (SkillGraphSnapshot, Vec<PlanSegment>)>
{
    arb_dag().prop_flat_map(|graph| {
        let mut ids: Vec<String> = graph.prerequisites.keys().cloned().collect();
        ids.sort_by_key(|id| id[1..].parse::<usize>().unwrap_or(usize::MAX));
        let len = ids.len();
        (
            Just(graph),
            prop::sample::subsequence(ids, 0..=len),
            prop::collection::vec((any::<Index>(), any::<Index>()), 0..6),
            prop::collection::vec(any::<Index>(), 0..3),
        )
            .prop_map(|(graph, ids, repeats, untagged)| {
                let mut entries: Vec<Option<String>> = ids.iter().cloned().map(Some).collect();
                if !ids.is_empty() {
                    for (pick, at) in repeats {
                        let id = pick.get(&ids).clone();
                        let first = entries
                            .iter()
                            .position(|e| e.as_deref() == Some(id.as_str()))
                            .unwrap_or(0);
                        let offset = at.index(entries.len() - first);
                        entries.insert(first + 1 + offset, Some(id));
                    }
                }
                for at in untagged {
                    let index = at.index(entries.len() + 1);
                    entries.insert(index, None);
                }
                (graph, numbered(entries))
            })
    })
}
