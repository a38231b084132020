//! Invariants of the graph store under arbitrary mutation sequences.

use proptest::prelude::*;

use skillgraph::SgError;
use skillgraph::core::{GraphStore, NewSkill, has_cycle};

const SKILLS: usize = 6;

fn id(i: usize) -> String {
    format!("s{i}")
}

fn store() -> GraphStore {
    let store = GraphStore::open_in_memory().unwrap();
    for i in 0..SKILLS {
        store
            .create_skill(NewSkill::new(id(i), format!("Skill {i}")).with_id(id(i)))
            .unwrap();
    }
    store
}

/// A `set_prerequisites` call: target index and candidate indices.
fn arb_update() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (0..SKILLS, prop::collection::vec(0..SKILLS, 0..4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn graph_stays_acyclic(updates in prop::collection::vec(arb_update(), 1..24)) {
        let store = store();
        for (target, candidates) in updates {
            let candidates: Vec<String> = candidates.into_iter().map(id).collect();
            let before = store.adjacency().unwrap();
            match store.set_prerequisites(&id(target), &candidates) {
                Ok(_) => {
                    prop_assert!(!has_cycle(&store.adjacency().unwrap()));
                }
                Err(_) => {
                    prop_assert_eq!(store.adjacency().unwrap(), before);
                }
            }
        }
        prop_assert!(store.find_cycle().unwrap().is_none());
    }

    #[test]
    fn self_reference_always_rejected(
        target in 0..SKILLS,
        others in prop::collection::vec(0..SKILLS + 3, 0..4),
        at in 0usize..5,
    ) {
        let store = store();
        // Indices past SKILLS are unknown ids.
        let mut candidates: Vec<String> = others.into_iter().map(id).collect();
        candidates.insert(at.min(candidates.len()), id(target));

        let err = store.set_prerequisites(&id(target), &candidates).unwrap_err();
        let is_self_reference = matches!(err, SgError::SelfReference { .. });
        prop_assert!(is_self_reference, "{err:?}");
    }

    #[test]
    fn unknown_candidate_rejected_without_writes(
        target in 0..SKILLS,
        known in prop::collection::vec(0..SKILLS, 0..3),
    ) {
        let store = store();
        let known: Vec<String> = known
            .into_iter()
            .filter(|&k| k != target)
            .map(id)
            .collect();
        let mut candidates = known;
        candidates.push("missing-skill".to_string());

        let before = store.adjacency().unwrap();
        let err = store.set_prerequisites(&id(target), &candidates).unwrap_err();
        let is_unknown = matches!(err, SgError::UnknownSkill { .. });
        prop_assert!(is_unknown, "{err:?}");
        prop_assert_eq!(store.adjacency().unwrap(), before);
    }
}
