//! Validator and reorderer properties over random DAGs and plans.

use proptest::prelude::*;

use skillgraph::planning::{PlanOrderValidator, PlanReorderer, PlanSegment};

use crate::strategies::{arb_graph_and_plan, arb_graph_and_valid_plan};

proptest! {
    #[test]
    fn reorder_leaves_no_violations((graph, plan) in arb_graph_and_plan()) {
        let reordered = PlanReorderer::new().reorder(&plan, &graph).unwrap();
        prop_assert_eq!(reordered.len(), plan.len());
        prop_assert!(PlanOrderValidator::new().validate(&reordered, &graph).is_empty());
        let positions: Vec<u32> = reordered.iter().map(|s| s.position).collect();
        prop_assert_eq!(positions, (1u32..).take(plan.len()).collect::<Vec<_>>());
    }

    #[test]
    fn valid_plan_is_returned_unchanged((graph, plan) in arb_graph_and_valid_plan()) {
        prop_assert!(PlanOrderValidator::new().validate(&plan, &graph).is_empty());
        let reordered = PlanReorderer::new().reorder(&plan, &graph).unwrap();
        prop_assert_eq!(reordered, plan);
    }

    #[test]
    fn reorder_is_idempotent((graph, plan) in arb_graph_and_plan()) {
        let once = PlanReorderer::new().reorder(&plan, &graph).unwrap();
        let twice = PlanReorderer::new().reorder(&once, &graph).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn absent_prerequisites_never_violate((graph, plan) in arb_graph_and_plan()) {
        let planned: Vec<&str> = plan.iter().filter_map(PlanSegment::skill).collect();
        for violation in PlanOrderValidator::new().validate(&plan, &graph) {
            prop_assert!(planned.contains(&violation.prerequisite_skill_id.as_str()));
            prop_assert!(violation.prerequisite_position.is_some());
        }
    }

    #[test]
    fn violations_are_sorted_by_position((graph, plan) in arb_graph_and_plan()) {
        let violations = PlanOrderValidator::new().validate(&plan, &graph);
        let keys: Vec<_> = violations
            .iter()
            .map(|v| (v.dependent_position, v.prerequisite_position))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys, sorted);
    }
}
