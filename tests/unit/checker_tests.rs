use skillgraph::SgError;
use skillgraph::planning::{
    GraphSource, PlanOrderValidator, PlanSegment, PrerequisiteChecker, SkillGraphSnapshot,
    parse_plan,
};
use skillgraph::test_utils::fixtures::{UnitTestFixture, plan_of, skill_order};

/// C -> B -> A, with A also listing C directly.
fn chain_fixture() -> UnitTestFixture {
    let fixture = UnitTestFixture::new().unwrap();
    fixture
        .seed(&["A", "B", "C"], &[("A", &["B", "C"]), ("B", &["C"])])
        .unwrap();
    fixture
}

#[test]
fn reversed_chain_has_three_violations() {
    let fixture = chain_fixture();
    let checker = PrerequisiteChecker::new(&fixture.store);

    let report = checker.check(&plan_of(&["A", "B", "C"])).unwrap();

    let pairs: Vec<(&str, &str)> = report
        .violations
        .iter()
        .map(|v| {
            (
                v.dependent_skill_id.as_str(),
                v.prerequisite_skill_id.as_str(),
            )
        })
        .collect();
    assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
    assert_eq!(
        report.violations[0].message,
        "Skill Skill A at position 1 requires prerequisite Skill B which appears at position 2"
    );
    assert!(report.degraded.is_empty());
}

#[test]
fn prerequisite_first_plan_is_clean() {
    let fixture = chain_fixture();
    let report = PrerequisiteChecker::new(&fixture.store)
        .check(&plan_of(&["C", "B", "A"]))
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(report.skills_checked, 3);
}

#[test]
fn repair_puts_prerequisites_first() {
    let fixture = chain_fixture();
    let checker = PrerequisiteChecker::new(&fixture.store);

    let outcome = checker.repair(&plan_of(&["A", "B", "C"])).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.violations_before.len(), 3);
    assert_eq!(skill_order(&outcome.segments), vec!["C", "B", "A"]);
    assert!(checker.check(&outcome.segments).unwrap().is_clean());
}

#[test]
fn absent_prerequisite_never_violates() {
    let fixture = chain_fixture();
    let report = PrerequisiteChecker::new(&fixture.store)
        .check(&plan_of(&["A", "B"]))
        .unwrap();
    // C is not in the plan, so only A -> B counts.
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].prerequisite_skill_id, "B");
}

#[test]
fn unknown_plan_skill_is_degraded_not_fatal() {
    let fixture = chain_fixture();
    let report = PrerequisiteChecker::new(&fixture.store)
        .check(&plan_of(&["C", "ghost"]))
        .unwrap();
    assert!(report.is_clean());
    assert!(report.degraded.contains_key("ghost"));
}

#[test]
fn mixed_segments_from_a_plan_file() {
    let fixture = chain_fixture();
    let json = r#"{"segments": [
        {"position": 2, "title": "Warm-up"},
        {"position": 1, "skillId": "B", "title": "Second"},
        {"position": 3, "skillId": "C", "title": "First"}
    ]}"#;
    let plan = parse_plan(json).unwrap();

    let outcome = PrerequisiteChecker::new(&fixture.store)
        .repair(&plan)
        .unwrap();

    let titles: Vec<_> = outcome
        .segments
        .iter()
        .map(|s| s.title.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Warm-up"]);
    let positions: Vec<u32> = outcome.segments.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn plan_with_gap_is_rejected() {
    let fixture = chain_fixture();
    let plan = vec![PlanSegment::new(1, "A"), PlanSegment::new(3, "B")];
    assert!(matches!(
        PrerequisiteChecker::new(&fixture.store).check(&plan),
        Err(SgError::InvalidPlan(_))
    ));
}

#[test]
fn unsorted_validator_keeps_discovery_order() {
    let fixture = chain_fixture();
    let checker = PrerequisiteChecker::new(&fixture.store)
        .with_validator(PlanOrderValidator::new().sort_violations(false));
    let report = checker.check(&plan_of(&["B", "A", "C"])).unwrap();
    // B is seen first, so its violation comes first.
    assert_eq!(report.violations[0].dependent_skill_id, "B");
    assert_eq!(report.violations.len(), 2);
}

#[test]
fn local_snapshot_holds_direct_edges_and_names() {
    let fixture = chain_fixture();
    let snapshot: SkillGraphSnapshot = fixture
        .store
        .snapshot(&["A".to_string(), "A".to_string(), "B".to_string()])
        .unwrap();
    assert_eq!(snapshot.prerequisites_of("A"), ["B", "C"]);
    assert_eq!(snapshot.prerequisites_of("B"), ["C"]);
    assert_eq!(snapshot.name_of("C"), "Skill C");
    assert!(!snapshot.is_degraded());
}
