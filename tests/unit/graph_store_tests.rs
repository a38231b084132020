use std::sync::Barrier;
use std::thread;

use skillgraph::SgError;
use skillgraph::core::{GraphStore, PrerequisiteLink, has_cycle};
use skillgraph::test_utils::fixtures::UnitTestFixture;
use skillgraph::test_utils::logging::TestLogger;
use skillgraph::test_utils::{TestCase, run_table_tests};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Error kind of a `set_prerequisites` call, or "ok".
fn outcome(result: skillgraph::Result<skillgraph::core::Skill>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(SgError::SelfReference { .. }) => "self_reference",
        Err(SgError::UnknownSkill { .. }) => "unknown_skill",
        Err(SgError::Cycle { .. }) => "cycle",
        Err(SgError::SkillNotFound(_)) => "skill_not_found",
        Err(_) => "other",
    }
}

#[test]
fn set_prerequisites_rejections_table() {
    let log = TestLogger::new("set_prerequisites_rejections_table");
    let fixture = UnitTestFixture::new().unwrap();
    // a -> b -> c
    fixture
        .seed(&["a", "b", "c", "d"], &[("a", &["b"]), ("b", &["c"])])
        .unwrap();

    run_table_tests(
        vec![
            TestCase::new("self only", ("a", ids(&["a"])), "self_reference"),
            TestCase::new("self among others", ("d", ids(&["c", "d"])), "self_reference"),
            TestCase::new("unknown", ("d", ids(&["zz"])), "unknown_skill"),
            TestCase::new("closes chain", ("c", ids(&["a"])), "cycle"),
            TestCase::new("two-cycle", ("b", ids(&["a"])), "cycle"),
            TestCase::new("missing skill", ("nope", ids(&["a"])), "skill_not_found"),
            TestCase::new("parallel edge", ("d", ids(&["a", "c"])), "ok"),
        ],
        |(skill, candidates)| outcome(fixture.store.set_prerequisites(skill, candidates)),
    );
    log.pass();
}

#[test]
fn self_reference_wins_over_unknown() {
    let fixture = UnitTestFixture::new().unwrap();
    fixture.seed(&["a"], &[]).unwrap();

    let err = fixture
        .store
        .set_prerequisites("a", &ids(&["ghost", "a"]))
        .unwrap_err();
    assert!(matches!(err, SgError::SelfReference { .. }));
}

#[test]
fn rejected_update_leaves_edges_unchanged() {
    let fixture = UnitTestFixture::new().unwrap();
    fixture
        .seed(&["a", "b", "c"], &[("a", &["b"]), ("b", &["c"])])
        .unwrap();
    let before = fixture.store.adjacency().unwrap();

    assert!(fixture.store.set_prerequisites("b", &ids(&["c", "ghost"])).is_err());
    assert!(fixture.store.set_prerequisites("c", &ids(&["a"])).is_err());
    assert!(fixture.store.set_prerequisites("b", &ids(&["b"])).is_err());

    assert_eq!(fixture.store.adjacency().unwrap(), before);
}

#[test]
fn concurrent_writers_cannot_close_a_cycle() {
    let log = TestLogger::new("concurrent_writers_cannot_close_a_cycle");
    let fixture = UnitTestFixture::new().unwrap();
    fixture.seed(&["a", "b"], &[]).unwrap();

    // Separate connections to one file, as two processes would have.
    let db_path = fixture.data_path.join("skills.db");
    let first = GraphStore::open(&db_path).unwrap();
    let second = GraphStore::open(&db_path).unwrap();

    for round in 0..20 {
        fixture.store.set_prerequisites("a", &[]).unwrap();
        fixture.store.set_prerequisites("b", &[]).unwrap();

        let barrier = Barrier::new(2);
        let (left, right) = thread::scope(|scope| {
            let left = scope.spawn(|| {
                barrier.wait();
                first.set_prerequisites("a", &ids(&["b"]))
            });
            let right = scope.spawn(|| {
                barrier.wait();
                second.set_prerequisites("b", &ids(&["a"]))
            });
            (left.join().unwrap(), right.join().unwrap())
        });

        let outcomes = [outcome(left), outcome(right)];
        log.log_actual(&(round, outcomes));
        assert!(
            outcomes == ["ok", "cycle"] || outcomes == ["cycle", "ok"],
            "round {round}: {outcomes:?}"
        );
        assert!(!has_cycle(&fixture.store.adjacency().unwrap()));
    }
    log.pass();
}

#[test]
fn cycle_error_names_detection_point() {
    let fixture = UnitTestFixture::new().unwrap();
    fixture
        .seed(&["a", "b", "c"], &[("a", &["b"]), ("b", &["c"])])
        .unwrap();

    let err = fixture
        .store
        .set_prerequisites("c", &ids(&["a"]))
        .unwrap_err();
    match err {
        SgError::Cycle {
            skill_id,
            detected_at,
        } => {
            assert_eq!(skill_id, "c");
            assert!(["a", "b", "c"].contains(&detected_at.as_str()));
        }
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn empty_list_clears_and_reopen_keeps_edges() {
    let fixture = UnitTestFixture::new().unwrap();
    fixture
        .seed(&["a", "b", "c"], &[("a", &["b", "c"])])
        .unwrap();
    assert_eq!(fixture.store.get_skill("a").unwrap().prerequisites, ids(&["b", "c"]));

    fixture.store.set_prerequisites("a", &[]).unwrap();
    assert!(fixture.store.get_prerequisites("a").unwrap().is_empty());

    fixture.store.set_prerequisites("a", &ids(&["c"])).unwrap();
    let reopened = GraphStore::open(fixture.data_path.join("skills.db")).unwrap();
    assert_eq!(reopened.get_skill("a").unwrap().prerequisites, ids(&["c"]));
}

#[test]
fn removing_a_skill_drops_its_edges() {
    let fixture = UnitTestFixture::new().unwrap();
    fixture
        .seed(&["a", "b", "c"], &[("a", &["b"]), ("b", &["c"])])
        .unwrap();

    fixture.store.delete_skill("b").unwrap();

    assert!(fixture.store.get_skill("a").unwrap().prerequisites.is_empty());
    assert!(fixture.store.find_cycle().unwrap().is_none());
    assert!(matches!(
        fixture.store.delete_skill("b"),
        Err(SgError::SkillNotFound(_))
    ));
}

#[test]
fn link_by_code_reports_each_outcome() {
    let fixture = UnitTestFixture::new().unwrap();
    fixture.seed(&["ALG", "ARITH", "CALC"], &[]).unwrap();

    let links = vec![
        PrerequisiteLink {
            skill_code: "ALG".to_string(),
            prerequisite_codes: ids(&["ARITH", "GEOMETRY"]),
        },
        PrerequisiteLink {
            skill_code: "PHYS".to_string(),
            prerequisite_codes: ids(&["CALC"]),
        },
        PrerequisiteLink {
            skill_code: "CALC".to_string(),
            prerequisite_codes: ids(&["ALG"]),
        },
        PrerequisiteLink {
            skill_code: "ARITH".to_string(),
            prerequisite_codes: ids(&["CALC"]),
        },
    ];
    let report = fixture.store.link_by_code(&links).unwrap();

    assert_eq!(report.linked, ids(&["ALG", "CALC"]));
    assert_eq!(report.unknown_skills, ids(&["PHYS"]));
    assert_eq!(report.unknown_prerequisites, ids(&["GEOMETRY"]));
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].skill_code, "ARITH");
    assert!(fixture.store.find_cycle().unwrap().is_none());
}
