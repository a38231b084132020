use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use skillgraph::catalog::GraphClient;
use skillgraph::config::GraphClientConfig;
use skillgraph::planning::PrerequisiteChecker;
use skillgraph::test_utils::fixtures::{plan_of, skill_order};

fn client_for(server: &MockServer) -> GraphClient {
    GraphClient::from_config(&GraphClientConfig::with_base_url(server.base_url())).unwrap()
}

fn serve_chain(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/skills/A/prerequisites");
        then.status(200).json_body(json!([
            {"id": "B", "code": "B", "name": "Fractions"},
            {"id": "C", "code": "C", "name": "Counting"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/skills/B/prerequisites");
        then.status(200)
            .json_body(json!([{"id": "C", "code": "C", "name": "Counting"}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/skills/C/prerequisites");
        then.status(200).json_body(json!([]));
    });
}

#[test]
fn remote_graph_drives_validation() {
    let server = MockServer::start();
    serve_chain(&server);

    let checker = PrerequisiteChecker::new(client_for(&server));
    let report = checker.check(&plan_of(&["A", "B", "C"])).unwrap();

    assert_eq!(report.violations.len(), 3);
    assert!(report.violations[0].message.contains("prerequisite Fractions"));
    assert!(report.degraded.is_empty());
}

#[test]
fn remote_graph_drives_reorder() {
    let server = MockServer::start();
    serve_chain(&server);

    let outcome = PrerequisiteChecker::new(client_for(&server))
        .repair(&plan_of(&["A", "B", "C"]))
        .unwrap();
    assert_eq!(skill_order(&outcome.segments), vec!["C", "B", "A"]);
}

#[test]
fn duplicate_plan_skills_fetch_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/skills/A/prerequisites");
        then.status(200).json_body(json!([]));
    });

    PrerequisiteChecker::new(client_for(&server))
        .check(&plan_of(&["A", "A", "A"]))
        .unwrap();
    mock.assert();
}

#[test]
fn unreachable_catalog_validates_clean_but_degraded() {
    let client = GraphClient::new(
        "http://127.0.0.1:1",
        Duration::from_secs(1),
        Duration::from_secs(1),
    )
    .unwrap();

    let report = PrerequisiteChecker::new(client)
        .check(&plan_of(&["A", "B"]))
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.degraded.len(), 2);
}

#[test]
fn partial_outage_keeps_the_edges_it_got() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/skills/A/prerequisites");
        then.status(200).json_body(json!([{"id": "B"}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/skills/B/prerequisites");
        then.status(502);
    });

    let report = PrerequisiteChecker::new(client_for(&server))
        .check(&plan_of(&["A", "B"]))
        .unwrap();

    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].prerequisite_skill_name, "B");
    assert_eq!(
        report.degraded.get("B").map(String::as_str),
        Some("catalog returned HTTP 502")
    );
}
