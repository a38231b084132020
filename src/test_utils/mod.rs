//! Shared test utilities for skillgraph.

pub mod fixtures;
pub mod logging;

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

impl<I, E> TestCase<I, E> {
    pub const fn new(name: &'static str, input: I, expected: E) -> Self {
        Self {
            name,
            input,
            expected,
        }
    }
}

/// Run table-driven tests, printing each case's input and outcome.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F)
where
    I: std::fmt::Debug,
    E: std::fmt::Debug + PartialEq,
    F: Fn(&I) -> E,
{
    for case in cases {
        let start = std::time::Instant::now();
        println!("[TEST] {}: {:?}", case.name, case.input);

        let actual = test_fn(&case.input);
        println!("[TEST] expected {:?}, got {:?} ({:?})", case.expected, actual, start.elapsed());

        assert_eq!(actual, case.expected, "case '{}' failed", case.name);
    }
}
