//! Unit test suite entry point.

mod checker_tests;
mod client_tests;
mod config_tests;
mod graph_store_tests;
