//! Property-based test suite entry point.

mod graph_properties;
mod plan_properties;
mod strategies;
