//! Remote catalog access.
//!
//! The catalog service owns the authoritative graph; this side only reads
//! it, one skill at a time, and tolerates the service being unreachable.

pub mod client;

pub use client::{DegradedReason, FetchOutcome, GraphClient};
