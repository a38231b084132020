//! Plan ordering against the prerequisite graph.
//!
//! Everything here works on a borrowed [`SkillGraphSnapshot`] and a
//! caller-owned plan. Snapshots come from any [`GraphSource`]: the local
//! [`GraphStore`](crate::core::GraphStore) or the remote
//! [`GraphClient`](crate::catalog::GraphClient).

pub mod checker;
pub mod reorder;
pub mod types;
pub mod validator;

pub use checker::{PlanReport, PrerequisiteChecker, RepairOutcome};
pub use reorder::PlanReorderer;
pub use types::{
    GraphSource, PlanDocument, PlanSegment, SkillGraphSnapshot, Violation, ensure_contiguous,
    parse_plan,
};
pub use validator::PlanOrderValidator;
