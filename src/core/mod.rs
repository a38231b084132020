//! Core skill types, cycle detection and the graph store

pub mod cycle;
pub mod graph_store;
pub mod skill;

pub use cycle::{Adjacency, CycleDetector, has_cycle};
pub use graph_store::{GraphStore, LinkReport, LinkRejection, PrerequisiteLink};
pub use skill::{NewSkill, Skill, SkillPatch, SkillSummary};
