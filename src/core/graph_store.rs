//! The authoritative skill-prerequisite graph.
//!
//! `GraphStore` owns the edge set for one catalog and keeps it acyclic across
//! every successful mutation. Writes are serialised twice: a process-local
//! mutex around the connection, and a `BEGIN IMMEDIATE` transaction so a
//! second process writing the same database file blocks until the first
//! commits. Validation reads the adjacency inside that transaction, so two
//! writers can never each approve half of a cycle.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::cycle::{Adjacency, CycleDetector};
use crate::core::skill::{NewSkill, Skill, SkillPatch};
use crate::error::{Result, SgError};
use crate::planning::{GraphSource, SkillGraphSnapshot};
use crate::storage::Database;

/// One bulk link: a skill code and the codes of its prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteLink {
    pub skill_code: String,
    #[serde(default)]
    pub prerequisite_codes: Vec<String>,
}

/// Result of [`GraphStore::link_by_code`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkReport {
    /// Codes whose prerequisites were replaced
    pub linked: Vec<String>,
    /// Skill codes that do not exist in the catalog
    pub unknown_skills: Vec<String>,
    /// Prerequisite codes that were dropped because they do not exist
    pub unknown_prerequisites: Vec<String>,
    /// Links refused by validation, with the reason
    pub rejected: Vec<LinkRejection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkRejection {
    pub skill_code: String,
    pub reason: String,
}

/// Cycle-safe store for skills and their prerequisite edges.
#[derive(Debug)]
pub struct GraphStore {
    db: Mutex<Database>,
}

impl GraphStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    // =========================================================================
    // Skills
    // =========================================================================

    pub fn create_skill(&self, new: NewSkill) -> Result<Skill> {
        let code = new.code.trim();
        let name = new.name.trim();
        if code.is_empty() || name.is_empty() {
            return Err(SgError::ValidationFailed(
                "skill code and name must not be empty".to_string(),
            ));
        }
        let new = NewSkill {
            code: code.to_string(),
            name: name.to_string(),
            ..new
        };

        let db = self.db.lock();
        let skill = db.immediate(|db| {
            if db.get_skill_by_code(&new.code)?.is_some() {
                return Err(SgError::ValidationFailed(format!(
                    "skill code '{}' already exists",
                    new.code
                )));
            }
            if let Some(id) = &new.id {
                if db.get_skill(id)?.is_some() {
                    return Err(SgError::ValidationFailed(format!(
                        "skill id '{id}' already exists"
                    )));
                }
            }
            db.insert_skill(&new)
        })?;

        info!(skill_id = %skill.id, code = %skill.code, "created skill");
        Ok(skill)
    }

    pub fn get_skill(&self, skill_id: &str) -> Result<Skill> {
        self.db
            .lock()
            .get_skill(skill_id)?
            .ok_or_else(|| SgError::SkillNotFound(skill_id.to_string()))
    }

    /// Look a skill up by id, then by code.
    pub fn find_skill(&self, id_or_code: &str) -> Result<Skill> {
        let db = self.db.lock();
        if let Some(skill) = db.get_skill(id_or_code)? {
            return Ok(skill);
        }
        db.get_skill_by_code(id_or_code)?
            .ok_or_else(|| SgError::SkillNotFound(id_or_code.to_string()))
    }

    /// Map each id or code to a skill id. References that match no skill
    /// are kept as given so `set_prerequisites` reports them as unknown.
    pub fn resolve_references(&self, references: &[String]) -> Result<Vec<String>> {
        resolve_each(references, |reference| self.find_skill(reference))
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        self.db.lock().list_skills()
    }

    /// Change a skill's name, description or level. Prerequisite edges are
    /// left as they are.
    pub fn update_skill(&self, skill_id: &str, patch: SkillPatch) -> Result<Skill> {
        let name = patch.name.map(|name| name.trim().to_string());
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(SgError::ValidationFailed(
                "skill name must not be empty".to_string(),
            ));
        }
        let patch = SkillPatch {
            name,
            description: patch.description.map(|d| d.trim().to_string()),
            level: patch.level.map(|l| l.trim().to_string()),
        };

        let db = self.db.lock();
        let skill = db.immediate(|db| {
            if !db.update_skill(skill_id, &patch)? {
                return Err(SgError::SkillNotFound(skill_id.to_string()));
            }
            db.get_skill(skill_id)?
                .ok_or_else(|| SgError::SkillNotFound(skill_id.to_string()))
        })?;

        info!(skill_id, code = %skill.code, "updated skill");
        Ok(skill)
    }

    /// Delete a skill together with every edge touching it.
    pub fn delete_skill(&self, skill_id: &str) -> Result<()> {
        let removed = self
            .db
            .lock()
            .immediate(|db| db.delete_skill(skill_id))?;
        if !removed {
            return Err(SgError::SkillNotFound(skill_id.to_string()));
        }
        info!(skill_id, "deleted skill");
        Ok(())
    }

    // =========================================================================
    // Prerequisites
    // =========================================================================

    /// Replace the prerequisite set of `skill_id` with `candidates`.
    ///
    /// Checks run in order and the first failure wins: the skill must exist,
    /// must not list itself, every candidate must exist, and the resulting
    /// graph must stay acyclic. Nothing is written unless all pass.
    /// Duplicate candidates are collapsed.
    pub fn set_prerequisites(&self, skill_id: &str, candidates: &[String]) -> Result<Skill> {
        let candidates = dedup(candidates);

        let db = self.db.lock();
        let skill = db.immediate(|db| {
            let mut skill = db
                .get_skill(skill_id)?
                .ok_or_else(|| SgError::SkillNotFound(skill_id.to_string()))?;

            if candidates.iter().any(|c| c == skill_id) {
                return Err(SgError::SelfReference {
                    skill_id: skill_id.to_string(),
                });
            }

            let missing = db.missing_skill_ids(&candidates)?;
            if !missing.is_empty() {
                return Err(SgError::UnknownSkill {
                    skill_id: skill_id.to_string(),
                    missing,
                });
            }

            let mut proposed = db.load_adjacency()?;
            proposed.insert(skill_id.to_string(), candidates.clone());
            // The stored graph is acyclic, so a new cycle has to pass
            // through the edges just replaced.
            if let Some(detected_at) = CycleDetector::new(&proposed).find_cycle_from(skill_id) {
                return Err(SgError::Cycle {
                    skill_id: skill_id.to_string(),
                    detected_at,
                });
            }

            db.replace_prerequisites(skill_id, &candidates)?;
            skill.updated_at = db.touch_skill(skill_id)?;
            let mut prerequisites = candidates.clone();
            prerequisites.sort();
            skill.prerequisites = prerequisites;
            Ok(skill)
        });

        match &skill {
            Ok(skill) => info!(
                skill_id,
                count = skill.prerequisites.len(),
                "replaced prerequisites"
            ),
            Err(err) => debug!(skill_id, error = %err, "rejected prerequisite update"),
        }
        skill
    }

    /// Direct prerequisites of `skill_id`, sorted by code.
    pub fn get_prerequisites(&self, skill_id: &str) -> Result<Vec<Skill>> {
        let db = self.db.lock();
        let skill = db
            .get_skill(skill_id)?
            .ok_or_else(|| SgError::SkillNotFound(skill_id.to_string()))?;

        let mut prerequisites = Vec::with_capacity(skill.prerequisites.len());
        for id in &skill.prerequisites {
            // Cascading deletes keep edges consistent, so this only misses
            // if the row vanished between the two reads.
            if let Some(prereq) = db.get_skill(id)? {
                prerequisites.push(prereq);
            }
        }
        prerequisites.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(prerequisites)
    }

    /// The whole edge set.
    pub fn adjacency(&self) -> Result<Adjacency> {
        self.db.lock().load_adjacency()
    }

    /// Scan the stored graph for a cycle.
    ///
    /// Always `None` for a graph only ever mutated through this store; a hit
    /// means the database was edited underneath it.
    pub fn find_cycle(&self) -> Result<Option<String>> {
        let graph = self.adjacency()?;
        Ok(CycleDetector::new(&graph).find_cycle())
    }

    /// SQLite `integrity_check` on the backing database.
    pub fn integrity_check(&self) -> Result<bool> {
        self.db.lock().integrity_check()
    }

    /// Apply code-based prerequisite links in order.
    ///
    /// Unknown skill codes are skipped and unknown prerequisite codes are
    /// dropped from their link. Each surviving link goes through
    /// [`set_prerequisites`](Self::set_prerequisites), so a link that would
    /// close a cycle is rejected on its own without affecting the others.
    pub fn link_by_code(&self, links: &[PrerequisiteLink]) -> Result<LinkReport> {
        let by_code: BTreeMap<String, String> = self
            .list_skills()?
            .into_iter()
            .map(|skill| (skill.code, skill.id))
            .collect();

        let mut report = LinkReport::default();
        for link in links {
            let Some(skill_id) = by_code.get(&link.skill_code) else {
                warn!(code = %link.skill_code, "skipping link for unknown skill code");
                report.unknown_skills.push(link.skill_code.clone());
                continue;
            };

            let mut prerequisite_ids = Vec::with_capacity(link.prerequisite_codes.len());
            for code in &link.prerequisite_codes {
                match by_code.get(code) {
                    Some(id) => prerequisite_ids.push(id.clone()),
                    None => report.unknown_prerequisites.push(code.clone()),
                }
            }

            match self.set_prerequisites(skill_id, &prerequisite_ids) {
                Ok(_) => report.linked.push(link.skill_code.clone()),
                Err(
                    err @ (SgError::SelfReference { .. }
                    | SgError::UnknownSkill { .. }
                    | SgError::Cycle { .. }
                    | SgError::SkillNotFound(_)),
                ) => {
                    warn!(code = %link.skill_code, error = %err, "link rejected");
                    report.rejected.push(LinkRejection {
                        skill_code: link.skill_code.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            linked = report.linked.len(),
            rejected = report.rejected.len(),
            "applied prerequisite links"
        );
        Ok(report)
    }
}

impl GraphSource for GraphStore {
    /// Local snapshot: direct prerequisites of each requested skill, with
    /// names for every skill involved. Ids unknown to the catalog are marked
    /// degraded and contribute no edges.
    fn snapshot(&self, skill_ids: &[String]) -> Result<SkillGraphSnapshot> {
        let db = self.db.lock();
        let names = db.skill_names()?;
        let mut graph = db.load_adjacency()?;

        let mut snapshot = SkillGraphSnapshot::new();
        for id in dedup(skill_ids) {
            if !names.contains_key(&id) {
                snapshot.mark_degraded(id.clone(), "skill not found in catalog");
                snapshot.insert(id, Vec::new());
                continue;
            }
            let mut prerequisites = graph.remove(&id).unwrap_or_default();
            prerequisites.sort();
            for prereq in std::iter::once(&id).chain(&prerequisites) {
                if let Some(name) = names.get(prereq) {
                    snapshot.record_name(prereq.clone(), name.clone());
                }
            }
            snapshot.insert(id, prerequisites);
        }

        debug!(
            skills = snapshot.prerequisites.len(),
            edges = snapshot.edge_count(),
            "built local skill graph"
        );
        Ok(snapshot)
    }
}

fn resolve_each(
    references: &[String],
    lookup: impl Fn(&str) -> Result<Skill>,
) -> Result<Vec<String>> {
    references
        .iter()
        .map(|reference| match lookup(reference) {
            Ok(skill) => Ok(skill.id),
            Err(SgError::SkillNotFound(_)) => Ok(reference.clone()),
            Err(err) => Err(err),
        })
        .collect()
}

/// Drop repeated ids, keeping the first occurrence.
fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
