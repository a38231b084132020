use std::path::PathBuf;

use tempfile::TempDir;

use crate::core::{GraphStore, NewSkill, Skill};
use crate::error::Result;
use crate::planning::PlanSegment;

/// A store backed by a database file in its own temp directory.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
    pub store: GraphStore,
}

impl UnitTestFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let data_path = temp_dir.path().to_path_buf();
        let store = GraphStore::open(data_path.join("skills.db"))?;

        println!("[FIXTURE] Created store in {}", data_path.display());

        Ok(Self {
            temp_dir,
            data_path,
            store,
        })
    }

    /// Add a skill whose id and code are both `code`.
    pub fn skill(&self, code: &str) -> Result<Skill> {
        self.store
            .create_skill(NewSkill::new(code, format!("Skill {code}")).with_id(code))
    }

    /// Add every named skill, then every `(skill, prerequisites)` edge set.
    pub fn seed(&self, codes: &[&str], edges: &[(&str, &[&str])]) -> Result<()> {
        for code in codes {
            self.skill(code)?;
        }
        for (skill, prereqs) in edges {
            let prereqs: Vec<String> = prereqs.iter().map(|p| (*p).to_string()).collect();
            self.store.set_prerequisites(skill, &prereqs)?;
        }
        Ok(())
    }

    /// Write `segments` as a plan file and return its path.
    pub fn write_plan(&self, name: &str, segments: &[PlanSegment]) -> Result<PathBuf> {
        let path = self.data_path.join(name);
        std::fs::write(&path, serde_json::to_string_pretty(segments)?)?;
        Ok(path)
    }
}

/// Segments `1..=N` tagged with the given skill ids.
pub fn plan_of(skills: &[&str]) -> Vec<PlanSegment> {
    (1u32..)
        .zip(skills)
        .map(|(position, skill)| PlanSegment::new(position, *skill))
        .collect()
}

/// Skill ids of a plan in slice order; untagged segments show as `-`.
pub fn skill_order(plan: &[PlanSegment]) -> Vec<&str> {
    plan.iter().map(|s| s.skill().unwrap_or("-")).collect()
}
