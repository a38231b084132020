//! SQLite database layer

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::core::cycle::Adjacency;
use crate::core::skill::{NewSkill, Skill, SkillPatch};
use crate::error::{Result, SgError};
use crate::storage::migrations;

const SKILL_COLUMNS: &str = "id, code, name, description, level, created_at, updated_at";

/// SQLite database wrapper for the skill catalog and its prerequisite edges
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (tests, scratch catalogs).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            schema_version,
        })
    }

    /// Get a reference to the connection
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so reads made inside `f` cannot be
    /// invalidated by another writer before the commit. Any error from `f`
    /// rolls the transaction back.
    pub fn immediate<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.conn
            .execute_batch("BEGIN IMMEDIATE;")
            .map_err(|err| SgError::TransactionFailed(format!("begin: {err}")))?;

        let outcome = f(self).and_then(|value| {
            self.conn
                .execute_batch("COMMIT;")
                .map_err(|err| SgError::TransactionFailed(format!("commit: {err}")))?;
            Ok(value)
        });

        if outcome.is_err() && !self.conn.is_autocommit() {
            if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
                tracing::warn!(error = %err, "rollback failed");
            }
        }
        outcome
    }

    // =========================================================================
    // Skills
    // =========================================================================

    /// Insert a skill. A v4 UUID is generated when `new.id` is absent.
    pub fn insert_skill(&self, new: &NewSkill) -> Result<Skill> {
        let id = new
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO skills (id, code, name, description, level, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![id, new.code, new.name, new.description, new.level, now],
        )?;

        Ok(Skill {
            id,
            code: new.code.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            level: new.level.clone(),
            prerequisites: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get_skill(&self, id: &str) -> Result<Option<Skill>> {
        let skill = self
            .conn
            .query_row(
                &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = ?1"),
                [id],
                skill_from_row,
            )
            .optional()?;
        self.with_prerequisites(skill)
    }

    pub fn get_skill_by_code(&self, code: &str) -> Result<Option<Skill>> {
        let skill = self
            .conn
            .query_row(
                &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE code = ?1"),
                [code],
                skill_from_row,
            )
            .optional()?;
        self.with_prerequisites(skill)
    }

    /// All skills ordered by code, with their direct prerequisites.
    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SKILL_COLUMNS} FROM skills ORDER BY code"))?;
        let mut skills = stmt
            .query_map([], skill_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut edges = self.load_adjacency()?;
        for skill in &mut skills {
            if let Some(mut prereqs) = edges.remove(&skill.id) {
                prereqs.sort();
                skill.prerequisites = prereqs;
            }
        }
        Ok(skills)
    }

    /// Ids from `ids` that do not exist, in input order.
    pub fn missing_skill_ids(&self, ids: &[String]) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT 1 FROM skills WHERE id = ?1")?;
        let mut missing = Vec::new();
        for id in ids {
            if !stmt.exists([id])? {
                missing.push(id.clone());
            }
        }
        Ok(missing)
    }

    /// Delete a skill. Edges to and from it are removed by cascade.
    pub fn delete_skill(&self, id: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM skills WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Apply `patch` to the skill's own fields and bump `updated_at`.
    /// Returns false if no such skill exists.
    pub fn update_skill(&self, id: &str, patch: &SkillPatch) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE skills SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                level = CASE WHEN ?4 IS NULL THEN level WHEN ?4 = '' THEN NULL ELSE ?4 END,
                updated_at = ?5
             WHERE id = ?1",
            params![id, patch.name, patch.description, patch.level, now],
        )?;
        Ok(changed > 0)
    }

    pub fn touch_skill(&self, id: &str) -> Result<String> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE skills SET updated_at = ?2 WHERE id = ?1",
            params![id, now],
        )?;
        Ok(now)
    }

    // =========================================================================
    // Prerequisite edges
    // =========================================================================

    /// Direct prerequisite ids of `skill_id`, sorted.
    pub fn prerequisite_ids(&self, skill_id: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT prerequisite_id FROM skill_prerequisites
             WHERE skill_id = ?1 ORDER BY prerequisite_id",
        )?;
        let ids = stmt
            .query_map([skill_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    /// Replace the outgoing edges of `skill_id` with `prerequisite_ids`.
    pub fn replace_prerequisites(&self, skill_id: &str, prerequisite_ids: &[String]) -> Result<()> {
        self.conn.execute(
            "DELETE FROM skill_prerequisites WHERE skill_id = ?1",
            [skill_id],
        )?;
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO skill_prerequisites (skill_id, prerequisite_id) VALUES (?1, ?2)",
        )?;
        for prereq in prerequisite_ids {
            stmt.execute(params![skill_id, prereq])?;
        }
        Ok(())
    }

    /// The full edge set as skill id -> prerequisite ids.
    ///
    /// Skills without prerequisites have no entry.
    pub fn load_adjacency(&self) -> Result<Adjacency> {
        let mut stmt = self
            .conn
            .prepare("SELECT skill_id, prerequisite_id FROM skill_prerequisites")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get(1)?)))?;

        let mut graph: Adjacency = HashMap::new();
        for row in rows {
            let (skill_id, prereq) = row?;
            graph.entry(skill_id).or_default().push(prereq);
        }
        Ok(graph)
    }

    /// Skill id -> display name for every skill.
    pub fn skill_names(&self) -> Result<BTreeMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM skills")?;
        let names = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<BTreeMap<String, String>, _>>()?;
        Ok(names)
    }

    /// Run SQLite's integrity check
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
        Ok(result == "ok")
    }

    fn with_prerequisites(&self, skill: Option<Skill>) -> Result<Option<Skill>> {
        match skill {
            Some(mut skill) => {
                skill.prerequisites = self.prerequisite_ids(&skill.id)?;
                Ok(Some(skill))
            }
            None => Ok(None),
        }
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }
}

fn skill_from_row(row: &Row<'_>) -> rusqlite::Result<Skill> {
    Ok(Skill {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        level: row.get(4)?,
        prerequisites: Vec::new(),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
