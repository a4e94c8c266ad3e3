use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Column, PostingSkillRow, SkillTable};

/// Snapshot of a loaded table.
#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: SkillTable,
    pub fetched_at: DateTime<Utc>,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sources (
                id INTEGER PRIMARY KEY,
                source TEXT UNIQUE NOT NULL,
                columns_json TEXT NOT NULL,
                fingerprint TEXT,
                fetched_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS posting_skills (
                id INTEGER PRIMARY KEY,
                source_id INTEGER NOT NULL REFERENCES sources(id),
                position INTEGER NOT NULL,
                skill TEXT NOT NULL,
                location TEXT,
                company_name TEXT,
                UNIQUE(source_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_posting_skills_source_id ON posting_skills(source_id);
            "#,
        )?;

        Ok(())
    }

    /// Replaces the snapshot stored for `source`.
    pub fn save_table(
        &self,
        source: &str,
        fingerprint: Option<&str>,
        table: &SkillTable,
    ) -> Result<()> {
        let columns: Vec<Column> = table.columns().collect();
        let columns_json = serde_json::to_string(&columns)?;

        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO sources (source, columns_json, fingerprint, fetched_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(source) DO UPDATE SET
                columns_json = excluded.columns_json,
                fingerprint = excluded.fingerprint,
                fetched_at = excluded.fetched_at
            "#,
            params![source, columns_json, fingerprint, Utc::now().to_rfc3339()],
        )?;

        let source_id: i64 = tx.query_row(
            "SELECT id FROM sources WHERE source = ?1",
            params![source],
            |row| row.get(0),
        )?;

        tx.execute(
            "DELETE FROM posting_skills WHERE source_id = ?1",
            params![source_id],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO posting_skills (source_id, position, skill, location, company_name)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;

            for (position, row) in table.rows().iter().enumerate() {
                stmt.execute(params![
                    source_id,
                    position as i64,
                    row.skill,
                    row.location,
                    row.company_name,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Snapshot for `source`, or `None` if there is none or it was taken under another
    /// fingerprint.
    pub fn get_table(
        &self,
        source: &str,
        fingerprint: Option<&str>,
    ) -> Result<Option<CachedTable>> {
        let header: Option<(i64, String, Option<String>, String)> = self
            .conn
            .query_row(
                "SELECT id, columns_json, fingerprint, fetched_at FROM sources WHERE source = ?1",
                params![source],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((source_id, columns_json, stored, fetched_at)) = header else {
            return Ok(None);
        };

        if stored.as_deref() != fingerprint {
            tracing::debug!("Snapshot for {} is stale", source);
            return Ok(None);
        }

        let columns: Vec<Column> = serde_json::from_str(&columns_json)?;
        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|e| Error::Snapshot(format!("invalid timestamp '{}': {}", fetched_at, e)))?
            .with_timezone(&Utc);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT skill, location, company_name
            FROM posting_skills
            WHERE source_id = ?1
            ORDER BY position
            "#,
        )?;

        let rows = stmt
            .query_map(params![source_id], |row| {
                Ok(PostingSkillRow {
                    skill: row.get(0)?,
                    location: row.get(1)?,
                    company_name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some(CachedTable {
            table: SkillTable::new(columns, rows),
            fetched_at,
        }))
    }

    pub fn delete_table(&self, source: &str) -> Result<bool> {
        let source_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM sources WHERE source = ?1",
                params![source],
                |row| row.get(0),
            )
            .optional()?;

        let Some(source_id) = source_id else {
            return Ok(false);
        };

        self.conn.execute(
            "DELETE FROM posting_skills WHERE source_id = ?1",
            params![source_id],
        )?;
        self.conn
            .execute("DELETE FROM sources WHERE id = ?1", params![source_id])?;

        Ok(true)
    }
}
