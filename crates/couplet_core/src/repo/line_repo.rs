//! Line repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist accepted lines keyed by their external post id.
//! - Answer the publish cycle's "what is still unpublished" queries.
//!
//! # Invariants
//! - Write paths call `LineRecord::validate()` before SQL mutations.
//! - Inserting an existing `external_id` is a no-op, not an error.
//! - A line amplified ahead of its partner keeps `submitted_at` across retries.
//! - `list_lines_since` is ordered by `created_at ASC, external_id ASC`.

use crate::db::DbError;
use crate::model::{LineRecord, LineValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const LINE_SELECT_SQL: &str = "SELECT
    external_id,
    author_id,
    text,
    created_at,
    submitted_at,
    acted_upon_at
FROM lines";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for line persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(LineValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "line not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted line data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<LineValidationError> for RepoError {
    fn from(value: LineValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for accepted lines.
pub trait LineRepository {
    /// Stores `record`; returns `false` when the external id already exists.
    fn insert_line(&self, record: &LineRecord) -> RepoResult<bool>;
    fn get_line(&self, external_id: &str) -> RepoResult<Option<LineRecord>>;
    /// Creation time of the newest line already acted upon.
    fn latest_acted_upon_created_at(&self) -> RepoResult<Option<i64>>;
    /// Unpublished lines created strictly after `after_ms` (all when `None`).
    fn list_lines_since(&self, after_ms: Option<i64>) -> RepoResult<Vec<LineRecord>>;
    /// Records that `external_id` was amplified at `at_ms`.
    fn mark_submitted(&self, external_id: &str, at_ms: i64) -> RepoResult<()>;
    /// Marks every listed line as acted upon at `at_ms`, atomically.
    fn mark_acted_upon(&self, external_ids: &[&str], at_ms: i64) -> RepoResult<()>;
}

/// SQLite-backed line repository.
pub struct SqliteLineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLineRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LineRepository for SqliteLineRepository<'_> {
    fn insert_line(&self, record: &LineRecord) -> RepoResult<bool> {
        record.validate()?;

        let changed = self.conn.execute(
            "INSERT INTO lines (
                external_id,
                author_id,
                text,
                created_at,
                submitted_at,
                acted_upon_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (external_id) DO NOTHING;",
            params![
                record.external_id.as_str(),
                record.author_id.as_str(),
                record.text.as_str(),
                record.created_at_ms,
                record.submitted_at_ms,
                record.acted_upon_at_ms,
            ],
        )?;

        Ok(changed == 1)
    }

    fn get_line(&self, external_id: &str) -> RepoResult<Option<LineRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LINE_SELECT_SQL} WHERE external_id = ?1;"))?;
        let mut rows = stmt.query([external_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_line_row(row)?)),
            None => Ok(None),
        }
    }

    fn latest_acted_upon_created_at(&self) -> RepoResult<Option<i64>> {
        let latest = self
            .conn
            .query_row(
                "SELECT created_at
                 FROM lines
                 WHERE acted_upon_at IS NOT NULL
                 ORDER BY created_at DESC
                 LIMIT 1;",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(latest)
    }

    fn list_lines_since(&self, after_ms: Option<i64>) -> RepoResult<Vec<LineRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LINE_SELECT_SQL}
             WHERE acted_upon_at IS NULL
               AND (?1 IS NULL OR created_at > ?1)
             ORDER BY created_at ASC, external_id ASC;"
        ))?;

        let mut rows = stmt.query([after_ms])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_line_row(row)?);
        }
        Ok(records)
    }

    fn mark_submitted(&self, external_id: &str, at_ms: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE lines SET submitted_at = ?1 WHERE external_id = ?2;",
            params![at_ms, external_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(external_id.to_string()));
        }
        Ok(())
    }

    fn mark_acted_upon(&self, external_ids: &[&str], at_ms: i64) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for external_id in external_ids {
            let changed = tx.execute(
                "UPDATE lines SET acted_upon_at = ?1 WHERE external_id = ?2;",
                params![at_ms, external_id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound((*external_id).to_string()));
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_line_row(row: &Row<'_>) -> RepoResult<LineRecord> {
    let record = LineRecord {
        external_id: row.get("external_id")?,
        author_id: row.get("author_id")?,
        text: row.get("text")?,
        created_at_ms: row.get("created_at")?,
        submitted_at_ms: row.get("submitted_at")?,
        acted_upon_at_ms: row.get("acted_upon_at")?,
    };
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("{}: {err}", record.external_id)))?;
    Ok(record)
}
