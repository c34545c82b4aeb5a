use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use zonewise_core::ids::SessionId;

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRow {
    pub id: SessionId,
    pub title: Option<String>,
    pub query_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str = "id, title, query_count, created_at, updated_at";

#[derive(Clone)]
pub struct SessionRepo {
    db: Database,
}

impl SessionRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub fn create(&self, title: Option<&str>) -> Result<SessionRow, StoreError> {
        let id = SessionId::new();
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_sessions (id, title, query_count, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?3)",
                rusqlite::params![id.as_str(), title, now],
            )?;

            Ok(SessionRow {
                id,
                title: title.map(String::from),
                query_count: 0,
                created_at: now.clone(),
                updated_at: now,
            })
        })
    }

    #[instrument(skip(self), fields(session_id = %id))]
    pub fn get(&self, id: &SessionId) -> Result<SessionRow, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM chat_sessions WHERE id = ?1"))?;
            let mut rows = stmt.query([id.as_str()])?;
            match rows.next()? {
                Some(row) => row_to_session(row),
                None => Err(StoreError::NotFound(format!("session {id}"))),
            }
        })
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub fn list(&self, limit: u32) -> Result<Vec<SessionRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM chat_sessions ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ))?;
            let mut rows = stmt.query([limit])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_session(row)?);
            }
            Ok(results)
        })
    }

    #[instrument(skip(self), fields(session_id = %id))]
    pub fn increment_query_count(&self, id: &SessionId) -> Result<(), StoreError> {
        self.db.with_conn(|conn| bump_query_count(conn, id))
    }
}

/// Shared with the exchange writer so both updates land in one transaction.
pub(crate) fn bump_query_count(
    conn: &rusqlite::Connection,
    id: &SessionId,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE chat_sessions SET query_count = query_count + 1, updated_at = ?1 WHERE id = ?2",
        rusqlite::params![Utc::now().to_rfc3339(), id.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(format!("session {id}")));
    }
    Ok(())
}

/// Create the session row if a client-supplied id has never been seen.
pub(crate) fn ensure_session(
    conn: &rusqlite::Connection,
    id: &SessionId,
    now: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO chat_sessions (id, title, query_count, created_at, updated_at)
         VALUES (?1, NULL, 0, ?2, ?2)",
        rusqlite::params![id.as_str(), now],
    )?;
    Ok(())
}

fn row_to_session(row: &rusqlite::Row<'_>) -> Result<SessionRow, StoreError> {
    const T: &str = "chat_sessions";
    Ok(SessionRow {
        id: SessionId::from_raw(row_helpers::get::<String>(row, 0, T, "id")?),
        title: row_helpers::get_opt(row, 1, T, "title")?,
        query_count: row_helpers::get(row, 2, T, "query_count")?,
        created_at: row_helpers::get(row, 3, T, "created_at")?,
        updated_at: row_helpers::get(row, 4, T, "updated_at")?,
    })
}
