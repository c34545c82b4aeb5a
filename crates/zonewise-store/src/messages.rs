use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use zonewise_core::artifact::Artifact;
use zonewise_core::ids::{MessageId, SessionId};
use zonewise_core::turns::Role;

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;
use crate::sessions;

/// A row of the chat log. Artifacts are returned as raw JSON, exactly as written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedMessage {
    pub id: MessageId,
    pub session_id: SessionId,
    pub role: Role,
    pub content: String,
    pub artifacts: Value,
    pub created_at: String,
}

#[derive(Clone)]
pub struct MessageRepo {
    db: Database,
}

impl MessageRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Write one user/assistant pair and bump the session's query count,
    /// atomically. Unknown session ids get a session row created first.
    #[instrument(skip_all, fields(session_id = %session_id, artifacts = artifacts.len()))]
    pub fn append_exchange(
        &self,
        session_id: &SessionId,
        user_content: &str,
        assistant_content: &str,
        artifacts: &[Artifact],
        timestamp: DateTime<Utc>,
    ) -> Result<(MessageId, MessageId), StoreError> {
        let artifacts_json = serde_json::to_string(artifacts)?;
        let now = timestamp.to_rfc3339();

        self.db.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            sessions::ensure_session(&tx, session_id, &now)?;

            let user_id = MessageId::new();
            insert_message(&tx, &user_id, session_id, Role::User, user_content, "[]", &now)?;

            let assistant_id = MessageId::new();
            insert_message(
                &tx,
                &assistant_id,
                session_id,
                Role::Assistant,
                assistant_content,
                &artifacts_json,
                &now,
            )?;

            sessions::bump_query_count(&tx, session_id)?;
            tx.commit()?;
            Ok((user_id, assistant_id))
        })
    }

    /// Oldest first.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<LoggedMessage>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, role, content, artifacts, created_at
                 FROM chat_messages WHERE session_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let mut rows = stmt.query([session_id.as_str()])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_message(row)?);
            }
            Ok(results)
        })
    }
}

fn insert_message(
    conn: &rusqlite::Connection,
    id: &MessageId,
    session_id: &SessionId,
    role: Role,
    content: &str,
    artifacts_json: &str,
    created_at: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO chat_messages (id, session_id, role, content, artifacts, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            id.as_str(),
            session_id.as_str(),
            role.as_str(),
            content,
            artifacts_json,
            created_at,
        ],
    )?;
    Ok(())
}

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<LoggedMessage, StoreError> {
    const T: &str = "chat_messages";
    let role: String = row_helpers::get(row, 2, T, "role")?;
    let artifacts: String = row_helpers::get(row, 4, T, "artifacts")?;

    Ok(LoggedMessage {
        id: MessageId::from_raw(row_helpers::get::<String>(row, 0, T, "id")?),
        session_id: SessionId::from_raw(row_helpers::get::<String>(row, 1, T, "session_id")?),
        role: row_helpers::parse_enum(&role, T, "role")?,
        content: row_helpers::get(row, 3, T, "content")?,
        artifacts: row_helpers::parse_json(&artifacts, T, "artifacts")?,
        created_at: row_helpers::get(row, 5, T, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::SessionRepo;
    use zonewise_core::artifact::{
        ArtifactBody, ArtifactMetadata, Coordinates, Setbacks, ZoneType, ZoningData,
    };
    use zonewise_core::ids::ArtifactId;

    fn map_artifact() -> Artifact {
        Artifact {
            id: ArtifactId::new(),
            title: "R-1 in Satellite Beach".into(),
            body: ArtifactBody::Map(ZoningData {
                zone_code: Some("R-1".into()),
                jurisdiction: Some("Satellite Beach".into()),
                setbacks: Some(Setbacks { front: 25.0, side: 7.5, rear: 20.0 }),
                max_height: Some(35.0),
                zone_type: ZoneType::Residential,
            }),
            metadata: ArtifactMetadata {
                jurisdiction: Some("Satellite Beach".into()),
                zone_code: Some("R-1".into()),
                coordinates: Coordinates(-80.59, 28.1761),
            },
        }
    }

    #[test]
    fn append_exchange_writes_pair_and_counts() {
        let db = Database::in_memory().unwrap();
        let sessions = SessionRepo::new(db.clone());
        let messages = MessageRepo::new(db);
        let session = sessions.create(None).unwrap();

        messages
            .append_exchange(&session.id, "R-1 setbacks?", "Front is 25 ft.", &[map_artifact()], Utc::now())
            .unwrap();

        let log = messages.list_for_session(&session.id).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Role::User);
        assert_eq!(log[0].artifacts, serde_json::json!([]));
        assert_eq!(log[1].role, Role::Assistant);
        assert_eq!(log[1].content, "Front is 25 ft.");
        assert_eq!(log[1].artifacts[0]["type"], "map");
        assert_eq!(log[1].artifacts[0]["data"]["setbacks"]["side"], 7.5);
        assert_eq!(sessions.get(&session.id).unwrap().query_count, 1);
    }

    #[test]
    fn unknown_session_is_created() {
        let db = Database::in_memory().unwrap();
        let messages = MessageRepo::new(db.clone());
        let id = SessionId::from_raw("client-session-7");

        messages.append_exchange(&id, "hi", "hello", &[], Utc::now()).unwrap();

        let session = SessionRepo::new(db).get(&id).unwrap();
        assert_eq!(session.query_count, 1);
        assert_eq!(messages.list_for_session(&id).unwrap().len(), 2);
    }

    #[test]
    fn messages_scoped_to_session() {
        let db = Database::in_memory().unwrap();
        let messages = MessageRepo::new(db);
        let a = SessionId::new();
        let b = SessionId::new();
        messages.append_exchange(&a, "q1", "a1", &[], Utc::now()).unwrap();
        messages.append_exchange(&a, "q2", "a2", &[], Utc::now()).unwrap();
        messages.append_exchange(&b, "q3", "a3", &[], Utc::now()).unwrap();

        let log = messages.list_for_session(&a).unwrap();
        let contents: Vec<_> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
    }

    #[test]
    fn corrupt_artifacts_column() {
        let db = Database::in_memory().unwrap();
        let session = SessionRepo::new(db.clone()).create(None).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (id, session_id, role, content, artifacts, created_at)
                 VALUES ('msg_x', ?1, 'assistant', 'x', 'not json', '2026-01-01T00:00:00Z')",
                [session.id.as_str()],
            )?;
            Ok(())
        })
        .unwrap();

        let result = MessageRepo::new(db).list_for_session(&session.id);
        assert!(matches!(result, Err(StoreError::CorruptRow { column: "artifacts", .. })));
    }
}
