//! Session state persistence.
//!
//! # Responsibility
//! - Keep the signed-in user across process restarts.
//!
//! # Invariants
//! - Stored as key/value rows in `session_state`; `save` replaces every key.
//! - `clear` removes every key, restoring the logged-out default.

use crate::db::ensure_schema_ready;
use crate::model::session::Session;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

const KEY_IS_LOGGED_IN: &str = "is_logged_in";
const KEY_USER_EMAIL: &str = "user_email";

/// Repository interface for the device login session.
pub trait SessionRepository {
    fn load_session(&self) -> RepoResult<Session>;
    fn save_session(&self, session: &Session) -> RepoResult<()>;
    fn clear_session(&self) -> RepoResult<()>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["session_state"])?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn load_session(&self) -> RepoResult<Session> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM session_state;")?;
        let mut rows = stmt.query([])?;
        let mut session = Session::default();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            match key.as_str() {
                KEY_IS_LOGGED_IN => {
                    session.is_logged_in = match value.as_str() {
                        "true" => true,
                        "false" => false,
                        other => {
                            return Err(RepoError::InvalidData(format!(
                                "invalid is_logged_in value `{other}` in session_state"
                            )));
                        }
                    };
                }
                KEY_USER_EMAIL => session.user_email = Some(value),
                // Unknown keys come from newer builds; ignore them.
                _ => {}
            }
        }
        Ok(session)
    }

    fn save_session(&self, session: &Session) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM session_state;", [])?;
        tx.execute(
            "INSERT INTO session_state (key, value) VALUES (?1, ?2);",
            params![KEY_IS_LOGGED_IN, session.is_logged_in.to_string()],
        )?;
        if let Some(email) = session.user_email.as_deref() {
            tx.execute(
                "INSERT INTO session_state (key, value) VALUES (?1, ?2);",
                params![KEY_USER_EMAIL, email],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear_session(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM session_state;", [])?;
        Ok(())
    }
}
