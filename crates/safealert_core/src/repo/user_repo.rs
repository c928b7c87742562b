//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist registered accounts and their password hashes.
//! - Resolve accounts by exact email.
//!
//! # Invariants
//! - Email uniqueness is enforced by the `users.email` constraint.
//! - Lookups use SQLite's default `BINARY` collation, so case is significant.

use crate::db::ensure_schema_ready;
use crate::model::user::{NewUser, User, UserId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    created_at
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts one user. Duplicate email yields a unique-constraint error.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    /// Loads one user by exact email.
    fn get_user(&self, email: &str) -> RepoResult<Option<User>>;
    /// Loads the stored PHC password hash for `email`.
    fn password_hash(&self, email: &str) -> RepoResult<Option<String>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        self.conn.execute(
            "INSERT INTO users (name, email, phone, password_hash)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.name.as_str(),
                user.email.as_str(),
                user.phone.as_str(),
                user.password_hash.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        load_user_by_id(self.conn, id)?
            .ok_or_else(|| RepoError::NotFound(format!("user id {id} after insert")))
    }

    fn get_user(&self, email: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn password_hash(&self, email: &str) -> RepoResult<Option<String>> {
        let hash = self
            .conn
            .query_row(
                "SELECT password_hash FROM users WHERE email = ?1;",
                [email],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(hash)
    }
}

fn load_user_by_id(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }
    Ok(None)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        created_at: row.get("created_at")?,
    })
}
