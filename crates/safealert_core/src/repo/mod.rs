//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs distinguish missing rows (`NotFound`), constraint
//!   violations (`Constraint`) and store faults (`Db`). Nothing is collapsed
//!   into a boolean or an empty list.
//! - Every write commits before the call returns.

pub mod alert_repo;
pub mod group_repo;
pub mod session_repo;
pub mod user_repo;

use crate::db::DbError;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Which table constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `UNIQUE` or primary key collision.
    Unique,
    /// Referenced row does not exist.
    ForeignKey,
    /// `NOT NULL`, `CHECK` or any other constraint.
    Other,
}

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Addressed entity does not exist.
    NotFound(String),
    Constraint {
        kind: ConstraintKind,
        detail: String,
    },
    /// Persisted row cannot be decoded into a domain value.
    InvalidData(String),
}

impl RepoError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Constraint {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            Self::Constraint {
                kind: ConstraintKind::ForeignKey,
                ..
            }
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Constraint { kind, detail } => {
                write!(f, "constraint violation ({kind:?}): {detail}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Constraint { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation {
                let kind = match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        ConstraintKind::Unique
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    _ => ConstraintKind::Other,
                };
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                return Self::Constraint { kind, detail };
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

