//! Domain model for accounts, contact groups, and emergency alerts.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Replace legacy sentinel strings with tagged capture results.
//!
//! # Invariants
//! - Users are identified by exact, case-sensitive email.
//! - A group is an explicit entity; memberships reference it by id.
//! - Alerts are immutable once persisted.

pub mod alert;
pub mod capture;
pub mod group;
pub mod session;
pub mod user;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input validation failure raised before any storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trim.
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
