//! Contact group model.
//!
//! # Invariants
//! - `(owner_email, name)` identifies at most one group.
//! - The owner is inserted as the first member when the group is created.

use serde::{Deserialize, Serialize};

/// Storage row id for contact groups.
pub type GroupId = i64;

/// Named set of contacts owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub owner_email: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Result of an add-member call. Adding is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// A new membership row was written.
    Added,
    /// The contact was already a member; nothing was written.
    AlreadyMember,
}
