//! Contact group use-case service.
//!
//! # Responsibility
//! - Validate group and member input above the repository layer.
//! - Translate constraint failures into group-level errors.
//!
//! # Invariants
//! - Group names, owner emails and member contacts are trimmed and non-empty
//!   before any storage access.
//! - A freshly created group lists its owner as the only member.

use crate::model::group::{Group, MembershipChange};
use crate::model::{require_non_empty, ValidationError};
use crate::repo::group_repo::GroupRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from group service operations.
#[derive(Debug)]
pub enum GroupServiceError {
    Validation(ValidationError),
    /// Owner already has a group with this name.
    GroupExists(String),
    GroupNotFound(String),
    /// Owner email does not belong to a registered account.
    OwnerNotFound(String),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for GroupServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::GroupExists(name) => write!(f, "group already exists: {name}"),
            Self::GroupNotFound(what) => write!(f, "group not found: {what}"),
            Self::OwnerNotFound(email) => write!(f, "group owner not registered: {email}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GroupServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for GroupServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for GroupServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(what) => Self::GroupNotFound(what),
            other => Self::Repo(other),
        }
    }
}

/// Group service facade.
pub struct GroupService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a group with `owner_email` as its first member.
    pub fn create_group(&self, owner_email: &str, name: &str) -> Result<Group, GroupServiceError> {
        let owner_email = require_non_empty("owner email", owner_email)?;
        let name = require_non_empty("group name", name)?;

        match self.repo.create_group(&owner_email, &name) {
            Ok(group) => {
                info!(
                    "event=group_create module=group status=ok group_id={}",
                    group.id
                );
                Ok(group)
            }
            Err(err) if err.is_unique_violation() => Err(GroupServiceError::GroupExists(name)),
            Err(err) if err.is_foreign_key_violation() => {
                Err(GroupServiceError::OwnerNotFound(owner_email))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Adds one contact. Adding an existing member is a no-op.
    pub fn add_member(
        &self,
        owner_email: &str,
        name: &str,
        contact: &str,
    ) -> Result<MembershipChange, GroupServiceError> {
        let owner_email = require_non_empty("owner email", owner_email)?;
        let name = require_non_empty("group name", name)?;
        let contact = require_non_empty("member contact", contact)?;
        Ok(self.repo.add_membership(&owner_email, &name, &contact)?)
    }

    /// Removes one contact. Returns whether a membership was deleted.
    ///
    /// The owner's own membership may be removed; the group keeps existing.
    pub fn remove_member(
        &self,
        owner_email: &str,
        name: &str,
        contact: &str,
    ) -> Result<bool, GroupServiceError> {
        let owner_email = require_non_empty("owner email", owner_email)?;
        let name = require_non_empty("group name", name)?;
        let contact = require_non_empty("member contact", contact)?;
        Ok(self.repo.remove_membership(&owner_email, &name, &contact)?)
    }

    pub fn list_groups(&self, owner_email: &str) -> Result<Vec<Group>, GroupServiceError> {
        let owner_email = require_non_empty("owner email", owner_email)?;
        Ok(self.repo.list_groups(&owner_email)?)
    }

    pub fn list_group_names(&self, owner_email: &str) -> Result<Vec<String>, GroupServiceError> {
        let owner_email = require_non_empty("owner email", owner_email)?;
        Ok(self.repo.list_group_names(&owner_email)?)
    }

    pub fn list_members(
        &self,
        owner_email: &str,
        name: &str,
    ) -> Result<Vec<String>, GroupServiceError> {
        let owner_email = require_non_empty("owner email", owner_email)?;
        let name = require_non_empty("group name", name)?;
        Ok(self.repo.list_members(&owner_email, &name)?)
    }
}
