//! Contact group repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist groups as explicit rows keyed by `(owner_email, name)`.
//! - Persist memberships referencing groups by id.
//!
//! # Invariants
//! - Group creation writes the group row and the owner's membership row in
//!   one `IMMEDIATE` transaction, so a group is never observed without its
//!   owner as first member.
//! - `(group_id, member_contact)` is unique; adding twice is a no-op.
//! - Group and member listings follow insertion order (`id ASC`).
//! - Removing the owner's own membership row is allowed and keeps the group.

use crate::db::ensure_schema_ready;
use crate::model::group::{Group, GroupId, MembershipChange};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const GROUP_SELECT_SQL: &str = "SELECT
    id,
    name,
    owner_email,
    created_at
FROM contact_groups";

/// Repository interface for contact groups and memberships.
pub trait GroupRepository {
    /// Creates a group and inserts `owner_email` as its first member.
    fn create_group(&self, owner_email: &str, name: &str) -> RepoResult<Group>;
    /// Loads one group by owner and exact name.
    fn find_group(&self, owner_email: &str, name: &str) -> RepoResult<Option<Group>>;
    /// Lists every group owned by `owner_email` in creation order.
    fn list_groups(&self, owner_email: &str) -> RepoResult<Vec<Group>>;
    /// Adds one member contact to an existing group.
    fn add_membership(
        &self,
        owner_email: &str,
        name: &str,
        member_contact: &str,
    ) -> RepoResult<MembershipChange>;
    /// Lists member contacts of one group in insertion order.
    fn list_members(&self, owner_email: &str, name: &str) -> RepoResult<Vec<String>>;
    /// Deletes one membership. Returns whether a row was removed.
    fn remove_membership(
        &self,
        owner_email: &str,
        name: &str,
        member_contact: &str,
    ) -> RepoResult<bool>;

    /// Lists distinct group names owned by `owner_email` in creation order.
    fn list_group_names(&self, owner_email: &str) -> RepoResult<Vec<String>> {
        Ok(self
            .list_groups(owner_email)?
            .into_iter()
            .map(|group| group.name)
            .collect())
    }
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["contact_groups", "group_memberships"])?;
        Ok(Self { conn })
    }

    fn require_group(&self, owner_email: &str, name: &str) -> RepoResult<Group> {
        self.find_group(owner_email, name)?
            .ok_or_else(|| group_not_found(owner_email, name))
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&self, owner_email: &str, name: &str) -> RepoResult<Group> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO contact_groups (name, owner_email) VALUES (?1, ?2);",
            params![name, owner_email],
        )?;
        let group_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO group_memberships (group_id, member_contact) VALUES (?1, ?2);",
            params![group_id, owner_email],
        )?;
        let group = load_group_by_id(&tx, group_id)?;
        tx.commit()?;

        group.ok_or_else(|| RepoError::NotFound(format!("group id {group_id} after insert")))
    }

    fn find_group(&self, owner_email: &str, name: &str) -> RepoResult<Option<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROUP_SELECT_SQL}
             WHERE owner_email = ?1
               AND name = ?2;"
        ))?;
        let mut rows = stmt.query(params![owner_email, name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_group_row(row)?));
        }
        Ok(None)
    }

    fn list_groups(&self, owner_email: &str) -> RepoResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROUP_SELECT_SQL}
             WHERE owner_email = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([owner_email])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_group_row(row)?);
        }
        Ok(groups)
    }

    fn add_membership(
        &self,
        owner_email: &str,
        name: &str,
        member_contact: &str,
    ) -> RepoResult<MembershipChange> {
        let group = self.require_group(owner_email, name)?;
        let changed = self.conn.execute(
            "INSERT INTO group_memberships (group_id, member_contact)
             VALUES (?1, ?2)
             ON CONFLICT (group_id, member_contact) DO NOTHING;",
            params![group.id, member_contact],
        )?;

        if changed == 0 {
            return Ok(MembershipChange::AlreadyMember);
        }
        Ok(MembershipChange::Added)
    }

    fn list_members(&self, owner_email: &str, name: &str) -> RepoResult<Vec<String>> {
        let group = self.require_group(owner_email, name)?;
        let mut stmt = self.conn.prepare(
            "SELECT member_contact
             FROM group_memberships
             WHERE group_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([group.id])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(row.get::<_, String>(0)?);
        }
        Ok(members)
    }

    fn remove_membership(
        &self,
        owner_email: &str,
        name: &str,
        member_contact: &str,
    ) -> RepoResult<bool> {
        let group = self.require_group(owner_email, name)?;
        let deleted = self.conn.execute(
            "DELETE FROM group_memberships
             WHERE group_id = ?1
               AND member_contact = ?2;",
            params![group.id, member_contact],
        )?;
        Ok(deleted > 0)
    }
}

fn load_group_by_id(conn: &Connection, group_id: GroupId) -> RepoResult<Option<Group>> {
    let group = conn
        .query_row(
            &format!("{GROUP_SELECT_SQL} WHERE id = ?1;"),
            [group_id],
            parse_group_row,
        )
        .optional()?;
    Ok(group)
}

fn parse_group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        name: row.get("name")?,
        owner_email: row.get("owner_email")?,
        created_at: row.get("created_at")?,
    })
}

fn group_not_found(owner_email: &str, name: &str) -> RepoError {
    RepoError::NotFound(format!("group `{name}` owned by `{owner_email}`"))
}
