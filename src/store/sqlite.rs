//! SQLite-backed implementations of both security-model variants.
//!
//! Persisted records are stored as a JSON `data` column with indexed
//! columns beside it; find-or-create lookups go through the unique name
//! index. Each store opens a deferred transaction after schema init so the
//! whole synchronization pass lands as one commit unit.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::SyncError;
use crate::model::{AccessModifier, FlagUser, GraphUser, Role, new_id, now_rfc3339};
use crate::store::schema;
use crate::store::{FlagStore, RoleGraphStore};

fn storage_err(e: impl ToString) -> SyncError {
    SyncError::Storage(e.to_string())
}

/// Role-graph security store over SQLite.
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl SqliteGraphStore {
    /// Open or create the store at the given path.
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        let conn = Connection::open(path).map_err(storage_err)?;
        Self::init(conn)
    }

    /// Create an in-memory store (useful for tests).
    pub fn open_in_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, SyncError> {
        schema::init_graph_schema(&conn)?;
        // All mutations until commit() belong to one transaction.
        conn.execute_batch("BEGIN").map_err(storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SyncError> {
        self.conn
            .lock()
            .map_err(|e| SyncError::Internal(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn count_rows(&self, table: &str) -> i64 {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        conn.query_row(&sql, [], |row| row.get(0)).unwrap()
    }
}

impl RoleGraphStore for SqliteGraphStore {
    fn find_role(&self, name: &str) -> Result<Option<Role>, SyncError> {
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM sec_roles WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;
        match data {
            Some(json) => {
                let role = serde_json::from_str(&json)
                    .map_err(|e| SyncError::Internal(e.to_string()))?;
                Ok(Some(role))
            }
            None => Ok(None),
        }
    }

    fn create_role(&self, name: &str) -> Result<Role, SyncError> {
        let now = now_rfc3339();
        let role = Role {
            id: new_id(),
            name: name.to_string(),
            is_administrative: false,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let json = serde_json::to_string(&role).map_err(|e| SyncError::Internal(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sec_roles (id, name, is_admin, data, created_at, updated_at)
             VALUES (?1, ?2, 0, ?3, ?4, ?4)",
            params![role.id, role.name, json, now],
        )
        .map_err(storage_err)?;
        Ok(role)
    }

    fn set_administrative(&self, role_id: &str, is_admin: bool) -> Result<(), SyncError> {
        let conn = self.lock()?;
        let json: String = conn
            .query_row(
                "SELECT data FROM sec_roles WHERE id = ?1",
                params![role_id],
                |row| row.get(0),
            )
            .map_err(storage_err)?;
        let mut role: Role =
            serde_json::from_str(&json).map_err(|e| SyncError::Internal(e.to_string()))?;
        role.is_administrative = is_admin;
        role.updated_at = now_rfc3339();
        let json = serde_json::to_string(&role).map_err(|e| SyncError::Internal(e.to_string()))?;

        conn.execute(
            "UPDATE sec_roles SET is_admin = ?1, data = ?2, updated_at = ?3 WHERE id = ?4",
            params![is_admin as i64, json, role.updated_at, role_id],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    fn has_parent(&self, role_id: &str, parent_id: &str) -> Result<bool, SyncError> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sec_role_parents WHERE role_id = ?1 AND parent_id = ?2",
                params![role_id, parent_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;
        Ok(found.is_some())
    }

    fn add_parent(&self, role_id: &str, parent_id: &str) -> Result<(), SyncError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO sec_role_parents (role_id, parent_id, added_at)
             VALUES (?1, ?2, ?3)",
            params![role_id, parent_id, now_rfc3339()],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    fn find_user(&self, user_name: &str) -> Result<Option<GraphUser>, SyncError> {
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM sec_users WHERE user_name = ?1",
                params![user_name],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;
        match data {
            Some(json) => {
                let user = serde_json::from_str(&json)
                    .map_err(|e| SyncError::Internal(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    fn create_user(&self, user_name: &str) -> Result<GraphUser, SyncError> {
        let now = now_rfc3339();
        let user = GraphUser {
            id: new_id(),
            user_name: user_name.to_string(),
            active: true,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let json = serde_json::to_string(&user).map_err(|e| SyncError::Internal(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sec_users (id, user_name, active, data, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?4, ?4)",
            params![user.id, user.user_name, json, now],
        )
        .map_err(storage_err)?;
        Ok(user)
    }

    fn add_user_role(&self, user_id: &str, role_id: &str) -> Result<(), SyncError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO sec_user_roles (user_id, role_id, added_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, role_id, now_rfc3339()],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    fn grant_type_permission(
        &self,
        role_id: &str,
        target_type: &str,
        operations: &str,
        modifier: AccessModifier,
    ) -> Result<bool, SyncError> {
        let conn = self.lock()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO sec_type_permissions
                 (role_id, target_type, operations, modifier, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![role_id, target_type, operations, modifier.as_str(), now_rfc3339()],
            )
            .map_err(storage_err)?;
        Ok(inserted > 0)
    }

    fn grant_object_permission(
        &self,
        role_id: &str,
        target_type: &str,
        criteria: &str,
        operations: &str,
        modifier: AccessModifier,
    ) -> Result<bool, SyncError> {
        let conn = self.lock()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO sec_object_permissions
                 (role_id, target_type, criteria, operations, modifier, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    role_id,
                    target_type,
                    criteria,
                    operations,
                    modifier.as_str(),
                    now_rfc3339()
                ],
            )
            .map_err(storage_err)?;
        Ok(inserted > 0)
    }

    fn grant_member_permission(
        &self,
        role_id: &str,
        target_type: &str,
        member_names: &str,
        criteria: &str,
        operations: &str,
        modifier: AccessModifier,
    ) -> Result<bool, SyncError> {
        let conn = self.lock()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO sec_member_permissions
                 (role_id, target_type, member_names, criteria, operations, modifier, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    role_id,
                    target_type,
                    member_names,
                    criteria,
                    operations,
                    modifier.as_str(),
                    now_rfc3339()
                ],
            )
            .map_err(storage_err)?;
        Ok(inserted > 0)
    }

    fn commit(&self) -> Result<(), SyncError> {
        let conn = self.lock()?;
        conn.execute_batch("COMMIT").map_err(storage_err)?;
        // Open the next unit so a later pass over the same handle also
        // commits atomically.
        conn.execute_batch("BEGIN").map_err(storage_err)?;
        Ok(())
    }
}

/// Flag-based security store over SQLite.
pub struct SqliteFlagStore {
    conn: Mutex<Connection>,
}

impl SqliteFlagStore {
    /// Open or create the store at the given path.
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        let conn = Connection::open(path).map_err(storage_err)?;
        Self::init(conn)
    }

    /// Create an in-memory store (useful for tests).
    pub fn open_in_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, SyncError> {
        schema::init_flag_schema(&conn)?;
        conn.execute_batch("BEGIN").map_err(storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SyncError> {
        self.conn
            .lock()
            .map_err(|e| SyncError::Internal(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn count_rows(&self, table: &str) -> i64 {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        conn.query_row(&sql, [], |row| row.get(0)).unwrap()
    }
}

impl FlagStore for SqliteFlagStore {
    fn find_user(&self, user_name: &str) -> Result<Option<FlagUser>, SyncError> {
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM sec_users WHERE user_name = ?1",
                params![user_name],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;
        match data {
            Some(json) => {
                let user = serde_json::from_str(&json)
                    .map_err(|e| SyncError::Internal(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    fn create_user(&self, user_name: &str, is_administrator: bool) -> Result<FlagUser, SyncError> {
        let now = now_rfc3339();
        let user = FlagUser {
            id: new_id(),
            user_name: user_name.to_string(),
            active: true,
            is_administrator,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let json = serde_json::to_string(&user).map_err(|e| SyncError::Internal(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sec_users (id, user_name, active, is_admin, data, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?4, ?5, ?5)",
            params![user.id, user.user_name, is_administrator as i64, json, now],
        )
        .map_err(storage_err)?;
        Ok(user)
    }

    fn commit(&self) -> Result<(), SyncError> {
        let conn = self.lock()?;
        conn.execute_batch("COMMIT").map_err(storage_err)?;
        conn.execute_batch("BEGIN").map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_find_or_create_identity() {
        let store = SqliteGraphStore::open_in_memory().unwrap();

        assert!(store.find_role("Sales").unwrap().is_none());
        let created = store.create_role("Sales").unwrap();
        let found = store.find_role("Sales").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(!found.is_administrative);
        assert_eq!(store.count_rows("sec_roles"), 1);
    }

    #[test]
    fn test_set_administrative_round_trips() {
        let store = SqliteGraphStore::open_in_memory().unwrap();
        let role = store.create_role("Admins").unwrap();

        store.set_administrative(&role.id, true).unwrap();
        assert!(store.find_role("Admins").unwrap().unwrap().is_administrative);

        store.set_administrative(&role.id, false).unwrap();
        assert!(!store.find_role("Admins").unwrap().unwrap().is_administrative);
    }

    #[test]
    fn test_parent_links_are_a_set() {
        let store = SqliteGraphStore::open_in_memory().unwrap();
        let child = store.create_role("Sales").unwrap();
        let parent = store.create_role("Staff").unwrap();

        assert!(!store.has_parent(&child.id, &parent.id).unwrap());
        store.add_parent(&child.id, &parent.id).unwrap();
        store.add_parent(&child.id, &parent.id).unwrap();
        assert!(store.has_parent(&child.id, &parent.id).unwrap());
        assert_eq!(store.count_rows("sec_role_parents"), 1);
    }

    #[test]
    fn test_grants_are_idempotent() {
        let store = SqliteGraphStore::open_in_memory().unwrap();
        let role = store.create_role("Sales").unwrap();

        let first = store
            .grant_type_permission(&role.id, "Order", "Read", AccessModifier::Allow)
            .unwrap();
        let second = store
            .grant_type_permission(&role.id, "Order", "Read", AccessModifier::Allow)
            .unwrap();
        assert!(first);
        assert!(!second);
        assert_eq!(store.count_rows("sec_type_permissions"), 1);

        // Different modifier is a different grant.
        assert!(
            store
                .grant_type_permission(&role.id, "Order", "Read", AccessModifier::Deny)
                .unwrap()
        );
        assert_eq!(store.count_rows("sec_type_permissions"), 2);
    }

    #[test]
    fn test_object_and_member_grant_keys() {
        let store = SqliteGraphStore::open_in_memory().unwrap();
        let role = store.create_role("Sales").unwrap();

        assert!(
            store
                .grant_object_permission(&role.id, "Order", "Amount > 100", "Read", AccessModifier::Allow)
                .unwrap()
        );
        assert!(
            !store
                .grant_object_permission(&role.id, "Order", "Amount > 100", "Read", AccessModifier::Allow)
                .unwrap()
        );
        // Different criteria is a different grant.
        assert!(
            store
                .grant_object_permission(&role.id, "Order", "Amount > 500", "Read", AccessModifier::Allow)
                .unwrap()
        );

        assert!(
            store
                .grant_member_permission(&role.id, "Order", "Total", "", "Read", AccessModifier::Allow)
                .unwrap()
        );
        assert!(
            !store
                .grant_member_permission(&role.id, "Order", "Total", "", "Read", AccessModifier::Allow)
                .unwrap()
        );
    }

    #[test]
    fn test_flag_user_create_and_find() {
        let store = SqliteFlagStore::open_in_memory().unwrap();

        assert!(store.find_user("alice").unwrap().is_none());
        let user = store.create_user("alice", true).unwrap();
        assert!(user.active);
        assert!(user.is_administrator);

        let found = store.find_user("alice").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.is_administrator);
    }

    #[test]
    fn test_commit_persists_to_disk() {
        let tmp = tempfile::NamedTempFile::new().unwrap();

        {
            let store = SqliteGraphStore::open(tmp.path()).unwrap();
            store.create_role("Sales").unwrap();
            store.commit().unwrap();
        }

        let reopened = SqliteGraphStore::open(tmp.path()).unwrap();
        assert!(reopened.find_role("Sales").unwrap().is_some());
    }

    #[test]
    fn test_uncommitted_work_is_discarded() {
        let tmp = tempfile::NamedTempFile::new().unwrap();

        {
            let store = SqliteGraphStore::open(tmp.path()).unwrap();
            store.create_role("Sales").unwrap();
            // Dropped without commit.
        }

        let reopened = SqliteGraphStore::open(tmp.path()).unwrap();
        assert!(reopened.find_role("Sales").unwrap().is_none());
    }
}
