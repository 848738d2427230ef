//! Persisted security model variants.
//!
//! The synchronizer writes through one of two capability traits — a
//! flag-based store with a single administrator flag per user, or a
//! role-graph store with role hierarchy and fine-grained grants. At most one
//! variant is active in a deployment; the active handle is passed explicitly
//! (there is no process-global accessor).

pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use crate::error::SyncError;
use crate::model::{AccessModifier, FlagUser, GraphUser, Role};

/// The flag-based ("simple") security store. Users either are or are not
/// administrators; roles and permission grants do not exist here.
pub trait FlagStore: Send + Sync {
    /// Look up a user by exact login name.
    fn find_user(&self, user_name: &str) -> Result<Option<FlagUser>, SyncError>;

    /// Create a new active user.
    fn create_user(&self, user_name: &str, is_administrator: bool) -> Result<FlagUser, SyncError>;

    /// Commit every mutation of this pass as a single unit.
    fn commit(&self) -> Result<(), SyncError>;
}

/// The role-graph ("complex") security store: roles with parent links,
/// users with role membership, and per-type/object/member grants.
///
/// The grant operations are required to be idempotent: repeating a grant
/// with identical fields must not persist a duplicate. The synchronizer
/// re-issues grants on every run and performs no deduplication of its own.
pub trait RoleGraphStore: Send + Sync {
    /// Look up a role by exact name.
    fn find_role(&self, name: &str) -> Result<Option<Role>, SyncError>;

    /// Create a new role. The administrative flag starts false; the
    /// synchronizer asserts it separately on every resolution.
    fn create_role(&self, name: &str) -> Result<Role, SyncError>;

    /// Set a role's administrative flag.
    fn set_administrative(&self, role_id: &str, is_admin: bool) -> Result<(), SyncError>;

    /// Whether `parent_id` is already a parent of `role_id`.
    fn has_parent(&self, role_id: &str, parent_id: &str) -> Result<bool, SyncError>;

    /// Link a parent role. Set semantics: linking twice keeps one entry.
    fn add_parent(&self, role_id: &str, parent_id: &str) -> Result<(), SyncError>;

    /// Look up a user by exact login name.
    fn find_user(&self, user_name: &str) -> Result<Option<GraphUser>, SyncError>;

    /// Create a new active user with no roles.
    fn create_user(&self, user_name: &str) -> Result<GraphUser, SyncError>;

    /// Add a role membership. Set semantics.
    fn add_user_role(&self, user_id: &str, role_id: &str) -> Result<(), SyncError>;

    /// Grant operations on a whole type. Returns whether a new grant was
    /// actually persisted (false on an identical repeat).
    fn grant_type_permission(
        &self,
        role_id: &str,
        target_type: &str,
        operations: &str,
        modifier: AccessModifier,
    ) -> Result<bool, SyncError>;

    /// Grant operations on the instances matching a criteria expression.
    fn grant_object_permission(
        &self,
        role_id: &str,
        target_type: &str,
        criteria: &str,
        operations: &str,
        modifier: AccessModifier,
    ) -> Result<bool, SyncError>;

    /// Grant operations on named members, optionally criteria-restricted.
    fn grant_member_permission(
        &self,
        role_id: &str,
        target_type: &str,
        member_names: &str,
        criteria: &str,
        operations: &str,
        modifier: AccessModifier,
    ) -> Result<bool, SyncError>;

    /// Commit every mutation of this pass as a single unit.
    fn commit(&self) -> Result<(), SyncError>;
}

/// The currently active security-model variant.
pub enum SecurityModel {
    Flag(Arc<dyn FlagStore>),
    RoleGraph(Arc<dyn RoleGraphStore>),
}

impl SecurityModel {
    /// Commit the underlying store.
    pub fn commit(&self) -> Result<(), SyncError> {
        match self {
            SecurityModel::Flag(store) => store.commit(),
            SecurityModel::RoleGraph(store) => store.commit(),
        }
    }
}
