//! Permission synchronizer.
//!
//! Consumes one [`Declarations`] snapshot and writes it into the active
//! security-model variant. All passes are find-or-create against the store:
//! the synchronizer never deletes roles, users or grants that are no longer
//! declared, and re-running with the same declarations is harmless (grant
//! idempotency is the store's contract, see [`crate::store::RoleGraphStore`]).

pub mod permissions;
pub mod roles;
pub mod users;

use crate::error::SyncError;
use crate::registry::Declarations;
use crate::store::SecurityModel;

/// Counters for what one synchronization run actually changed. A second run
/// against the same declarations reports all zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub roles_created: usize,
    pub users_created: usize,
    pub grants_written: usize,
}

/// One synchronization run over a declaration snapshot.
pub struct SyncService<'a> {
    decls: &'a Declarations,
    report: SyncReport,
}

impl<'a> SyncService<'a> {
    /// Synchronize the declarations into the active security model.
    ///
    /// Branches once on the variant; the flag-based model only ever sees the
    /// predefined-user pass, the role-graph model runs the full sequence.
    pub fn synchronize(
        decls: &'a Declarations,
        model: &SecurityModel,
    ) -> Result<SyncReport, SyncError> {
        let mut service = SyncService {
            decls,
            report: SyncReport::default(),
        };
        match model {
            SecurityModel::Flag(store) => service.sync_flag(store.as_ref())?,
            SecurityModel::RoleGraph(store) => service.sync_role_graph(store.as_ref())?,
        }
        Ok(service.report)
    }

    fn sync_flag(&mut self, store: &dyn crate::store::FlagStore) -> Result<(), SyncError> {
        self.create_flag_users(store)
    }

    fn sync_role_graph(&mut self, store: &dyn crate::store::RoleGraphStore) -> Result<(), SyncError> {
        // The admin role must exist before anything references it.
        let admin_role_name = self.decls.admin_role_name.clone();
        self.get_role(store, &admin_role_name)?;

        self.create_predefined_users(store)?;
        self.assign_role_parents(store)?;
        self.create_type_permissions(store)?;
        self.create_object_permissions(store)?;
        self.create_member_permissions(store)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use crate::registry::{Declarations, SecurityRegistry};
    use crate::store::SecurityModel;
    use crate::store::sqlite::{SqliteFlagStore, SqliteGraphStore};

    pub fn graph_fixture() -> (Arc<SqliteGraphStore>, SecurityModel) {
        let store = Arc::new(SqliteGraphStore::open_in_memory().unwrap());
        let model = SecurityModel::RoleGraph(store.clone());
        (store, model)
    }

    pub fn flag_fixture() -> (Arc<SqliteFlagStore>, SecurityModel) {
        let store = Arc::new(SqliteFlagStore::open_in_memory().unwrap());
        let model = SecurityModel::Flag(store.clone());
        (store, model)
    }

    pub fn collect(build: impl FnOnce(&mut SecurityRegistry)) -> Declarations {
        let mut registry = SecurityRegistry::new();
        build(&mut registry);
        registry.collect()
    }
}
