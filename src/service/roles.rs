use tracing::{info, warn};

use crate::error::SyncError;
use crate::model::Role;
use crate::service::SyncService;
use crate::store::RoleGraphStore;

impl SyncService<'_> {
    /// Resolve a role by name, creating it if absent.
    ///
    /// The administrative flag is re-asserted on every resolution, created
    /// or not: a role named exactly the configured admin role name is always
    /// administrative afterwards. An empty name resolves to nothing.
    pub(crate) fn get_role(
        &mut self,
        store: &dyn RoleGraphStore,
        name: &str,
    ) -> Result<Option<Role>, SyncError> {
        if name.is_empty() {
            warn!("skipping declaration entry with an empty role name");
            return Ok(None);
        }

        let role = match store.find_role(name)? {
            Some(role) => role,
            None => {
                let role = store.create_role(name)?;
                self.report.roles_created += 1;
                info!("created role '{name}'");
                role
            }
        };

        store.set_administrative(&role.id, name == self.decls.admin_role_name)?;
        Ok(Some(role))
    }

    /// Link declared parent roles. Both sides resolve through
    /// [`get_role`](Self::get_role); a link already present is left alone.
    pub(crate) fn assign_role_parents(
        &mut self,
        store: &dyn RoleGraphStore,
    ) -> Result<(), SyncError> {
        let decls = self.decls;
        for declaration in &decls.role_parents {
            let Some(child) = self.get_role(store, &declaration.role_name)? else {
                continue;
            };
            for parent_name in declaration.parent_names() {
                let Some(parent) = self.get_role(store, &parent_name)? else {
                    continue;
                };
                if !store.has_parent(&child.id, &parent.id)? {
                    store.add_parent(&child.id, &parent.id)?;
                }
            }
        }
        Ok(())
    }
}
