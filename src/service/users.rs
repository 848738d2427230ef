use tracing::{info, warn};

use crate::error::SyncError;
use crate::service::SyncService;
use crate::store::{FlagStore, RoleGraphStore};

impl SyncService<'_> {
    /// Flag variant: ensure each predefined user exists. A newly created
    /// user is an administrator iff the admin role name appears in its
    /// declared role set; an existing user is left untouched, flag included.
    pub(crate) fn create_flag_users(&mut self, store: &dyn FlagStore) -> Result<(), SyncError> {
        for user in &self.decls.users {
            if user.user_name.is_empty() {
                warn!("skipping predefined user with an empty name");
                continue;
            }
            if store.find_user(&user.user_name)?.is_some() {
                continue;
            }

            let is_administrator = user
                .role_names()
                .iter()
                .any(|role| role == &self.decls.admin_role_name);
            store.create_user(&user.user_name, is_administrator)?;
            self.report.users_created += 1;
            info!(
                "created user '{}' (administrator: {})",
                user.user_name, is_administrator
            );
        }
        Ok(())
    }

    /// Role-graph variant: ensure each predefined user exists. Declared role
    /// memberships are applied on creation only — membership of an existing
    /// user is the store's own bookkeeping, not re-synced here.
    pub(crate) fn create_predefined_users(
        &mut self,
        store: &dyn RoleGraphStore,
    ) -> Result<(), SyncError> {
        let decls = self.decls;
        for user in &decls.users {
            if user.user_name.is_empty() {
                warn!("skipping predefined user with an empty name");
                continue;
            }
            if store.find_user(&user.user_name)?.is_some() {
                continue;
            }

            let created = store.create_user(&user.user_name)?;
            self.report.users_created += 1;
            info!("created user '{}'", user.user_name);

            for role_name in user.role_names() {
                if let Some(role) = self.get_role(store, &role_name)? {
                    store.add_user_role(&created.id, &role.id)?;
                }
            }
        }
        Ok(())
    }
}
