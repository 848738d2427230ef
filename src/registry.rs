//! Declaration registry — the collection pass.
//!
//! Domain modules register their policy facts here at process setup, keyed
//! by the target type's name; the registry replaces any reflective scanning
//! of the domain model. [`SecurityRegistry::collect`] flattens everything
//! into a fresh [`Declarations`] snapshot for one synchronization run.

use tracing::warn;

use crate::model::{
    DEFAULT_ADMIN_ROLE_NAME, MemberPermission, ObjectPermission, PredefinedUser, RoleParents,
    SecurityOptions, TypePermission,
};

/// Registration surface for security declarations.
#[derive(Debug, Default)]
pub struct SecurityRegistry {
    options: Option<SecurityOptions>,
    type_permissions: Vec<TypePermission>,
    object_permissions: Vec<ObjectPermission>,
    member_permissions: Vec<MemberPermission>,
}

impl SecurityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the process-wide options block. The first registration wins;
    /// later ones are dropped.
    pub fn register_options(&mut self, options: SecurityOptions) {
        if self.options.is_some() {
            warn!("security options already registered, ignoring later registration");
            return;
        }
        self.options = Some(options);
    }

    /// Declare a type-level permission on the type the permission names.
    pub fn declare_type_permission(&mut self, perm: TypePermission) {
        self.type_permissions.push(perm);
    }

    /// Declare an object-level (criteria-restricted) permission.
    pub fn declare_object_permission(&mut self, perm: ObjectPermission) {
        self.object_permissions.push(perm);
    }

    /// Declare a member-level permission. A declaration attached to a single
    /// member is the same shape with one name in `member_names`.
    pub fn declare_member_permission(&mut self, perm: MemberPermission) {
        self.member_permissions.push(perm);
    }

    /// Flatten every registered declaration into one snapshot.
    ///
    /// No filtering, deduplication or validation happens here — duplicates
    /// across overlapping declarations are kept for the synchronizer to
    /// resolve against the store.
    pub fn collect(&self) -> Declarations {
        let mut decls = Declarations::default();

        if let Some(options) = &self.options {
            if let Some(name) = &options.admin_role_name {
                decls.admin_role_name = name.clone();
            }
            decls.users.extend(options.users.iter().cloned());
            decls.role_parents.extend(options.role_parents.iter().cloned());
            decls
                .type_permissions
                .extend(options.external_type_permissions.iter().cloned());
            decls
                .object_permissions
                .extend(options.external_object_permissions.iter().cloned());
            decls
                .member_permissions
                .extend(options.external_member_permissions.iter().cloned());
        }

        decls.type_permissions.extend(self.type_permissions.iter().cloned());
        decls.object_permissions.extend(self.object_permissions.iter().cloned());
        decls.member_permissions.extend(self.member_permissions.iter().cloned());

        decls
    }
}

/// The flat declaration snapshot one synchronization run consumes. Built
/// fresh by [`SecurityRegistry::collect`] and discarded after the run.
#[derive(Debug, Clone)]
pub struct Declarations {
    pub admin_role_name: String,
    pub users: Vec<PredefinedUser>,
    pub role_parents: Vec<RoleParents>,
    pub type_permissions: Vec<TypePermission>,
    pub object_permissions: Vec<ObjectPermission>,
    pub member_permissions: Vec<MemberPermission>,
}

impl Default for Declarations {
    fn default() -> Self {
        Self {
            admin_role_name: DEFAULT_ADMIN_ROLE_NAME.to_string(),
            users: Vec::new(),
            role_parents: Vec::new(),
            type_permissions: Vec::new(),
            object_permissions: Vec::new(),
            member_permissions: Vec::new(),
        }
    }
}
