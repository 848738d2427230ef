use crate::model::permission::{MemberPermission, ObjectPermission, TypePermission, split_names};

/// Default name for the administrative role when no override is registered.
pub const DEFAULT_ADMIN_ROLE_NAME: &str = "Administrators";

/// A user to ensure exists, with its initial role membership.
#[derive(Debug, Clone)]
pub struct PredefinedUser {
    pub user_name: String,
    /// Semicolon-delimited role names.
    pub role_names: String,
}

impl PredefinedUser {
    pub fn new(user_name: impl Into<String>, role_names: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            role_names: role_names.into(),
        }
    }

    pub fn role_names(&self) -> Vec<String> {
        split_names(&self.role_names)
    }
}

/// Declares that a role inherits everything granted to each parent role.
#[derive(Debug, Clone)]
pub struct RoleParents {
    pub role_name: String,
    /// Semicolon-delimited parent role names.
    pub parent_names: String,
}

impl RoleParents {
    pub fn new(role_name: impl Into<String>, parent_names: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            parent_names: parent_names.into(),
        }
    }

    pub fn parent_names(&self) -> Vec<String> {
        split_names(&self.parent_names)
    }
}

/// Process-wide declarations: the admin role name override, predefined
/// users, role-parent links, and "external" permissions — grants an
/// integrator declares for domain types it does not own and therefore cannot
/// annotate directly (each carries its own explicit target type).
#[derive(Debug, Clone, Default)]
pub struct SecurityOptions {
    pub admin_role_name: Option<String>,
    pub users: Vec<PredefinedUser>,
    pub role_parents: Vec<RoleParents>,
    pub external_type_permissions: Vec<TypePermission>,
    pub external_object_permissions: Vec<ObjectPermission>,
    pub external_member_permissions: Vec<MemberPermission>,
}

impl SecurityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin_role_name(mut self, name: impl Into<String>) -> Self {
        self.admin_role_name = Some(name.into());
        self
    }

    pub fn user(mut self, user: PredefinedUser) -> Self {
        self.users.push(user);
        self
    }

    pub fn role_parents(mut self, parents: RoleParents) -> Self {
        self.role_parents.push(parents);
        self
    }

    pub fn type_permission(mut self, perm: TypePermission) -> Self {
        self.external_type_permissions.push(perm);
        self
    }

    pub fn object_permission(mut self, perm: ObjectPermission) -> Self {
        self.external_object_permissions.push(perm);
        self
    }

    pub fn member_permission(mut self, perm: MemberPermission) -> Self {
        self.external_member_permissions.push(perm);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = SecurityOptions::new()
            .admin_role_name("Admins")
            .user(PredefinedUser::new("alice", "Admins"))
            .role_parents(RoleParents::new("Sales", "Staff;ReadOnly"))
            .type_permission(TypePermission::new("Invoice", "Audit", "Read"));

        assert_eq!(options.admin_role_name.as_deref(), Some("Admins"));
        assert_eq!(options.users.len(), 1);
        assert_eq!(options.role_parents[0].parent_names(), vec!["Staff", "ReadOnly"]);
        assert_eq!(options.external_type_permissions[0].target_type, "Invoice");
    }

    #[test]
    fn test_predefined_user_empty_roles() {
        let user = PredefinedUser::new("bob", "");
        assert!(user.role_names().is_empty());
    }
}
