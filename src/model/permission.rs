use serde::{Deserialize, Serialize};

/// Whether a grant allows or denies the declared operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    #[default]
    Allow,
    Deny,
}

impl AccessModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessModifier::Allow => "allow",
            AccessModifier::Deny => "deny",
        }
    }
}

/// Split a semicolon-delimited name list into its entries.
///
/// An empty input yields an empty list; leading, trailing or doubled
/// delimiters never produce empty-string entries. Duplicates and order are
/// preserved — deduplication is not the declaration layer's job.
pub fn split_names(names: &str) -> Vec<String> {
    names
        .split(';')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

/// Grants the declared operations on every instance of a type.
#[derive(Debug, Clone)]
pub struct TypePermission {
    /// Name of the domain type the grant governs.
    pub target_type: String,
    /// Semicolon-delimited role names.
    pub role_names: String,
    /// Operation tokens (see [`crate::model::operations`]).
    pub operations: String,
    pub modifier: AccessModifier,
}

impl TypePermission {
    pub fn new(
        target_type: impl Into<String>,
        role_names: impl Into<String>,
        operations: impl Into<String>,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            role_names: role_names.into(),
            operations: operations.into(),
            modifier: AccessModifier::Allow,
        }
    }

    pub fn deny(mut self) -> Self {
        self.modifier = AccessModifier::Deny;
        self
    }

    pub fn role_names(&self) -> Vec<String> {
        split_names(&self.role_names)
    }
}

/// Grants operations on the subset of a type's instances matching a
/// criteria expression.
///
/// The criteria string is stored as-is; it is evaluated, if ever, by the
/// store's own expression engine. Unless [`not_navigable`] is set the
/// synchronizer also issues an implicit navigate grant on the target type.
///
/// [`not_navigable`]: ObjectPermission::not_navigable
#[derive(Debug, Clone)]
pub struct ObjectPermission {
    pub target_type: String,
    pub role_names: String,
    pub operations: String,
    pub modifier: AccessModifier,
    /// Filter expression selecting the governed instances.
    pub criteria: String,
    /// Suppress the implicit navigate grant.
    pub not_navigable: bool,
}

impl ObjectPermission {
    pub fn new(
        target_type: impl Into<String>,
        role_names: impl Into<String>,
        operations: impl Into<String>,
        criteria: impl Into<String>,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            role_names: role_names.into(),
            operations: operations.into(),
            modifier: AccessModifier::Allow,
            criteria: criteria.into(),
            not_navigable: false,
        }
    }

    pub fn deny(mut self) -> Self {
        self.modifier = AccessModifier::Deny;
        self
    }

    pub fn not_navigable(mut self) -> Self {
        self.not_navigable = true;
        self
    }

    pub fn role_names(&self) -> Vec<String> {
        split_names(&self.role_names)
    }
}

/// Grants operations on named members of a type.
///
/// Covers both declaration shapes: a list attached to the type (several
/// member names at once) and a declaration attached to a single member
/// (`member_names` then holds that one name).
#[derive(Debug, Clone)]
pub struct MemberPermission {
    pub target_type: String,
    /// Semicolon-delimited member names.
    pub member_names: String,
    pub role_names: String,
    pub operations: String,
    pub modifier: AccessModifier,
    pub criteria: String,
}

impl MemberPermission {
    pub fn new(
        target_type: impl Into<String>,
        member_names: impl Into<String>,
        role_names: impl Into<String>,
        operations: impl Into<String>,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            member_names: member_names.into(),
            role_names: role_names.into(),
            operations: operations.into(),
            modifier: AccessModifier::Allow,
            criteria: String::new(),
        }
    }

    pub fn with_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = criteria.into();
        self
    }

    pub fn deny(mut self) -> Self {
        self.modifier = AccessModifier::Deny;
        self
    }

    pub fn role_names(&self) -> Vec<String> {
        split_names(&self.role_names)
    }

    pub fn member_names(&self) -> Vec<String> {
        split_names(&self.member_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_names() {
        assert_eq!(split_names("A;B;C"), vec!["A", "B", "C"]);
        assert_eq!(split_names("Sales"), vec!["Sales"]);
        assert!(split_names("").is_empty());
    }

    #[test]
    fn test_split_names_stray_delimiters() {
        assert_eq!(split_names(";A;B;"), vec!["A", "B"]);
        assert_eq!(split_names("A;;B"), vec!["A", "B"]);
        assert!(split_names(";;").is_empty());
    }

    #[test]
    fn test_split_names_keeps_duplicates() {
        assert_eq!(split_names("A;B;A"), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_type_permission_defaults_to_allow() {
        let perm = TypePermission::new("Order", "Sales", "Read");
        assert_eq!(perm.modifier, AccessModifier::Allow);
        assert_eq!(perm.role_names(), vec!["Sales"]);

        let denied = TypePermission::new("Order", "Sales", "Read").deny();
        assert_eq!(denied.modifier, AccessModifier::Deny);
    }

    #[test]
    fn test_object_permission_navigable_by_default() {
        let perm = ObjectPermission::new("Order", "Sales", "Read", "Amount > 100");
        assert!(!perm.not_navigable);
        assert!(perm.not_navigable().not_navigable);
    }

    #[test]
    fn test_member_permission_names() {
        let perm = MemberPermission::new("Order", "Total;Discount", "Sales;Audit", "Read")
            .with_criteria("Closed = false");
        assert_eq!(perm.member_names(), vec!["Total", "Discount"]);
        assert_eq!(perm.role_names(), vec!["Sales", "Audit"]);
        assert_eq!(perm.criteria, "Closed = false");
    }
}
