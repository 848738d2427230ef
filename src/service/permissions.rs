use tracing::debug;

use crate::error::SyncError;
use crate::model::{AccessModifier, operations};
use crate::service::SyncService;
use crate::store::RoleGraphStore;

impl SyncService<'_> {
    /// Grant declared type-level permissions to every named role.
    pub(crate) fn create_type_permissions(
        &mut self,
        store: &dyn RoleGraphStore,
    ) -> Result<(), SyncError> {
        let decls = self.decls;
        for perm in &decls.type_permissions {
            for role_name in perm.role_names() {
                let Some(role) = self.get_role(store, &role_name)? else {
                    continue;
                };
                if store.grant_type_permission(
                    &role.id,
                    &perm.target_type,
                    &perm.operations,
                    perm.modifier,
                )? {
                    self.report.grants_written += 1;
                    debug!(
                        "type grant: role '{}' {} on {}",
                        role_name, perm.operations, perm.target_type
                    );
                }
            }
        }
        Ok(())
    }

    /// Grant declared object-level (criteria-restricted) permissions.
    ///
    /// Unless the declaration opts out, an implicit navigate grant on the
    /// target type comes first — a criteria grant is useless to a role that
    /// cannot see the type at all.
    pub(crate) fn create_object_permissions(
        &mut self,
        store: &dyn RoleGraphStore,
    ) -> Result<(), SyncError> {
        let decls = self.decls;
        for perm in &decls.object_permissions {
            for role_name in perm.role_names() {
                let Some(role) = self.get_role(store, &role_name)? else {
                    continue;
                };
                if !perm.not_navigable
                    && store.grant_type_permission(
                        &role.id,
                        &perm.target_type,
                        operations::NAVIGATE,
                        AccessModifier::Allow,
                    )?
                {
                    self.report.grants_written += 1;
                }
                if store.grant_object_permission(
                    &role.id,
                    &perm.target_type,
                    &perm.criteria,
                    &perm.operations,
                    perm.modifier,
                )? {
                    self.report.grants_written += 1;
                    debug!(
                        "object grant: role '{}' {} on {} where {}",
                        role_name, perm.operations, perm.target_type, perm.criteria
                    );
                }
            }
        }
        Ok(())
    }

    /// Grant declared member-level permissions, always preceded by the
    /// implicit navigate grant on the declaring type.
    pub(crate) fn create_member_permissions(
        &mut self,
        store: &dyn RoleGraphStore,
    ) -> Result<(), SyncError> {
        let decls = self.decls;
        for perm in &decls.member_permissions {
            for role_name in perm.role_names() {
                let Some(role) = self.get_role(store, &role_name)? else {
                    continue;
                };
                if store.grant_type_permission(
                    &role.id,
                    &perm.target_type,
                    operations::NAVIGATE,
                    AccessModifier::Allow,
                )? {
                    self.report.grants_written += 1;
                }
                if store.grant_member_permission(
                    &role.id,
                    &perm.target_type,
                    &perm.member_names,
                    &perm.criteria,
                    &perm.operations,
                    perm.modifier,
                )? {
                    self.report.grants_written += 1;
                    debug!(
                        "member grant: role '{}' {} on {}::{}",
                        role_name, perm.operations, perm.target_type, perm.member_names
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{AccessModifier, MemberPermission, ObjectPermission, TypePermission, operations};
    use crate::service::SyncService;
    use crate::service::testutil::{collect, graph_fixture};
    use crate::store::RoleGraphStore;

    #[test]
    fn test_type_permission_grants_each_named_role() {
        let (store, model) = graph_fixture();
        let decls = collect(|r| {
            r.declare_type_permission(TypePermission::new(
                "Order",
                "Sales;Audit",
                operations::READ,
            ));
        });

        let report = SyncService::synchronize(&decls, &model).unwrap();
        assert_eq!(report.grants_written, 2);
        assert_eq!(store.count_rows("sec_type_permissions"), 2);
    }

    #[test]
    fn test_object_permission_includes_implicit_navigate() {
        let (store, model) = graph_fixture();
        let decls = collect(|r| {
            r.declare_object_permission(ObjectPermission::new(
                "Order",
                "Sales",
                operations::READ,
                "Amount > 100",
            ));
        });

        SyncService::synchronize(&decls, &model).unwrap();

        let role = store.find_role("Sales").unwrap().unwrap();
        // One navigate type grant plus the criteria-restricted object grant.
        assert!(
            !store
                .grant_type_permission(&role.id, "Order", operations::NAVIGATE, AccessModifier::Allow)
                .unwrap()
        );
        assert!(
            !store
                .grant_object_permission(
                    &role.id,
                    "Order",
                    "Amount > 100",
                    operations::READ,
                    AccessModifier::Allow
                )
                .unwrap()
        );
        assert_eq!(store.count_rows("sec_type_permissions"), 1);
        assert_eq!(store.count_rows("sec_object_permissions"), 1);
    }

    #[test]
    fn test_not_navigable_suppresses_navigate_grant() {
        let (store, model) = graph_fixture();
        let decls = collect(|r| {
            r.declare_object_permission(
                ObjectPermission::new("Order", "Sales", operations::READ, "Amount > 100")
                    .not_navigable(),
            );
        });

        SyncService::synchronize(&decls, &model).unwrap();
        assert_eq!(store.count_rows("sec_type_permissions"), 0);
        assert_eq!(store.count_rows("sec_object_permissions"), 1);
    }

    #[test]
    fn test_member_permission_always_navigable() {
        let (store, model) = graph_fixture();
        let decls = collect(|r| {
            r.declare_member_permission(
                MemberPermission::new("Order", "Total;Discount", "Audit", operations::READ)
                    .with_criteria("Closed = true"),
            );
        });

        SyncService::synchronize(&decls, &model).unwrap();
        assert_eq!(store.count_rows("sec_type_permissions"), 1);
        assert_eq!(store.count_rows("sec_member_permissions"), 1);
    }

    #[test]
    fn test_deny_modifier_carried_through() {
        let (store, model) = graph_fixture();
        let decls = collect(|r| {
            r.declare_type_permission(
                TypePermission::new("Payroll", "Interns", operations::READ).deny(),
            );
        });

        SyncService::synchronize(&decls, &model).unwrap();

        let role = store.find_role("Interns").unwrap().unwrap();
        // The deny grant is present; an identical re-issue is a no-op.
        assert!(
            !store
                .grant_type_permission(&role.id, "Payroll", operations::READ, AccessModifier::Deny)
                .unwrap()
        );
    }

    #[test]
    fn test_malformed_criteria_is_stored_as_is() {
        let (store, model) = graph_fixture();
        let decls = collect(|r| {
            r.declare_object_permission(ObjectPermission::new(
                "Order",
                "Sales",
                operations::READ,
                "((not even close to valid",
            ));
        });

        // Criteria are opaque to this layer; nothing fails here.
        SyncService::synchronize(&decls, &model).unwrap();
        assert_eq!(store.count_rows("sec_object_permissions"), 1);
    }
}
