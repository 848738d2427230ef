//! Schema-update driver.
//!
//! The host invokes [`SecurityUpdater::run`] exactly once per schema-update
//! step, after its own schema is current: collect declarations, synchronize
//! them into the active security model, commit. Concurrent invocation is
//! undefined; the caller guarantees single-writer semantics.

use tracing::info;

use crate::error::SyncError;
use crate::registry::SecurityRegistry;
use crate::service::{SyncReport, SyncService};
use crate::store::SecurityModel;

/// Drives one collect → synchronize → commit pass.
pub struct SecurityUpdater {
    model: Option<SecurityModel>,
}

impl SecurityUpdater {
    /// `model` is the active security-model variant, if any. With `None`
    /// the updater is a no-op — a deployment without a compatible security
    /// model is not an error.
    pub fn new(model: Option<SecurityModel>) -> Self {
        Self { model }
    }

    /// Run the synchronization pass. Store failures, commit included,
    /// propagate to the caller; nothing is retried.
    pub fn run(&self, registry: &SecurityRegistry) -> Result<SyncReport, SyncError> {
        let Some(model) = &self.model else {
            info!("no active security model, skipping security synchronization");
            return Ok(SyncReport::default());
        };

        let declarations = registry.collect();
        let report = SyncService::synchronize(&declarations, model)?;
        model.commit()?;

        info!(
            "security synchronized: {} roles created, {} users created, {} grants written",
            report.roles_created, report.users_created, report.grants_written
        );
        Ok(report)
    }
}
