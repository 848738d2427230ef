//! secsync — declarative security synchronization.
//!
//! Domain modules declare access-control facts (type/object/member
//! permissions, role hierarchy, predefined users) against a registry instead
//! of hand-writing security-setup code. At schema-update time a driver
//! collects every declaration and materializes it into whichever persisted
//! security model is active.
//!
//! # Resources
//!
//! - **SecurityRegistry** — explicit registration surface for declarations
//! - **Declarations** — the flat, per-run snapshot the registry collects
//! - **SecurityModel** — the active store variant (flag-based or role-graph)
//! - **SecurityUpdater** — once-per-schema-update driver: collect → sync → commit
//!
//! # Usage
//!
//! ```ignore
//! use secsync::{SecurityRegistry, SecurityModel, SecurityUpdater};
//! use secsync::model::{SecurityOptions, PredefinedUser, TypePermission, operations};
//! use secsync::store::sqlite::SqliteGraphStore;
//!
//! let mut registry = SecurityRegistry::new();
//! registry.register_options(
//!     SecurityOptions::new()
//!         .admin_role_name("Admins")
//!         .user(PredefinedUser::new("alice", "Admins")),
//! );
//! registry.declare_type_permission(TypePermission::new("Order", "Sales", operations::READ));
//!
//! let store = SqliteGraphStore::open(path)?;
//! let model = SecurityModel::RoleGraph(std::sync::Arc::new(store));
//! let report = SecurityUpdater::new(Some(model)).run(&registry)?;
//! ```

pub mod error;
pub mod model;
pub mod registry;
pub mod service;
pub mod store;
pub mod update;

pub use error::SyncError;
pub use registry::{Declarations, SecurityRegistry};
pub use service::{SyncReport, SyncService};
pub use store::SecurityModel;
pub use update::SecurityUpdater;
