//! Security operation tokens.
//!
//! Operations travel through the engine as opaque strings; the store decides
//! what they mean at enforcement time. The engine itself only ever adds
//! [`NAVIGATE`] (the implicit grant that lets a role see a type at all).
//! Combined tokens join single operations with the `;` delimiter used
//! everywhere else for multi-value fields.

pub const READ: &str = "Read";
pub const WRITE: &str = "Write";
pub const CREATE: &str = "Create";
pub const DELETE: &str = "Delete";
pub const NAVIGATE: &str = "Navigate";

/// Read + write.
pub const READ_WRITE: &str = "Read;Write";

/// Every operation, navigation included.
pub const FULL: &str = "Read;Write;Create;Delete;Navigate";
