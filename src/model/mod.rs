pub mod operations;

mod options;
mod permission;
mod records;

pub use options::*;
pub use permission::*;
pub use records::*;
