//! Table descriptors and the generic repository built on them.

pub mod repository;
pub mod traits;

pub use repository::Repository;
pub use traits::{CRUDTable, Changes, UpdateModel};
