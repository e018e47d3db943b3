//! Execution seam between compiled statements and the store.

pub mod executor;
pub mod in_list;

pub use executor::Executor;
pub use in_list::{Arg, expand_in};
