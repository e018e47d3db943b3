//! # SQL Compilation
//!
//! Pure functions from a [`CRUDTable`](crate::CRUDTable) and a
//! [`Filter`](crate::filtering::Filter) to SQL text plus positional arguments.
//! Identifiers are always backtick-quoted and values are always `?`
//! placeholders, on every path.
//!
//! ```rust,ignore
//! let filter = Filter::new().with_condition(Condition::eq("name", "Alice"));
//! let compiled = compile_select::<Author>(Some(&filter))?;
//! assert_eq!(compiled.sql, "SELECT * FROM `authors` WHERE `name` = ?");
//! ```

pub mod compiler;

pub use compiler::{
    Compiled, compile_delete, compile_delete_by_id, compile_delete_by_ids, compile_insert,
    compile_select, compile_select_by_id, compile_select_by_ids, compile_select_fields,
    compile_update, compile_update_by_id, compile_update_by_ids, quote_identifier,
};
