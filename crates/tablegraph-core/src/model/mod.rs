//! Table, column, and edge definitions.
//!
//! These are the passive value types the schema registry works over. The
//! definition types consumed by a downstream DDL generator ([`Field`],
//! [`ForeignKey`], [`Table`], [`Edge`]) are serializable; [`MainTable`] is
//! runtime registry state and is not.

mod edge;
mod field;
mod main_table;
mod table;

pub use edge::{Edge, EdgeKind};
pub use field::{Field, ForeignKey, ReferenceOption};
pub use main_table::{MainTable, SourceType};
pub use table::Table;
