//! Schema definition errors.
//!
//! Every variant here signals an invalid schema definition supplied by the
//! program, not a transient runtime condition. None of them are retryable;
//! callers at the process boundary are expected to treat any of them as a
//! fatal build failure and refuse to proceed.

use thiserror::Error;

/// Errors raised while building or querying a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A must-exist lookup named a table that was never registered.
    #[error("table {name} does not exist")]
    TableNotFound {
        /// The requested table name.
        name: String,
    },

    /// A field lookup named a column absent from the table.
    #[error("field {field} not found in {table}")]
    FieldNotFound {
        /// The table searched.
        table: String,
        /// The requested column name.
        field: String,
    },

    /// The inferred dependency graph contains a cycle; no creation order
    /// exists.
    #[error("cyclic dependency between tables: {}", tables.join(", "))]
    CyclicDependency {
        /// The tables still caught in the cycle, in name order.
        tables: Vec<String>,
    },

    /// An edge names a peer table that was never registered.
    #[error("edge {edge} of table {table} refers to unknown table {peer}")]
    UnknownPeerTable {
        /// The table owning the edge.
        table: String,
        /// The edge name.
        edge: String,
        /// The unresolved peer table name.
        peer: String,
    },

    /// A recorded parent names a table that was never registered.
    #[error("table {table} records unknown parent table {parent}")]
    UnknownParent {
        /// The table carrying the parent reference.
        table: String,
        /// The unresolved parent table name.
        parent: String,
    },

    /// A table's recorded parent disagrees with its parent-bearing edge.
    #[error("table {table} records parent {parent} but its parent edge points at {peer}")]
    ParentMismatch {
        /// The table carrying both references.
        table: String,
        /// The recorded parent table name.
        parent: String,
        /// The peer named by the `ManyToOneWithParent` edge.
        peer: String,
    },
}
