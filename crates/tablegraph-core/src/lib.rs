//! Schema dependency graph builder and topological orderer.
//!
//! Given a set of table definitions derived from application entity types,
//! this crate registers them in a [`Schema`], infers a directed dependency
//! relation from their foreign-key-bearing edges, and computes a
//! deterministic order in which the tables can be created so that every
//! table referenced by a foreign key exists before the table referencing it.
//!
//! Column derivation and DDL emission live outside this crate: a generator
//! consumes [`Schema::sorted_tables`] together with each table's fields,
//! key groups, and foreign keys and emits statements in the returned order.

pub mod error;
mod graph;
pub mod model;
pub mod schema;

pub use error::SchemaError;
pub use model::{Edge, EdgeKind, Field, ForeignKey, MainTable, ReferenceOption, SourceType, Table};
pub use schema::Schema;
