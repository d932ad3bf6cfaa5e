//! Main tables: the tables that participate in the dependency graph.

use super::edge::Edge;
use super::table::Table;
use std::any::TypeId;
use std::ops::{Deref, DerefMut};

/// Identity of the entity type a main table was derived from.
///
/// The name doubles as the table name and registry key; the `TypeId` is
/// kept so repeated registrations of the same type deduplicate to one
/// table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType {
    id: TypeId,
    name: String,
}

impl SourceType {
    /// Identity of `T`, named after the last path segment of its type name.
    pub fn of<T: 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self {
            id: TypeId::of::<T>(),
            name: name.to_string(),
        }
    }

    /// The table name derived from the type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying type identity.
    pub fn id(&self) -> TypeId {
        self.id
    }
}

/// A [`Table`] that participates in the dependency graph.
///
/// Dereferences to [`Table`] for column and key access. Auxiliary tables
/// attached here have no graph identity of their own: they are never
/// registered in a schema and never appear in the topological order.
#[derive(Debug, Clone)]
pub struct MainTable {
    table: Table,
    /// Subordinate tables attached to this one.
    pub aux_tables: Vec<Table>,
    /// Typed relationships owned by this table.
    pub edges: Vec<Edge>,
    source: SourceType,
    known_parent: Option<String>,
    yielded: bool,
}

impl MainTable {
    /// Create an empty main table for `source`, named after it.
    pub fn new(source: SourceType) -> Self {
        Self {
            table: Table::new(source.name()),
            aux_tables: Vec::new(),
            edges: Vec::new(),
            source,
            known_parent: None,
            yielded: false,
        }
    }

    /// Identity of the entity type this table was registered for.
    pub fn source(&self) -> &SourceType {
        &self.source
    }

    /// The structural parent recorded for this table, if any.
    ///
    /// Recorded by the caller to capture a parent relationship even when no
    /// edge expresses it. Compared by table name, which is table identity
    /// within a schema.
    pub fn known_parent(&self) -> Option<&str> {
        self.known_parent.as_deref()
    }

    /// Record the structural parent.
    pub fn set_known_parent(&mut self, parent: impl Into<String>) {
        self.known_parent = Some(parent.into());
    }

    /// Opaque caller-owned flag; stored untouched, never interpreted here.
    pub fn is_yielded(&self) -> bool {
        self.yielded
    }

    /// Set the opaque caller-owned flag.
    pub fn set_yielded(&mut self, yielded: bool) {
        self.yielded = yielded;
    }

    /// Append an edge.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Attach an auxiliary table.
    pub fn add_aux_table(&mut self, table: Table) {
        self.aux_tables.push(table);
    }

    /// Look up an edge by its name.
    pub fn find_edge_by_name(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.name == name)
    }

    /// Look up an edge by the peer table it points at.
    pub fn find_edge_by_peer_table(&self, peer: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.peer_table == peer)
    }

    /// Whether `dependency` must be created before this table.
    ///
    /// True when `dependency` is the recorded parent, or when this table
    /// owns an edge to it whose kind puts the referencing column on this
    /// side (see [`super::EdgeKind::creates_dependency`]).
    pub fn depends_on(&self, dependency: &MainTable) -> bool {
        if self.known_parent.as_deref() == Some(dependency.name()) {
            return true;
        }
        self.edges
            .iter()
            .any(|e| e.kind.creates_dependency() && e.peer_table == dependency.name())
    }
}

impl Deref for MainTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

impl DerefMut for MainTable {
    fn deref_mut(&mut self) -> &mut Table {
        &mut self.table
    }
}
