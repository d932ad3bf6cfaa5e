//! Typed relationship descriptors between main tables.

use serde::{Deserialize, Serialize};

/// The kind of a relationship edge, seen from the owning table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// One row on each side; the peer stores the referencing column.
    OneToOne,
    /// The owner is the "one" side; referencing columns live on the peer.
    OneToMany,
    /// The owner is the "many" side and stores the referencing column.
    ManyToOne,
    /// Like [`EdgeKind::ManyToOne`], and the peer is also the owner's
    /// registration parent (cross-checked against the recorded parent when
    /// the graph is rebuilt).
    ManyToOneWithParent,
}

impl EdgeKind {
    /// Whether an edge of this kind makes its owner depend on the peer.
    ///
    /// For the many-to-one kinds the owner stores the referencing column,
    /// so the peer must be created first. For `OneToOne` and `OneToMany`
    /// the referencing column lives on the peer and the dependency is
    /// expressed from that side (or via the recorded parent); counting them
    /// here would double-count or point the wrong way.
    pub fn creates_dependency(&self) -> bool {
        !matches!(self, EdgeKind::OneToOne | EdgeKind::OneToMany)
    }
}

/// A directed, typed relationship from one main table to a named peer.
///
/// The peer side is looked up by name, never stored as an object relation,
/// so edges can be declared before their peer table is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Edge name, unique within the owning table.
    pub name: String,
    /// Name of the peer main table.
    pub peer_table: String,
    /// Relationship kind.
    pub kind: EdgeKind,
}

impl Edge {
    /// Create an edge to `peer_table`.
    pub fn new(name: impl Into<String>, peer_table: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            name: name.into(),
            peer_table: peer_table.into(),
            kind,
        }
    }
}
