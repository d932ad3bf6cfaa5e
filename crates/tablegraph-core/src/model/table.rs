//! Table definitions: columns, key groups, and foreign keys.

use super::field::{Field, ForeignKey};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named relational table: columns plus key constraint groups.
///
/// The name is the table's identity within a schema and is fixed at
/// construction. Key groups use `BTreeMap` so the DDL consumer sees a
/// deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    /// Plain columns in declaration order.
    pub simple_fields: Vec<Field>,
    /// Columns forming the primary key.
    pub primary_keys: Vec<String>,
    /// Unique key groups, keyed by group name.
    pub unique_keys: BTreeMap<String, Vec<String>>,
    /// Composite (non-unique) key groups, keyed by group name.
    pub composite_keys: BTreeMap<String, Vec<String>>,
    /// Foreign keys owned by this table.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            simple_fields: Vec::new(),
            primary_keys: Vec::new(),
            unique_keys: BTreeMap::new(),
            composite_keys: BTreeMap::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a column.
    pub fn add_field(&mut self, field: Field) {
        self.simple_fields.push(field);
    }

    /// Add a column to the primary key.
    pub fn add_primary_key(&mut self, column: impl Into<String>) {
        self.primary_keys.push(column.into());
    }

    /// Record a unique key group.
    pub fn add_unique_key(
        &mut self,
        group: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.unique_keys
            .insert(group.into(), columns.into_iter().map(Into::into).collect());
    }

    /// Record a composite key group.
    pub fn add_composite_key(
        &mut self,
        group: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.composite_keys
            .insert(group.into(), columns.into_iter().map(Into::into).collect());
    }

    /// Append a foreign key.
    pub fn add_foreign_key(&mut self, key: ForeignKey) {
        self.foreign_keys.push(key);
    }

    /// Look up a column by name.
    ///
    /// Absence is a definition error. Field sets are small (tens of
    /// columns), so this is a linear scan.
    pub fn find_field(&self, name: &str) -> Result<&Field, SchemaError> {
        self.simple_fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                table: self.name.clone(),
                field: name.to_string(),
            })
    }
}
