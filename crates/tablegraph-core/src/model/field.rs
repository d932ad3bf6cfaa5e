//! Column and foreign key definitions.

use serde::{Deserialize, Serialize};

/// Action applied to referencing rows when the referenced key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceOption {
    /// Reject the change while referencing rows exist.
    Restrict,
    /// Propagate the change to the referencing rows.
    Cascade,
    /// Null out the referencing columns.
    SetNull,
}

impl ReferenceOption {
    /// The SQL token for this action.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferenceOption::Restrict => "RESTRICT",
            ReferenceOption::Cascade => "CASCADE",
            ReferenceOption::SetNull => "SET NULL",
        }
    }
}

/// A plain column within a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Opaque SQL type token, passed through to the DDL generator.
    pub sql_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Whether the column is auto-incremented.
    pub auto_increment: bool,
}

impl Field {
    /// Create a non-nullable column.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: false,
            auto_increment: false,
        }
    }

    /// Mark the column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the column as auto-incremented.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// A foreign key constraint owned by exactly one table.
///
/// `ref_table` is a name reference, not an object relation. It is resolved
/// when the dependency graph is rebuilt, so tables can be defined in any
/// order; it is never checked at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing columns on the owning table.
    pub source_columns: Vec<String>,
    /// Name of the referenced table.
    pub ref_table: String,
    /// Referenced columns, matched positionally with `source_columns`.
    pub ref_columns: Vec<String>,
    /// Action on key update.
    pub on_update: ReferenceOption,
    /// Action on row deletion. Unset means the backend default applies.
    pub on_delete: Option<ReferenceOption>,
}

impl ForeignKey {
    /// Create a foreign key against `ref_table` with no columns yet,
    /// restricting updates and leaving the delete action unset.
    pub fn new(ref_table: impl Into<String>) -> Self {
        Self {
            source_columns: Vec::new(),
            ref_table: ref_table.into(),
            ref_columns: Vec::new(),
            on_update: ReferenceOption::Restrict,
            on_delete: None,
        }
    }

    /// Set the referencing and referenced column lists.
    pub fn with_columns(
        mut self,
        source: impl IntoIterator<Item = impl Into<String>>,
        referenced: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.source_columns = source.into_iter().map(Into::into).collect();
        self.ref_columns = referenced.into_iter().map(Into::into).collect();
        self
    }

    /// Set the update action.
    pub fn with_on_update(mut self, action: ReferenceOption) -> Self {
        self.on_update = action;
        self
    }

    /// Set the delete action.
    pub fn with_on_delete(mut self, action: ReferenceOption) -> Self {
        self.on_delete = Some(action);
        self
    }
}
