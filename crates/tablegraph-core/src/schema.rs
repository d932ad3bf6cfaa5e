//! Schema registry and creation-order computation.

use crate::error::SchemaError;
use crate::graph::DependencyGraph;
use crate::model::{EdgeKind, MainTable, SourceType};
use std::collections::BTreeMap;
use tracing::debug;

/// The registry of all main tables for one schema build.
///
/// Tables are registered additively, never removed. The sorted creation
/// order is cached and rebuilt lazily the first time it is requested after
/// going stale. Any operation handing out mutable table access marks the
/// cache stale, so edges added after registration are picked up by the next
/// [`Schema::sorted_tables`] call.
///
/// All mutating operations take `&mut self`; a caller needing concurrent
/// access must serialize calls externally, which the borrow rules already
/// enforce.
#[derive(Debug, Default)]
pub struct Schema {
    tables: BTreeMap<String, MainTable>,
    order: Vec<String>,
    outdated: bool,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate registered tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &MainTable> {
        self.tables.values()
    }

    /// Get or create the table registered for `source`.
    ///
    /// Idempotent: repeated calls with the same identity return the same
    /// table. The caller populates fields, keys, and edges through the
    /// returned reference before requesting the sorted order.
    pub fn table_for(&mut self, source: SourceType) -> &mut MainTable {
        self.outdated = true;
        self.tables
            .entry(source.name().to_string())
            .or_insert_with(|| {
                debug!(table = %source.name(), "registered table");
                MainTable::new(source)
            })
    }

    /// Look up a table that must already be registered.
    pub fn table(&self, name: &str) -> Result<&MainTable, SchemaError> {
        self.tables
            .get(name)
            .ok_or_else(|| SchemaError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Mutable lookup of a registered table; marks the cached order stale.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut MainTable, SchemaError> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| SchemaError::TableNotFound {
                name: name.to_string(),
            })?;
        self.outdated = true;
        Ok(table)
    }

    /// The registered tables in creation order.
    ///
    /// Every table referenced by another (per
    /// [`MainTable::depends_on`]) precedes its referents; tables with no
    /// dependency relation between them come out in lexicographic name
    /// order. Two builds over an identical table and edge set return the
    /// identical sequence. A cached order is returned unchanged until the
    /// schema goes stale.
    pub fn sorted_tables(&mut self) -> Result<Vec<&MainTable>, SchemaError> {
        if self.outdated {
            self.rebuild_order()?;
        }
        let sorted: Vec<&MainTable> = self
            .order
            .iter()
            .filter_map(|name| self.tables.get(name))
            .collect();
        debug_assert_eq!(sorted.len(), self.tables.len());
        Ok(sorted)
    }

    fn rebuild_order(&mut self) -> Result<(), SchemaError> {
        self.validate()?;

        // BTreeMap keys are already lexicographic; node registration order
        // is the sole tie-break among unrelated tables.
        let mut graph = DependencyGraph::new(self.tables.keys().cloned().collect());
        let mut edge_count = 0usize;
        for dependent in self.tables.values() {
            for dependency in self.tables.values() {
                if dependent.name() != dependency.name() && dependent.depends_on(dependency) {
                    graph.add_edge(dependency.name(), dependent.name());
                    edge_count += 1;
                }
            }
        }

        self.order = graph
            .toposort()
            .map_err(|tables| SchemaError::CyclicDependency { tables })?;
        self.outdated = false;
        debug!(
            tables = self.tables.len(),
            edges = edge_count,
            "rebuilt table creation order"
        );
        Ok(())
    }

    /// Resolve all soft name references before building the graph, so a
    /// dangling edge or parent fails here instead of silently dropping a
    /// dependency.
    fn validate(&self) -> Result<(), SchemaError> {
        for table in self.tables.values() {
            for edge in &table.edges {
                if !self.tables.contains_key(&edge.peer_table) {
                    return Err(SchemaError::UnknownPeerTable {
                        table: table.name().to_string(),
                        edge: edge.name.clone(),
                        peer: edge.peer_table.clone(),
                    });
                }
                if edge.kind == EdgeKind::ManyToOneWithParent {
                    if let Some(parent) = table.known_parent() {
                        if parent != edge.peer_table {
                            return Err(SchemaError::ParentMismatch {
                                table: table.name().to_string(),
                                parent: parent.to_string(),
                                peer: edge.peer_table.clone(),
                            });
                        }
                    }
                }
            }
            if let Some(parent) = table.known_parent() {
                if !self.tables.contains_key(parent) {
                    return Err(SchemaError::UnknownParent {
                        table: table.name().to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Field, ForeignKey, Table};

    struct Customer;
    struct Order;
    struct OrderLine;
    struct Product;
    struct Alpha;
    struct Beta;
    struct Gamma;
    struct Foo;
    struct Bar;

    fn names(tables: &[&MainTable]) -> Vec<String> {
        tables.iter().map(|t| t.name().to_string()).collect()
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    /// Customer <- Order <- OrderLine -> Product, everything populated the
    /// way a reflection front end would.
    fn sample_schema() -> Schema {
        let mut schema = Schema::new();

        let customer = schema.table_for(SourceType::of::<Customer>());
        customer.add_field(Field::new("id", "BIGINT UNSIGNED").auto_increment());
        customer.add_primary_key("id");
        customer.add_edge(Edge::new("orders", "Order", EdgeKind::OneToMany));

        let order = schema.table_for(SourceType::of::<Order>());
        order.add_field(Field::new("id", "BIGINT UNSIGNED").auto_increment());
        order.add_field(Field::new("customer_id", "BIGINT UNSIGNED"));
        order.add_primary_key("id");
        order.add_edge(Edge::new("customer", "Customer", EdgeKind::ManyToOne));
        order.add_foreign_key(ForeignKey::new("Customer").with_columns(["customer_id"], ["id"]));

        let product = schema.table_for(SourceType::of::<Product>());
        product.add_field(Field::new("id", "BIGINT UNSIGNED").auto_increment());
        product.add_primary_key("id");

        let line = schema.table_for(SourceType::of::<OrderLine>());
        line.add_field(Field::new("order_id", "BIGINT UNSIGNED"));
        line.add_field(Field::new("product_id", "BIGINT UNSIGNED"));
        line.add_edge(Edge::new("order", "Order", EdgeKind::ManyToOneWithParent));
        line.add_edge(Edge::new("product", "Product", EdgeKind::ManyToOne));
        line.set_known_parent("Order");

        schema
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Customer>());
        schema.table_for(SourceType::of::<Customer>());

        assert_eq!(schema.len(), 1);
        assert!(schema.table("Customer").is_ok());
    }

    #[test]
    fn test_must_lookup_fails_for_unregistered() {
        let schema = Schema::new();
        let err = schema.table("Customer").unwrap_err();
        assert!(matches!(err, SchemaError::TableNotFound { ref name } if name == "Customer"));
    }

    #[test]
    fn test_order_validity_and_completeness() {
        let mut schema = sample_schema();
        let sorted = names(&schema.sorted_tables().unwrap());

        assert_eq!(sorted.len(), 4);
        assert!(position(&sorted, "Customer") < position(&sorted, "Order"));
        assert!(position(&sorted, "Order") < position(&sorted, "OrderLine"));
        assert!(position(&sorted, "Product") < position(&sorted, "OrderLine"));
    }

    #[test]
    fn test_dependency_inference_example() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Customer>());
        schema
            .table_for(SourceType::of::<Order>())
            .add_edge(Edge::new("customer", "Customer", EdgeKind::ManyToOne));

        let sorted = names(&schema.sorted_tables().unwrap());
        assert_eq!(sorted, vec!["Customer", "Order"]);
    }

    #[test]
    fn test_tie_break_by_name() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Gamma>());
        schema.table_for(SourceType::of::<Alpha>());
        schema.table_for(SourceType::of::<Beta>());

        let sorted = names(&schema.sorted_tables().unwrap());
        assert_eq!(sorted, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_one_sided_edges_do_not_reorder() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Beta>());
        schema
            .table_for(SourceType::of::<Alpha>())
            .add_edge(Edge::new("betas", "Beta", EdgeKind::OneToMany));
        schema
            .table_for(SourceType::of::<Gamma>())
            .add_edge(Edge::new("beta", "Beta", EdgeKind::OneToOne));

        let sorted = names(&schema.sorted_tables().unwrap());
        assert_eq!(sorted, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_cycle_detection() {
        let mut schema = Schema::new();
        schema
            .table_for(SourceType::of::<Foo>())
            .add_edge(Edge::new("bar", "Bar", EdgeKind::ManyToOne));
        schema
            .table_for(SourceType::of::<Bar>())
            .add_edge(Edge::new("foo", "Foo", EdgeKind::ManyToOne));

        let err = schema.sorted_tables().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::CyclicDependency { ref tables } if tables == &["Bar", "Foo"]
        ));
    }

    #[test]
    fn test_idempotent_caching() {
        let mut schema = sample_schema();
        let first = names(&schema.sorted_tables().unwrap());
        let second = names(&schema.sorted_tables().unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_registration_invalidates_cache() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Alpha>());
        schema.table_for(SourceType::of::<Gamma>());
        assert_eq!(names(&schema.sorted_tables().unwrap()), vec!["Alpha", "Gamma"]);

        schema.table_for(SourceType::of::<Beta>());
        assert_eq!(
            names(&schema.sorted_tables().unwrap()),
            vec!["Alpha", "Beta", "Gamma"]
        );
    }

    #[test]
    fn test_edge_added_after_sort_invalidates_cache() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Alpha>());
        schema.table_for(SourceType::of::<Gamma>());
        assert_eq!(names(&schema.sorted_tables().unwrap()), vec!["Alpha", "Gamma"]);

        schema
            .table_mut("Alpha")
            .unwrap()
            .add_edge(Edge::new("gamma", "Gamma", EdgeKind::ManyToOne));

        assert_eq!(names(&schema.sorted_tables().unwrap()), vec!["Gamma", "Alpha"]);
    }

    #[test]
    fn test_determinism_across_builds() {
        let mut forward = sample_schema();

        // Same tables and edges, registered in a different order.
        let mut reversed = Schema::new();
        let line = reversed.table_for(SourceType::of::<OrderLine>());
        line.add_edge(Edge::new("order", "Order", EdgeKind::ManyToOneWithParent));
        line.add_edge(Edge::new("product", "Product", EdgeKind::ManyToOne));
        line.set_known_parent("Order");
        reversed.table_for(SourceType::of::<Product>());
        reversed
            .table_for(SourceType::of::<Order>())
            .add_edge(Edge::new("customer", "Customer", EdgeKind::ManyToOne));
        reversed
            .table_for(SourceType::of::<Customer>())
            .add_edge(Edge::new("orders", "Order", EdgeKind::OneToMany));

        assert_eq!(
            names(&forward.sorted_tables().unwrap()),
            names(&reversed.sorted_tables().unwrap())
        );
    }

    #[test]
    fn test_known_parent_orders_parent_first() {
        struct Zone;
        struct Area;

        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Zone>());
        schema
            .table_for(SourceType::of::<Area>())
            .set_known_parent("Zone");

        // Lexicographic order alone would put Area first.
        let sorted = names(&schema.sorted_tables().unwrap());
        assert_eq!(sorted, vec!["Zone", "Area"]);
    }

    #[test]
    fn test_unknown_peer_table_is_rejected() {
        let mut schema = Schema::new();
        schema
            .table_for(SourceType::of::<Order>())
            .add_edge(Edge::new("customer", "Customer", EdgeKind::ManyToOne));

        let err = schema.sorted_tables().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownPeerTable { ref table, ref edge, ref peer }
                if table == "Order" && edge == "customer" && peer == "Customer"
        ));
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut schema = Schema::new();
        schema
            .table_for(SourceType::of::<Order>())
            .set_known_parent("Customer");

        let err = schema.sorted_tables().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownParent { ref table, ref parent }
                if table == "Order" && parent == "Customer"
        ));
    }

    #[test]
    fn test_parent_mismatch_is_rejected() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Customer>());
        schema.table_for(SourceType::of::<Product>());
        let line = schema.table_for(SourceType::of::<OrderLine>());
        line.add_edge(Edge::new("product", "Product", EdgeKind::ManyToOneWithParent));
        line.set_known_parent("Customer");

        let err = schema.sorted_tables().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::ParentMismatch { ref table, ref parent, ref peer }
                if table == "OrderLine" && parent == "Customer" && peer == "Product"
        ));
    }

    #[test]
    fn test_parent_edge_without_known_parent_is_allowed() {
        let mut schema = Schema::new();
        schema.table_for(SourceType::of::<Order>());
        schema
            .table_for(SourceType::of::<OrderLine>())
            .add_edge(Edge::new("order", "Order", EdgeKind::ManyToOneWithParent));

        let sorted = names(&schema.sorted_tables().unwrap());
        assert_eq!(sorted, vec!["Order", "OrderLine"]);
    }

    #[test]
    fn test_aux_tables_stay_out_of_the_order() {
        let mut schema = Schema::new();
        let customer = schema.table_for(SourceType::of::<Customer>());
        customer.add_aux_table(Table::new("CustomerNote"));

        let sorted = names(&schema.sorted_tables().unwrap());
        assert_eq!(sorted, vec!["Customer"]);
        assert_eq!(schema.table("Customer").unwrap().aux_tables.len(), 1);
        assert!(schema.table("CustomerNote").is_err());
    }

    #[test]
    fn test_yielded_flag_is_preserved() {
        let mut schema = Schema::new();
        schema
            .table_for(SourceType::of::<Customer>())
            .set_yielded(true);

        assert!(schema.table("Customer").unwrap().is_yielded());
    }
}
