//! Dependency graph construction and topological ordering.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

/// A directed graph over table names with a fixed node set.
///
/// Nodes are registered in the order given at construction; the schema
/// passes them lexicographically, and the sort breaks ties toward the
/// earliest node, so the output is byte-identical across runs for an
/// identical table and edge set.
pub(crate) struct DependencyGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    /// Per node: the nodes that must come after it.
    dependents: Vec<BTreeSet<usize>>,
    /// Per node: how many nodes it waits on.
    dependency_counts: Vec<usize>,
}

impl DependencyGraph {
    /// Create a graph with one node per name, in the given order.
    pub(crate) fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let dependents = vec![BTreeSet::new(); names.len()];
        let dependency_counts = vec![0; names.len()];
        Self {
            names,
            index,
            dependents,
            dependency_counts,
        }
    }

    /// Record that `dependency` must be emitted before `dependent`.
    ///
    /// Both names must be registered nodes; the schema validates edges
    /// before building the graph.
    pub(crate) fn add_edge(&mut self, dependency: &str, dependent: &str) {
        let (Some(&dep), Some(&node)) = (self.index.get(dependency), self.index.get(dependent))
        else {
            debug_assert!(false, "edge references an unregistered node");
            return;
        };
        if self.dependents[dep].insert(node) {
            self.dependency_counts[node] += 1;
        }
    }

    /// Kahn's algorithm with a smallest-node-first ready queue.
    ///
    /// `Err` carries the names still caught in a cycle, sorted.
    pub(crate) fn toposort(self) -> Result<Vec<String>, Vec<String>> {
        let DependencyGraph {
            names,
            dependents,
            mut dependency_counts,
            ..
        } = self;

        let mut ready: BinaryHeap<Reverse<usize>> = dependency_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(node, _)| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(names.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &next in &dependents[node] {
                dependency_counts[next] -= 1;
                if dependency_counts[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() != names.len() {
            let mut cyclic: Vec<String> = dependency_counts
                .iter()
                .enumerate()
                .filter(|(_, &count)| count > 0)
                .map(|(node, _)| names[node].clone())
                .collect();
            cyclic.sort();
            return Err(cyclic);
        }

        Ok(order.into_iter().map(|node| names[node].clone()).collect())
    }
}
