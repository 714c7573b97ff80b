//! The target dependency graph: a thin wrapper over [`DirectedGraph`] that
//! also keeps the `Target` values reachable by id, since the generic graph
//! itself only tracks identity.

use std::collections::HashMap;

use crate::graph::DirectedGraph;
use crate::model::{Target, TargetId};

#[derive(Debug, Default)]
pub struct TargetGraph {
    graph: DirectedGraph<TargetId>,
    targets: HashMap<TargetId, Target>,
}

impl TargetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `target`, depending on `dependencies` (targets that must be
    /// built first). Dependencies must themselves be added via `insert` at
    /// some point for their `Target` value to be resolvable; referencing an
    /// id that's never inserted with a `Target` produces a graph cycle
    /// failure being sidestepped (ordering succeeds, but `targets()` simply
    /// won't contain it), which in practice never happens since every
    /// caller inserts every target it names as a dependency.
    pub fn insert(&mut self, target: Target, dependencies: impl IntoIterator<Item = Target>) {
        let mut dep_ids = Vec::new();
        for dep in dependencies {
            dep_ids.push(dep.id().clone());
            self.targets.entry(dep.id().clone()).or_insert(dep);
        }
        self.graph.insert(target.id().clone(), dep_ids);
        self.targets.entry(target.id().clone()).or_insert(target);
    }

    /// Returns targets in topological order, or `(false, _)` on a cycle.
    pub fn ordered(&self) -> (bool, Vec<Target>) {
        let (ok, order) = self.graph.ordered();
        if !ok {
            return (false, Vec::new());
        }
        let targets = order
            .into_iter()
            .map(|id| self.targets.get(&id).cloned().expect("every graph node has a Target"))
            .collect();
        (true, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_targets_by_dependency() {
        let t1 = Target::new("t1", "t1");
        let t2 = Target::new("t2", "t2");

        let mut graph = TargetGraph::new();
        graph.insert(t2.clone(), vec![t1.clone()]);

        let (ok, order) = graph.ordered();
        assert!(ok);
        assert_eq!(order, vec![t1, t2]);
    }

    #[test]
    fn target_cycle_is_detected() {
        let t1 = Target::new("t1", "t1");
        let t2 = Target::new("t2", "t2");

        let mut graph = TargetGraph::new();
        graph.insert(t1.clone(), vec![t2.clone()]);
        graph.insert(t2, vec![t1]);

        let (ok, _) = graph.ordered();
        assert!(!ok);
    }
}
