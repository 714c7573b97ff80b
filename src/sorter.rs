//! Builds the intra-target data-dependency graph from invocation
//! input/output file sets and orders it.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::graph::DirectedGraph;
use crate::model::Invocation;

/// Orders `invocations` so that every invocation producing a path another
/// invocation consumes comes first.
///
/// Returns `(false, _)` if the invocations form a cycle; the second element
/// is then empty and the caller should log "cycle detected building
/// invocation graph" and fail the target.
pub fn sort_invocations(invocations: Vec<Invocation>) -> (bool, Vec<Invocation>) {
    // output path -> index of the invocation producing it. Last writer wins;
    // duplicate registrations are logged but otherwise left as-is, per the
    // spec's retained (if debatable) duplicate-output behaviour.
    let mut output_owner: HashMap<PathBuf, usize> = HashMap::new();
    for (index, invocation) in invocations.iter().enumerate() {
        for output in &invocation.outputs {
            if let Some(previous) = output_owner.insert(output.clone(), index) {
                if previous != index {
                    log::warn!(
                        "duplicate output registration for {}: invocation {} overrides {}",
                        output.display(),
                        index,
                        previous
                    );
                }
            }
        }
    }

    let mut graph = DirectedGraph::new();
    for (index, invocation) in invocations.iter().enumerate() {
        let predecessors: Vec<usize> = invocation
            .dependency_paths()
            .filter_map(|path| output_owner.get(path).copied())
            .filter(|&producer| producer != index)
            .collect();
        graph.insert(index, predecessors);
    }

    let (ok, order) = graph.ordered();
    if !ok {
        return (false, Vec::new());
    }

    // `invocations` is consumed; pull each one out by index in the order the
    // graph produced, leaving `None` placeholders behind so later lookups in
    // the same pass can't double-take an invocation.
    let mut slots: Vec<Option<Invocation>> = invocations.into_iter().map(Some).collect();
    let ordered = order.into_iter().map(|index| slots[index].take().unwrap()).collect();

    (true, ordered)
}
