//! Optional validation pass over a parsed graph
//!
//! The parser accepts option targets that name no state. This pass reports
//! them, together with a start id that resolves to nothing and states that
//! cannot be reached from the start. It never modifies the graph.

use std::collections::{HashSet, VecDeque};

use super::graph::DialogueGraph;

/// A structural finding about a dialogue graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    /// The start id names no state
    #[error("start state '{start}' does not exist")]
    MissingStart {
        /// Start id from the script
        start: String,
    },

    /// An option points at a state that does not exist
    #[error("option {option} of state '{state}' targets unknown state '{target}'")]
    DanglingTarget {
        /// State holding the option
        state: String,
        /// Option index within the state
        option: usize,
        /// Unresolved target id
        target: String,
    },

    /// No path from the start state reaches this state
    #[error("state '{state}' is unreachable from the start state")]
    Unreachable {
        /// Unreachable state id
        state: String,
    },
}

/// Check a graph for dangling edges and unreachable states
///
/// `end_sentinel` is the reserved target that terminates navigation; options
/// pointing at it are never reported.
pub fn validate(graph: &DialogueGraph, end_sentinel: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !graph.contains(graph.start_id()) {
        issues.push(ValidationIssue::MissingStart {
            start: graph.start_id().to_string(),
        });
    }

    for node in graph.nodes() {
        for (index, option) in node.options.iter().enumerate() {
            if option.next != end_sentinel && !graph.contains(&option.next) {
                issues.push(ValidationIssue::DanglingTarget {
                    state: node.id.clone(),
                    option: index,
                    target: option.next.clone(),
                });
            }
        }
    }

    // Breadth-first walk over resolvable edges
    let mut reached: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    if graph.contains(graph.start_id()) {
        reached.insert(graph.start_id());
        queue.push_back(graph.start_id());
    }
    while let Some(id) = queue.pop_front() {
        let Some(node) = graph.get(id) else { continue };
        for option in &node.options {
            if graph.contains(&option.next) && reached.insert(option.next.as_str()) {
                queue.push_back(option.next.as_str());
            }
        }
    }

    issues.extend(
        graph
            .nodes()
            .filter(|node| !reached.contains(node.id.as_str()))
            .map(|node| ValidationIssue::Unreachable { state: node.id.clone() }),
    );

    issues
}
