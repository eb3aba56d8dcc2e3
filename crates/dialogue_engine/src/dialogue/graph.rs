//! Dialogue graph data model
//!
//! Nodes are stored by id in first-insertion order; edges are plain ids
//! resolved through [`DialogueGraph::get`], so a dangling target is a
//! lookup miss rather than a broken reference.

use std::path::Path;

use indexmap::IndexMap;

use super::parser::{DialogueResult, ScriptParser};

/// A selectable choice on a dialogue node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueOption {
    /// Display label, optionally prefixed with a lock marker
    pub label: String,
    /// Target state id or the terminal sentinel
    pub next: String,
}

/// One state of the dialogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueNode {
    /// Unique id within the graph
    pub id: String,
    /// Body text; may contain `\n` paragraph breaks
    pub text: String,
    /// Options in script order
    pub options: Vec<DialogueOption>,
}

/// Parsed dialogue script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueGraph {
    pub(crate) nodes: IndexMap<String, DialogueNode>,
    pub(crate) start_id: String,
}

impl DialogueGraph {
    /// Load and parse a dialogue script file
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError`](super::DialogueError) if the file cannot be
    /// read, a text block or option line is malformed, or no states were
    /// found.
    pub fn load_from_file(path: impl AsRef<Path>) -> DialogueResult<Self> {
        ScriptParser::parse_file(path)
    }

    /// Parse a dialogue script held in memory
    ///
    /// # Errors
    ///
    /// Same structural errors as [`Self::load_from_file`].
    pub fn parse(source: &str) -> DialogueResult<Self> {
        ScriptParser::parse(source)
    }

    /// Clear the graph and rebuild it from a script file
    ///
    /// On error the graph is left empty.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_from_file`].
    pub fn reload(&mut self, path: impl AsRef<Path>) -> DialogueResult<()> {
        self.nodes.clear();
        self.start_id.clear();
        *self = Self::load_from_file(path)?;
        Ok(())
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    /// Designated start state id
    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    /// Whether a node with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate nodes in first-insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_node() {
        let graph = DialogueGraph::parse("state: a\noption: Go -> b\nendstate\n").unwrap();
        assert!(graph.get("a").is_some());
        assert!(graph.get("b").is_none());
        assert!(!graph.contains("b"));
    }

    #[test]
    fn test_nodes_keep_file_order() {
        let graph = DialogueGraph::parse("state: zeta\nendstate\nstate: alpha\nendstate\nstate: mid\n").unwrap();
        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_reload_failure_leaves_graph_empty() {
        let mut graph = DialogueGraph::parse("state: a\n").unwrap();
        assert!(graph.reload("/nonexistent/dialogues.txt").is_err());
        assert!(graph.is_empty());
        assert_eq!(graph.start_id(), "");
    }

    #[test]
    fn test_reload_replaces_contents() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("dialogues.txt");
        std::fs::write(&path, "state: first\nendstate\n").unwrap();

        let mut graph = DialogueGraph::load_from_file(&path).unwrap();
        assert_eq!(graph.start_id(), "first");

        std::fs::write(&path, "start: b\nstate: a\nendstate\nstate: b\nendstate\n").unwrap();
        graph.reload(&path).unwrap();
        assert!(!graph.contains("first"));
        assert_eq!(graph.start_id(), "b");
        assert_eq!(graph.len(), 2);
    }
}
