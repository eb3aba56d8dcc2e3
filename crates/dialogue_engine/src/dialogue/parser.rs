//! Dialogue script parser
//!
//! Line-oriented format:
//!
//! ```text
//! start: <id>
//! state: <id>
//! text:
//! <<<
//! multi-line body
//! >>>
//! option: <label> -> <next-id-or-END>
//! endstate
//! ```
//!
//! Lines starting with `#` or `//` are comments, blank lines are skipped and
//! trailing carriage returns are stripped. Unrecognised lines are ignored.

use std::path::{Path, PathBuf};

use super::graph::{DialogueGraph, DialogueNode, DialogueOption};

/// Result type for script loading
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors that abort a script load
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// Script file could not be read
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        /// Path that was opened
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// `text:` was the last line of the file
    #[error("Unexpected EOF after 'text:' (line {line})")]
    UnexpectedEofAfterText {
        /// Line holding `text:`
        line: usize,
    },

    /// The line after `text:` was not `<<<`
    #[error("Expected '<<<' after text: at line {line}")]
    ExpectedTextOpen {
        /// Offending line
        line: usize,
    },

    /// `option:` line without a `->` separator
    #[error("Malformed option, missing '->' at line {line}")]
    MissingArrow {
        /// Offending line
        line: usize,
    },

    /// `option:` line with an empty label or target
    #[error("Option missing label or target at line {line}")]
    EmptyOptionPart {
        /// Offending line
        line: usize,
    },

    /// Neither a `start:` line nor any state was found
    #[error("No states loaded")]
    NoStates,
}

impl DialogueError {
    /// 1-based script line the error refers to, if any
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEofAfterText { line }
            | Self::ExpectedTextOpen { line }
            | Self::MissingArrow { line }
            | Self::EmptyOptionPart { line } => Some(*line),
            Self::Io { .. } | Self::NoStates => None,
        }
    }
}

const TEXT_OPEN: &str = "<<<";
const TEXT_CLOSE: &str = ">>>";
const OPTION_ARROW: &str = "->";

/// Dialogue script parser
pub struct ScriptParser;

impl ScriptParser {
    /// Read and parse a script file
    ///
    /// # Errors
    ///
    /// [`DialogueError::Io`] when the file cannot be read as UTF-8 text, or
    /// any structural error from [`Self::parse`].
    pub fn parse_file(path: impl AsRef<Path>) -> DialogueResult<DialogueGraph> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| DialogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let graph = Self::parse(&source)?;
        log::info!(
            "Loaded dialogue script {}: {} states, start '{}'",
            path.display(),
            graph.len(),
            graph.start_id()
        );
        Ok(graph)
    }

    /// Parse script contents into a graph
    ///
    /// A node is committed on `endstate`, on the next `state:` line, or at
    /// end of input; nodes with an empty id are dropped. Without a `start:`
    /// line the first committed node becomes the start state.
    ///
    /// # Errors
    ///
    /// Malformed text blocks and option lines abort the whole parse with the
    /// offending line number. [`DialogueError::NoStates`] if no start id
    /// could be determined.
    pub fn parse(source: &str) -> DialogueResult<DialogueGraph> {
        let mut graph = DialogueGraph::default();
        let mut current: Option<DialogueNode> = None;
        let mut lines = source
            .lines()
            .map(strip_cr)
            .enumerate()
            .map(|(index, line)| (index + 1, line));

        while let Some((line_no, line)) = lines.next() {
            let trimmed = line.trim();

            // Skip empty and comment lines
            if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
                continue;
            }

            if let Some(id) = trimmed.strip_prefix("start:") {
                graph.start_id = id.trim().to_string();
            } else if let Some(id) = trimmed.strip_prefix("state:") {
                commit(&mut graph, current.take());
                current = Some(DialogueNode {
                    id: id.trim().to_string(),
                    ..DialogueNode::default()
                });
            } else if trimmed == "text:" {
                let text = Self::read_text_block(&mut lines, line_no)?;
                match current.as_mut() {
                    Some(node) => node.text = text,
                    None => log::warn!("Line {}: text block outside of a state ignored", line_no),
                }
            } else if let Some(payload) = trimmed.strip_prefix("option:") {
                let option = Self::parse_option(payload, line_no)?;
                match current.as_mut() {
                    Some(node) => node.options.push(option),
                    None => log::warn!("Line {}: option outside of a state ignored", line_no),
                }
            } else if trimmed == "endstate" {
                commit(&mut graph, current.take());
            } else {
                log::trace!("Line {}: unrecognised directive ignored", line_no);
            }
        }

        commit(&mut graph, current.take());

        if graph.start_id.is_empty() {
            if let Some(first) = graph.nodes.keys().next() {
                graph.start_id = first.clone();
            }
        }
        if graph.start_id.is_empty() {
            return Err(DialogueError::NoStates);
        }

        Ok(graph)
    }

    /// Read a `<<<` ... `>>>` block following a `text:` line
    ///
    /// Block lines are kept verbatim and joined with `\n`. A block left open
    /// at end of input takes everything up to EOF.
    fn read_text_block<'a, I>(lines: &mut I, text_line: usize) -> DialogueResult<String>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        let (marker_line, marker) = lines
            .next()
            .ok_or(DialogueError::UnexpectedEofAfterText { line: text_line })?;
        if marker.trim() != TEXT_OPEN {
            return Err(DialogueError::ExpectedTextOpen { line: marker_line });
        }

        let mut body = Vec::new();
        let mut closed = false;
        for (_, line) in lines.by_ref() {
            if line.trim() == TEXT_CLOSE {
                closed = true;
                break;
            }
            body.push(line);
        }
        if !closed {
            log::warn!("Text block opened at line {} runs to end of file", marker_line);
        }

        Ok(body.join("\n"))
    }

    /// Parse the payload of an `option:` line
    fn parse_option(payload: &str, line: usize) -> DialogueResult<DialogueOption> {
        let (label, next) = payload
            .trim()
            .split_once(OPTION_ARROW)
            .ok_or(DialogueError::MissingArrow { line })?;

        let label = label.trim();
        let next = next.trim();
        if label.is_empty() || next.is_empty() {
            return Err(DialogueError::EmptyOptionPart { line });
        }

        Ok(DialogueOption {
            label: label.to_string(),
            next: next.to_string(),
        })
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Move a finished node into the graph; nodes without an id are dropped
fn commit(graph: &mut DialogueGraph, node: Option<DialogueNode>) {
    match node {
        Some(node) if !node.id.is_empty() => {
            graph.nodes.insert(node.id.clone(), node);
        }
        Some(_) => log::debug!("Dropping state with an empty id"),
        None => {}
    }
}
