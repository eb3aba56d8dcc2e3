//! Script loading and navigation against the bundled sample script

use std::path::PathBuf;

use dialogue_engine::dialogue::{validate, DialogueError, DialogueGraph};
use dialogue_engine::prelude::*;
use tempfile::TempDir;

fn sample_script() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/dialogues.txt")
}

#[test]
fn test_sample_script_loads_cleanly() {
    let graph = DialogueGraph::load_from_file(sample_script()).unwrap();

    assert_eq!(graph.start_id(), "lobby");
    assert_eq!(graph.len(), 5);
    assert!(validate(&graph, "END").is_empty());

    let lobby = graph.get("lobby").unwrap();
    assert_eq!(lobby.options.len(), 4);
    assert_eq!(lobby.options[2].label, "[LOCKED]Use the key on the service panel");
    assert!(lobby.text.contains("\n\nSomewhere above"));
}

#[test]
fn test_parsing_is_idempotent() {
    let first = DialogueGraph::load_from_file(sample_script()).unwrap();
    let second = DialogueGraph::load_from_file(sample_script()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_walkthrough_unlocks_service_exit() {
    let graph = DialogueGraph::load_from_file(sample_script()).unwrap();
    let mut nav = DialogueNavigator::new(graph, GatingRules::default());

    nav.move_selection(2);
    assert_eq!(nav.confirm_selection(), ConfirmOutcome::Locked);
    assert_eq!(nav.state().cur_state, "lobby");

    nav.select(1);
    assert_eq!(nav.confirm_selection(), ConfirmOutcome::Moved);
    assert_eq!(nav.confirm_selection(), ConfirmOutcome::Moved);
    assert_eq!(nav.state().cur_state, "end");
    assert!(nav.is_unlocked());

    assert_eq!(nav.confirm_selection(), ConfirmOutcome::Moved);
    nav.select(2);
    assert_eq!(nav.confirm_selection(), ConfirmOutcome::Moved);
    assert_eq!(nav.state().cur_state, "service");
    assert_eq!(nav.confirm_selection(), ConfirmOutcome::Finished);
    assert!(nav.is_finished());
}

#[test]
fn test_malformed_script_reports_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.txt");
    std::fs::write(&path, "state: a\r\ntext:\r\n<<<\r\nbody\r\n>>>\r\noption: missing arrow\r\n").unwrap();

    let err = DialogueGraph::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DialogueError::MissingArrow { line: 6 }));
    assert_eq!(err.line(), Some(6));
}

#[test]
fn test_text_at_end_of_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("truncated.txt");
    std::fs::write(&path, "state: a\ntext:").unwrap();

    let err = DialogueGraph::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DialogueError::UnexpectedEofAfterText { line: 2 }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_missing_file_names_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.txt");

    let err = DialogueGraph::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DialogueError::Io { .. }));
    assert!(err.to_string().contains("absent.txt"));
}
