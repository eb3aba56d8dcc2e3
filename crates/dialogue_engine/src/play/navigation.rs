//! Dialogue navigation state machine
//!
//! A cursor into a [`DialogueGraph`]: the current state id, the selected
//! option, a terminal flag and a one-way unlock flag. Missing nodes are
//! never an error here; every operation on one is a no-op.

use crate::config::GatingRules;
use crate::dialogue::{DialogueGraph, DialogueNode};

/// Cursor state held by a [`DialogueNavigator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Id of the node being shown; may name no node
    pub cur_state: String,
    /// Index into the current node's options
    pub selected: usize,
    /// Set once navigation has ended
    pub finished: bool,
    /// Set once the unlock trigger state has been reached
    pub key: bool,
}

/// Result of [`DialogueNavigator::confirm_selection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Finished, or no node or option to act on
    Ignored,
    /// Selected option is locked and the key has not been found
    Locked,
    /// Navigation ended
    Finished,
    /// Moved to the selected option's target
    Moved,
}

/// Drives selection and transitions over a loaded dialogue graph
#[derive(Debug, Clone)]
pub struct DialogueNavigator {
    graph: DialogueGraph,
    state: NavigationState,
    rules: GatingRules,
}

impl DialogueNavigator {
    /// Start at the graph's start state
    pub fn new(graph: DialogueGraph, rules: GatingRules) -> Self {
        let state = NavigationState {
            cur_state: graph.start_id().to_string(),
            selected: 0,
            finished: false,
            key: false,
        };
        Self { graph, state, rules }
    }

    /// Node for the current state, if it exists
    pub fn current_node(&self) -> Option<&DialogueNode> {
        self.graph.get(&self.state.cur_state)
    }

    /// Shift the selection by `delta`, wrapping around the option list
    pub fn move_selection(&mut self, delta: i32) {
        if self.state.finished {
            return;
        }
        let Some(count) = self.current_node().map(|node| node.options.len()) else {
            return;
        };
        let (Ok(count), Ok(current)) = (i64::try_from(count), i64::try_from(self.state.selected)) else {
            return;
        };
        if count == 0 {
            return;
        }
        let next = (current + i64::from(delta)).rem_euclid(count);
        self.state.selected = usize::try_from(next).unwrap_or(0);
    }

    /// Select option `index` of the current node
    ///
    /// Returns `false` and leaves the selection alone if there is no such
    /// option.
    pub fn select(&mut self, index: usize) -> bool {
        let exists = self
            .current_node()
            .is_some_and(|node| index < node.options.len());
        if exists {
            self.state.selected = index;
        }
        exists
    }

    /// Act on the selected option
    pub fn confirm_selection(&mut self) -> ConfirmOutcome {
        if self.state.finished {
            return ConfirmOutcome::Ignored;
        }
        let Some(node) = self.graph.get(&self.state.cur_state) else {
            return ConfirmOutcome::Ignored;
        };

        if node.options.is_empty() {
            log::info!("Dialogue finished at '{}' (no options)", node.id);
            self.state.finished = true;
            return ConfirmOutcome::Finished;
        }
        let Some(option) = node.options.get(self.state.selected) else {
            return ConfirmOutcome::Ignored;
        };

        if self.rules.is_locked_label(&option.label) && !self.state.key {
            log::debug!("Option '{}' is locked", option.label);
            return ConfirmOutcome::Locked;
        }
        if option.next == self.rules.end_sentinel {
            log::info!("Dialogue finished at '{}'", node.id);
            self.state.finished = true;
            return ConfirmOutcome::Finished;
        }

        self.state.cur_state = option.next.clone();
        self.state.selected = 0;
        if self.state.cur_state == self.rules.unlock_trigger && !self.state.key {
            log::info!("Reached '{}', locked options are now available", self.state.cur_state);
            self.state.key = true;
        }
        ConfirmOutcome::Moved
    }

    /// Current cursor state
    pub const fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Selected option index
    pub const fn selected(&self) -> usize {
        self.state.selected
    }

    /// Whether navigation has ended
    pub const fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Whether locked options are available
    pub const fn is_unlocked(&self) -> bool {
        self.state.key
    }

    /// The graph being navigated
    pub const fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    /// Gating rules in effect
    pub const fn rules(&self) -> &GatingRules {
        &self.rules
    }
}
