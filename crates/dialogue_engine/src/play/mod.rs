//! Dialogue play mode
//!
//! [`DialogueNavigator`] holds the cursor into the graph,
//! [`DialogueLayout`] places text on screen and [`PlayMode`] wires both to
//! input events and a text surface.

pub mod navigation;
pub mod layout;
pub mod play_mode;

pub use navigation::{ConfirmOutcome, DialogueNavigator, NavigationState};
pub use layout::{DialogueLayout, LayoutLine, OptionRow};
pub use play_mode::{PlayMode, MISSING_NODE_MESSAGE};
