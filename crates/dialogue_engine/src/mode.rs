//! Mode trait and lifecycle errors

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::dialogue::DialogueError;
use crate::input::InputEvent;
use crate::text::TextError;

/// A game mode driven by the host's event loop
///
/// The host forwards input events, then calls [`Mode::update`] and
/// [`Mode::draw`] once per frame.
pub trait Mode {
    /// Handle one input event
    ///
    /// Returns `true` when the event was consumed and should not be
    /// forwarded further.
    fn handle_event(&mut self, event: &InputEvent, window_size: (u32, u32)) -> bool;

    /// Advance time-based state by `elapsed` seconds
    fn update(&mut self, _elapsed: f32) {}

    /// Draw a frame for a drawable of `drawable_size` pixels
    ///
    /// # Errors
    ///
    /// Rendering failures reported by the backend.
    fn draw(&mut self, drawable_size: (u32, u32)) -> Result<(), ModeError>;
}

/// Errors raised while constructing or drawing a mode
#[derive(Error, Debug)]
pub enum ModeError {
    /// Dialogue script failed to load
    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    /// Font or text drawing failure
    #[error("Text error: {0}")]
    Text(#[from] TextError),

    /// Asset loading failure
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
