//! # Dialogue Engine
//!
//! A branching dialogue play mode for a real-time 3D scene, with
//! HarfBuzz-style shaped text, greedy pixel-width wrapping and a lazily
//! populated glyph texture cache.
//!
//! ## Features
//!
//! - **Dialogue Scripts**: Line-oriented `state:` / `text:` / `option:` format
//! - **Navigation**: Keyboard and pointer driven choice selection with gated options
//! - **Text Shaping**: Kerning and ligatures via `rustybuzz`, clusters in source order
//! - **Glyph Cache**: On-demand `fontdue` rasterization uploaded as GPU textures
//! - **Backend Agnostic**: GPU, asset and window services injected through traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dialogue_engine::prelude::*;
//!
//! fn run(assets: &mut dyn AssetLoader) -> Result<(), ModeError> {
//!     let config = PlayModeConfig::default();
//!     let mut mode = PlayMode::new(assets, HeadlessBackend::new(), config)?;
//!
//!     mode.handle_event(&InputEvent::KeyDown(KeyCode::Enter), (1280, 720));
//!     mode.update(1.0 / 60.0);
//!     mode.draw((1280, 720))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss
)]

pub mod foundation;
pub mod config;
pub mod dialogue;
pub mod text;
pub mod render;
pub mod input;
pub mod assets;
pub mod play;

mod mode;

pub use mode::{Mode, ModeError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Mode, ModeError,
        assets::{AssetLoader, AssetError, Camera, DirectoryAssets, Scene, SoundSample},
        config::{Config, PlayModeConfig, LayoutMetrics, Palette, GatingRules},
        dialogue::{DialogueGraph, DialogueNode, DialogueOption, DialogueError},
        input::{InputEvent, KeyCode, MouseButton},
        play::{PlayMode, DialogueNavigator, NavigationState, ConfirmOutcome, DialogueLayout},
        render::{TextRenderBackend, HeadlessBackend},
        text::{ClusterShaper, TextEngine, TextError, TextSurface},
    };
}
