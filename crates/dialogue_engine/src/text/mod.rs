//! Text system
//!
//! Shaping, greedy wrapping, the glyph texture cache and the text engine
//! that draws shaped lines through a [`TextRenderBackend`](crate::render::TextRenderBackend).

pub mod shaping;
pub mod wrap;
pub mod glyph_cache;
pub mod text_renderer;

pub use shaping::{ClusterShaper, HbCluster, ShapedGlyph, TextShaper, clusters_from_glyphs, fixed_to_px};
pub use wrap::{wrap_paragraph, wrap_text};
pub use glyph_cache::{FontdueRasterizer, GlyphBitmap, GlyphCache, GlyphRasterizer, GlyphTex};
pub use text_renderer::{TextEngine, TextSurface};

use crate::render::BackendError;

/// Result type for text operations
pub type TextResult<T> = Result<T, TextError>;

/// Errors from font loading, rasterization and text drawing
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// Font bytes could not be parsed
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// Glyph index does not fit the face's glyph range
    #[error("Glyph index {0} out of range for font face")]
    GlyphIndex(u32),

    /// GPU collaborator failure
    #[error(transparent)]
    Backend(#[from] BackendError),
}
