//! Rendering collaborators
//!
//! The text engine draws through [`TextRenderBackend`]; window, shader
//! compilation and buffer management stay behind that trait.
//! [`HeadlessBackend`] keeps everything in memory.

pub mod backend;
pub mod headless;

pub use backend::{
    TextRenderBackend, BackendError, BackendResult,
    ProgramHandle, QuadBufferHandle, TextureHandle, GlyphVertex, GlyphQuad,
};
pub use headless::{HeadlessBackend, HeadlessCommand, HeadlessTexture};
