//! In-memory render backend
//!
//! Stores glyph bitmaps in a slot map and records every command instead of
//! talking to a GPU. Used for offscreen verification and in tests, where the
//! live resource counts show whether everything acquired was released.

use std::path::Path;

use slotmap::{DefaultKey, Key, KeyData, SlotMap};

use super::backend::{
    BackendError, BackendResult, GlyphQuad, ProgramHandle, QuadBufferHandle, TextRenderBackend,
    TextureHandle,
};
use crate::foundation::math::{Vec3, Vec4};

/// A recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessCommand {
    /// Framebuffer clear
    Clear(Vec4),
    /// Start of a text pass
    BeginPass {
        /// Bound program
        program: ProgramHandle,
        /// Screen size used for the projection
        screen: (u32, u32),
    },
    /// One textured glyph quad
    Quad {
        /// Sampled texture
        texture: TextureHandle,
        /// Quad vertices in pixels
        vertices: GlyphQuad,
        /// Tint colour
        color: Vec3,
    },
    /// End of a text pass
    EndPass,
}

/// A stored single-channel texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Coverage bytes, row-major
    pub pixels: Vec<u8>,
}

/// Render backend that keeps all resources in memory
#[derive(Default)]
pub struct HeadlessBackend {
    programs: SlotMap<DefaultKey, ()>,
    buffers: SlotMap<DefaultKey, ()>,
    textures: SlotMap<DefaultKey, HeadlessTexture>,
    commands: Vec<HeadlessCommand>,
    active_program: Option<ProgramHandle>,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[HeadlessCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take_commands(&mut self) -> Vec<HeadlessCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded glyph quads
    pub fn quad_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, HeadlessCommand::Quad { .. }))
            .count()
    }

    /// Look up a stored texture
    pub fn texture(&self, texture: TextureHandle) -> Option<&HeadlessTexture> {
        self.textures.get(to_key(texture.0))
    }

    /// Number of textures not yet destroyed
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Number of programs not yet destroyed
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// Number of quad buffers not yet destroyed
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Write a stored texture as an 8-bit grayscale PNG
    ///
    /// # Errors
    ///
    /// [`BackendError::InvalidHandle`] for unknown handles,
    /// [`BackendError::Export`] if the image cannot be encoded or written.
    pub fn save_texture_png(&self, texture: TextureHandle, path: impl AsRef<Path>) -> BackendResult<()> {
        let stored = self.texture(texture).ok_or(BackendError::InvalidHandle(texture.0))?;
        let image = image::GrayImage::from_raw(stored.width, stored.height, stored.pixels.clone())
            .ok_or_else(|| BackendError::Export("pixel buffer does not match texture size".to_string()))?;
        image
            .save(path.as_ref())
            .map_err(|e| BackendError::Export(e.to_string()))
    }
}

impl TextRenderBackend for HeadlessBackend {
    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> BackendResult<ProgramHandle> {
        if vertex_src.trim().is_empty() || fragment_src.trim().is_empty() {
            return Err(BackendError::ShaderCompilation("empty shader source".to_string()));
        }
        Ok(ProgramHandle(from_key(self.programs.insert(()))))
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(to_key(program.0)).is_none() {
            log::warn!("Destroying unknown program {:?}", program);
        }
    }

    fn create_quad_buffer(&mut self) -> BackendResult<QuadBufferHandle> {
        Ok(QuadBufferHandle(from_key(self.buffers.insert(()))))
    }

    fn destroy_quad_buffer(&mut self, buffer: QuadBufferHandle) {
        if self.buffers.remove(to_key(buffer.0)).is_none() {
            log::warn!("Destroying unknown quad buffer {:?}", buffer);
        }
    }

    fn create_glyph_texture(&mut self, width: u32, height: u32, coverage: &[u8]) -> BackendResult<TextureHandle> {
        let expected = width as usize * height as usize;
        if coverage.len() != expected {
            return Err(BackendError::ResourceCreation(format!(
                "glyph bitmap has {} bytes, expected {}x{}",
                coverage.len(),
                width,
                height
            )));
        }
        let key = self.textures.insert(HeadlessTexture {
            width,
            height,
            pixels: coverage.to_vec(),
        });
        Ok(TextureHandle(from_key(key)))
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(to_key(texture.0)).is_none() {
            log::warn!("Destroying unknown texture {:?}", texture);
        }
    }

    fn clear(&mut self, color: Vec4) {
        self.commands.push(HeadlessCommand::Clear(color));
    }

    fn begin_text_pass(&mut self, program: ProgramHandle, screen_px: (u32, u32)) -> BackendResult<()> {
        if !self.programs.contains_key(to_key(program.0)) {
            return Err(BackendError::InvalidHandle(program.0));
        }
        self.active_program = Some(program);
        self.commands.push(HeadlessCommand::BeginPass {
            program,
            screen: screen_px,
        });
        Ok(())
    }

    fn draw_textured_quad(
        &mut self,
        buffer: QuadBufferHandle,
        texture: TextureHandle,
        vertices: &GlyphQuad,
        color: Vec3,
    ) -> BackendResult<()> {
        if self.active_program.is_none() {
            return Err(BackendError::NoActivePass);
        }
        if !self.buffers.contains_key(to_key(buffer.0)) {
            return Err(BackendError::InvalidHandle(buffer.0));
        }
        if !self.textures.contains_key(to_key(texture.0)) {
            return Err(BackendError::InvalidHandle(texture.0));
        }
        self.commands.push(HeadlessCommand::Quad {
            texture,
            vertices: *vertices,
            color,
        });
        Ok(())
    }

    fn end_text_pass(&mut self) {
        self.active_program = None;
        self.commands.push(HeadlessCommand::EndPass);
    }
}

fn from_key(key: DefaultKey) -> u64 {
    key.data().as_ffi()
}

fn to_key(raw: u64) -> DefaultKey {
    KeyData::from_ffi(raw).into()
}
