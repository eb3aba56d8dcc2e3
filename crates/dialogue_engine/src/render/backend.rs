//! Text render backend trait
//!
//! Defines the interface between the text engine and a GPU backend.
//! Keeps text layout independent of Vulkan/OpenGL specifics.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Vec3, Vec4};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors reported by a render backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Shader program failed to compile or link
    #[error("Shader compilation failed: {0}")]
    ShaderCompilation(String),

    /// GPU resource could not be created
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    /// Handle does not name a live resource
    #[error("Invalid handle: {0}")]
    InvalidHandle(u64),

    /// Draw call issued outside of a text pass
    #[error("No text pass in progress")]
    NoActivePass,

    /// Texture contents could not be exported
    #[error("Texture export failed: {0}")]
    Export(String),
}

/// Handle to a compiled shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Handle to the vertex array and buffer used for glyph quads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadBufferHandle(pub u64);

/// Handle to a single-channel glyph texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Vertex of a screen-space glyph quad
///
/// Positions are pixels with the origin at the top-left corner and +Y
/// pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GlyphVertex {
    /// Position in pixels
    pub position: [f32; 2],
    /// Texture coordinates
    pub uv: [f32; 2],
}

/// Two triangles covering one glyph
pub type GlyphQuad = [GlyphVertex; 6];

/// Backend-agnostic text rendering interface
pub trait TextRenderBackend {
    /// Compile and link a vertex + fragment program
    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> BackendResult<ProgramHandle>;

    /// Release a program
    fn destroy_program(&mut self, program: ProgramHandle);

    /// Create the vertex array/buffer pair used to stream glyph quads
    ///
    /// Attribute 0 is the `position` pair, attribute 1 the `uv` pair of
    /// [`GlyphVertex`].
    fn create_quad_buffer(&mut self) -> BackendResult<QuadBufferHandle>;

    /// Release a quad buffer
    fn destroy_quad_buffer(&mut self, buffer: QuadBufferHandle);

    /// Upload a glyph bitmap
    ///
    /// `coverage` is `width * height` bytes, one row after another, stored
    /// as the red channel. Sampling is linear with clamp-to-edge wrapping.
    fn create_glyph_texture(&mut self, width: u32, height: u32, coverage: &[u8]) -> BackendResult<TextureHandle>;

    /// Release a glyph texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Clear colour and depth of the current framebuffer
    fn clear(&mut self, color: Vec4);

    /// Bind `program`, set the pixel-to-clip projection for `screen_px` and
    /// enable alpha blending
    fn begin_text_pass(&mut self, program: ProgramHandle, screen_px: (u32, u32)) -> BackendResult<()>;

    /// Draw one textured quad tinted with `color`
    fn draw_textured_quad(
        &mut self,
        buffer: QuadBufferHandle,
        texture: TextureHandle,
        vertices: &GlyphQuad,
        color: Vec3,
    ) -> BackendResult<()>;

    /// Disable blending and unbind the program
    fn end_text_pass(&mut self);
}

impl<B: TextRenderBackend + ?Sized> TextRenderBackend for &mut B {
    fn compile_program(&mut self, vertex_src: &str, fragment_src: &str) -> BackendResult<ProgramHandle> {
        (**self).compile_program(vertex_src, fragment_src)
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        (**self).destroy_program(program);
    }

    fn create_quad_buffer(&mut self) -> BackendResult<QuadBufferHandle> {
        (**self).create_quad_buffer()
    }

    fn destroy_quad_buffer(&mut self, buffer: QuadBufferHandle) {
        (**self).destroy_quad_buffer(buffer);
    }

    fn create_glyph_texture(&mut self, width: u32, height: u32, coverage: &[u8]) -> BackendResult<TextureHandle> {
        (**self).create_glyph_texture(width, height, coverage)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        (**self).destroy_texture(texture);
    }

    fn clear(&mut self, color: Vec4) {
        (**self).clear(color);
    }

    fn begin_text_pass(&mut self, program: ProgramHandle, screen_px: (u32, u32)) -> BackendResult<()> {
        (**self).begin_text_pass(program, screen_px)
    }

    fn draw_textured_quad(
        &mut self,
        buffer: QuadBufferHandle,
        texture: TextureHandle,
        vertices: &GlyphQuad,
        color: Vec3,
    ) -> BackendResult<()> {
        (**self).draw_textured_quad(buffer, texture, vertices, color)
    }

    fn end_text_pass(&mut self) {
        (**self).end_text_pass();
    }
}

impl GlyphVertex {
    /// Build the six vertices of an axis-aligned quad
    pub const fn quad(left: f32, top: f32, right: f32, bottom: f32) -> GlyphQuad {
        [
            Self { position: [left, top], uv: [0.0, 0.0] },
            Self { position: [right, top], uv: [1.0, 0.0] },
            Self { position: [right, bottom], uv: [1.0, 1.0] },

            Self { position: [left, top], uv: [0.0, 0.0] },
            Self { position: [right, bottom], uv: [1.0, 1.0] },
            Self { position: [left, bottom], uv: [0.0, 1.0] },
        ]
    }
}
