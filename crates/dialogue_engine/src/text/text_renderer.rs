//! Shaped text drawing
//!
//! [`TextEngine`] owns the text program, the glyph quad buffer and the
//! font (shaper plus glyph cache). Lines are shaped on every draw and each
//! glyph is submitted as one textured quad in pixel space.

use crate::foundation::math::{Vec3, Vec4};
use crate::render::{GlyphVertex, ProgramHandle, QuadBufferHandle, TextRenderBackend};
use super::glyph_cache::{FontdueRasterizer, GlyphCache};
use super::shaping::{fixed_to_px, ClusterShaper, HbCluster, TextShaper};
use super::{TextError, TextResult};

/// Pixel-space quad shader; (0, 0) is the top-left corner
const TEXT_VERTEX_SHADER: &str = r"#version 330
layout(location=0) in vec2 aPos;
layout(location=1) in vec2 aUV;
out vec2 vUV;
uniform vec2 uScreen;
void main() {
    vUV = aUV;
    float x = (aPos.x / uScreen.x) * 2.0 - 1.0;
    float y = 1.0 - (aPos.y / uScreen.y) * 2.0;
    gl_Position = vec4(x, y, 0.0, 1.0);
}
";

/// Tinted coverage; the red channel holds alpha
const TEXT_FRAGMENT_SHADER: &str = r"#version 330
in vec2 vUV;
out vec4 FragColor;
uniform sampler2D uTex;
uniform vec3 uColor;
void main() {
    FragColor = vec4(uColor, texture(uTex, vUV).r);
}
";

/// Something text can be measured, wrapped and drawn on
///
/// Play modes draw through this trait so they can run against any surface
/// that shapes text the same way it draws it.
pub trait TextSurface: ClusterShaper {
    /// Clear the whole drawable
    fn clear(&mut self, color: Vec4);

    /// Start a text pass over a drawable of `screen_px` pixels
    ///
    /// # Errors
    ///
    /// Backend failure binding the text program.
    fn begin(&mut self, screen_px: (u32, u32)) -> TextResult<()>;

    /// Draw one line with its pen starting at (`x`, `baseline_y`)
    ///
    /// # Errors
    ///
    /// Backend failure uploading a glyph or submitting a quad.
    fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Vec3) -> TextResult<()>;

    /// Finish the text pass
    fn end(&mut self);
}

struct LoadedFont {
    shaper: TextShaper,
    glyphs: GlyphCache<FontdueRasterizer>,
}

/// Text renderer for one font face at one pixel size
pub struct TextEngine<B: TextRenderBackend> {
    backend: B,
    program: Option<ProgramHandle>,
    quad_buffer: Option<QuadBufferHandle>,
    font: Option<LoadedFont>,
    screen: (u32, u32),
}

impl<B: TextRenderBackend> TextEngine<B> {
    /// Compile the text program, create the quad buffer and load the font
    ///
    /// # Arguments
    ///
    /// * `backend` - GPU collaborator that owns the created resources
    /// * `font_data` - TrueType/OpenType file bytes
    /// * `pixel_size` - Em size used for both shaping and rasterization
    ///
    /// # Errors
    ///
    /// [`TextError::Backend`] if the program or buffer cannot be created,
    /// [`TextError::FontLoad`] if the font is unusable. Anything acquired
    /// before the failure is released again.
    pub fn new(backend: B, font_data: Vec<u8>, pixel_size: u32) -> TextResult<Self> {
        let mut engine = Self {
            backend,
            program: None,
            quad_buffer: None,
            font: None,
            screen: (0, 0),
        };

        engine.program = Some(engine.backend.compile_program(TEXT_VERTEX_SHADER, TEXT_FRAGMENT_SHADER)?);
        engine.quad_buffer = Some(engine.backend.create_quad_buffer()?);

        let rasterizer = FontdueRasterizer::new(&font_data, pixel_size)?;
        let shaper = TextShaper::new(font_data, pixel_size)?;
        engine.font = Some(LoadedFont {
            shaper,
            glyphs: GlyphCache::new(rasterizer),
        });

        log::info!("Loaded font at {}px", pixel_size);
        Ok(engine)
    }

    /// Clear the drawable
    pub fn clear(&mut self, color: Vec4) {
        self.backend.clear(color);
    }

    /// Bind the text program for a drawable of `screen_px` pixels
    ///
    /// Does nothing after [`Self::shutdown`].
    ///
    /// # Errors
    ///
    /// Backend failure binding the program.
    pub fn begin(&mut self, screen_px: (u32, u32)) -> TextResult<()> {
        self.screen = screen_px;
        if let Some(program) = self.program {
            self.backend.begin_text_pass(program, screen_px)?;
        }
        Ok(())
    }

    /// End the text pass started by [`Self::begin`]
    pub fn end(&mut self) {
        if self.program.is_some() {
            self.backend.end_text_pass();
        }
    }

    /// Shape `text` and draw it glyph by glyph from (`x`, `baseline_y`)
    ///
    /// Glyphs missing from the face are skipped, as are glyphs without
    /// coverage such as spaces. Does nothing after [`Self::shutdown`].
    ///
    /// # Errors
    ///
    /// Backend failure creating a glyph texture or drawing a quad.
    pub fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Vec3) -> TextResult<()> {
        let (Some(font), Some(buffer)) = (self.font.as_mut(), self.quad_buffer) else {
            return Ok(());
        };

        let mut pen_x = x;
        let mut pen_y = baseline_y;
        for glyph in font.shaper.shape_glyphs(text) {
            let tex = match font.glyphs.get_or_rasterize(&mut self.backend, glyph.glyph_id) {
                Ok(tex) => tex,
                Err(TextError::GlyphIndex(index)) => {
                    log::warn!("Skipping glyph {} outside the font face", index);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if tex.width > 0 && tex.height > 0 {
                let left = pen_x + fixed_to_px(glyph.x_offset) + tex.bearing_x as f32;
                let top = pen_y - fixed_to_px(glyph.y_offset) - tex.bearing_y as f32;
                let quad = GlyphVertex::quad(left, top, left + tex.width as f32, top + tex.height as f32);
                self.backend.draw_textured_quad(buffer, tex.texture, &quad, color)?;
            }

            pen_x += fixed_to_px(glyph.x_advance);
            pen_y += fixed_to_px(glyph.y_advance);
        }
        Ok(())
    }

    /// Drawable size passed to the last [`Self::begin`]
    pub const fn screen(&self) -> (u32, u32) {
        self.screen
    }

    /// Number of glyph textures currently cached
    pub fn cached_glyphs(&self) -> usize {
        self.font.as_ref().map_or(0, |font| font.glyphs.len())
    }

    /// Whether [`Self::shutdown`] has run
    pub const fn is_shut_down(&self) -> bool {
        self.program.is_none()
    }

    /// Access the backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Access the backend mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Release glyph textures, font, quad buffer and program, in that order
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(mut font) = self.font.take() {
            let released = font.glyphs.release_all(&mut self.backend);
            log::debug!("Released {} glyph textures", released);
        }
        if let Some(buffer) = self.quad_buffer.take() {
            self.backend.destroy_quad_buffer(buffer);
        }
        if let Some(program) = self.program.take() {
            self.backend.destroy_program(program);
        }
    }
}

impl<B: TextRenderBackend> Drop for TextEngine<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<B: TextRenderBackend> ClusterShaper for TextEngine<B> {
    fn shape_clusters(&self, text: &str) -> Vec<HbCluster> {
        self.font
            .as_ref()
            .map_or_else(Vec::new, |font| font.shaper.shape_clusters(text))
    }
}

impl<B: TextRenderBackend> TextSurface for TextEngine<B> {
    fn clear(&mut self, color: Vec4) {
        Self::clear(self, color);
    }

    fn begin(&mut self, screen_px: (u32, u32)) -> TextResult<()> {
        Self::begin(self, screen_px)
    }

    fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Vec3) -> TextResult<()> {
        Self::draw_text(self, text, x, baseline_y, color)
    }

    fn end(&mut self) {
        Self::end(self);
    }
}
