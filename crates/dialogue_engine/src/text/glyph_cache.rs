//! Lazily populated glyph texture cache
//!
//! Glyphs are rasterized with `fontdue` the first time their index is
//! drawn and uploaded as single-channel textures. Entries live until the
//! owning text engine shuts down; there is no eviction.

use std::collections::HashMap;

use fontdue::{Font, FontSettings};

use crate::render::{TextRenderBackend, TextureHandle};
use super::{TextError, TextResult};

/// Coverage bitmap and metrics for one rasterized glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Offset from the pen position to the bitmap's left edge
    pub bearing_x: i32,
    /// Offset from the baseline up to the bitmap's top edge
    pub bearing_y: i32,
    /// Horizontal advance in pixels
    pub advance_px: f32,
    /// Row-major coverage, one byte per pixel
    pub coverage: Vec<u8>,
}

/// Source of glyph bitmaps for one face at one pixel size
pub trait GlyphRasterizer {
    /// Number of glyphs in the face
    fn glyph_count(&self) -> u16;

    /// Rasterize the glyph at `glyph_index`
    fn rasterize(&self, glyph_index: u16) -> GlyphBitmap;
}

/// `fontdue` rasterizer
pub struct FontdueRasterizer {
    font: Font,
    pixel_size: f32,
}

impl FontdueRasterizer {
    /// Parse `font_data` for rasterization at `pixel_size`
    ///
    /// # Errors
    ///
    /// [`TextError::FontLoad`] if `fontdue` rejects the data.
    pub fn new(font_data: &[u8], pixel_size: u32) -> TextResult<Self> {
        let pixel_size = pixel_size as f32;
        let settings = FontSettings {
            scale: pixel_size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(font_data, settings)
            .map_err(|e| TextError::FontLoad(format!("fontdue error: {}", e)))?;
        Ok(Self { font, pixel_size })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn glyph_count(&self) -> u16 {
        self.font.glyph_count()
    }

    fn rasterize(&self, glyph_index: u16) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize_indexed(glyph_index, self.pixel_size);
        // fontdue reports the bottom edge; the top sits `height` above it
        let height = i32::try_from(metrics.height).unwrap_or(i32::MAX);
        GlyphBitmap {
            width: u32::try_from(metrics.width).unwrap_or(0),
            height: u32::try_from(metrics.height).unwrap_or(0),
            bearing_x: metrics.xmin,
            bearing_y: metrics.ymin.saturating_add(height),
            advance_px: metrics.advance_width,
            coverage,
        }
    }
}

/// Cached GPU texture and placement metrics of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphTex {
    /// Coverage texture
    pub texture: TextureHandle,
    /// Texture width in pixels
    pub width: u32,
    /// Texture height in pixels
    pub height: u32,
    /// Left bearing in pixels
    pub bearing_x: i32,
    /// Top bearing above the baseline in pixels
    pub bearing_y: i32,
    /// Horizontal advance in pixels
    pub advance_px: f32,
}

/// Glyph textures keyed by glyph index within one face
pub struct GlyphCache<R: GlyphRasterizer> {
    rasterizer: R,
    entries: HashMap<u32, GlyphTex>,
}

impl<R: GlyphRasterizer> GlyphCache<R> {
    /// Empty cache over `rasterizer`
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            entries: HashMap::new(),
        }
    }

    /// Cached entry for `glyph_index`, rasterizing and uploading it on a miss
    ///
    /// # Errors
    ///
    /// [`TextError::GlyphIndex`] if the index is outside the face, or
    /// [`TextError::Backend`] if the texture upload fails. Nothing is
    /// cached on error.
    pub fn get_or_rasterize<B>(&mut self, backend: &mut B, glyph_index: u32) -> TextResult<GlyphTex>
    where
        B: TextRenderBackend + ?Sized,
    {
        if let Some(glyph) = self.entries.get(&glyph_index) {
            return Ok(*glyph);
        }

        let index = u16::try_from(glyph_index)
            .ok()
            .filter(|index| *index < self.rasterizer.glyph_count())
            .ok_or(TextError::GlyphIndex(glyph_index))?;

        let bitmap = self.rasterizer.rasterize(index);
        let texture = backend.create_glyph_texture(bitmap.width, bitmap.height, &bitmap.coverage)?;
        log::trace!("Rasterized glyph {} ({}x{})", glyph_index, bitmap.width, bitmap.height);

        let glyph = GlyphTex {
            texture,
            width: bitmap.width,
            height: bitmap.height,
            bearing_x: bitmap.bearing_x,
            bearing_y: bitmap.bearing_y,
            advance_px: bitmap.advance_px,
        };
        self.entries.insert(glyph_index, glyph);
        Ok(glyph)
    }

    /// Destroy every cached texture, returning how many were released
    pub fn release_all<B>(&mut self, backend: &mut B) -> usize
    where
        B: TextRenderBackend + ?Sized,
    {
        let released = self.entries.len();
        for (_, glyph) in self.entries.drain() {
            backend.destroy_texture(glyph.texture);
        }
        released
    }

    /// Whether `glyph_index` has been rasterized
    pub fn contains(&self, glyph_index: u32) -> bool {
        self.entries.contains_key(&glyph_index)
    }

    /// Number of cached glyphs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been rasterized yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
