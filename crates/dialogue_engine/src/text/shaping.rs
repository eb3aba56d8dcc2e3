//! Text shaping
//!
//! Runs HarfBuzz shaping (via `rustybuzz`) with kerning and ligatures
//! enabled and folds the glyph stream into clusters keyed by source byte
//! offset. Advances are carried in 26.6 fixed point, as HarfBuzz reports
//! them for a font sized in pixels, and divided by 64 for pixel values.

use rustybuzz::ttf_parser::Tag;
use rustybuzz::{Face, Feature, UnicodeBuffer};

use super::{TextError, TextResult};

/// Fixed-point scale of 26.6 values
const FIXED_ONE: f32 = 64.0;

/// Convert a 26.6 fixed-point value to pixels
pub fn fixed_to_px(value: i32) -> f32 {
    value as f32 / FIXED_ONE
}

/// A shaped unit of one or more glyphs covering one or more source bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HbCluster {
    /// First byte of the cluster in the shaped text
    pub byte_start: usize,
    /// One past the last byte of the cluster
    pub byte_end: usize,
    /// Summed horizontal advance of the cluster's glyphs
    pub advance_px: f32,
    /// Cluster starts with an ASCII space or tab
    pub is_space: bool,
}

/// A positioned glyph, all metrics in 26.6 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    /// Glyph index within the font face
    pub glyph_id: u32,
    /// Byte offset of the source cluster
    pub cluster: u32,
    /// Horizontal pen advance
    pub x_advance: i32,
    /// Vertical pen advance
    pub y_advance: i32,
    /// Horizontal offset from the pen position
    pub x_offset: i32,
    /// Vertical offset from the pen position (+Y up)
    pub y_offset: i32,
}

/// Anything that can break text into shaped clusters
///
/// Measuring and wrapping are defined on top of cluster shaping so that
/// every consumer sees the same geometry.
pub trait ClusterShaper {
    /// Shape `text` into clusters in source order
    fn shape_clusters(&self, text: &str) -> Vec<HbCluster>;

    /// Total advance width of `text` in pixels
    fn measure(&self, text: &str) -> f32 {
        self.shape_clusters(text).iter().map(|cluster| cluster.advance_px).sum()
    }

    /// Greedily wrap `text` into lines no wider than `max_width_px`
    ///
    /// See [`wrap_text`](super::wrap_text) for the exact contract.
    fn wrap(&self, text: &str, max_width_px: f32) -> Vec<String> {
        super::wrap_text(self, text, max_width_px)
    }
}

/// HarfBuzz-compatible shaper for one font face at a fixed pixel size
///
/// The face is parsed once in [`TextShaper::new`] and reused for every
/// shaping call.
pub struct TextShaper {
    // Declared before `font_data` so it drops first
    face: Face<'static>,
    font_data: Box<[u8]>,
    pixel_size: u32,
    /// Font units to 26.6 pixels
    scale: f32,
}

impl TextShaper {
    /// Parse `font_data` and prepare shaping at `pixel_size`
    ///
    /// # Errors
    ///
    /// [`TextError::FontLoad`] if the data is not a usable font face.
    pub fn new(font_data: Vec<u8>, pixel_size: u32) -> TextResult<Self> {
        let font_data = font_data.into_boxed_slice();
        // SAFETY: the boxed bytes never move or change while `face` is alive;
        // `face` is private, never handed out as 'static, and dropped first.
        let static_data: &'static [u8] = unsafe { std::mem::transmute::<&[u8], &'static [u8]>(&*font_data) };
        let face = parse_face(static_data)
            .ok_or_else(|| TextError::FontLoad("not a TrueType/OpenType face".to_string()))?;

        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return Err(TextError::FontLoad("face reports zero units per em".to_string()));
        }

        Ok(Self {
            face,
            font_data,
            pixel_size,
            scale: pixel_size as f32 * FIXED_ONE / units_per_em,
        })
    }

    /// Raw font bytes
    pub fn font_data(&self) -> &[u8] {
        &self.font_data
    }

    /// Pixel size used for shaping
    pub const fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Shape `text` into positioned glyphs in visual order
    ///
    /// Script, direction and language are guessed from the text.
    pub fn shape_glyphs(&self, text: &str) -> Vec<ShapedGlyph> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();

        let output = rustybuzz::shape(&self.face, &shaping_features(), buffer);

        output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_advance: self.to_fixed(pos.x_advance),
                y_advance: self.to_fixed(pos.y_advance),
                x_offset: self.to_fixed(pos.x_offset),
                y_offset: self.to_fixed(pos.y_offset),
            })
            .collect()
    }

    fn to_fixed(&self, font_units: i32) -> i32 {
        (font_units as f32 * self.scale).round() as i32
    }
}

impl ClusterShaper for TextShaper {
    fn shape_clusters(&self, text: &str) -> Vec<HbCluster> {
        clusters_from_glyphs(text, &self.shape_glyphs(text))
    }
}

fn parse_face(data: &[u8]) -> Option<Face<'_>> {
    #[cfg(test)]
    FACE_PARSES.with(|count| count.set(count.get() + 1));
    Face::from_slice(data, 0)
}

#[cfg(test)]
thread_local! {
    static FACE_PARSES: std::cell::Cell<usize> = std::cell::Cell::new(0);
}

/// Kerning and standard ligatures over the whole buffer
fn shaping_features() -> [Feature; 2] {
    let enable = |tag: &[u8; 4]| Feature {
        tag: Tag::from_bytes(tag),
        value: 1,
        start: 0,
        end: u32::MAX,
    };
    [enable(b"kern"), enable(b"liga")]
}

/// Merge glyphs sharing a source cluster and order clusters by byte offset
///
/// Glyphs of right-to-left runs arrive with descending cluster values; the
/// result is always in logical order. Each cluster ends where the next one
/// starts, the last one at the end of `text`.
pub fn clusters_from_glyphs(text: &str, glyphs: &[ShapedGlyph]) -> Vec<HbCluster> {
    let mut merged: Vec<(usize, i32)> = Vec::with_capacity(glyphs.len());
    for glyph in glyphs {
        let start = glyph.cluster as usize;
        match merged.last_mut() {
            Some(last) if last.0 == start => last.1 += glyph.x_advance,
            _ => merged.push((start, glyph.x_advance)),
        }
    }

    merged.sort_by_key(|&(start, _)| start);
    merged.dedup_by(|next, kept| {
        if next.0 == kept.0 {
            kept.1 += next.1;
            true
        } else {
            false
        }
    });

    let bytes = text.as_bytes();
    merged
        .iter()
        .enumerate()
        .map(|(index, &(start, advance))| {
            let end = merged.get(index + 1).map_or(text.len(), |next| next.0);
            HbCluster {
                byte_start: start,
                byte_end: end,
                advance_px: fixed_to_px(advance),
                is_space: matches!(bytes.get(start), Some(b' ' | b'\t')),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::system_font;
    use approx::assert_relative_eq;

    fn glyph(cluster: u32, x_advance: i32) -> ShapedGlyph {
        ShapedGlyph {
            glyph_id: cluster + 1,
            cluster,
            x_advance,
            y_advance: 0,
            x_offset: 0,
            y_offset: 0,
        }
    }

    #[test]
    fn test_fixed_point_conversion() {
        assert_relative_eq!(fixed_to_px(64), 1.0);
        assert_relative_eq!(fixed_to_px(96), 1.5);
        assert_relative_eq!(fixed_to_px(-32), -0.5);
    }

    #[test]
    fn test_one_glyph_per_byte() {
        let clusters = clusters_from_glyphs("a b", &[glyph(0, 640), glyph(1, 320), glyph(2, 640)]);
        assert_eq!(clusters.len(), 3);
        assert_eq!((clusters[1].byte_start, clusters[1].byte_end), (1, 2));
        assert!(clusters[1].is_space);
        assert!(!clusters[0].is_space);
        assert_relative_eq!(clusters[2].advance_px, 10.0);
    }

    #[test]
    fn test_ligature_spans_bytes() {
        // "fi" shaped to one glyph covering bytes 0..2
        let clusters = clusters_from_glyphs("fix", &[glyph(0, 700), glyph(2, 500)]);
        assert_eq!(clusters.len(), 2);
        assert_eq!((clusters[0].byte_start, clusters[0].byte_end), (0, 2));
        assert_eq!((clusters[1].byte_start, clusters[1].byte_end), (2, 3));
    }

    #[test]
    fn test_multiple_glyphs_merge_into_cluster() {
        // Base plus combining mark share cluster 0
        let text = "e\u{301}x";
        let clusters = clusters_from_glyphs(text, &[glyph(0, 600), glyph(0, 0), glyph(3, 600)]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].byte_end, 3);
        assert_relative_eq!(clusters[0].advance_px, 600.0 / 64.0);
    }

    #[test]
    fn test_rtl_glyph_order_is_normalised() {
        let clusters = clusters_from_glyphs("abc", &[glyph(2, 64), glyph(1, 128), glyph(0, 192)]);
        let starts: Vec<usize> = clusters.iter().map(|c| c.byte_start).collect();
        assert_eq!(starts, [0, 1, 2]);
        assert_relative_eq!(clusters[0].advance_px, 3.0);
        assert_eq!(clusters[2].byte_end, 3);
    }

    #[test]
    fn test_tab_is_space_but_nbsp_is_not() {
        let text = "\t\u{a0}";
        let clusters = clusters_from_glyphs(text, &[glyph(0, 64), glyph(1, 64)]);
        assert!(clusters[0].is_space);
        assert!(!clusters[1].is_space);
    }

    #[test]
    fn test_empty_input() {
        assert!(clusters_from_glyphs("", &[]).is_empty());
    }

    #[test]
    fn test_invalid_font_rejected() {
        assert!(matches!(TextShaper::new(vec![0; 16], 32), Err(TextError::FontLoad(_))));
    }

    #[test]
    fn test_face_parsed_once_per_shaper() {
        let Some(font) = system_font() else {
            return;
        };
        let parses = || FACE_PARSES.with(std::cell::Cell::get);
        let before = parses();
        let shaper = TextShaper::new(font, 32).unwrap();
        assert_eq!(parses(), before + 1);

        let first = shaper.shape_glyphs("Take the lift");
        for _ in 0..10 {
            assert_eq!(shaper.shape_glyphs("Take the lift"), first);
            shaper.wrap("Take the lift\n\nto the roof", 120.0);
        }
        assert_eq!(parses(), before + 1);
        assert!(!first.is_empty());
    }
}
