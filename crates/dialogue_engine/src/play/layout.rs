//! Screen layout of a dialogue node
//!
//! One pass computes every line position and option row, and both drawing
//! and pointer hit-testing read the result, so what is clicked is always
//! what was drawn.

use crate::config::{GatingRules, LayoutMetrics};
use crate::dialogue::DialogueNode;
use crate::text::ClusterShaper;

/// A wrapped line and its pen origin
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Line text; may be empty
    pub text: String,
    /// Pen x in pixels
    pub x: f32,
    /// Baseline y in pixels, top-left origin
    pub baseline: f32,
}

/// Vertical extent and lines of one option
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    /// Index into the node's options
    pub index: usize,
    /// Top edge, half a line above the first baseline
    pub top: f32,
    /// Bottom edge, one line height per wrapped line below `top`
    pub bottom: f32,
    /// Wrapped label lines; always at least one
    pub lines: Vec<LayoutLine>,
}

impl OptionRow {
    /// Whether `y` falls within the row, edges included
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Positioned body lines and option rows for one node
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueLayout {
    /// Wrapped body text
    pub body: Vec<LayoutLine>,
    /// One row per option, in option order
    pub options: Vec<OptionRow>,
}

impl DialogueLayout {
    /// Lay out `node` for a viewport `viewport_width` pixels wide
    ///
    /// Option labels are wrapped as displayed: blank while locked, marker
    /// stripped once `unlocked`.
    pub fn compute<S>(
        node: &DialogueNode,
        shaper: &S,
        metrics: &LayoutMetrics,
        viewport_width: u32,
        rules: &GatingRules,
        unlocked: bool,
    ) -> Self
    where
        S: ClusterShaper + ?Sized,
    {
        let line_height = metrics.line_height;
        let mut baseline = metrics.start_y;

        let body = shaper
            .wrap(&node.text, metrics.body_width(viewport_width))
            .into_iter()
            .map(|text| {
                let line = LayoutLine {
                    text,
                    x: metrics.margin_left,
                    baseline,
                };
                baseline += line_height;
                line
            })
            .collect();

        baseline += metrics.option_gap;
        let option_x = metrics.margin_left + metrics.option_indent;
        let option_width = metrics.option_width(viewport_width);

        let options = node
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let label = rules.display_label(&option.label, unlocked);
                let top = baseline - line_height * 0.5;
                let lines: Vec<LayoutLine> = shaper
                    .wrap(label, option_width)
                    .into_iter()
                    .map(|text| {
                        let line = LayoutLine {
                            text,
                            x: option_x,
                            baseline,
                        };
                        baseline += line_height;
                        line
                    })
                    .collect();
                OptionRow {
                    index,
                    top,
                    bottom: top + line_height * lines.len() as f32,
                    lines,
                }
            })
            .collect();

        Self { body, options }
    }

    /// Option whose row contains `y`; the first row wins on a shared edge
    pub fn option_at(&self, y: f32) -> Option<usize> {
        self.options.iter().find(|row| row.contains(y)).map(|row| row.index)
    }
}
