//! Greedy line wrapping over shaped clusters
//!
//! Text is split on `\n` into paragraphs wrapped independently. A newline
//! directly followed by another newline also leaves a blank line of its
//! own, on top of the empty paragraph between them. Within a paragraph
//! clusters, leading spaces included, are packed left to right; when the
//! next cluster would push the line past the width, the line breaks at the
//! latest space in the line, or right before the overflowing cluster when
//! there is none. A cluster wider than the whole width gets a line of its
//! own. Every iteration either consumes a cluster or commits a line, and
//! clusters are carried over a break at most once, so wrapping is linear in
//! the cluster count.

use super::shaping::{ClusterShaper, HbCluster};

/// Wrap `text` to `max_width_px` using clusters from `shaper`
///
/// Every paragraph yields at least one line: an empty paragraph (including
/// the whole of an empty `text`) becomes one empty line, and each `\n\n`
/// pair adds one more. Lines have leading and trailing spaces trimmed.
pub fn wrap_text<S: ClusterShaper + ?Sized>(shaper: &S, text: &str, max_width_px: f32) -> Vec<String> {
    let paragraphs: Vec<&str> = text.split('\n').collect();
    let last = paragraphs.len() - 1;

    let mut lines = Vec::new();
    for (index, paragraph) in paragraphs.iter().enumerate() {
        lines.extend(wrap_paragraph(paragraph, &shaper.shape_clusters(paragraph), max_width_px));
        // The newline after this paragraph is immediately followed by another
        if index + 1 < last && paragraphs[index + 1].is_empty() {
            lines.push(String::new());
        }
    }
    lines
}

/// Wrap a single paragraph given its clusters
///
/// `clusters` must be in source order with byte ranges into `paragraph`.
pub fn wrap_paragraph(paragraph: &str, clusters: &[HbCluster], max_width_px: f32) -> Vec<String> {
    let count = clusters.len();
    let skip_spaces = |mut index: usize| {
        while index < count && clusters[index].is_space {
            index += 1;
        }
        index
    };

    let mut lines = Vec::new();
    let mut seg_begin = 0;
    let mut seg_width = 0.0_f32;
    let mut last_space: Option<usize> = None;
    let mut i = 0;

    while i < count {
        if clusters[i].is_space {
            last_space = Some(i);
        }

        let tentative = seg_width + clusters[i].advance_px;
        if tentative <= max_width_px {
            seg_width = tentative;
            i += 1;
            continue;
        }

        let break_at = match last_space {
            Some(space) if space >= seg_begin => space,
            _ if i == seg_begin => i,
            _ => i - 1,
        };
        lines.push(extract_line(paragraph, clusters, seg_begin, break_at));

        seg_begin = skip_spaces(break_at + 1);
        last_space = None;
        if seg_begin <= i {
            // Clusters after the break point open the next line; none are spaces
            seg_width = clusters[seg_begin..i].iter().map(|c| c.advance_px).sum();
        } else {
            seg_width = 0.0;
            i = seg_begin;
        }
    }

    if seg_begin < count {
        lines.push(extract_line(paragraph, clusters, seg_begin, count - 1));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Text of clusters `first..=last` with surrounding spaces trimmed
fn extract_line(paragraph: &str, clusters: &[HbCluster], first: usize, last: usize) -> String {
    let visible = &clusters[first..=last];
    let Some(head) = visible.iter().position(|c| !c.is_space) else {
        return String::new();
    };
    let tail = visible.iter().rposition(|c| !c.is_space).unwrap_or(head);

    let start = visible[head].byte_start;
    let end = visible[tail].byte_end;
    paragraph.get(start..end).unwrap_or_default().to_string()
}
