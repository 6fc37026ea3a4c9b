//! Flow-block regrouping and ordering.
//!
//! Lines that sit close together vertically and share horizontal extent
//! belong to one flow block (a paragraph or column fragment). Blocks are
//! then ordered by a blended position key so multi-column layouts read in
//! a sensible flow rather than strict top-to-bottom page order.

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, HasBBox};
use crate::layout::config::LayoutConfig;
use crate::layout::words::TextLine;

/// A flow block: consecutive lines absorbed into one reading unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Minimal bounding rectangle of the member lines.
    pub bbox: BBox,
    /// Member lines in vertical order.
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Block text: line texts joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HasBBox for TextBlock {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// Vertical gap between a box and a block box; 0 when the spans overlap.
fn vertical_gap(a: &BBox, b: &BBox) -> f32 {
    let a = a.normalize();
    let b = b.normalize();
    if a.y1 >= b.y0 && b.y1 >= a.y0 {
        0.0
    } else if a.y1 < b.y0 {
        b.y0 - a.y1
    } else {
        a.y0 - b.y1
    }
}

fn horizontal_extents_overlap(a: &BBox, b: &BBox) -> bool {
    let a = a.normalize();
    let b = b.normalize();
    a.x0 < b.x1 && a.x1 > b.x0
}

/// Group lines into flow blocks.
///
/// Iteratively absorbs any unassigned line whose vertical gap from the
/// growing block is below `line_margin` × the block's average line height
/// and whose horizontal extent overlaps the block. The scan repeats until
/// no line can be absorbed, then seeds the next block. O(n²) in the number
/// of lines in the worst case; line counts per page are small enough that
/// this has never mattered in practice.
pub fn group_blocks(lines: Vec<TextLine>, config: &LayoutConfig) -> Vec<TextBlock> {
    if lines.is_empty() {
        return vec![];
    }

    let mut assigned = vec![false; lines.len()];
    let mut blocks: Vec<TextBlock> = Vec::new();

    for seed in 0..lines.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        let mut bbox = lines[seed].bbox.normalize();
        let mut height_sum = lines[seed].bbox.height();

        loop {
            let avg_height = height_sum / members.len() as f32;
            let threshold = config.line_margin * avg_height;
            let mut absorbed = false;

            for (i, line) in lines.iter().enumerate() {
                if assigned[i] {
                    continue;
                }
                if vertical_gap(&line.bbox, &bbox) < threshold
                    && horizontal_extents_overlap(&line.bbox, &bbox)
                {
                    assigned[i] = true;
                    bbox = bbox.union(&line.bbox);
                    height_sum += line.bbox.height();
                    members.push(i);
                    absorbed = true;
                }
            }
            if !absorbed {
                break;
            }
        }

        members.sort_by(|&a, &b| {
            let la = lines[a].bbox.normalize();
            let lb = lines[b].bbox.normalize();
            la.y0.total_cmp(&lb.y0).then(la.x0.total_cmp(&lb.x0))
        });
        let block_lines: Vec<TextLine> = members.iter().map(|&i| lines[i].clone()).collect();
        blocks.push(TextBlock {
            bbox,
            lines: block_lines,
        });
    }

    sort_blocks(&mut blocks, config.boxes_flow);
    blocks
}

/// Order blocks by the flow key.
///
/// With `boxes_flow = Some(f)` the key is `(1 - f)·x0 + f·y0`: 0 reads
/// pure left-to-right, 1 pure top-to-bottom, values between blend the two.
/// With `None`, blocks sort in pure visual order: top-to-bottom, then
/// left-to-right.
pub fn sort_blocks(blocks: &mut [TextBlock], boxes_flow: Option<f32>) {
    match boxes_flow {
        Some(f) => blocks.sort_by(|a, b| {
            let ka = (1.0 - f) * a.bbox.normalize().x0 + f * a.bbox.normalize().y0;
            let kb = (1.0 - f) * b.bbox.normalize().x0 + f * b.bbox.normalize().y0;
            ka.total_cmp(&kb)
        }),
        None => blocks.sort_by(|a, b| {
            let ba = a.bbox.normalize();
            let bb = b.bbox.normalize();
            ba.y0.total_cmp(&bb.y0).then(ba.x0.total_cmp(&bb.x0))
        }),
    }
}
