//! Projection-profile fallback for borderless tables.
//!
//! When edge-based detection finds nothing, character coverage is
//! projected onto each axis. Deep valleys in the profiles (bins below 10%
//! of the peak) mark separators; the implied grid is accepted only when it
//! is at least 2×2 and at least 30% of its cells contain text. Confidence
//! comes from a reduced blend and is capped below every edge-based score
//! band, reflecting the weaker evidence.

use crate::geometry::BBox;
use crate::primitives::Char;
use crate::table::config::{mean_char_height, mean_char_width, TOLERANCE_FLOOR};
use crate::table::grid::{cell_text, GridLayout};
use crate::table::scoring::{regularity, round2, size_sanity};
use crate::table::Cell;

/// Bins below this fraction of the profile peak count as valleys.
const VALLEY_RATIO: f32 = 0.1;
/// Minimum fraction of non-empty cells for an accepted grid.
const MIN_FILLED_RATIO: f32 = 0.3;
/// Upper bound on fallback confidence.
const MAX_CONFIDENCE: f32 = 0.85;
/// Upper bound on profile resolution.
const MAX_BINS: usize = 4096;
/// Fewer printable characters than this cannot support a grid.
const MIN_PRINTABLE_CHARS: usize = 8;

/// Coverage histogram along one axis.
fn profile(extents: &[(f32, f32)], lo: f32, hi: f32, bin_width: f32) -> Vec<f32> {
    let span = hi - lo;
    if span <= f32::EPSILON || bin_width <= f32::EPSILON {
        return vec![];
    }
    let n = ((span / bin_width).ceil() as usize).clamp(1, MAX_BINS);
    let width = span / n as f32;
    let mut bins = vec![0.0f32; n];
    for &(elo, ehi) in extents {
        let first = (((elo - lo) / width).floor() as isize).clamp(0, n as isize - 1) as usize;
        let last = (((ehi - lo) / width).ceil() as isize - 1).clamp(0, n as isize - 1) as usize;
        for (i, bin) in bins.iter_mut().enumerate().take(last + 1).skip(first) {
            let bin_lo = lo + i as f32 * width;
            let bin_hi = bin_lo + width;
            let overlap = ehi.min(bin_hi) - elo.max(bin_lo);
            if overlap > 0.0 {
                *bin += overlap;
            }
        }
    }
    bins
}

/// Boundary coordinates from a coverage profile.
///
/// Interior runs of valley bins each contribute one separator at the run
/// center; the outer boundaries are the content extent itself. Leading and
/// trailing valleys are trimmed rather than treated as separators.
fn profile_boundaries(bins: &[f32], lo: f32, hi: f32) -> Vec<f32> {
    let peak = bins.iter().fold(0.0f32, |a, &b| a.max(b));
    if peak <= f32::EPSILON {
        return vec![];
    }
    let threshold = VALLEY_RATIO * peak;
    let width = (hi - lo) / bins.len() as f32;

    let mut boundaries = vec![lo];
    let mut run_start: Option<usize> = None;
    for (i, &v) in bins.iter().enumerate() {
        if v < threshold {
            run_start.get_or_insert(i);
        } else if let Some(start) = run_start.take() {
            if start > 0 {
                let center = lo + (start + i) as f32 / 2.0 * width;
                boundaries.push(center);
            }
        }
    }
    // A trailing valley run is the right margin, not a separator.
    boundaries.push(hi);
    boundaries
}

/// Attempt borderless detection over the characters' joint extent.
///
/// Returns the grid and its confidence, or `None` when the profiles do not
/// support at least a sparse 2×2 grid.
pub(crate) fn projection_fallback(chars: &[Char]) -> Option<(GridLayout, f32)> {
    let printable: Vec<&Char> = chars.iter().filter(|c| !c.is_blank()).collect();
    if printable.len() < MIN_PRINTABLE_CHARS {
        return None;
    }
    let bbox = printable
        .iter()
        .map(|c| c.bbox.normalize())
        .reduce(|a, b| a.union(&b))?;

    let x_extents: Vec<(f32, f32)> = printable
        .iter()
        .map(|c| {
            let b = c.bbox.normalize();
            (b.x0, b.x1)
        })
        .collect();
    let y_extents: Vec<(f32, f32)> = printable
        .iter()
        .map(|c| {
            let b = c.bbox.normalize();
            (b.y0, b.y1)
        })
        .collect();

    // Bin at the average glyph extent so inter-character gaps inside a
    // word do not read as valleys.
    let x_bin = mean_char_width(chars).max(TOLERANCE_FLOOR);
    let y_bin = mean_char_height(chars).max(TOLERANCE_FLOOR);
    let x_bins = profile(&x_extents, bbox.x0, bbox.x1, x_bin);
    let y_bins = profile(&y_extents, bbox.y0, bbox.y1, y_bin);
    let col_boundaries = profile_boundaries(&x_bins, bbox.x0, bbox.x1);
    let row_boundaries = profile_boundaries(&y_bins, bbox.y0, bbox.y1);
    if col_boundaries.len() < 3 || row_boundaries.len() < 3 {
        return None;
    }

    let mut cells = Vec::new();
    let mut filled = 0usize;
    for (ri, rows) in row_boundaries.windows(2).enumerate() {
        for (ci, cols) in col_boundaries.windows(2).enumerate() {
            let cell_bbox = BBox::new(cols[0], rows[0], cols[1], rows[1]);
            let text = cell_text(chars, &cell_bbox);
            if !text.is_empty() {
                filled += 1;
            }
            cells.push(Cell {
                row: ri,
                col: ci,
                row_span: 1,
                col_span: 1,
                bbox: cell_bbox,
                text,
            });
        }
    }
    if (filled as f32) < MIN_FILLED_RATIO * cells.len() as f32 {
        return None;
    }
    let coverage = filled as f32 / cells.len() as f32;

    // A projection grid has no graphical intersections; treat every
    // boundary crossing as present so scoring sees a complete frame.
    let n_corners = col_boundaries.len() * row_boundaries.len();
    let grid = GridLayout {
        bbox,
        col_boundaries,
        row_boundaries,
        n_corners,
        cells,
    };
    let regular = regularity(&grid.row_boundaries, &grid.col_boundaries);
    let size = size_sanity(&grid);
    let confidence = round2(
        (MAX_CONFIDENCE * (0.45 * coverage + 0.35 * regular + 0.20 * size))
            .min(MAX_CONFIDENCE),
    );
    log::debug!(
        "fallback: {}x{} projection grid, confidence {confidence}",
        grid.n_rows(),
        grid.n_cols()
    );
    Some((grid, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_word_chars(text: &str, x: f32, y: f32) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                Char::new(
                    c.to_string(),
                    BBox::new(x + i as f32 * 8.0, y, x + (i + 1) as f32 * 8.0, y + 12.0),
                    "Times",
                    12.0,
                    0,
                )
            })
            .collect()
    }

    fn two_by_three(gap_x: f32, gap_y: f32) -> Vec<Char> {
        let mut chars = Vec::new();
        for row in 0..3 {
            let y = row as f32 * gap_y;
            chars.extend(mock_word_chars("aaaa", 0.0, y));
            chars.extend(mock_word_chars("bbbb", gap_x, y));
        }
        chars
    }

    #[test]
    fn test_detects_borderless_grid() {
        // Two columns separated by a wide empty band, three rows with
        // generous leading.
        let chars = two_by_three(120.0, 40.0);
        let (grid, confidence) = projection_fallback(&chars).unwrap();
        assert_eq!(grid.n_cols(), 2);
        assert_eq!(grid.n_rows(), 3);
        assert!(confidence > 0.0 && confidence <= 0.85);
    }

    #[test]
    fn test_confidence_capped() {
        let chars = two_by_three(120.0, 40.0);
        let (_, confidence) = projection_fallback(&chars).unwrap();
        assert!(confidence <= 0.85);
    }

    #[test]
    fn test_single_column_rejected() {
        // No interior x-valley: one column only.
        let mut chars = Vec::new();
        for row in 0..3 {
            chars.extend(mock_word_chars("aaaaaaaa", 0.0, row as f32 * 40.0));
        }
        assert!(projection_fallback(&chars).is_none());
    }

    #[test]
    fn test_too_few_chars_rejected() {
        assert!(projection_fallback(&[]).is_none());
        let chars = mock_word_chars("ab", 0.0, 0.0);
        assert!(projection_fallback(&chars).is_none());
    }
}
