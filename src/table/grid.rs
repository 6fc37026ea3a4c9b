//! Grid and cell reconstruction from a segmented region.
//!
//! The region's intersection points define candidate row and column
//! boundaries. Each recorded top-left corner seeds a cell whose span grows
//! rightward and downward until a separator stops it: a covering edge or a
//! recorded corner on the path. Merged cells fall out of this naturally,
//! because a missing interior separator lets the span run past it.

use crate::geometry::BBox;
use crate::layout::words::sort_chars;
use crate::primitives::Char;
use crate::table::config::ResolvedTolerances;
use crate::table::edges::{span_covered, Edge};
use crate::table::intersections::Intersection;
use crate::table::Cell;

/// A reconstructed grid, before scoring.
#[derive(Debug, Clone)]
pub(crate) struct GridLayout {
    /// Bounding box of the whole grid.
    pub bbox: BBox,
    /// Sorted snapped x boundaries (`n_cols + 1` entries).
    pub col_boundaries: Vec<f32>,
    /// Sorted snapped y boundaries (`n_rows + 1` entries).
    pub row_boundaries: Vec<f32>,
    /// Number of recorded corner intersections on the boundary grid.
    pub n_corners: usize,
    /// Materialized cells in row-major order of their top-left position.
    pub cells: Vec<Cell>,
}

impl GridLayout {
    pub(crate) fn n_rows(&self) -> usize {
        self.row_boundaries.len().saturating_sub(1)
    }

    pub(crate) fn n_cols(&self) -> usize {
        self.col_boundaries.len().saturating_sub(1)
    }
}

fn sorted_unique(mut values: Vec<f32>, tolerance: f32) -> Vec<f32> {
    values.sort_by(f32::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() <= tolerance);
    values
}

/// Reconstruct the grid for one region.
///
/// Returns `None` when the region cannot form at least one cell (fewer
/// than two row or column boundaries, or no cell materialized).
pub(crate) fn build_grid(
    region: &[Intersection],
    verticals: &[Edge],
    horizontals: &[Edge],
    chars: &[Char],
    tol: &ResolvedTolerances,
) -> Option<GridLayout> {
    let cols = sorted_unique(
        region.iter().map(|p| p.point.x).collect(),
        tol.intersection_x,
    );
    let rows = sorted_unique(
        region.iter().map(|p| p.point.y).collect(),
        tol.intersection_y,
    );
    if cols.len() < 2 || rows.len() < 2 {
        return None;
    }

    // Corner lookup on the snapped grid.
    let col_index = |x: f32| cols.iter().position(|&c| (c - x).abs() <= tol.intersection_x);
    let row_index = |y: f32| rows.iter().position(|&r| (r - y).abs() <= tol.intersection_y);
    let mut corners = vec![vec![false; cols.len()]; rows.len()];
    for p in region {
        if let (Some(ci), Some(ri)) = (col_index(p.point.x), row_index(p.point.y)) {
            corners[ri][ci] = true;
        }
    }
    let n_corners = corners
        .iter()
        .map(|row| row.iter().filter(|&&c| c).count())
        .sum();

    let n_rows = rows.len() - 1;
    let n_cols = cols.len() - 1;
    let mut covered = vec![vec![false; n_cols]; n_rows];
    let mut cells: Vec<Cell> = Vec::new();

    for ri in 0..n_rows {
        for ci in 0..n_cols {
            if covered[ri][ci] || !corners[ri][ci] {
                continue;
            }

            // Grow right until a vertical separator for this row band, a
            // recorded corner on the top edge, or the outer boundary.
            let band_lo = rows[ri];
            let band_hi = rows[ri + 1];
            let mut end_col = ci + 1;
            while end_col < n_cols {
                let stopped = span_covered(
                    verticals,
                    cols[end_col],
                    band_lo,
                    band_hi,
                    tol.intersection_x,
                ) || corners[ri][end_col];
                if stopped {
                    break;
                }
                end_col += 1;
            }

            // Grow down over the chosen column span. A recorded corner
            // anywhere along the span is a separator, not just at `ci`.
            let span_lo = cols[ci];
            let span_hi = cols[end_col];
            let mut end_row = ri + 1;
            while end_row < n_rows {
                let stopped = span_covered(
                    horizontals,
                    rows[end_row],
                    span_lo,
                    span_hi,
                    tol.intersection_y,
                ) || (ci..=end_col).any(|c| corners[end_row][c]);
                if stopped {
                    break;
                }
                end_row += 1;
            }

            // Both corners must be recorded intersections.
            if !corners[end_row][end_col] {
                continue;
            }

            let bbox = BBox::new(cols[ci], rows[ri], cols[end_col], rows[end_row]);
            for r in ri..end_row {
                for c in ci..end_col {
                    covered[r][c] = true;
                }
            }
            cells.push(Cell {
                row: ri,
                col: ci,
                row_span: end_row - ri,
                col_span: end_col - ci,
                bbox,
                text: cell_text(chars, &bbox),
            });
        }
    }

    if cells.is_empty() {
        return None;
    }
    let bbox = BBox::new(cols[0], rows[0], cols[n_cols], rows[n_rows]);
    Some(GridLayout {
        bbox,
        col_boundaries: cols,
        row_boundaries: rows,
        n_corners,
        cells,
    })
}

/// Text content of one cell: the overlapping characters in reading order,
/// concatenated and trimmed.
pub(crate) fn cell_text(chars: &[Char], bbox: &BBox) -> String {
    let inside: Vec<Char> = chars
        .iter()
        .filter(|c| c.bbox.overlaps(bbox))
        .cloned()
        .collect();
    let ordered = sort_chars(&inside, 0.5);
    let joined: String = ordered.iter().map(|c| c.text.as_str()).collect();
    joined.trim().to_string()
}
