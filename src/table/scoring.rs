//! Confidence scoring for reconstructed tables.
//!
//! The score is a weighted blend of five signals, each in `[0, 1]`:
//! border completeness, content coverage, geometric regularity, the
//! reliability of the detection method, and a size-sanity check. The blend
//! is rounded to two decimals so downstream thresholds compare cleanly.

use crate::table::config::TOLERANCE_FLOOR;
use crate::table::grid::GridLayout;
use crate::table::DetectionMethod;

const MAX_SANE_ROWS: usize = 100;
const MAX_SANE_COLS: usize = 50;

const W_EDGES: f32 = 0.30;
const W_CONTENT: f32 = 0.25;
const W_REGULARITY: f32 = 0.20;
const W_METHOD: f32 = 0.15;
const W_SIZE: f32 = 0.10;

/// Round to two decimal places.
pub(crate) fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn method_reliability(method: DetectionMethod) -> f32 {
    match method {
        DetectionMethod::Lines => 1.0,
        DetectionMethod::Explicit => 0.9,
        DetectionMethod::Hybrid => 0.75,
        DetectionMethod::Text => 0.6,
        DetectionMethod::Projection => 0.6,
    }
}

/// Fraction of grid corners backed by a recorded intersection.
///
/// A fully ruled table records all `(n_rows + 1) × (n_cols + 1)` corners;
/// missing ones mean partial borders.
fn edge_completeness(grid: &GridLayout) -> f32 {
    let total = grid.row_boundaries.len() * grid.col_boundaries.len();
    if total == 0 {
        0.0
    } else {
        (grid.n_corners as f32 / total as f32).min(1.0)
    }
}

/// Fraction of grid positions whose cell holds text.
///
/// Merged cells shrink the cell list, so the denominator is the position
/// count, not the cell count. A page with no printable characters scores
/// a neutral 1.0: empty cells are not evidence against a ruled grid when
/// there was nothing to fill them with.
fn content_coverage(grid: &GridLayout, page_has_text: bool) -> f32 {
    if !page_has_text {
        return 1.0;
    }
    let positions = grid.n_rows() * grid.n_cols();
    if positions == 0 {
        return 0.0;
    }
    let filled = grid.cells.iter().filter(|c| !c.text.is_empty()).count();
    filled as f32 / positions as f32
}

fn coefficient_of_variation(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    if mean <= f32::EPSILON {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    var.sqrt() / mean
}

/// Geometric regularity: one minus the mean coefficient of variation of
/// row heights and column widths, clamped to `[0, 1]`.
pub(crate) fn regularity(row_boundaries: &[f32], col_boundaries: &[f32]) -> f32 {
    let heights: Vec<f32> = row_boundaries.windows(2).map(|p| p[1] - p[0]).collect();
    let widths: Vec<f32> = col_boundaries.windows(2).map(|p| p[1] - p[0]).collect();
    let cv = (coefficient_of_variation(&heights) + coefficient_of_variation(&widths)) / 2.0;
    (1.0 - cv).clamp(0.0, 1.0)
}

/// Plausibility of the grid's shape.
///
/// Single-row and single-column grids are legal but weak evidence, as are
/// implausibly large ones; bands thinner than twice the tolerance floor
/// are usually snapping artifacts.
pub(crate) fn size_sanity(grid: &GridLayout) -> f32 {
    let plausible = grid.n_rows() >= 2
        && grid.n_cols() >= 2
        && grid.n_rows() <= MAX_SANE_ROWS
        && grid.n_cols() <= MAX_SANE_COLS;
    let dim = if plausible { 1.0 } else { 0.3 };
    let extents: Vec<f32> = grid
        .row_boundaries
        .windows(2)
        .chain(grid.col_boundaries.windows(2))
        .map(|p| p[1] - p[0])
        .collect();
    if extents.is_empty() {
        return 0.0;
    }
    let sane = extents
        .iter()
        .filter(|&&e| e >= 2.0 * TOLERANCE_FLOOR)
        .count();
    dim * (sane as f32 / extents.len() as f32)
}

/// Blend the five signals into a confidence score in `[0, 1]`.
pub(crate) fn score_table(
    grid: &GridLayout,
    method: DetectionMethod,
    page_has_text: bool,
) -> f32 {
    let edges = edge_completeness(grid);
    let content = content_coverage(grid, page_has_text);
    let regular = regularity(&grid.row_boundaries, &grid.col_boundaries);
    let size = size_sanity(grid);
    let blended = W_EDGES * edges
        + W_CONTENT * content
        + W_REGULARITY * regular
        + W_METHOD * method_reliability(method)
        + W_SIZE * size;
    log::debug!(
        "score: edges={edges:.2} content={content:.2} regularity={regular:.2} size={size:.2} -> {blended:.2}"
    );
    round2(blended.clamp(0.0, 1.0))
}
