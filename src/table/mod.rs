//! Table detection engine built on border evidence.
//!
//! The pipeline runs per page: collect border candidates according to the
//! per-axis strategies, join collinear fragments, cross the vertical and
//! horizontal sets into intersections, segment the intersections into
//! connected regions, reconstruct each region's grid and cells, then score
//! the result. When the edge pipeline finds nothing, a projection-profile
//! fallback looks for borderless tables in the character coverage.

pub mod config;
pub mod edges;
pub mod intersections;

mod fallback;
mod grid;
mod regions;
mod scoring;

pub use config::{Strategy, TableConfig};
pub use edges::{Edge, Orientation};
pub use intersections::Intersection;

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, HasBBox};
use crate::layout::LayoutEngine;
use crate::primitives::{Char, LineSegment, RectShape};
use crate::Result;

/// How a table was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMethod {
    /// Both axes from graphical lines.
    Lines,
    /// Both axes from caller-supplied coordinates.
    Explicit,
    /// Both axes from text-derived edges.
    Text,
    /// Mixed strategies across the axes.
    Hybrid,
    /// Projection-profile fallback on character coverage.
    Projection,
}

/// One table cell.
///
/// `row`/`col` give the top-left grid position; spans above 1 mark merged
/// cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Grid row of the top-left corner.
    pub row: usize,
    /// Grid column of the top-left corner.
    pub col: usize,
    /// Number of grid rows covered.
    pub row_span: usize,
    /// Number of grid columns covered.
    pub col_span: usize,
    /// Cell rectangle.
    pub bbox: BBox,
    /// Trimmed cell text in reading order.
    pub text: String,
}

/// A detected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table rectangle.
    pub bbox: BBox,
    /// Page index the primitives came from.
    pub page: usize,
    /// Grid row count.
    pub n_rows: usize,
    /// Grid column count.
    pub n_cols: usize,
    /// Dense row-major view of the cell texts.
    ///
    /// Each cell's text sits at its top-left position; positions covered
    /// by a merged cell (and positions with no materialized cell) are
    /// `None`.
    pub grid: Vec<Vec<Option<String>>>,
    /// Cells in row-major order of their top-left position.
    pub cells: Vec<Cell>,
    /// Confidence score in `[0, 1]`, rounded to two decimals.
    pub confidence: f32,
    /// How the table was detected.
    pub method: DetectionMethod,
    /// Tables detected inside this table's cells.
    pub nested: Vec<Table>,
    /// For a nested table, the `(row, col)` of the host cell.
    pub parent_cell: Option<(usize, usize)>,
}

impl HasBBox for Table {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// Detection output for one page.
///
/// The joined edges and snapped intersections are retained for
/// visual-debugging overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    /// Detected tables in visual order (top-to-bottom, left-to-right).
    pub tables: Vec<Table>,
    /// Joined edges from both axes.
    pub edges: Vec<Edge>,
    /// Snapped intersections.
    pub intersections: Vec<Intersection>,
}

/// Table detection engine.
///
/// Holds a [`TableConfig`]; one instance can process any number of pages.
#[derive(Debug, Clone, Default)]
pub struct TableFinder {
    config: TableConfig,
}

impl TableFinder {
    /// Create a finder with the given configuration.
    ///
    /// The configuration is taken as-is; use [`TableFinder::try_new`] to
    /// validate it first.
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    /// Create a finder after validating the configuration.
    pub fn try_new(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The finder's configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Detect tables among one page's primitives.
    ///
    /// Total: empty primitives yield an empty result, never an error.
    pub fn find_tables(
        &self,
        chars: &[Char],
        segments: &[LineSegment],
        rects: &[RectShape],
        page: usize,
    ) -> TableResult {
        let depth = if self.config.detect_nested {
            self.config.max_nested_depth
        } else {
            0
        };
        self.find_at_depth(chars, segments, rects, page, depth, true)
    }

    fn find_at_depth(
        &self,
        chars: &[Char],
        segments: &[LineSegment],
        rects: &[RectShape],
        page: usize,
        depth: usize,
        allow_fallback: bool,
    ) -> TableResult {
        let tol = self.config.resolve_tolerances(chars);
        // Explicit coordinates may lie outside the content extent; the
        // synthesized edges must reach them or they can never intersect.
        let content_bbox = content_bbox(chars, segments, rects).map(|b| {
            expand_to_coords(
                b,
                &self.config.explicit_vertical_lines,
                &self.config.explicit_horizontal_lines,
            )
        });

        let needs_words = self.config.vertical_strategy == Strategy::Text
            || self.config.horizontal_strategy == Strategy::Text;
        let words = if needs_words {
            LayoutEngine::new(self.config.text_layout.clone()).extract_words(chars)
        } else {
            vec![]
        };

        let raw_verticals = edges::collect_edges(
            Orientation::Vertical,
            self.config.vertical_strategy,
            segments,
            rects,
            &self.config.explicit_vertical_lines,
            &words,
            &tol,
            self.config.min_words_vertical,
            content_bbox,
        );
        let raw_horizontals = edges::collect_edges(
            Orientation::Horizontal,
            self.config.horizontal_strategy,
            segments,
            rects,
            &self.config.explicit_horizontal_lines,
            &words,
            &tol,
            self.config.min_words_horizontal,
            content_bbox,
        );

        // Vertical edges share an x coordinate and span y, so they snap on
        // x and join along y; horizontal edges are the mirror case.
        let verticals = edges::join_edges(&raw_verticals, tol.snap_x, tol.join_y);
        let horizontals = edges::join_edges(&raw_horizontals, tol.snap_y, tol.join_x);

        let points = intersections::find_intersections(&verticals, &horizontals, &tol);
        let mut tables: Vec<Table> = Vec::new();
        let method = self.method();
        let page_has_text = chars.iter().any(|c| !c.is_blank());

        for region in regions::segment_regions(&points, &verticals, &horizontals, &tol) {
            let Some(grid) = grid::build_grid(&region, &verticals, &horizontals, chars, &tol)
            else {
                continue;
            };
            let confidence = scoring::score_table(&grid, method, page_has_text);
            tables.push(self.finish_table(grid, chars, segments, rects, page, method, confidence, depth));
        }

        if tables.is_empty() && allow_fallback {
            if let Some((grid, confidence)) = fallback::projection_fallback(chars) {
                tables.push(self.finish_table(
                    grid,
                    chars,
                    segments,
                    rects,
                    page,
                    DetectionMethod::Projection,
                    confidence,
                    0,
                ));
            }
        }

        tables.sort_by(|a, b| {
            a.bbox
                .y0
                .total_cmp(&b.bbox.y0)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });
        log::debug!("tables: page {page} -> {} tables", tables.len());

        let mut all_edges = verticals;
        all_edges.extend(horizontals);
        TableResult {
            tables,
            edges: all_edges,
            intersections: points,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_table(
        &self,
        grid: grid::GridLayout,
        chars: &[Char],
        segments: &[LineSegment],
        rects: &[RectShape],
        page: usize,
        method: DetectionMethod,
        confidence: f32,
        depth: usize,
    ) -> Table {
        let nested = if depth > 0 {
            self.find_nested(&grid, chars, segments, rects, page, depth)
        } else {
            vec![]
        };
        Table {
            bbox: grid.bbox,
            page,
            n_rows: grid.n_rows(),
            n_cols: grid.n_cols(),
            grid: dense_grid(&grid.cells, grid.n_rows(), grid.n_cols()),
            cells: grid.cells,
            confidence,
            method,
            nested,
            parent_cell: None,
        }
    }

    /// Recurse into each cell looking for nested tables.
    ///
    /// A candidate counts as nested only when it is meaningfully smaller
    /// than its host cell: at most 80% of the cell's width or height.
    /// Anything larger is the cell's own border structure re-detected.
    fn find_nested(
        &self,
        grid: &grid::GridLayout,
        chars: &[Char],
        segments: &[LineSegment],
        rects: &[RectShape],
        page: usize,
        depth: usize,
    ) -> Vec<Table> {
        let mut nested = Vec::new();
        for cell in &grid.cells {
            let cell_chars: Vec<Char> = chars
                .iter()
                .filter(|c| c.bbox.within(&cell.bbox))
                .cloned()
                .collect();
            let cell_segments: Vec<LineSegment> = segments
                .iter()
                .filter(|s| s.bbox().within(&cell.bbox))
                .copied()
                .collect();
            let cell_rects: Vec<RectShape> = rects
                .iter()
                .filter(|r| r.bbox.within(&cell.bbox))
                .copied()
                .collect();
            if cell_segments.is_empty() && cell_rects.is_empty() {
                continue;
            }
            let inner = self.find_at_depth(
                &cell_chars,
                &cell_segments,
                &cell_rects,
                page,
                depth - 1,
                false,
            );
            for mut table in inner.tables {
                let fits_width = table.bbox.width() <= 0.8 * cell.bbox.width();
                let fits_height = table.bbox.height() <= 0.8 * cell.bbox.height();
                if fits_width || fits_height {
                    table.parent_cell = Some((cell.row, cell.col));
                    nested.push(table);
                }
            }
        }
        nested
    }

    fn method(&self) -> DetectionMethod {
        let axis = |s: Strategy| match s {
            Strategy::Lines | Strategy::LinesStrict => DetectionMethod::Lines,
            Strategy::Explicit => DetectionMethod::Explicit,
            Strategy::Text => DetectionMethod::Text,
        };
        let v = axis(self.config.vertical_strategy);
        let h = axis(self.config.horizontal_strategy);
        if v == h {
            v
        } else {
            DetectionMethod::Hybrid
        }
    }
}

/// Cell texts as a dense row-major matrix keyed by top-left position.
fn dense_grid(cells: &[Cell], n_rows: usize, n_cols: usize) -> Vec<Vec<Option<String>>> {
    let mut rows = vec![vec![None; n_cols]; n_rows];
    for cell in cells {
        if cell.row < n_rows && cell.col < n_cols {
            rows[cell.row][cell.col] = Some(cell.text.clone());
        }
    }
    rows
}

fn expand_to_coords(bbox: BBox, xs: &[f32], ys: &[f32]) -> BBox {
    let mut b = bbox;
    for &x in xs {
        b.x0 = b.x0.min(x);
        b.x1 = b.x1.max(x);
    }
    for &y in ys {
        b.y0 = b.y0.min(y);
        b.y1 = b.y1.max(y);
    }
    b
}

fn content_bbox(chars: &[Char], segments: &[LineSegment], rects: &[RectShape]) -> Option<BBox> {
    let boxes = chars
        .iter()
        .map(|c| c.bbox)
        .chain(segments.iter().map(LineSegment::bbox))
        .chain(rects.iter().map(|r| r.bbox));
    boxes.map(|b| b.normalize()).reduce(|a, b| a.union(&b))
}
