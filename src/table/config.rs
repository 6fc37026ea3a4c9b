//! Table detection configuration and tolerance resolution.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::LayoutConfig;
use crate::primitives::Char;

/// Edge-collection strategy for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Synthesize full-span edges at caller-supplied coordinates.
    Explicit,
    /// Use axis-aligned graphical segments plus painted rectangle sides.
    Lines,
    /// Like `Lines`, but only stroked primitives count (fill-only
    /// rectangles are usually shading, not borders).
    LinesStrict,
    /// Derive edges from text alignment, whitespace gaps, and cell-center
    /// recurrence.
    Text,
}

/// Table detection settings.
///
/// The vertical and horizontal strategies are independent, so a table with
/// ruled columns but unruled rows can combine `Lines` and `Text`. The six
/// distance/count tolerances each take a base value plus optional per-axis
/// overrides; unset distance tolerances resolve adaptively from the mean
/// non-blank character width (floor 3.0 units), which keeps detection
/// self-scaling across font sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Strategy for vertical edges (column separators).
    pub vertical_strategy: Strategy,
    /// Strategy for horizontal edges (row separators).
    pub horizontal_strategy: Strategy,
    /// Explicit x-coordinates for vertical edges (`Strategy::Explicit`).
    /// An empty list silently yields zero vertical edges.
    pub explicit_vertical_lines: Vec<f32>,
    /// Explicit y-coordinates for horizontal edges.
    pub explicit_horizontal_lines: Vec<f32>,
    /// Base snap tolerance: max distance for treating two coordinates as
    /// equal. `None` = adaptive.
    pub snap_tolerance: Option<f32>,
    /// Per-axis snap override for x coordinates.
    pub snap_x_tolerance: Option<f32>,
    /// Per-axis snap override for y coordinates.
    pub snap_y_tolerance: Option<f32>,
    /// Base join tolerance: max gap bridged when extending collinear edges.
    pub join_tolerance: Option<f32>,
    /// Per-axis join override along x (horizontal edges).
    pub join_x_tolerance: Option<f32>,
    /// Per-axis join override along y (vertical edges).
    pub join_y_tolerance: Option<f32>,
    /// Minimum edge length; shorter edges are dropped before joining.
    pub edge_min_length: Option<f32>,
    /// Per-axis minimum length for horizontal edges.
    pub edge_min_length_x: Option<f32>,
    /// Per-axis minimum length for vertical edges.
    pub edge_min_length_y: Option<f32>,
    /// Minimum number of distinct text rows a word-alignment cluster must
    /// span to emit a vertical edge.
    pub min_words_vertical: usize,
    /// Minimum number of distinct text columns a word-alignment cluster
    /// must span to emit a horizontal edge.
    pub min_words_horizontal: usize,
    /// Base intersection tolerance.
    pub intersection_tolerance: Option<f32>,
    /// Per-axis intersection override for x.
    pub intersection_x_tolerance: Option<f32>,
    /// Per-axis intersection override for y.
    pub intersection_y_tolerance: Option<f32>,
    /// Layout tolerances used when extracting words for text strategies
    /// and the borderless fallback.
    pub text_layout: LayoutConfig,
    /// Recursively detect tables nested inside cells.
    pub detect_nested: bool,
    /// Depth bound for nested detection.
    pub max_nested_depth: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::Lines,
            horizontal_strategy: Strategy::Lines,
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            snap_tolerance: None,
            snap_x_tolerance: None,
            snap_y_tolerance: None,
            join_tolerance: None,
            join_x_tolerance: None,
            join_y_tolerance: None,
            edge_min_length: Some(3.0),
            edge_min_length_x: None,
            edge_min_length_y: None,
            min_words_vertical: 3,
            min_words_horizontal: 1,
            intersection_tolerance: None,
            intersection_x_tolerance: None,
            intersection_y_tolerance: None,
            text_layout: LayoutConfig::default(),
            detect_nested: false,
            max_nested_depth: 1,
        }
    }
}

impl TableConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("snap_tolerance", self.snap_tolerance),
            ("snap_x_tolerance", self.snap_x_tolerance),
            ("snap_y_tolerance", self.snap_y_tolerance),
            ("join_tolerance", self.join_tolerance),
            ("join_x_tolerance", self.join_x_tolerance),
            ("join_y_tolerance", self.join_y_tolerance),
            ("edge_min_length", self.edge_min_length),
            ("edge_min_length_x", self.edge_min_length_x),
            ("edge_min_length_y", self.edge_min_length_y),
            ("intersection_tolerance", self.intersection_tolerance),
            ("intersection_x_tolerance", self.intersection_x_tolerance),
            ("intersection_y_tolerance", self.intersection_y_tolerance),
        ];
        for (name, value) in named {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(Error::InvalidTolerance { name, value: v });
                }
            }
        }
        if self.min_words_vertical == 0 {
            return Err(Error::InvalidCount {
                name: "min_words_vertical",
            });
        }
        if self.min_words_horizontal == 0 {
            return Err(Error::InvalidCount {
                name: "min_words_horizontal",
            });
        }
        if self.detect_nested && self.max_nested_depth == 0 {
            return Err(Error::InvalidCount {
                name: "max_nested_depth",
            });
        }
        self.text_layout.validate()
    }
}

/// Hard floor for adaptively resolved tolerances.
pub const TOLERANCE_FLOOR: f32 = 3.0;

/// Distance tolerances with every override resolved to a concrete value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTolerances {
    /// Snap tolerance for x coordinates.
    pub snap_x: f32,
    /// Snap tolerance for y coordinates.
    pub snap_y: f32,
    /// Join tolerance along x.
    pub join_x: f32,
    /// Join tolerance along y.
    pub join_y: f32,
    /// Minimum length for horizontal edges.
    pub min_length_x: f32,
    /// Minimum length for vertical edges.
    pub min_length_y: f32,
    /// Intersection tolerance for x.
    pub intersection_x: f32,
    /// Intersection tolerance for y.
    pub intersection_y: f32,
}

/// Mean width of the non-blank characters, or 0.0 when there are none.
pub fn mean_char_width(chars: &[Char]) -> f32 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for ch in chars.iter().filter(|c| !c.is_blank()) {
        sum += ch.width();
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

/// Mean height of the non-blank characters, or 0.0 when there are none.
pub fn mean_char_height(chars: &[Char]) -> f32 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for ch in chars.iter().filter(|c| !c.is_blank()) {
        sum += ch.height();
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

impl TableConfig {
    /// Resolve all distance tolerances against the page's characters.
    ///
    /// The adaptive default is half the mean non-blank character width,
    /// floored at [`TOLERANCE_FLOOR`]; explicit settings win, per-axis
    /// overrides win over base settings.
    pub fn resolve_tolerances(&self, chars: &[Char]) -> ResolvedTolerances {
        let adaptive = (mean_char_width(chars) / 2.0).max(TOLERANCE_FLOOR);
        let pick = |axis: Option<f32>, base: Option<f32>| axis.or(base).unwrap_or(adaptive);
        ResolvedTolerances {
            snap_x: pick(self.snap_x_tolerance, self.snap_tolerance),
            snap_y: pick(self.snap_y_tolerance, self.snap_tolerance),
            join_x: pick(self.join_x_tolerance, self.join_tolerance),
            join_y: pick(self.join_y_tolerance, self.join_tolerance),
            min_length_x: pick(self.edge_min_length_x, self.edge_min_length),
            min_length_y: pick(self.edge_min_length_y, self.edge_min_length),
            intersection_x: pick(self.intersection_x_tolerance, self.intersection_tolerance),
            intersection_y: pick(self.intersection_y_tolerance, self.intersection_tolerance),
        }
    }
}
