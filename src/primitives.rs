//! Positioned input primitives supplied by an external page-content source.
//!
//! These are the immutable value types the layout and table engines consume:
//! text glyphs, graphical line segments, and rectangles, each carrying a
//! bounding box and the minimal metadata the algorithms need. The crate
//! never constructs these from a document format itself; a PDF interpreter,
//! OCR pass, or test harness supplies them.

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, HasBBox, Point};

/// A positioned text glyph.
///
/// `text` is a string rather than a single `char` so that ligature glyphs
/// ("ﬁ", "ﬂ") decomposed by an upstream extractor stay intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Char {
    /// Unicode text for this glyph (usually one character).
    pub text: String,
    /// Glyph bounding box.
    pub bbox: BBox,
    /// Name of the font that rendered this glyph.
    pub font_name: String,
    /// Font size in text-space units.
    pub size: f32,
    /// Whether the glyph is upright (false for rotated/vertical text).
    pub upright: bool,
    /// Page index (0-based) this glyph belongs to.
    pub page: usize,
}

impl Char {
    /// Create an upright character with the given text, box, font, and page.
    pub fn new(
        text: impl Into<String>,
        bbox: BBox,
        font_name: impl Into<String>,
        size: f32,
        page: usize,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            size,
            upright: true,
            page,
        }
    }

    /// Whether this glyph renders as whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Width of the glyph box.
    pub fn width(&self) -> f32 {
        self.bbox.width()
    }

    /// Height of the glyph box.
    pub fn height(&self) -> f32 {
        self.bbox.height()
    }
}

impl HasBBox for Char {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// A graphical line segment painted on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// First endpoint.
    pub p0: Point,
    /// Second endpoint.
    pub p1: Point,
    /// Whether the segment was stroked (painted) rather than implied.
    pub stroked: bool,
}

impl LineSegment {
    /// Create a stroked segment between two points.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            p0: Point::new(x0, y0),
            p1: Point::new(x1, y1),
            stroked: true,
        }
    }

    /// Bounding box of the segment (zero width or height for axis-aligned
    /// segments; normalize before using it in area math).
    pub fn bbox(&self) -> BBox {
        BBox::new(self.p0.x, self.p0.y, self.p1.x, self.p1.y).normalize()
    }
}

/// A rectangle painted on the page.
///
/// The stroke/fill flags matter to table detection: a rectangle contributes
/// border edges only when it was actually painted, and the `lines_strict`
/// strategy further requires a stroke (a filled-only rect is usually a
/// shading cell, not a border).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    /// Rectangle bounding box.
    pub bbox: BBox,
    /// Whether the rectangle outline was stroked.
    pub stroked: bool,
    /// Whether the rectangle interior was filled.
    pub filled: bool,
}

impl RectShape {
    /// Create a stroked, unfilled rectangle.
    pub fn stroked(bbox: BBox) -> Self {
        Self {
            bbox,
            stroked: true,
            filled: false,
        }
    }

    /// Create a filled, unstroked rectangle.
    pub fn filled(bbox: BBox) -> Self {
        Self {
            bbox,
            stroked: false,
            filled: true,
        }
    }
}

impl HasBBox for RectShape {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}
