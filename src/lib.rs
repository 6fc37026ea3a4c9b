//! # Layout Oxide
//!
//! Layout analysis toolkit: converts a flat set of positioned page
//! primitives (characters, line segments, rectangles, each with a bounding
//! box and minimal metadata) into two structured artifacts:
//!
//! - **Reading-ordered text**: characters grouped into words, lines, and
//!   flow-ordered blocks via the [`layout::LayoutEngine`].
//! - **Reconstructed tables**: grid structure, per-cell text, merged-cell
//!   spans, and a confidence score via the [`table::TableFinder`].
//!
//! The crate is a pure library boundary. It consumes positioned primitives
//! from an external page-content collaborator (a PDF interpreter, an OCR
//! pass, a synthetic generator) and performs no I/O of its own. One call
//! processes one page's primitives to completion: single-threaded,
//! synchronous, no shared state across calls.
//!
//! ## Quick Start
//!
//! ```
//! use layout_oxide::geometry::BBox;
//! use layout_oxide::primitives::Char;
//! use layout_oxide::layout::{LayoutConfig, LayoutEngine};
//!
//! let chars = vec![
//!     Char::new("H", BBox::new(0.0, 0.0, 8.0, 12.0), "Times", 12.0, 0),
//!     Char::new("i", BBox::new(8.0, 0.0, 12.0, 12.0), "Times", 12.0, 0),
//! ];
//!
//! let engine = LayoutEngine::new(LayoutConfig::default());
//! let text = engine.extract_text(&chars);
//! assert_eq!(text, "Hi");
//! ```
//!
//! Table detection takes the same characters plus graphical line segments
//! and rectangles, and returns detected tables along with the retained
//! edges and intersections for visual-debugging overlays:
//!
//! ```
//! use layout_oxide::table::{TableConfig, TableFinder};
//!
//! let finder = TableFinder::new(TableConfig::default());
//! let result = finder.find_tables(&[], &[], &[], 0);
//! assert!(result.tables.is_empty());
//! ```
//!
//! ## Scaling notes
//!
//! Intersection detection is O(V×H) over the joined edge sets and region
//! segmentation is near-linear (row/column bucketing plus union-find).
//! Dense pages with thousands of edge fragments are bounded by the edge
//! joining pass, which collapses collinear fragments before the pair scan.
//! The engine exposes no internal cancellation hooks; callers needing
//! timeouts must impose them between calls.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Input value types
pub mod primitives;

// Geometric algebra and clustering
pub mod geometry;

// Text layout engine
pub mod layout;

// Table detection engine
pub mod table;

pub use error::{Error, Result};
pub use geometry::{BBox, Point};
pub use layout::{LayoutConfig, LayoutEngine, TextBlock, TextLine, Word};
pub use primitives::{Char, LineSegment, RectShape};
pub use table::{Cell, DetectionMethod, Table, TableConfig, TableFinder, TableResult};
