//! Text layout engine for grouping characters into words, words into
//! lines, and lines into flow-ordered blocks.
//!
//! The engine is pure and total: every entry point returns empty output on
//! empty input, never an error. Tolerances are ratios scaled by local
//! character metrics (see [`LayoutConfig`]).

pub mod config;
pub mod flow;
pub mod words;

pub use config::LayoutConfig;
pub use flow::TextBlock;
pub use words::{compare_reading_order, Direction, TextLine, Word};

use crate::primitives::Char;

/// Text layout engine.
///
/// Holds a [`LayoutConfig`] and exposes the extraction entry points. The
/// engine keeps no per-call state; the same instance can process any
/// number of pages.
///
/// # Examples
///
/// ```
/// use layout_oxide::geometry::BBox;
/// use layout_oxide::layout::{LayoutConfig, LayoutEngine};
/// use layout_oxide::primitives::Char;
///
/// let engine = LayoutEngine::new(LayoutConfig::default());
/// let chars = vec![
///     Char::new("O", BBox::new(0.0, 0.0, 8.0, 12.0), "Times", 12.0, 0),
///     Char::new("k", BBox::new(8.0, 0.0, 16.0, 12.0), "Times", 12.0, 0),
/// ];
/// assert_eq!(engine.extract_text(&chars), "Ok");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Extract lines from the characters in reading order.
    pub fn extract_lines(&self, chars: &[Char]) -> Vec<TextLine> {
        if chars.is_empty() {
            return vec![];
        }
        let sorted = words::sort_chars(chars, self.config.line_overlap);
        let partitions = words::partition_lines(&sorted, &self.config);
        log::debug!(
            "layout: {} chars -> {} lines",
            chars.len(),
            partitions.len()
        );
        partitions
            .into_iter()
            .map(|p| words::build_line(p, &self.config))
            .collect()
    }

    /// Extract all words from the characters in reading order.
    pub fn extract_words(&self, chars: &[Char]) -> Vec<Word> {
        self.extract_lines(chars)
            .into_iter()
            .flat_map(|line| line.words)
            .collect()
    }

    /// Extract flow-ordered blocks.
    ///
    /// When `detect_flow` is disabled each line becomes its own block in
    /// sort order (the fast path).
    pub fn extract_blocks(&self, chars: &[Char]) -> Vec<TextBlock> {
        let lines = self.extract_lines(chars);
        if !self.config.detect_flow {
            return lines
                .into_iter()
                .map(|line| TextBlock {
                    bbox: line.bbox,
                    lines: vec![line],
                })
                .collect();
        }
        let blocks = flow::group_blocks(lines, &self.config);
        log::debug!("layout: grouped into {} flow blocks", blocks.len());
        blocks
    }

    /// Extract plain text.
    ///
    /// Blocks are separated by blank lines when flow detection is on;
    /// otherwise lines are joined with single newlines.
    pub fn extract_text(&self, chars: &[Char]) -> String {
        if self.config.detect_flow {
            self.extract_blocks(chars)
                .iter()
                .map(TextBlock::text)
                .collect::<Vec<_>>()
                .join("\n\n")
        } else {
            self.extract_lines(chars)
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
