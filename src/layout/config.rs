//! Configuration for the text layout engine.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerances controlling character-to-word-to-line-to-block grouping.
///
/// All margins are ratios, scaled by local character/line metrics rather
/// than absolute units, so the defaults behave consistently across font
/// sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum fraction of the smaller character's height that must
    /// vertically overlap for two characters to share a line.
    pub line_overlap: f32,
    /// Maximum horizontal gap, as a multiple of the average adjacent
    /// character width, for two characters to stay in one word.
    pub char_margin: f32,
    /// Tighter gap threshold (same scaling) applied around literal space
    /// characters.
    pub word_margin: f32,
    /// Maximum vertical gap, as a multiple of the average line height, for
    /// a line to join a flow block.
    pub line_margin: f32,
    /// Flow-order blend in `[0, 1]`: 0 orders blocks purely by x, 1 purely
    /// by y. `None` selects pure visual order (top-to-bottom, then
    /// left-to-right).
    pub boxes_flow: Option<f32>,
    /// Also break words at punctuation-class boundaries.
    pub split_punctuation: bool,
    /// Reconstruct flow-ordered blocks. Disabling this is the fast path:
    /// lines are emitted in sort order at O(n log n) with no block
    /// absorption scan, trading flow fidelity for cost.
    pub detect_flow: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_overlap: 0.5,
            char_margin: 2.0,
            word_margin: 0.1,
            line_margin: 0.5,
            boxes_flow: Some(0.5),
            split_punctuation: false,
            detect_flow: true,
        }
    }
}

impl LayoutConfig {
    /// Validate the configuration.
    ///
    /// Margins must be non-negative; `line_overlap` and `boxes_flow` must
    /// lie within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("char_margin", self.char_margin),
            ("word_margin", self.word_margin),
            ("line_margin", self.line_margin),
        ] {
            if value < 0.0 {
                return Err(Error::InvalidTolerance { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.line_overlap) {
            return Err(Error::InvalidRatio {
                name: "line_overlap",
                value: self.line_overlap,
                min: 0.0,
                max: 1.0,
            });
        }
        if let Some(flow) = self.boxes_flow {
            if !(0.0..=1.0).contains(&flow) {
                return Err(Error::InvalidRatio {
                    name: "boxes_flow",
                    value: flow,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_margin() {
        let config = LayoutConfig {
            char_margin: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_boxes_flow() {
        let config = LayoutConfig {
            boxes_flow: Some(1.5),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LayoutConfig {
            boxes_flow: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
