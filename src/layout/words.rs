//! Character sorting, line partitioning, and word splitting.
//!
//! Coordinates follow the top-left-origin convention used throughout the
//! crate: y increases downward, so reading order is ascending y, then
//! ascending x within a line.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, HasBBox};
use crate::layout::config::LayoutConfig;
use crate::primitives::Char;

/// Horizontal writing direction of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Left-to-right script.
    Ltr,
    /// Right-to-left script (Hebrew, Arabic).
    Rtl,
}

/// A word derived from spatially grouped characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Concatenated character text.
    pub text: String,
    /// Minimal bounding rectangle of the member characters.
    pub bbox: BBox,
    /// Member characters in reading order.
    pub chars: Vec<Char>,
    /// Writing direction, inferred from the first strong character.
    pub direction: Direction,
}

impl HasBBox for Word {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// A line of text derived from vertically overlapping characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Line text: word texts joined with single spaces.
    pub text: String,
    /// Minimal bounding rectangle of the member characters.
    pub bbox: BBox,
    /// All member characters in reading order (blanks included).
    pub chars: Vec<Char>,
    /// Words split out of this line (blanks excluded).
    pub words: Vec<Word>,
}

impl HasBBox for TextLine {
    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// Vertical overlap of two boxes as a fraction of the smaller height.
///
/// Returns 1.0 when the smaller height is degenerate but the spans touch,
/// 0.0 when they are disjoint.
fn vertical_overlap_ratio(a: &BBox, b: &BBox) -> f32 {
    let a = a.normalize();
    let b = b.normalize();
    let overlap = a.y1.min(b.y1) - a.y0.max(b.y0);
    let smaller = a.height().min(b.height());
    if smaller > 0.0 {
        overlap / smaller
    } else if overlap >= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Reading-order comparator for characters.
///
/// Characters whose vertical overlap ratio reaches `line_overlap` are
/// treated as same-line and ordered by left edge; otherwise the higher
/// character (smaller top) comes first.
///
/// This relation is **not globally transitive**: three characters can
/// pairwise straddle the overlap threshold with no consistent total order.
/// We resolve the ambiguity with a single stable sort pass, so borderline
/// ties between adjacent lines fall back to input order. Adversarial
/// inputs have no uniquely correct grouping; this is the documented
/// tie-break, not a defect.
pub fn compare_reading_order(a: &Char, b: &Char, line_overlap: f32) -> Ordering {
    if vertical_overlap_ratio(&a.bbox, &b.bbox) >= line_overlap {
        a.bbox.normalize().x0.total_cmp(&b.bbox.normalize().x0)
    } else {
        a.bbox.normalize().y0.total_cmp(&b.bbox.normalize().y0)
    }
}

/// Sort characters into reading order (stable single pass).
pub fn sort_chars(chars: &[Char], line_overlap: f32) -> Vec<Char> {
    let mut sorted = chars.to_vec();
    sorted.sort_by(|a, b| compare_reading_order(a, b, line_overlap));
    sorted
}

/// Partition reading-ordered characters into lines.
///
/// Scans in sorted order; a character merges into the running line when its
/// vertical span overlaps the line's accumulated span by at least
/// `line_overlap` of the smaller of the two heights, otherwise it starts a
/// new line.
pub fn partition_lines(sorted: &[Char], config: &LayoutConfig) -> Vec<Vec<Char>> {
    let mut lines: Vec<Vec<Char>> = Vec::new();
    let mut current: Vec<Char> = Vec::new();
    let mut span: Option<BBox> = None;

    for ch in sorted {
        let joined = match &span {
            Some(s) => vertical_overlap_ratio(s, &ch.bbox) >= config.line_overlap,
            None => true,
        };
        if !joined {
            lines.push(std::mem::take(&mut current));
            span = None;
        }
        span = Some(match span {
            Some(s) => s.union(&ch.bbox),
            None => ch.bbox.normalize(),
        });
        current.push(ch.clone());
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// First-strong-character direction detection.
fn detect_direction(chars: &[Char]) -> Direction {
    for ch in chars {
        for c in ch.text.chars() {
            let cp = c as u32;
            // Hebrew, Arabic, Arabic supplement/extended, presentation forms.
            if (0x0590..=0x08FF).contains(&cp)
                || (0xFB1D..=0xFDFF).contains(&cp)
                || (0xFE70..=0xFEFF).contains(&cp)
            {
                return Direction::Rtl;
            }
            if c.is_alphabetic() {
                return Direction::Ltr;
            }
        }
    }
    Direction::Ltr
}

fn is_punctuation(ch: &Char) -> bool {
    ch.text
        .chars()
        .all(|c| c.is_ascii_punctuation() || matches!(c, '\u{2013}' | '\u{2014}' | '\u{2019}'))
}

fn build_word(chars: Vec<Char>) -> Word {
    let text: String = chars.iter().map(|c| c.text.as_str()).collect();
    let bbox = chars
        .iter()
        .skip(1)
        .fold(chars[0].bbox.normalize(), |acc, c| acc.union(&c.bbox));
    let direction = detect_direction(&chars);
    Word {
        text,
        bbox,
        chars,
        direction,
    }
}

/// Split one line's characters into words.
///
/// Blank glyphs are never word members. Break conditions between adjacent
/// non-blank characters:
/// - the horizontal gap exceeds `char_margin` × the average width of the
///   two characters;
/// - a literal space lies between them and the gap across it (previous
///   glyph's right edge to the next glyph's left edge) exceeds
///   `word_margin` × that width, so zero-gap artifact spaces do not break;
/// - optionally, the punctuation class changes (`split_punctuation`).
pub fn split_words(line_chars: &[Char], config: &LayoutConfig) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Vec<Char> = Vec::new();
    let mut prev_glyph: Option<&Char> = None;
    let mut blank_between = false;

    for ch in line_chars {
        if ch.is_blank() {
            blank_between = true;
            continue;
        }

        if let Some(p) = prev_glyph {
            let gap = ch.bbox.normalize().x0 - p.bbox.normalize().x1;
            let avg_width = (p.width() + ch.width()) / 2.0;
            let margin = if blank_between {
                config.word_margin
            } else {
                config.char_margin
            };
            let class_break =
                config.split_punctuation && is_punctuation(p) != is_punctuation(ch);
            if (gap > margin * avg_width || class_break) && !current.is_empty() {
                words.push(build_word(std::mem::take(&mut current)));
            }
        }
        current.push(ch.clone());
        prev_glyph = Some(ch);
        blank_between = false;
    }
    if !current.is_empty() {
        words.push(build_word(current));
    }
    words
}

/// Assemble a [`TextLine`] from one partition of characters.
///
/// An empty partition yields an empty line with a degenerate box.
pub fn build_line(chars: Vec<Char>, config: &LayoutConfig) -> TextLine {
    if chars.is_empty() {
        return TextLine {
            text: String::new(),
            bbox: BBox::new(0.0, 0.0, 0.0, 0.0),
            chars,
            words: Vec::new(),
        };
    }
    let words = split_words(&chars, config);
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let bbox = chars
        .iter()
        .skip(1)
        .fold(chars[0].bbox.normalize(), |acc, c| acc.union(&c.bbox));
    TextLine {
        text,
        bbox,
        chars,
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;

    fn mock_char(text: &str, x: f32, y: f32) -> Char {
        Char::new(text, BBox::new(x, y, x + 8.0, y + 12.0), "Times", 12.0, 0)
    }

    fn mock_run(text: &str, x: f32, y: f32) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| mock_char(&c.to_string(), x + i as f32 * 8.0, y))
            .collect()
    }

    #[test]
    fn test_sort_reading_order() {
        let mut chars = mock_run("ab", 0.0, 30.0);
        chars.extend(mock_run("cd", 0.0, 0.0));
        let sorted = sort_chars(&chars, 0.5);
        let text: String = sorted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(text, "cdab");
    }

    #[test]
    fn test_partition_two_lines() {
        let mut chars = mock_run("top", 0.0, 0.0);
        chars.extend(mock_run("low", 0.0, 30.0));
        let sorted = sort_chars(&chars, 0.5);
        let lines = partition_lines(&sorted, &LayoutConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 3);
        assert_eq!(lines[1].len(), 3);
    }

    #[test]
    fn test_partition_merges_slight_offset() {
        // Second run shifted 2 units down: >50% overlap, same line.
        let mut chars = mock_run("ab", 0.0, 0.0);
        chars.extend(mock_run("cd", 20.0, 2.0));
        let sorted = sort_chars(&chars, 0.5);
        let lines = partition_lines(&sorted, &LayoutConfig::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_split_words_on_gap() {
        // "Hello" contiguous, gap > char_margin * avg width, then "World".
        let mut chars = mock_run("Hello", 0.0, 0.0);
        chars.extend(mock_run("World", 100.0, 0.0)); // gap 60 > 2.0 * 8.0
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Hello");
        assert_eq!(words[1].text, "World");
    }

    #[test]
    fn test_split_words_on_literal_space() {
        let mut chars = mock_run("a", 0.0, 0.0);
        chars.push(mock_char(" ", 8.0, 0.0));
        chars.extend(mock_run("b", 16.0, 0.0));
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "a");
        assert_eq!(words[1].text, "b");
    }

    #[test]
    fn test_word_margin_gates_space_breaks() {
        // "ab", a space, then "cd" with a 4-unit gap across the blank.
        let mut chars = mock_run("ab", 0.0, 0.0);
        chars.push(mock_char(" ", 16.0, 0.0));
        chars.extend(mock_run("cd", 20.0, 0.0));

        let tight = LayoutConfig {
            word_margin: 0.1, // 4 > 0.1 * 8
            ..Default::default()
        };
        let words = split_words(&chars, &tight);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "ab");
        assert_eq!(words[1].text, "cd");

        let loose = LayoutConfig {
            word_margin: 1.0, // 4 <= 1.0 * 8
            ..Default::default()
        };
        let words = split_words(&chars, &loose);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "abcd");
    }

    #[test]
    fn test_artifact_space_with_no_gap_keeps_word() {
        // An artifact space overlapping two touching glyphs.
        let mut chars = mock_run("a", 0.0, 0.0);
        chars.push(mock_char(" ", 8.0, 0.0));
        chars.extend(mock_run("b", 8.0, 0.0)); // touches a's right edge
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "ab");
        assert!(!words[0].text.contains(' '));
    }

    #[test]
    fn test_word_bbox_is_minimal_bounding_rect() {
        let chars = mock_run("abc", 10.0, 5.0);
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].bbox, BBox::new(10.0, 5.0, 34.0, 17.0));
    }

    #[test]
    fn test_rtl_direction() {
        let chars = vec![mock_char("\u{05D0}", 0.0, 0.0)]; // aleph
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words[0].direction, Direction::Rtl);

        let chars = vec![mock_char("a", 0.0, 0.0)];
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words[0].direction, Direction::Ltr);
    }

    #[test]
    fn test_punctuation_split_optional() {
        let chars = mock_run("a,b", 0.0, 0.0);
        let words = split_words(&chars, &LayoutConfig::default());
        assert_eq!(words.len(), 1);

        let config = LayoutConfig {
            split_punctuation: true,
            ..Default::default()
        };
        let words = split_words(&chars, &config);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_empty_input_total() {
        assert!(sort_chars(&[], 0.5).is_empty());
        assert!(partition_lines(&[], &LayoutConfig::default()).is_empty());
        assert!(split_words(&[], &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_line_text_joins_words() {
        let mut chars = mock_run("Hi", 0.0, 0.0);
        chars.extend(mock_run("there", 100.0, 0.0));
        let line = build_line(chars, &LayoutConfig::default());
        assert_eq!(line.text, "Hi there");
        assert_eq!(line.words.len(), 2);
        assert_eq!(line.chars.len(), 7);
    }
}
