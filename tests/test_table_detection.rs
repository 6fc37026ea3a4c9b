//! Integration tests for the table detection engine.

use layout_oxide::geometry::BBox;
use layout_oxide::primitives::{Char, LineSegment, RectShape};
use layout_oxide::table::{DetectionMethod, Strategy, TableConfig, TableFinder};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mock_word(text: &str, x: f32, y: f32) -> Vec<Char> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            Char::new(
                c.to_string(),
                BBox::new(x + i as f32 * 8.0, y, x + (i + 1) as f32 * 8.0, y + 12.0),
                "Helvetica",
                12.0,
                0,
            )
        })
        .collect()
}

/// Full-span ruling segments for a grid with the given boundaries.
fn mock_grid_segments(xs: &[f32], ys: &[f32]) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    for &x in xs {
        segments.push(LineSegment::new(x, ys[0], x, ys[ys.len() - 1]));
    }
    for &y in ys {
        segments.push(LineSegment::new(xs[0], y, xs[xs.len() - 1], y));
    }
    segments
}

#[test]
fn test_ruled_three_by_three() {
    init_logs();
    // 4 vertical + 4 horizontal full-span segments bound a 3x3 grid.
    let xs = [0.0, 60.0, 120.0, 180.0];
    let ys = [0.0, 30.0, 60.0, 90.0];
    let segments = mock_grid_segments(&xs, &ys);

    // A word in every cell.
    let mut chars = Vec::new();
    for (ri, y) in ys[..3].iter().enumerate() {
        for (ci, x) in xs[..3].iter().enumerate() {
            chars.extend(mock_word(&format!("c{ri}{ci}"), x + 6.0, y + 9.0));
        }
    }

    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&chars, &segments, &[], 0);

    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.intersections.len(), 16);

    let table = &result.tables[0];
    assert_eq!(table.n_rows, 3);
    assert_eq!(table.n_cols, 3);
    assert_eq!(table.cells.len(), 9);
    assert_eq!(table.method, DetectionMethod::Lines);
    assert!(table.confidence > 0.8, "confidence {}", table.confidence);

    assert_eq!(table.grid[0][0].as_deref(), Some("c00"));
    assert_eq!(table.grid[2][2].as_deref(), Some("c22"));
}

#[test]
fn test_bare_ruled_three_by_three() {
    // The same ruled grid with no characters at all still scores high:
    // emptiness is only held against a table when the page has text.
    let xs = [0.0, 100.0, 200.0, 300.0];
    let ys = [0.0, 100.0, 200.0, 300.0];
    let segments = mock_grid_segments(&xs, &ys);

    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &segments, &[], 0);

    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.intersections.len(), 16);
    let table = &result.tables[0];
    assert_eq!(table.n_rows, 3);
    assert_eq!(table.n_cols, 3);
    assert!(table.confidence > 0.8, "confidence {}", table.confidence);
}

#[test]
fn test_parallel_lines_are_not_a_table() {
    let segments = vec![
        LineSegment::new(0.0, 10.0, 200.0, 10.0),
        LineSegment::new(0.0, 50.0, 200.0, 50.0),
    ];
    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &segments, &[], 0);
    assert!(result.tables.is_empty());
}

#[test]
fn test_empty_page_is_empty_result() {
    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &[], &[], 0);
    assert!(result.tables.is_empty());
    assert!(result.edges.is_empty());
    assert!(result.intersections.is_empty());
}

#[test]
fn test_rect_outline_works_like_segments() {
    // A stroked rectangle plus one interior cross of segments: 2x2 grid.
    let rect = RectShape::stroked(BBox::new(0.0, 0.0, 120.0, 60.0));
    let segments = vec![
        LineSegment::new(60.0, 0.0, 60.0, 60.0),
        LineSegment::new(0.0, 30.0, 120.0, 30.0),
    ];
    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &segments, &[rect], 0);
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].n_rows, 2);
    assert_eq!(result.tables[0].n_cols, 2);
}

#[test]
fn test_dashed_borders_join() {
    // The top border is drawn as three dashes; joining bridges the gaps.
    let mut segments = mock_grid_segments(&[0.0, 60.0, 120.0], &[0.0, 30.0, 60.0]);
    segments.retain(|s| !(s.p0.y == 0.0 && s.p1.y == 0.0));
    segments.push(LineSegment::new(0.0, 0.0, 40.0, 0.0));
    segments.push(LineSegment::new(42.0, 0.0, 80.0, 0.0));
    segments.push(LineSegment::new(82.0, 0.0, 120.0, 0.0));

    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &segments, &[], 0);
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].n_rows, 2);
    assert_eq!(result.tables[0].n_cols, 2);
}

#[test]
fn test_explicit_strategy() {
    // No graphics at all: the caller supplies the grid coordinates, and
    // characters provide the content extent.
    let mut chars = Vec::new();
    chars.extend(mock_word("a", 10.0, 10.0));
    chars.extend(mock_word("b", 110.0, 10.0));
    chars.extend(mock_word("c", 10.0, 50.0));
    chars.extend(mock_word("d", 110.0, 50.0));

    let config = TableConfig {
        vertical_strategy: Strategy::Explicit,
        horizontal_strategy: Strategy::Explicit,
        explicit_vertical_lines: vec![0.0, 100.0, 200.0],
        explicit_horizontal_lines: vec![0.0, 40.0, 80.0],
        ..Default::default()
    };
    let finder = TableFinder::new(config);
    let result = finder.find_tables(&chars, &[], &[], 0);

    assert_eq!(result.tables.len(), 1);
    let table = &result.tables[0];
    assert_eq!(table.method, DetectionMethod::Explicit);
    assert_eq!(table.n_rows, 2);
    assert_eq!(table.n_cols, 2);
    assert_eq!(table.grid[0][0].as_deref(), Some("a"));
    assert_eq!(table.grid[0][1].as_deref(), Some("b"));
    assert_eq!(table.grid[1][0].as_deref(), Some("c"));
    assert_eq!(table.grid[1][1].as_deref(), Some("d"));
}

#[test]
fn test_explicit_with_empty_coordinates_finds_nothing() {
    let chars = mock_word("abc", 10.0, 10.0);
    let config = TableConfig {
        vertical_strategy: Strategy::Explicit,
        horizontal_strategy: Strategy::Explicit,
        ..Default::default()
    };
    let finder = TableFinder::new(config);
    // The fallback also rejects a single short word.
    assert!(finder.find_tables(&chars, &[], &[], 0).tables.is_empty());
}

#[test]
fn test_text_strategy_two_columns() {
    // Two left-aligned text columns over four rows, no graphics.
    let mut chars = Vec::new();
    let rows = ["alpha", "beta", "gamma", "delta"];
    let right = ["one", "two", "three", "four"];
    for (i, (a, b)) in rows.iter().zip(right.iter()).enumerate() {
        let y = i as f32 * 25.0;
        chars.extend(mock_word(a, 0.0, y));
        chars.extend(mock_word(b, 140.0, y));
    }

    let config = TableConfig {
        vertical_strategy: Strategy::Text,
        horizontal_strategy: Strategy::Text,
        ..Default::default()
    };
    let finder = TableFinder::new(config);
    let result = finder.find_tables(&chars, &[], &[], 0);

    assert!(!result.tables.is_empty());
    let table = &result.tables[0];
    assert_eq!(table.method, DetectionMethod::Text);
    assert_eq!(table.n_cols, 2, "boundaries {:?}", result.edges);
    assert_eq!(table.n_rows, 4);
    assert_eq!(table.grid[0][0].as_deref(), Some("alpha"));
    assert_eq!(table.grid[3][1].as_deref(), Some("four"));
}

#[test]
fn test_lines_strict_ignores_fill_shading() {
    // Filled (unstroked) rectangles are shading, not borders.
    let rects = vec![
        RectShape::filled(BBox::new(0.0, 0.0, 120.0, 30.0)),
        RectShape::filled(BBox::new(0.0, 30.0, 120.0, 60.0)),
    ];
    let strict = TableFinder::new(TableConfig {
        vertical_strategy: Strategy::LinesStrict,
        horizontal_strategy: Strategy::LinesStrict,
        ..Default::default()
    });
    assert!(strict.find_tables(&[], &[], &rects, 0).tables.is_empty());

    let loose = TableFinder::new(TableConfig::default());
    assert_eq!(loose.find_tables(&[], &[], &rects, 0).tables.len(), 1);
}

#[test]
fn test_merged_header_cell() {
    // Full outer border, interior vertical only in the bottom row band:
    // the top row is one merged cell spanning both columns.
    let segments = vec![
        LineSegment::new(0.0, 0.0, 120.0, 0.0),
        LineSegment::new(0.0, 30.0, 120.0, 30.0),
        LineSegment::new(0.0, 60.0, 120.0, 60.0),
        LineSegment::new(0.0, 0.0, 0.0, 60.0),
        LineSegment::new(120.0, 0.0, 120.0, 60.0),
        LineSegment::new(60.0, 30.0, 60.0, 60.0),
    ];
    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &segments, &[], 0);
    assert_eq!(result.tables.len(), 1);

    let table = &result.tables[0];
    let header = table.cells.iter().find(|c| c.row == 0).unwrap();
    assert_eq!(header.col_span, 2);
    assert_eq!(table.cells.iter().filter(|c| c.row == 1).count(), 2);
    // The position covered by the merged header has no cell of its own.
    assert!(table.grid[0][1].is_none());
}

#[test]
fn test_two_tables_on_one_page() {
    let mut segments = mock_grid_segments(&[0.0, 50.0, 100.0], &[0.0, 30.0, 60.0]);
    segments.extend(mock_grid_segments(&[0.0, 50.0, 100.0], &[300.0, 330.0, 360.0]));

    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&[], &segments, &[], 0);
    assert_eq!(result.tables.len(), 2);
    assert!(result.tables[0].bbox.y1 <= result.tables[1].bbox.y0);
}

#[test]
fn test_projection_fallback_borderless() {
    init_logs();
    // A borderless 3x2 layout of words with wide gutters. No edges exist,
    // so the projection fallback has to find it, at reduced confidence.
    let mut chars = Vec::new();
    for row in 0..3 {
        let y = row as f32 * 40.0;
        chars.extend(mock_word("aaaa", 0.0, y));
        chars.extend(mock_word("bbbb", 150.0, y));
    }
    // Keep the text strategies off so the edge pipeline really is empty.
    let finder = TableFinder::new(TableConfig::default());
    let result = finder.find_tables(&chars, &[], &[], 0);

    assert_eq!(result.tables.len(), 1);
    let table = &result.tables[0];
    assert_eq!(table.method, DetectionMethod::Projection);
    assert_eq!(table.n_rows, 3);
    assert_eq!(table.n_cols, 2);
    assert!(table.confidence <= 0.85);
}

#[test]
fn test_nested_table_detection() {
    // Outer 1x2 table; the right cell contains a small 2x2 table.
    let mut segments = mock_grid_segments(&[0.0, 200.0, 400.0], &[0.0, 200.0]);
    segments.extend(mock_grid_segments(&[220.0, 260.0, 300.0], &[20.0, 50.0, 80.0]));

    let nested_on = TableFinder::new(TableConfig {
        detect_nested: true,
        max_nested_depth: 1,
        ..Default::default()
    });
    let result = nested_on.find_tables(&[], &segments, &[], 0);

    let outer = result
        .tables
        .iter()
        .find(|t| t.bbox.width() > 300.0)
        .expect("outer table");
    assert_eq!(outer.nested.len(), 1);
    assert_eq!(outer.nested[0].n_rows, 2);
    assert_eq!(outer.nested[0].n_cols, 2);
    assert_eq!(outer.nested[0].parent_cell, Some((0, 1)));
    assert_eq!(outer.parent_cell, None);

    let nested_off = TableFinder::new(TableConfig::default());
    let result = nested_off.find_tables(&[], &segments, &[], 0);
    assert!(result.tables.iter().all(|t| t.nested.is_empty()));
}

#[test]
fn test_validation_errors() {
    let bad = TableConfig {
        snap_tolerance: Some(-1.0),
        ..Default::default()
    };
    assert!(TableFinder::try_new(bad).is_err());

    let bad = TableConfig {
        min_words_vertical: 0,
        ..Default::default()
    };
    assert!(TableFinder::try_new(bad).is_err());
}
