//! Segment classification, grouping, and intersection tests.
//!
//! These utilities operate on the graphical [`LineSegment`] and
//! [`RectShape`] primitives and feed the table detection engine: axis
//! classification with tolerance, coordinate grouping with first-match
//! bucket semantics, rectangle decomposition into boundary segments, and a
//! true finite-segment intersection test.

use crate::geometry::Point;
use crate::primitives::{LineSegment, RectShape};

/// Default tolerance for axis classification and coordinate grouping.
pub const DEFAULT_TOLERANCE: f32 = 3.0;

/// Whether the segment is horizontal: its y-delta is within `tolerance`.
///
/// # Examples
///
/// ```
/// use layout_oxide::primitives::LineSegment;
/// use layout_oxide::geometry::segments::is_horizontal;
///
/// assert!(is_horizontal(&LineSegment::new(0.0, 10.0, 100.0, 11.5), 3.0));
/// assert!(!is_horizontal(&LineSegment::new(0.0, 10.0, 100.0, 50.0), 3.0));
/// ```
pub fn is_horizontal(segment: &LineSegment, tolerance: f32) -> bool {
    (segment.p1.y - segment.p0.y).abs() <= tolerance
}

/// Whether the segment is vertical: its x-delta is within `tolerance`.
pub fn is_vertical(segment: &LineSegment, tolerance: f32) -> bool {
    (segment.p1.x - segment.p0.x).abs() <= tolerance
}

/// Filter to the horizontal segments. Empty-safe.
pub fn horizontal_lines(segments: &[LineSegment], tolerance: f32) -> Vec<LineSegment> {
    segments
        .iter()
        .filter(|s| is_horizontal(s, tolerance))
        .copied()
        .collect()
}

/// Filter to the vertical segments. Empty-safe.
pub fn vertical_lines(segments: &[LineSegment], tolerance: f32) -> Vec<LineSegment> {
    segments
        .iter()
        .filter(|s| is_vertical(s, tolerance))
        .copied()
        .collect()
}

/// Representative coordinate of a horizontal segment: its mean y.
fn h_key(segment: &LineSegment) -> f32 {
    (segment.p0.y + segment.p1.y) / 2.0
}

/// Representative coordinate of a vertical segment: its mean x.
fn v_key(segment: &LineSegment) -> f32 {
    (segment.p0.x + segment.p1.x) / 2.0
}

/// Group segments by a shared coordinate using first-match semantics.
///
/// A new item joins the **first** existing bucket whose key lies within
/// `tolerance`, otherwise it opens a new bucket keyed by its own value.
/// This is a deliberate approximation: under slowly drifting coordinates a
/// run of segments can fragment into several buckets. Do not replace it
/// with nearest-bucket matching; that silently changes output on
/// ambiguous inputs. Callers wanting drift tolerance should use
/// [`cluster_by_mean`](crate::geometry::clustering::cluster_by_mean).
fn group_by_key(
    segments: &[LineSegment],
    key: fn(&LineSegment) -> f32,
    tolerance: f32,
) -> Vec<(f32, Vec<LineSegment>)> {
    let mut buckets: Vec<(f32, Vec<LineSegment>)> = Vec::new();
    for segment in segments {
        let k = key(segment);
        match buckets.iter_mut().find(|(bk, _)| (k - *bk).abs() <= tolerance) {
            Some((_, members)) => members.push(*segment),
            None => buckets.push((k, vec![*segment])),
        }
    }
    buckets
}

/// Group horizontal segments by shared y-coordinate (first-match buckets).
///
/// Returns `(representative_y, members)` pairs in first-seen order.
pub fn group_horizontal_lines(
    segments: &[LineSegment],
    tolerance: f32,
) -> Vec<(f32, Vec<LineSegment>)> {
    group_by_key(segments, h_key, tolerance)
}

/// Group vertical segments by shared x-coordinate (first-match buckets).
pub fn group_vertical_lines(
    segments: &[LineSegment],
    tolerance: f32,
) -> Vec<(f32, Vec<LineSegment>)> {
    group_by_key(segments, v_key, tolerance)
}

/// Unique x-positions of the vertical segments: bucket representatives,
/// sorted ascending.
pub fn unique_x_positions(segments: &[LineSegment], tolerance: f32) -> Vec<f32> {
    let mut xs: Vec<f32> = group_vertical_lines(&vertical_lines(segments, tolerance), tolerance)
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    xs
}

/// Unique y-positions of the horizontal segments: bucket representatives,
/// sorted ascending.
pub fn unique_y_positions(segments: &[LineSegment], tolerance: f32) -> Vec<f32> {
    let mut ys: Vec<f32> = group_horizontal_lines(&horizontal_lines(segments, tolerance), tolerance)
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    ys
}

/// Decompose painted rectangles into their four boundary segments.
///
/// Only rectangles that were stroked or filled contribute segments; a
/// rectangle that was constructed but never painted is invisible and yields
/// nothing.
pub fn rects_to_lines(rects: &[RectShape]) -> Vec<LineSegment> {
    let mut lines = Vec::with_capacity(rects.len() * 4);
    for rect in rects {
        if !rect.stroked && !rect.filled {
            continue;
        }
        let b = rect.bbox.normalize();
        lines.push(LineSegment::new(b.x0, b.y0, b.x1, b.y0)); // top
        lines.push(LineSegment::new(b.x0, b.y1, b.x1, b.y1)); // bottom
        lines.push(LineSegment::new(b.x0, b.y0, b.x0, b.y1)); // left
        lines.push(LineSegment::new(b.x1, b.y0, b.x1, b.y1)); // right
    }
    lines
}

/// Euclidean length of a segment.
///
/// # Examples
///
/// ```
/// use layout_oxide::primitives::LineSegment;
/// use layout_oxide::geometry::segments::length;
///
/// assert_eq!(length(&LineSegment::new(0.0, 0.0, 3.0, 4.0)), 5.0);
/// ```
pub fn length(segment: &LineSegment) -> f32 {
    let dx = segment.p1.x - segment.p0.x;
    let dy = segment.p1.y - segment.p0.y;
    (dx * dx + dy * dy).sqrt()
}

/// Orientation of the ordered triple (p, q, r).
///
/// Returns 0 for collinear, 1 for clockwise, 2 for counter-clockwise.
fn orientation(p: Point, q: Point, r: Point) -> u8 {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val.abs() < f32::EPSILON {
        0
    } else if val > 0.0 {
        1
    } else {
        2
    }
}

/// Whether `q` lies on segment (p, r), assuming the three are collinear.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// True finite-segment intersection test.
///
/// This tests the actual segments, not the infinite lines through them.
/// Touching at an endpoint and collinear overlap both count as
/// intersecting.
///
/// # Examples
///
/// ```
/// use layout_oxide::primitives::LineSegment;
/// use layout_oxide::geometry::segments::segments_intersect;
///
/// let a = LineSegment::new(0.0, 0.0, 10.0, 10.0);
/// let b = LineSegment::new(0.0, 10.0, 10.0, 0.0);
/// assert!(segments_intersect(&a, &b));
///
/// // Same infinite line, disjoint spans.
/// let c = LineSegment::new(20.0, 20.0, 30.0, 30.0);
/// assert!(!segments_intersect(&a, &c));
/// ```
pub fn segments_intersect(a: &LineSegment, b: &LineSegment) -> bool {
    let (p1, q1) = (a.p0, a.p1);
    let (p2, q2) = (b.p0, b.p1);

    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases: an endpoint of one segment lies on the other.
    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}
