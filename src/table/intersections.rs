//! Intersection detection between joined vertical and horizontal edges.
//!
//! Every vertical/horizontal edge pair is tested for proximity within the
//! intersection tolerances; hits are snapped onto a tolerance grid and
//! de-duplicated so that near-coincident crossings collapse to one point.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::table::config::ResolvedTolerances;
use crate::table::edges::Edge;

/// A detected crossing of one vertical and one horizontal edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Snapped crossing point.
    pub point: Point,
    /// Index into the joined vertical edges.
    pub vertical: usize,
    /// Index into the joined horizontal edges.
    pub horizontal: usize,
}

/// Snap a coordinate onto the tolerance grid.
///
/// Coordinates within one tolerance of each other land on the same grid
/// value, which is what makes intersection de-duplication and later grid
/// assembly stable against sub-tolerance jitter.
pub(crate) fn snap_coord(value: f32, tolerance: f32) -> f32 {
    if tolerance <= f32::EPSILON {
        return value;
    }
    (value / tolerance).round() * tolerance
}

fn grid_key(point: Point, tol: &ResolvedTolerances) -> (i64, i64) {
    let kx = if tol.intersection_x <= f32::EPSILON {
        point.x.to_bits() as i64
    } else {
        (point.x / tol.intersection_x).round() as i64
    };
    let ky = if tol.intersection_y <= f32::EPSILON {
        point.y.to_bits() as i64
    } else {
        (point.y / tol.intersection_y).round() as i64
    };
    (kx, ky)
}

/// Find all crossings between the vertical and horizontal edge sets.
///
/// A pair intersects when the vertical edge's x lies within the horizontal
/// edge's x-span (extended by the x tolerance) and the horizontal edge's y
/// lies within the vertical edge's y-span (extended by the y tolerance).
/// Touching counts: a vertical edge ending exactly on a horizontal one
/// produces a corner intersection. O(V×H); edge counts after joining are
/// small.
pub(crate) fn find_intersections(
    verticals: &[Edge],
    horizontals: &[Edge],
    tol: &ResolvedTolerances,
) -> Vec<Intersection> {
    let mut found: Vec<Intersection> = Vec::new();
    let mut seen: Vec<(i64, i64)> = Vec::new();

    for (vi, v) in verticals.iter().enumerate() {
        let x = v.line_coord();
        let (vy0, vy1) = v.span();
        for (hi, h) in horizontals.iter().enumerate() {
            let y = h.line_coord();
            let (hx0, hx1) = h.span();
            if x < hx0 - tol.intersection_x || x > hx1 + tol.intersection_x {
                continue;
            }
            if y < vy0 - tol.intersection_y || y > vy1 + tol.intersection_y {
                continue;
            }
            let point = Point::new(
                snap_coord(x, tol.intersection_x),
                snap_coord(y, tol.intersection_y),
            );
            let key = grid_key(point, tol);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            found.push(Intersection {
                point,
                vertical: vi,
                horizontal: hi,
            });
        }
    }
    log::debug!(
        "intersections: {}x{} edges -> {} points",
        verticals.len(),
        horizontals.len(),
        found.len()
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::config::TableConfig;

    fn tol() -> ResolvedTolerances {
        TableConfig::default().resolve_tolerances(&[])
    }

    #[test]
    fn test_snap_coalesces_near_values() {
        assert_eq!(snap_coord(10.1, 3.0), snap_coord(9.2, 3.0));
        assert_ne!(snap_coord(10.0, 3.0), snap_coord(20.0, 3.0));
    }

    #[test]
    fn test_full_grid_intersections() {
        // 3 verticals x 3 horizontals fully crossing: 9 points.
        let verticals: Vec<Edge> = [0.0, 50.0, 100.0]
            .iter()
            .map(|&x| Edge::vertical(x, 0.0, 60.0))
            .collect();
        let horizontals: Vec<Edge> = [0.0, 30.0, 60.0]
            .iter()
            .map(|&y| Edge::horizontal(y, 0.0, 100.0))
            .collect();
        let found = find_intersections(&verticals, &horizontals, &tol());
        assert_eq!(found.len(), 9);
    }

    #[test]
    fn test_touch_counts_as_intersection() {
        // Vertical ends exactly on the horizontal line.
        let verticals = vec![Edge::vertical(50.0, 0.0, 30.0)];
        let horizontals = vec![Edge::horizontal(30.0, 0.0, 100.0)];
        assert_eq!(find_intersections(&verticals, &horizontals, &tol()).len(), 1);
    }

    #[test]
    fn test_disjoint_edges_do_not_intersect() {
        let verticals = vec![Edge::vertical(200.0, 0.0, 60.0)];
        let horizontals = vec![Edge::horizontal(30.0, 0.0, 100.0)];
        assert!(find_intersections(&verticals, &horizontals, &tol()).is_empty());
    }

    #[test]
    fn test_near_coincident_crossings_dedupe() {
        // Two verticals 1 unit apart with tolerance 3: one snapped point.
        let verticals = vec![
            Edge::vertical(50.0, 0.0, 60.0),
            Edge::vertical(51.0, 0.0, 60.0),
        ];
        let horizontals = vec![Edge::horizontal(30.0, 0.0, 100.0)];
        assert_eq!(find_intersections(&verticals, &horizontals, &tol()).len(), 1);
    }
}
