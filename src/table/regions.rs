//! Region segmentation: grouping intersections into table candidates.
//!
//! Intersections are bucketed into snapped rows and columns; consecutive
//! points within a row or column are connected when an edge actually
//! covers the span between them. Connected components are extracted with
//! union-find, and components too small to bound a single cell are
//! discarded. Connecting only consecutive bucket neighbors keeps the pass
//! near-linear in the number of intersections instead of quadratic over
//! all pairs.

use crate::table::config::ResolvedTolerances;
use crate::table::edges::{span_covered, Edge};
use crate::table::intersections::{snap_coord, Intersection};

/// A single table needs at least a 2×2 corner set.
const MIN_REGION_POINTS: usize = 4;

/// Union-find over intersection indices, with path halving.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Bucket intersection indices by one snapped coordinate, each bucket
/// sorted by the other coordinate.
fn bucket_by<K, S>(points: &[Intersection], key: K, sort: S, tolerance: f32) -> Vec<Vec<usize>>
where
    K: Fn(&Intersection) -> f32,
    S: Fn(&Intersection) -> f32,
{
    let mut buckets: Vec<(i64, Vec<usize>)> = Vec::new();
    for (i, p) in points.iter().enumerate() {
        let snapped = snap_coord(key(p), tolerance);
        let k = if tolerance <= f32::EPSILON {
            snapped.to_bits() as i64
        } else {
            (snapped / tolerance).round() as i64
        };
        match buckets.iter_mut().find(|(bk, _)| *bk == k) {
            Some((_, members)) => members.push(i),
            None => buckets.push((k, vec![i])),
        }
    }
    let mut out: Vec<Vec<usize>> = buckets.into_iter().map(|(_, m)| m).collect();
    for bucket in &mut out {
        bucket.sort_by(|&a, &b| sort(&points[a]).total_cmp(&sort(&points[b])));
    }
    out
}

/// Split intersections into connected regions, each a plausible table.
///
/// Two consecutive points in a row connect when a horizontal edge covers
/// the span between them; column neighbors need a covering vertical edge.
/// Components with fewer than four points cannot bound a cell and are
/// dropped.
pub(crate) fn segment_regions(
    points: &[Intersection],
    verticals: &[Edge],
    horizontals: &[Edge],
    tol: &ResolvedTolerances,
) -> Vec<Vec<Intersection>> {
    if points.len() < MIN_REGION_POINTS {
        return vec![];
    }
    let mut uf = UnionFind::new(points.len());

    // Row neighbors, connected along horizontal edges.
    for row in bucket_by(points, |p| p.point.y, |p| p.point.x, tol.intersection_y) {
        for pair in row.windows(2) {
            let a = &points[pair[0]];
            let b = &points[pair[1]];
            let y = (a.point.y + b.point.y) / 2.0;
            if span_covered(horizontals, y, a.point.x, b.point.x, tol.intersection_y) {
                uf.union(pair[0], pair[1]);
            }
        }
    }

    // Column neighbors, connected along vertical edges.
    for col in bucket_by(points, |p| p.point.x, |p| p.point.y, tol.intersection_x) {
        for pair in col.windows(2) {
            let a = &points[pair[0]];
            let b = &points[pair[1]];
            let x = (a.point.x + b.point.x) / 2.0;
            if span_covered(verticals, x, a.point.y, b.point.y, tol.intersection_x) {
                uf.union(pair[0], pair[1]);
            }
        }
    }

    let mut components: Vec<(usize, Vec<Intersection>)> = Vec::new();
    for i in 0..points.len() {
        let root = uf.find(i);
        match components.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(points[i]),
            None => components.push((root, vec![points[i]])),
        }
    }

    let regions: Vec<Vec<Intersection>> = components
        .into_iter()
        .map(|(_, members)| members)
        .filter(|members| members.len() >= MIN_REGION_POINTS)
        .collect();
    log::debug!(
        "regions: {} intersections -> {} regions",
        points.len(),
        regions.len()
    );
    regions
}
