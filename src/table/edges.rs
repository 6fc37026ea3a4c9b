//! Edge model and per-strategy edge collection.
//!
//! An edge is a detected axis-aligned segment that is a candidate table
//! border. Edges come from three sources depending on the configured
//! strategy: explicit caller-supplied coordinates, graphical segments and
//! painted rectangle sides, or text-derived heuristics over word
//! positions. Collected edges are length-filtered, then joined per
//! orientation to bridge broken and dashed borders.

use serde::{Deserialize, Serialize};

use crate::geometry::clustering::cluster_by_key;
use crate::geometry::segments::{is_horizontal, is_vertical, rects_to_lines};
use crate::geometry::{BBox, Point};
use crate::layout::Word;
use crate::primitives::{LineSegment, RectShape};
use crate::table::config::{ResolvedTolerances, Strategy};

/// Fraction of a span an edge must cover to count as a boundary between
/// two intersections. Tolerates broken and partially drawn lines.
pub const PARTIAL_OVERLAP_RATIO: f32 = 0.3;

/// Edge orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Constant-y edge (row separator).
    Horizontal,
    /// Constant-x edge (column separator).
    Vertical,
}

/// A detected axis-aligned border candidate.
///
/// Ephemeral: created and merged within one detection run, retained in the
/// result only for visual-debugging overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Span start endpoint.
    pub p0: Point,
    /// Span end endpoint.
    pub p1: Point,
    /// Orientation of the edge.
    pub orientation: Orientation,
}

impl Edge {
    /// Horizontal edge at `y` spanning `[x0, x1]`.
    pub fn horizontal(y: f32, x0: f32, x1: f32) -> Self {
        Self {
            p0: Point::new(x0.min(x1), y),
            p1: Point::new(x0.max(x1), y),
            orientation: Orientation::Horizontal,
        }
    }

    /// Vertical edge at `x` spanning `[y0, y1]`.
    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Self {
            p0: Point::new(x, y0.min(y1)),
            p1: Point::new(x, y0.max(y1)),
            orientation: Orientation::Vertical,
        }
    }

    /// The constant coordinate: y for horizontal edges, x for vertical.
    pub fn line_coord(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => (self.p0.y + self.p1.y) / 2.0,
            Orientation::Vertical => (self.p0.x + self.p1.x) / 2.0,
        }
    }

    /// The varying span as an ordered `(lo, hi)` pair.
    pub fn span(&self) -> (f32, f32) {
        match self.orientation {
            Orientation::Horizontal => (self.p0.x.min(self.p1.x), self.p0.x.max(self.p1.x)),
            Orientation::Vertical => (self.p0.y.min(self.p1.y), self.p0.y.max(self.p1.y)),
        }
    }

    /// Span length of the edge.
    pub fn length(&self) -> f32 {
        let (lo, hi) = self.span();
        hi - lo
    }
}

/// Does any edge near `line_coord` cover `[lo, hi]` fully or with at least
/// [`PARTIAL_OVERLAP_RATIO`] overlap?
///
/// A degenerate span degrades to a point-containment check.
pub(crate) fn span_covered(
    edges: &[Edge],
    line_coord: f32,
    lo: f32,
    hi: f32,
    line_tol: f32,
) -> bool {
    let span = hi - lo;
    for edge in edges {
        if (edge.line_coord() - line_coord).abs() > line_tol {
            continue;
        }
        let (elo, ehi) = edge.span();
        if span <= f32::EPSILON {
            let mid = (lo + hi) / 2.0;
            if elo - line_tol <= mid && mid <= ehi + line_tol {
                return true;
            }
            continue;
        }
        let overlap = ehi.min(hi) - elo.max(lo);
        if overlap >= PARTIAL_OVERLAP_RATIO * span {
            return true;
        }
    }
    false
}

/// Join collinear edges per orientation.
///
/// Edges sharing a line coordinate within `snap` are grouped; within each
/// group the spans are sorted and the running edge is extended whenever the
/// next span starts within `join` of its end. This bridges broken and
/// dashed borders into single logical edges.
pub fn join_edges(edges: &[Edge], snap: f32, join: f32) -> Vec<Edge> {
    if edges.is_empty() {
        return vec![];
    }
    let orientation = edges[0].orientation;
    let groups = cluster_by_key(edges, Edge::line_coord, snap);
    let mut joined = Vec::new();

    for group in groups {
        let coord =
            group.iter().map(Edge::line_coord).sum::<f32>() / group.len() as f32;
        let mut spans: Vec<(f32, f32)> = group.iter().map(Edge::span).collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (mut lo, mut hi) = spans[0];
        for &(next_lo, next_hi) in &spans[1..] {
            if next_lo <= hi + join {
                hi = hi.max(next_hi);
            } else {
                joined.push(make_edge(orientation, coord, lo, hi));
                lo = next_lo;
                hi = next_hi;
            }
        }
        joined.push(make_edge(orientation, coord, lo, hi));
    }
    joined
}

fn make_edge(orientation: Orientation, coord: f32, lo: f32, hi: f32) -> Edge {
    match orientation {
        Orientation::Horizontal => Edge::horizontal(coord, lo, hi),
        Orientation::Vertical => Edge::vertical(coord, lo, hi),
    }
}

/// Collect edges for one axis according to its strategy.
///
/// `content_bbox` is the union box of all supplied primitives; explicit
/// edges span it. An empty explicit coordinate list yields zero edges for
/// the axis, a documented pipeline outcome rather than an error.
#[allow(clippy::too_many_arguments)]
pub(crate) fn collect_edges(
    orientation: Orientation,
    strategy: Strategy,
    segments: &[LineSegment],
    rects: &[RectShape],
    explicit: &[f32],
    words: &[Word],
    tol: &ResolvedTolerances,
    min_distinct: usize,
    content_bbox: Option<BBox>,
) -> Vec<Edge> {
    let edges = match strategy {
        Strategy::Explicit => explicit_edges(orientation, explicit, content_bbox),
        Strategy::Lines => line_edges(orientation, segments, rects, tol, false),
        Strategy::LinesStrict => line_edges(orientation, segments, rects, tol, true),
        Strategy::Text => text_edges(orientation, words, tol, min_distinct),
    };
    let min_length = match orientation {
        Orientation::Horizontal => tol.min_length_x,
        Orientation::Vertical => tol.min_length_y,
    };
    let kept: Vec<Edge> = edges
        .into_iter()
        .filter(|e| e.length() >= min_length)
        .collect();
    log::debug!(
        "edges: {:?}/{:?} -> {} candidates",
        orientation,
        strategy,
        kept.len()
    );
    kept
}

fn explicit_edges(
    orientation: Orientation,
    coords: &[f32],
    content_bbox: Option<BBox>,
) -> Vec<Edge> {
    let Some(bbox) = content_bbox.map(|b| b.normalize()) else {
        return vec![];
    };
    coords
        .iter()
        .map(|&c| match orientation {
            Orientation::Horizontal => Edge::horizontal(c, bbox.x0, bbox.x1),
            Orientation::Vertical => Edge::vertical(c, bbox.y0, bbox.y1),
        })
        .collect()
}

fn line_edges(
    orientation: Orientation,
    segments: &[LineSegment],
    rects: &[RectShape],
    tol: &ResolvedTolerances,
    strict: bool,
) -> Vec<Edge> {
    let mut pool: Vec<LineSegment> = segments
        .iter()
        .filter(|s| !strict || s.stroked)
        .copied()
        .collect();
    let painted: Vec<RectShape> = rects
        .iter()
        .filter(|r| if strict { r.stroked } else { r.stroked || r.filled })
        .copied()
        .collect();
    pool.extend(rects_to_lines(&painted));

    pool.iter()
        .filter_map(|s| match orientation {
            Orientation::Horizontal if is_horizontal(s, tol.snap_y) => Some(Edge::horizontal(
                (s.p0.y + s.p1.y) / 2.0,
                s.p0.x.min(s.p1.x),
                s.p0.x.max(s.p1.x),
            )),
            Orientation::Vertical if is_vertical(s, tol.snap_x) => Some(Edge::vertical(
                (s.p0.x + s.p1.x) / 2.0,
                s.p0.y.min(s.p1.y),
                s.p0.y.max(s.p1.y),
            )),
            _ => None,
        })
        .collect()
}

/// A word projected onto one axis for text-edge derivation.
///
/// `lo`/`hi`/`center` run along the separator axis (x for vertical edges);
/// `o_*` run along the orthogonal axis; `mean_glyph` is the average glyph
/// extent along the separator axis, used to scale whitespace-gap
/// detection.
#[derive(Debug, Clone, Copy)]
struct ProjectedWord {
    lo: f32,
    hi: f32,
    center: f32,
    o_lo: f32,
    o_hi: f32,
    o_center: f32,
    mean_glyph: f32,
}

fn project(orientation: Orientation, word: &Word) -> ProjectedWord {
    let b = word.bbox.normalize();
    let n = word.chars.len().max(1) as f32;
    match orientation {
        // Vertical separators vary along x.
        Orientation::Vertical => ProjectedWord {
            lo: b.x0,
            hi: b.x1,
            center: (b.x0 + b.x1) / 2.0,
            o_lo: b.y0,
            o_hi: b.y1,
            o_center: (b.y0 + b.y1) / 2.0,
            mean_glyph: b.width() / n,
        },
        Orientation::Horizontal => ProjectedWord {
            lo: b.y0,
            hi: b.y1,
            center: (b.y0 + b.y1) / 2.0,
            o_lo: b.x0,
            o_hi: b.x1,
            o_center: (b.x0 + b.x1) / 2.0,
            mean_glyph: b.height() / n,
        },
    }
}

/// A candidate separator: position along the axis plus orthogonal span.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    coord: f32,
    span_lo: f32,
    span_hi: f32,
}

/// Derive text edges for one axis from word geometry.
///
/// Merges three independent heuristics with de-duplication:
///
/// 1. alignment clustering of word edges (lo/hi coordinates), a cluster
///    qualifying only when it spans at least `min_distinct` **distinct**
///    orthogonal groups (text rows for vertical edges, columns for
///    horizontal), plus one closing boundary at the far content extent;
/// 2. whitespace-gap detection: per orthogonal group, gaps wider than 2×
///    the local mean glyph extent are candidate separators, promoted when
///    they recur in a majority of groups;
/// 3. cell-center clustering: word midpoints clustered across groups,
///    centers recurring in at least half the groups retained, separators
///    placed at consecutive-center midpoints plus the outer content
///    boundaries.
///
/// De-duplication is two-stage: snap-tolerance clustering, then collapsing
/// all candidates that land in the same content-free band (several
/// heuristics describing the same column break produce one boundary).
pub(crate) fn text_edges(
    orientation: Orientation,
    words: &[Word],
    tol: &ResolvedTolerances,
    min_distinct: usize,
) -> Vec<Edge> {
    if words.is_empty() {
        return vec![];
    }
    let (snap, o_snap) = match orientation {
        Orientation::Vertical => (tol.snap_x, tol.snap_y),
        Orientation::Horizontal => (tol.snap_y, tol.snap_x),
    };
    let projected: Vec<ProjectedWord> = words.iter().map(|w| project(orientation, w)).collect();

    // Orthogonal groups: text rows for vertical edges, columns for
    // horizontal ones. Group id per word, by index.
    let indices: Vec<usize> = (0..projected.len()).collect();
    let groups = cluster_by_key(&indices, |&i| projected[i].o_center, o_snap);
    let n_groups = groups.len();
    let mut group_of = vec![0usize; projected.len()];
    for (gi, group) in groups.iter().enumerate() {
        for &i in group {
            group_of[i] = gi;
        }
    }

    let full_lo = projected
        .iter()
        .map(|w| w.o_lo)
        .fold(f32::INFINITY, f32::min);
    let full_hi = projected
        .iter()
        .map(|w| w.o_hi)
        .fold(f32::NEG_INFINITY, f32::max);
    let content_lo = projected.iter().map(|w| w.lo).fold(f32::INFINITY, f32::min);
    let content_hi = projected
        .iter()
        .map(|w| w.hi)
        .fold(f32::NEG_INFINITY, f32::max);

    let mut candidates: Vec<Candidate> = Vec::new();

    // Heuristic 1: edge-alignment clusters spanning enough distinct groups.
    let mut any_alignment = false;
    let alignment_keys: [fn(&ProjectedWord) -> f32; 2] = [|w| w.lo, |w| w.hi];
    for key in alignment_keys {
        let clusters = cluster_by_key(&indices, |&i| key(&projected[i]), snap);
        for cluster in clusters {
            let mut seen_groups: Vec<usize> = cluster.iter().map(|&i| group_of[i]).collect();
            seen_groups.sort_unstable();
            seen_groups.dedup();
            if seen_groups.len() < min_distinct {
                continue;
            }
            any_alignment = true;
            let coord = cluster.iter().map(|&i| key(&projected[i])).sum::<f32>()
                / cluster.len() as f32;
            let span_lo = cluster
                .iter()
                .map(|&i| projected[i].o_lo)
                .fold(f32::INFINITY, f32::min);
            let span_hi = cluster
                .iter()
                .map(|&i| projected[i].o_hi)
                .fold(f32::NEG_INFINITY, f32::max);
            candidates.push(Candidate {
                coord,
                span_lo,
                span_hi,
            });
        }
    }
    if any_alignment {
        // Closing boundary so the last column/row has a far edge.
        candidates.push(Candidate {
            coord: content_hi,
            span_lo: full_lo,
            span_hi: full_hi,
        });
    }

    // Heuristic 2: recurring whitespace gaps within orthogonal groups.
    let mut gap_candidates: Vec<(f32, usize)> = Vec::new();
    for (gi, group) in groups.iter().enumerate() {
        let mut members: Vec<&ProjectedWord> = group.iter().map(|&i| &projected[i]).collect();
        members.sort_by(|a, b| a.lo.total_cmp(&b.lo));
        let mean_glyph =
            members.iter().map(|w| w.mean_glyph).sum::<f32>() / members.len() as f32;
        for pair in members.windows(2) {
            let gap = pair[1].lo - pair[0].hi;
            if gap > 2.0 * mean_glyph {
                gap_candidates.push(((pair[0].hi + pair[1].lo) / 2.0, gi));
            }
        }
    }
    for cluster in cluster_by_key(&gap_candidates, |c| c.0, snap) {
        let mut gs: Vec<usize> = cluster.iter().map(|c| c.1).collect();
        gs.sort_unstable();
        gs.dedup();
        if gs.len() * 2 > n_groups {
            let coord = cluster.iter().map(|c| c.0).sum::<f32>() / cluster.len() as f32;
            candidates.push(Candidate {
                coord,
                span_lo: full_lo,
                span_hi: full_hi,
            });
        }
    }

    // Heuristic 3: recurring cell centers.
    let mut centers: Vec<f32> = Vec::new();
    for cluster in cluster_by_key(&indices, |&i| projected[i].center, snap) {
        let mut gs: Vec<usize> = cluster.iter().map(|&i| group_of[i]).collect();
        gs.sort_unstable();
        gs.dedup();
        if gs.len() * 2 >= n_groups {
            centers.push(
                cluster.iter().map(|&i| projected[i].center).sum::<f32>()
                    / cluster.len() as f32,
            );
        }
    }
    centers.sort_by(f32::total_cmp);
    if centers.len() >= 2 {
        candidates.push(Candidate {
            coord: content_lo,
            span_lo: full_lo,
            span_hi: full_hi,
        });
        for pair in centers.windows(2) {
            candidates.push(Candidate {
                coord: (pair[0] + pair[1]) / 2.0,
                span_lo: full_lo,
                span_hi: full_hi,
            });
        }
        candidates.push(Candidate {
            coord: content_hi,
            span_lo: full_lo,
            span_hi: full_hi,
        });
    }

    let merged = dedupe_candidates(candidates, &projected, snap);
    merged
        .into_iter()
        .map(|c| make_edge(orientation, c.coord, c.span_lo, c.span_hi))
        .collect()
}

/// Two-stage candidate de-duplication.
///
/// Stage one clusters candidate coordinates within the snap tolerance.
/// Stage two merges candidates that occupy the same content-free band:
/// the occupied intervals of the projected words are unioned, and any two
/// candidates falling between the same pair of intervals describe the same
/// break, so they collapse to their mean.
fn dedupe_candidates(
    candidates: Vec<Candidate>,
    projected: &[ProjectedWord],
    snap: f32,
) -> Vec<Candidate> {
    if candidates.is_empty() {
        return candidates;
    }

    let snapped: Vec<Candidate> = cluster_by_key(&candidates, |c| c.coord, snap)
        .into_iter()
        .map(merge_candidates)
        .collect();

    // Occupied intervals along the axis, merged.
    let mut intervals: Vec<(f32, f32)> = projected.iter().map(|w| (w.lo, w.hi)).collect();
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut occupied: Vec<(f32, f32)> = Vec::new();
    for (lo, hi) in intervals {
        match occupied.last_mut() {
            Some(last) if lo <= last.1 => last.1 = last.1.max(hi),
            _ => occupied.push((lo, hi)),
        }
    }

    // Band id: number of occupied intervals essentially before the
    // coordinate. Candidates strictly inside an interval keep their own
    // identity (band None).
    let band_of = |c: f32| -> Option<usize> {
        for (i, &(lo, hi)) in occupied.iter().enumerate() {
            if c < lo + snap {
                return Some(i);
            }
            if c <= hi - snap {
                return None; // interior of content
            }
        }
        Some(occupied.len())
    };

    let mut by_band: Vec<(Option<usize>, Vec<Candidate>)> = Vec::new();
    for cand in snapped {
        let band = band_of(cand.coord);
        match by_band
            .iter_mut()
            .find(|(b, _)| b.is_some() && *b == band)
        {
            Some((_, members)) => members.push(cand),
            None => by_band.push((band, vec![cand])),
        }
    }

    let mut out: Vec<Candidate> = Vec::new();
    for (band, members) in by_band {
        if band.is_some() {
            out.push(merge_candidates(members));
        } else {
            out.extend(members);
        }
    }
    out.sort_by(|a, b| a.coord.total_cmp(&b.coord));
    out
}

fn merge_candidates(members: Vec<Candidate>) -> Candidate {
    let n = members.len() as f32;
    Candidate {
        coord: members.iter().map(|c| c.coord).sum::<f32>() / n,
        span_lo: members
            .iter()
            .map(|c| c.span_lo)
            .fold(f32::INFINITY, f32::min),
        span_hi: members
            .iter()
            .map(|c| c.span_hi)
            .fold(f32::NEG_INFINITY, f32::max),
    }
}
