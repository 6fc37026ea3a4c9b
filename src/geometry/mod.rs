//! Geometric primitives for layout analysis.
//!
//! This module provides the bounding-box algebra the layout and table
//! engines are built on: a corner-tuple [`BBox`] with total, pure set-like
//! operations, plus order-preserving filtering combinators over any
//! box-bearing collection.
//!
//! Boxes are **not** assumed pre-ordered; call [`BBox::normalize`] before
//! comparisons that depend on corner ordering. Every engine-internal
//! comparison does so.

pub mod clustering;
pub mod segments;

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box stored as two corner points.
///
/// The corner tuple `(x0, y0, x1, y1)` is not required to be ordered on
/// construction; [`normalize`](BBox::normalize) produces the canonical form
/// with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// First corner x
    pub x0: f32,
    /// First corner y
    pub y0: f32,
    /// Second corner x
    pub x1: f32,
    /// Second corner y
    pub y1: f32,
}

impl BBox {
    /// Create a new box from two corner points (in any order).
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::BBox;
    ///
    /// let bbox = BBox::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(bbox.width(), 100.0);
    /// assert_eq!(bbox.height(), 50.0);
    /// ```
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Return the normalized box with `x0 <= x1` and `y0 <= y1`.
    ///
    /// Idempotent: normalizing a normalized box is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::BBox;
    ///
    /// let bbox = BBox::new(100.0, 50.0, 0.0, 0.0).normalize();
    /// assert_eq!(bbox, BBox::new(0.0, 0.0, 100.0, 50.0));
    /// assert_eq!(bbox.normalize(), bbox);
    /// ```
    pub fn normalize(&self) -> BBox {
        BBox {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// Whether the box has strictly positive width and height.
    ///
    /// Zero-area (degenerate) boxes are invalid for area-based tests.
    pub fn is_valid(&self) -> bool {
        let b = self.normalize();
        b.x1 > b.x0 && b.y1 > b.y0
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    /// Area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point of the box.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::BBox;
    ///
    /// let center = BBox::new(0.0, 0.0, 100.0, 50.0).center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: (self.x0 + self.x1) / 2.0,
            y: (self.y0 + self.y1) / 2.0,
        }
    }

    /// Inclusive boundary containment test for a point.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::{BBox, Point};
    ///
    /// let bbox = BBox::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(bbox.contains_point(&Point::new(50.0, 50.0)));
    /// assert!(bbox.contains_point(&Point::new(0.0, 0.0)));
    /// assert!(!bbox.contains_point(&Point::new(150.0, 50.0)));
    /// ```
    pub fn contains_point(&self, p: &Point) -> bool {
        let b = self.normalize();
        p.x >= b.x0 && p.x <= b.x1 && p.y >= b.y0 && p.y <= b.y1
    }

    /// Strict positive-area overlap test.
    ///
    /// Boxes that share only an edge or a corner do **not** overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::BBox;
    ///
    /// let a = BBox::new(0.0, 0.0, 100.0, 100.0);
    /// let b = BBox::new(50.0, 50.0, 150.0, 150.0);
    /// let touching = BBox::new(100.0, 0.0, 200.0, 100.0);
    ///
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&touching));
    /// ```
    pub fn overlaps(&self, other: &BBox) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
    }

    /// Inclusive-boundary containment test: is `self` entirely within `outer`?
    pub fn within(&self, outer: &BBox) -> bool {
        let a = self.normalize();
        let b = outer.normalize();
        a.x0 >= b.x0 && a.x1 <= b.x1 && a.y0 >= b.y0 && a.y1 <= b.y1
    }

    /// True iff the boxes do not overlap. Touching counts as outside.
    pub fn outside(&self, other: &BBox) -> bool {
        !self.overlaps(other)
    }

    /// The overlapping sub-box, or `None` iff the boxes do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::BBox;
    ///
    /// let a = BBox::new(0.0, 0.0, 100.0, 100.0);
    /// let b = BBox::new(50.0, 50.0, 150.0, 150.0);
    ///
    /// let i = a.intersection(&b).unwrap();
    /// assert_eq!(i, BBox::new(50.0, 50.0, 100.0, 100.0));
    ///
    /// let far = BBox::new(200.0, 200.0, 300.0, 300.0);
    /// assert!(a.intersection(&far).is_none());
    /// ```
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        if !self.overlaps(other) {
            return None;
        }
        let a = self.normalize();
        let b = other.normalize();
        Some(BBox {
            x0: a.x0.max(b.x0),
            y0: a.y0.max(b.y0),
            x1: a.x1.min(b.x1),
            y1: a.y1.min(b.y1),
        })
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        let a = self.normalize();
        let b = other.normalize();
        BBox {
            x0: a.x0.min(b.x0),
            y0: a.y0.min(b.y0),
            x1: a.x1.max(b.x1),
            y1: a.y1.max(b.y1),
        }
    }

    /// Expand the box by `margin` on every side.
    ///
    /// A negative margin shrinks the box; the result is normalized, so an
    /// over-shrunk box collapses rather than inverting.
    pub fn expand(&self, margin: f32) -> BBox {
        let b = self.normalize();
        BBox {
            x0: b.x0 - margin,
            y0: b.y0 - margin,
            x1: b.x1 + margin,
            y1: b.y1 + margin,
        }
        .normalize()
    }
}

/// Anything carrying a bounding box.
///
/// Implemented by the input primitives and the derived text structures so
/// the filtering combinators below work uniformly over all of them.
pub trait HasBBox {
    /// The item's bounding box.
    fn bbox(&self) -> BBox;
}

impl HasBBox for BBox {
    fn bbox(&self) -> BBox {
        *self
    }
}

/// Keep the items whose boxes lie entirely within `outer` (inclusive).
///
/// Order-preserving; empty input yields empty output.
pub fn filter_within<T: HasBBox + Clone>(items: &[T], outer: &BBox) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.bbox().within(outer))
        .cloned()
        .collect()
}

/// Keep the items whose boxes overlap `target` with positive area.
pub fn filter_overlapping<T: HasBBox + Clone>(items: &[T], target: &BBox) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.bbox().overlaps(target))
        .cloned()
        .collect()
}

/// Keep the items whose boxes do not overlap `target` (touching counts).
pub fn filter_outside<T: HasBBox + Clone>(items: &[T], target: &BBox) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.bbox().outside(target))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_swaps_corners() {
        let b = BBox::new(100.0, 50.0, 0.0, 10.0).normalize();
        assert!(b.x0 <= b.x1 && b.y0 <= b.y1);
        assert_eq!(b, BBox::new(0.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_normalize_idempotent() {
        let b = BBox::new(30.0, 80.0, 10.0, 20.0);
        assert_eq!(b.normalize(), b.normalize().normalize());
    }

    #[test]
    fn test_is_valid_rejects_zero_area() {
        assert!(BBox::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!BBox::new(0.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!BBox::new(5.0, 5.0, 5.0, 5.0).is_valid());
    }

    #[test]
    fn test_overlaps_strict() {
        let a = BBox::new(0.0, 0.0, 100.0, 100.0);
        // Shares the x=100 edge only.
        let edge = BBox::new(100.0, 0.0, 200.0, 100.0);
        // Shares the (100, 100) corner only.
        let corner = BBox::new(100.0, 100.0, 200.0, 200.0);

        assert!(!a.overlaps(&edge));
        assert!(!a.overlaps(&corner));
        assert!(a.overlaps(&BBox::new(99.0, 99.0, 200.0, 200.0)));
    }

    #[test]
    fn test_overlaps_unnormalized_input() {
        let a = BBox::new(100.0, 100.0, 0.0, 0.0);
        let b = BBox::new(150.0, 150.0, 50.0, 50.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_intersection_none_iff_no_overlap() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let touching = BBox::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersection(&touching).is_none());

        let b = BBox::new(5.0, 5.0, 15.0, 15.0);
        let i = a.intersection(&b).unwrap();
        assert!(i.within(&a));
        assert!(i.within(&b));
    }

    #[test]
    fn test_union_contains_both() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(20.0, 20.0, 30.0, 30.0);
        let u = a.union(&b);
        assert!(a.within(&u));
        assert!(b.within(&u));
        assert_eq!(a.union(&a), a.normalize());
    }

    #[test]
    fn test_within_inclusive() {
        let outer = BBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.within(&outer));
        assert!(BBox::new(0.0, 0.0, 50.0, 50.0).within(&outer));
        assert!(!BBox::new(-1.0, 0.0, 50.0, 50.0).within(&outer));
    }

    #[test]
    fn test_expand_and_shrink() {
        let b = BBox::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(b.expand(5.0), BBox::new(5.0, 5.0, 25.0, 25.0));
        assert_eq!(b.expand(-2.0), BBox::new(12.0, 12.0, 18.0, 18.0));
        // Over-shrinking collapses instead of inverting.
        let collapsed = b.expand(-10.0);
        assert!(collapsed.x0 <= collapsed.x1 && collapsed.y0 <= collapsed.y1);
    }

    #[test]
    fn test_contains_point_inclusive() {
        let b = BBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(b.contains_point(&Point::new(0.0, 0.0)));
        assert!(b.contains_point(&Point::new(100.0, 100.0)));
        assert!(!b.contains_point(&Point::new(100.1, 50.0)));
    }

    #[test]
    fn test_filters_preserve_order_and_empty() {
        let boxes = vec![
            BBox::new(0.0, 0.0, 10.0, 10.0),
            BBox::new(50.0, 50.0, 60.0, 60.0),
            BBox::new(5.0, 5.0, 15.0, 15.0),
        ];
        let target = BBox::new(0.0, 0.0, 20.0, 20.0);

        let within = filter_within(&boxes, &target);
        assert_eq!(within.len(), 2);
        assert_eq!(within[0], boxes[0]);
        assert_eq!(within[1], boxes[2]);

        let overlapping = filter_overlapping(&boxes, &target);
        assert_eq!(overlapping.len(), 2);

        let outside = filter_outside(&boxes, &target);
        assert_eq!(outside, vec![boxes[1]]);

        let empty: Vec<BBox> = vec![];
        assert!(filter_within(&empty, &target).is_empty());
        assert!(filter_overlapping(&empty, &target).is_empty());
        assert!(filter_outside(&empty, &target).is_empty());
    }
}
