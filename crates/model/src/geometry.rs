//! Region, pointer, and offset types.
//!
//! A [`Region`] is always re-measured from the current layout by whoever
//! owns it; nothing in this crate caches one across layout changes.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Bounding rectangle of an interactive element, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width (may be zero before the element is laid out).
    pub width: f64,
    /// Height (may be zero before the element is laid out).
    pub height: f64,
}

impl Region {
    /// An unmeasured region: zero-sized at the origin.
    pub const EMPTY: Region = Region {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The geometric center of this region.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether both dimensions are finite and strictly positive.
    ///
    /// Anything that divides by width or height must check this first.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Check if a pointer sample lies within this region (edges inclusive).
    pub fn contains(&self, sample: PointerSample) -> bool {
        sample.client_x >= self.left
            && sample.client_x <= self.right()
            && sample.client_y >= self.top
            && sample.client_y <= self.bottom()
    }

    /// Area of the overlap with another region, zero if disjoint.
    pub fn intersection_area(&self, other: &Region) -> f64 {
        let w = self.right().min(other.right()) - self.left.max(other.left);
        let h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Scale every coordinate about the viewport origin.
    pub fn scaled(&self, factor: f64) -> Region {
        Region {
            left: self.left * factor,
            top: self.top * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Pointer position at the moment of a move event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerSample {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Signed 2D displacement applied to an element's visual content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetVector {
    pub x: f64,
    pub y: f64,
}

impl OffsetVector {
    /// The rest state.
    pub const ZERO: OffsetVector = OffsetVector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for OffsetVector {
    type Output = OffsetVector;

    fn add(self, rhs: OffsetVector) -> OffsetVector {
        OffsetVector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for OffsetVector {
    type Output = OffsetVector;

    fn sub(self, rhs: OffsetVector) -> OffsetVector {
        OffsetVector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for OffsetVector {
    type Output = OffsetVector;

    fn mul(self, rhs: f64) -> OffsetVector {
        OffsetVector::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_center_and_edges() {
        let r = Region::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(r.center(), (110.0, 70.0));
        assert_eq!(r.right(), 210.0);
        assert_eq!(r.bottom(), 120.0);
        assert_eq!(r.area(), 20_000.0);
    }

    #[test]
    fn test_has_area_rejects_unmeasured() {
        assert!(!Region::EMPTY.has_area());
        assert!(!Region::new(0.0, 0.0, 100.0, 0.0).has_area());
        assert!(!Region::new(0.0, 0.0, f64::NAN, 10.0).has_area());
        assert!(!Region::new(0.0, 0.0, f64::INFINITY, 10.0).has_area());
        assert!(Region::new(0.0, 0.0, 1.0, 1.0).has_area());
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let r = Region::new(0.0, 0.0, 200.0, 100.0);
        assert!(r.contains(PointerSample::new(0.0, 0.0)));
        assert!(r.contains(PointerSample::new(200.0, 100.0)));
        assert!(!r.contains(PointerSample::new(200.1, 50.0)));
    }

    #[test]
    fn test_intersection_area() {
        let a = Region::new(0.0, 0.0, 100.0, 100.0);
        let b = Region::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection_area(&b), 2_500.0);

        let far = Region::new(500.0, 500.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&far), 0.0);
    }

    #[test]
    fn test_offset_arithmetic() {
        let a = OffsetVector::new(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a + a, OffsetVector::new(6.0, 8.0));
        assert_eq!(a - a, OffsetVector::ZERO);
        assert_eq!(a * 0.5, OffsetVector::new(1.5, 2.0));
    }

    proptest! {
        #[test]
        fn prop_center_is_contained(
            left in -1e4f64..1e4,
            top in -1e4f64..1e4,
            width in 0.0f64..1e4,
            height in 0.0f64..1e4,
        ) {
            let r = Region::new(left, top, width, height);
            let (cx, cy) = r.center();
            prop_assert!(r.contains(PointerSample::new(cx, cy)));
        }

        #[test]
        fn prop_intersection_is_symmetric_and_bounded(
            a in (-500.0f64..500.0, -500.0f64..500.0, 1.0f64..500.0, 1.0f64..500.0),
            b in (-500.0f64..500.0, -500.0f64..500.0, 1.0f64..500.0, 1.0f64..500.0),
        ) {
            let ra = Region::new(a.0, a.1, a.2, a.3);
            let rb = Region::new(b.0, b.1, b.2, b.3);
            let ab = ra.intersection_area(&rb);
            prop_assert_eq!(ab, rb.intersection_area(&ra));
            prop_assert!(ab >= 0.0);
            prop_assert!(ab <= ra.area().min(rb.area()) + 1e-6);
        }
    }
}
