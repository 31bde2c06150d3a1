use crate::{Interval, Ray, Vec3};

/// Minimum extent of a box built from points; thinner axes are padded.
const MIN_EXTENT: f64 = 0.0001;

/// Axis-Aligned Bounding Box used by the BSP index and per-object culling.
///
/// `Aabb::EMPTY` has inverted corners and encloses nothing; subsuming any
/// other box into it yields that box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Create a box from its corners as given.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two corner points, in any order.
    ///
    /// Axes thinner than `MIN_EXTENT` are padded so that flat geometry
    /// (an axis-aligned triangle) still has a volume to intersect.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Grow this box to the smallest box enclosing both `self` and `other`.
    ///
    /// Component-wise min/max, so the result does not depend on the order
    /// in which a set of boxes is subsumed.
    pub fn subsume(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// True if the box encloses nothing (any min greater than its max).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties prefer X, then Y, then Z, so a cube (or a point) splits on X.
    pub fn longest_axis(&self) -> usize {
        let extent = self.extent();

        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Coordinate of `point` along `axis` (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis_value(point: Vec3, axis: usize) -> f64 {
        match axis {
            0 => point.x,
            1 => point.y,
            _ => point.z,
        }
    }

    /// True if `point` lies inside or on the boundary of the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test returning the parametric range over which `ray` is inside
    /// the box, clipped to `t >= 0`.
    ///
    /// An axis where the ray direction is zero is parallel to that slab: it
    /// only passes if the origin already lies between the two planes.
    pub fn hit_interval(&self, ray: &Ray) -> Option<Interval> {
        let origin = ray.origin();
        let direction = ray.direction();
        let inv = ray.inv_direction();

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let o = Self::axis_value(origin, axis);
            let lo = Self::axis_value(self.min, axis);
            let hi = Self::axis_value(self.max, axis);

            if Self::axis_value(direction, axis) == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let adinv = Self::axis_value(inv, axis);
            let mut t0 = (lo - o) * adinv;
            let mut t1 = (hi - o) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        // Clipping to t >= 0 empties the range when the box is behind
        let hit = Interval::new(t_min.max(0.0), t_max);
        (!hit.is_empty()).then_some(hit)
    }

    /// True if the ray passes through the box at a non-negative parameter.
    #[inline]
    pub fn intersects(&self, ray: &Ray) -> bool {
        self.hit_interval(ray).is_some()
    }

    /// Pad axes to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let extent = self.extent();
        let pad = Vec3::new(
            if extent.x < MIN_EXTENT { MIN_EXTENT * 0.5 } else { 0.0 },
            if extent.y < MIN_EXTENT { MIN_EXTENT * 0.5 } else { 0.0 },
            if extent.z < MIN_EXTENT { MIN_EXTENT * 0.5 } else { 0.0 },
        );
        self.min -= pad;
        self.max += pad;
    }

    pub const EMPTY: Aabb = Aabb {
        min: Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        max: Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
    };
}
