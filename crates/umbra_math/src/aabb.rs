use crate::{Interval, Vec3};

/// Axis-Aligned Bounding Box used as a cell of the renderer's spatial index.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub const fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// A cube of the given side length centered on the origin.
    pub fn cube(side: f32) -> Self {
        let half = Vec3::splat(side * 0.5);
        Self::from_points(-half, half)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Extent of the shortest axis.
    ///
    /// The spatial index refuses to subdivide cells whose shortest side is
    /// already below its threshold.
    pub fn size(&self) -> f32 {
        self.x.size().min(self.y.size()).min(self.z.size())
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bisect the box along all three axes.
    ///
    /// Octant `i` takes the upper half of X when bit 0 is set, of Y for bit 1
    /// and of Z for bit 2.
    pub fn octants(&self) -> [Aabb; 8] {
        let xs = self.x.halves();
        let ys = self.y.halves();
        let zs = self.z.halves();
        let pick = |halves: (Interval, Interval), upper: bool| {
            if upper {
                halves.1
            } else {
                halves.0
            }
        };
        std::array::from_fn(|i| {
            Aabb::new(
                pick(xs, i & 1 != 0),
                pick(ys, i & 2 != 0),
                pick(zs, i & 4 != 0),
            )
        })
    }

    /// Returns true if `p` lies inside or on the boundary of the box.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Returns true if the two boxes share any volume or boundary.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y) && self.z.overlaps(&other.z)
    }

    /// Grow every axis by `amount` on both sides.
    pub fn expand(&self, amount: f32) -> Aabb {
        Aabb::new(
            self.x.expand(amount),
            self.y.expand(amount),
            self.z.expand(amount),
        )
    }

    /// Slab test with a precomputed inverse direction.
    ///
    /// Zero direction components give infinite slab bounds; NaNs produced at
    /// the exact slab boundary are discarded by `f32::max`/`f32::min`, which
    /// keeps the test conservative.
    pub fn hit_inv(&self, origin: Vec3, inv_dir: Vec3, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = inv_dir[axis];
            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }
        true
    }
}
