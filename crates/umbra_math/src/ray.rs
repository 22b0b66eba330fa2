use crate::Vec3;

/// Distance a ray origin is advanced along its direction before every
/// intersection query, so a ray leaving a surface does not re-hit it.
pub const RAY_EPSILON: f32 = 1e-4;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is normalized by every producer in the renderer, so the ray
/// parameter `t` doubles as a world-space distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Component-wise reciprocal of the direction, for slab tests.
    ///
    /// Zero components become signed infinities, which the slab test handles.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.direction.recip()
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray with its origin advanced by [`RAY_EPSILON`].
    #[inline]
    pub fn nudged(&self) -> Ray {
        Ray::new(self.at(RAY_EPSILON), self.direction)
    }
}
