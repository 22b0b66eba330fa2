//! Infinite plane primitive `a·x + b·y + c·z + d = 0`.

use crate::surface::{positive_hit, Primitive};
use umbra_math::{Aabb, Ray, Vec2, Vec3};

/// An infinite plane given by its implicit coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// (a, b, c), not necessarily unit length
    coefficients: Vec3,
    d: f32,
    /// Normalized (a, b, c)
    normal: Vec3,
}

impl Plane {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        let coefficients = Vec3::new(a, b, c);
        Self {
            coefficients,
            d,
            normal: coefficients.normalize(),
        }
    }

    /// Signed value of the implicit equation at `p`.
    #[inline]
    fn evaluate(&self, p: Vec3) -> f32 {
        self.coefficients.dot(p) + self.d
    }
}

impl Primitive for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        // Parallel rays divide by zero and come out infinite or NaN,
        // which positive_hit rejects.
        let t = -self.evaluate(ray.origin()) / self.coefficients.dot(ray.direction());
        positive_hit(t.max(0.0))
    }

    fn normal_at(&self, _p: Vec3) -> Vec3 {
        self.normal
    }

    fn texcoord_at(&self, _p: Vec3) -> Option<Vec2> {
        None
    }

    fn might_intersect(&self, bbox: &Aabb) -> bool {
        let corners = bbox.corners();
        let all_above = corners.iter().all(|&c| self.evaluate(c) > 0.0);
        let all_below = corners.iter().all(|&c| self.evaluate(c) < 0.0);
        !(all_above || all_below)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Plane {
        // y = -1
        Plane::new(0.0, 1.0, 0.0, 1.0)
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
        let t = ground().intersect(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_hit_behind_is_a_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(ground().intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_parallel_is_a_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ground().intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_normal_is_normalized() {
        let plane = Plane::new(0.0, 0.0, 4.0, 2.0);
        assert_eq!(plane.normal_at(Vec3::ZERO), Vec3::Z);
    }

    #[test]
    fn test_plane_might_intersect() {
        let plane = ground();
        let straddling = Aabb::from_points(Vec3::new(0.0, -2.0, 0.0), Vec3::new(1.0, 0.0, 1.0));
        let above = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let touching = Aabb::from_points(Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(plane.might_intersect(&straddling));
        assert!(!plane.might_intersect(&above));
        assert!(plane.might_intersect(&touching));
    }
}
