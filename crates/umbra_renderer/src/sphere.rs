//! Sphere primitive for ray tracing.

use crate::surface::{positive_hit, Primitive};
use umbra_math::{Aabb, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let to_center = self.center - ray.origin();
        let inside = to_center.length() < self.radius;

        // Distance along the ray to the point closest to the center
        let t_center = to_center.dot(ray.direction());
        if !inside && t_center < 0.0 {
            return None;
        }

        let closest = ray.at(t_center) - self.center;
        let d2 = closest.length_squared();
        let r2 = self.radius * self.radius;
        if !inside && r2 <= d2 {
            return None;
        }

        let t_offset = (r2 - d2).max(0.0).sqrt();
        if inside {
            positive_hit(t_center + t_offset)
        } else {
            positive_hit(t_center - t_offset)
        }
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize()
    }

    /// Longitude runs along s, latitude along t with t = 0 at the +Y pole.
    fn texcoord_at(&self, p: Vec3) -> Option<Vec2> {
        let n = self.normal_at(p);
        let phi = (-n.z).atan2(n.x) + PI;
        let theta = n.y.clamp(-1.0, 1.0).acos();
        Some(Vec2::new(phi / (2.0 * PI), theta / PI))
    }

    fn might_intersect(&self, bbox: &Aabb) -> bool {
        bbox.expand(self.radius).contains_point(self.center)
    }
}
