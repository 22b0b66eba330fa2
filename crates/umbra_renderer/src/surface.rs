//! Primitive trait and the `Surface` type stored in the scene arena.

use crate::{Plane, Sphere, Triangle};
use umbra_core::{Color, Material};
use umbra_math::{Aabb, Ray, Vec2, Vec3};

/// Geometry that rays can be intersected with.
pub trait Primitive: Send + Sync {
    /// Distance along `ray` to the first point where it meets the surface.
    ///
    /// Returns `None` for misses, grazing rays, and hits at or behind the
    /// origin. `ray.direction` must be normalized.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Outward (unflipped) surface normal at a point on the surface.
    fn normal_at(&self, p: Vec3) -> Vec3;

    /// True surface normal at `p`, ignoring any shading interpolation.
    fn geometric_normal_at(&self, p: Vec3) -> Vec3 {
        self.normal_at(p)
    }

    /// Texture coordinates at a point on the surface, if the primitive has a
    /// parameterization.
    fn texcoord_at(&self, p: Vec3) -> Option<Vec2>;

    /// Conservative overlap test against a spatial-index cell.
    ///
    /// May report overlaps that do not exist, must never miss one.
    fn might_intersect(&self, bbox: &Aabb) -> bool;
}

/// Keeps only hits strictly in front of the ray origin.
#[inline]
pub(crate) fn positive_hit(t: f32) -> Option<f32> {
    (t > 0.0 && t.is_finite()).then_some(t)
}

/// The closed set of supported geometric shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
}

impl Primitive for Shape {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
            Shape::Triangle(t) => t.intersect(ray),
        }
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal_at(p),
            Shape::Plane(pl) => pl.normal_at(p),
            Shape::Triangle(t) => t.normal_at(p),
        }
    }

    fn geometric_normal_at(&self, p: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.geometric_normal_at(p),
            Shape::Plane(pl) => pl.geometric_normal_at(p),
            Shape::Triangle(t) => t.geometric_normal_at(p),
        }
    }

    fn texcoord_at(&self, p: Vec3) -> Option<Vec2> {
        match self {
            Shape::Sphere(s) => s.texcoord_at(p),
            Shape::Plane(pl) => pl.texcoord_at(p),
            Shape::Triangle(t) => t.texcoord_at(p),
        }
    }

    fn might_intersect(&self, bbox: &Aabb) -> bool {
        match self {
            Shape::Sphere(s) => s.might_intersect(bbox),
            Shape::Plane(p) => p.might_intersect(bbox),
            Shape::Triangle(t) => t.might_intersect(bbox),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Shape::Plane(p)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

/// Stable handle to a surface in a scene's arena.
///
/// Spatial-index leaves store these instead of owning surfaces, so one
/// surface can be referenced from every cell it overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) usize);

impl SurfaceId {
    /// Position of the surface in the scene arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A shape together with its material.
#[derive(Debug, Clone)]
pub struct Surface {
    pub shape: Shape,
    pub material: Material,
}

impl Surface {
    pub fn new(shape: impl Into<Shape>, material: Material) -> Self {
        Self {
            shape: shape.into(),
            material,
        }
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.shape.intersect(ray)
    }

    #[inline]
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        self.shape.normal_at(p)
    }

    #[inline]
    pub fn geometric_normal_at(&self, p: Vec3) -> Vec3 {
        self.shape.geometric_normal_at(p)
    }

    #[inline]
    pub fn might_intersect(&self, bbox: &Aabb) -> bool {
        self.shape.might_intersect(bbox)
    }

    /// Surface color at `p`: a texture sample when the material has a texture
    /// and the shape a parameterization, the flat material color otherwise.
    pub fn color_at(&self, p: Vec3) -> Color {
        match (&self.material.texture, self.shape.texcoord_at(p)) {
            (Some(texture), Some(st)) => texture.sample(st.x, st.y),
            _ => self.material.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use umbra_core::Texture;

    #[test]
    fn test_color_at_uses_flat_color_without_texture() {
        let surface = Surface::new(
            Sphere::new(Vec3::ZERO, 1.0),
            Material::diffuse(Color::new(0.2, 0.4, 0.6)),
        );
        assert_eq!(surface.color_at(Vec3::Y), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_color_at_samples_texture() {
        let texture = Arc::new(Texture::solid_color(Color::new(0.0, 1.0, 0.0)));
        let surface = Surface::new(
            Sphere::new(Vec3::ZERO, 1.0),
            Material::diffuse(Color::ONE).with_texture(texture),
        );
        assert_eq!(surface.color_at(Vec3::X), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_plane_ignores_texture() {
        let texture = Arc::new(Texture::solid_color(Color::new(0.0, 1.0, 0.0)));
        let surface = Surface::new(
            Plane::new(0.0, 1.0, 0.0, 0.0),
            Material::diffuse(Color::new(1.0, 0.0, 0.0)).with_texture(texture),
        );
        assert_eq!(surface.color_at(Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
    }
}
