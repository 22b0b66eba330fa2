//! Triangle primitive with per-vertex normals and texture coordinates.
//!
//! Intersection is a plane hit followed by a barycentric inside test. The
//! barycentric basis vectors are derived once at construction, so a triangle
//! is immutable afterwards.

use crate::surface::{positive_hit, Primitive};
use umbra_math::{Aabb, Ray, Vec2, Vec3};

/// A vertex as supplied by scene assembly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    /// Shading normal; zero means "use the face normal"
    pub normal: Vec3,
    pub texcoord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_texcoord(mut self, texcoord: Vec2) -> Self {
        self.texcoord = texcoord;
        self
    }
}

/// A triangle primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertex positions
    p: [Vec3; 3],
    /// Per-vertex shading normals
    n: [Vec3; 3],
    /// Per-vertex texture coordinates
    st: [Vec2; 3],
    /// Unit face normal
    face_normal: Vec3,
    /// Dotting `p - p0` with these yields the barycentric weights of p1 and p2
    e1: Vec3,
    e2: Vec3,
    /// Bounding box
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// If any supplied normal is zero length, all three fall back to the face
    /// normal.
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        let p = [v0.position, v1.position, v2.position];
        let edge1 = p[1] - p[0];
        let edge2 = p[2] - p[0];
        let n = edge1.cross(edge2);
        let face_normal = n.normalize();

        let supplied = [v0.normal, v1.normal, v2.normal];
        let normals = if supplied.iter().any(|n| n.length_squared() == 0.0) {
            [face_normal; 3]
        } else {
            supplied
        };

        let e1 = edge2.cross(n);
        let e1 = e1 / e1.dot(edge1);
        let e2 = edge1.cross(n);
        let e2 = e2 / e2.dot(edge2);

        let bbox = Aabb::from_points(p[0].min(p[1]).min(p[2]), p[0].max(p[1]).max(p[2]));

        Self {
            p,
            n: normals,
            st: [v0.texcoord, v1.texcoord, v2.texcoord],
            face_normal,
            e1,
            e2,
            bbox,
        }
    }

    /// Flat triangle from bare positions.
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self::new(Vertex::new(p0), Vertex::new(p1), Vertex::new(p2))
    }

    /// Barycentric weights of `p` with respect to the three vertices.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        let rel = p - self.p[0];
        let b1 = self.e1.dot(rel);
        let b2 = self.e2.dot(rel);
        Vec3::new(1.0 - b1 - b2, b1, b2)
    }

    pub fn face_normal(&self) -> Vec3 {
        self.face_normal
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let t = (self.p[0] - ray.origin()).dot(self.face_normal)
            / ray.direction().dot(self.face_normal);
        let t = positive_hit(t)?;

        let b = self.barycentric(ray.at(t));
        (b.x >= 0.0 && b.y >= 0.0 && b.z >= 0.0).then_some(t)
    }

    /// Barycentric interpolation of the vertex normals.
    fn normal_at(&self, p: Vec3) -> Vec3 {
        let b = self.barycentric(p);
        (b.x * self.n[0] + b.y * self.n[1] + b.z * self.n[2]).normalize()
    }

    fn geometric_normal_at(&self, _p: Vec3) -> Vec3 {
        self.face_normal
    }

    fn texcoord_at(&self, p: Vec3) -> Option<Vec2> {
        let b = self.barycentric(p);
        Some(b.x * self.st[0] + b.y * self.st[1] + b.z * self.st[2])
    }

    fn might_intersect(&self, bbox: &Aabb) -> bool {
        self.bbox.overlaps(bbox)
    }
}
