//! Umbra renderer - CPU ray tracing
//!
//! A recursive ray tracer with shadow rays, mirror reflection, refraction,
//! one-sample diffuse global illumination, fisheye projection and depth of
//! field. Surfaces live in an arena indexed by an octree BVH.

mod bucket;
mod bvh;
mod camera;
mod integrator;
mod light;
mod plane;
mod renderer;
mod scene;
mod shading;
mod sphere;
mod surface;
mod triangle;

pub use bucket::{bucket_seed, generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::{Bvh, BvhNode, BvhStats, LEAF_MAX_SIZE, MIN_CELL_SIZE, WORLD_SIZE};
pub use camera::Camera;
pub use integrator::{face_forward, reflect, refract, trace, Depth, TraceHit};
pub use light::{Light, MAX_POINT_LIGHT_GAIN};
pub use plane::Plane;
pub use renderer::{
    color_to_rgba, expose, gamma, render, render_into, render_pixel, ImageBuffer, RenderError,
    RenderResult,
};
pub use scene::{Intersection, Scene};
pub use shading::illuminate;
pub use sphere::Sphere;
pub use surface::{Primitive, Shape, Surface, SurfaceId};
pub use triangle::{Triangle, Vertex};

/// Re-export the math and scene-data types the public API is written in
pub use umbra_core::{Color, Material, RenderSettings};
pub use umbra_math::{Aabb, Ray, Vec2, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in `[0, 1)`.
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}
