//! Recursive Whitted-style integrator with one-sample diffuse bounces.
//!
//! Each call shades the nearest hit with direct light from every scene light,
//! optionally one indirect diffuse bounce (treated as a virtual point light),
//! and mirror reflection plus refraction while specular depth remains.

use crate::{gen_f32, illuminate, Light, Scene, SurfaceId};
use rand::{Rng, RngCore};
use rand_distr::Normal;
use umbra_core::{Color, RenderSettings};
use umbra_math::{Ray, Vec3};

/// Remaining recursion budget for a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    /// Diffuse global-illumination bounces
    pub gi: u32,
    /// Specular (reflection and refraction) bounces
    pub bounces: u32,
}

impl Depth {
    pub fn new(gi: u32, bounces: u32) -> Self {
        Self { gi, bounces }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.gi_depth, settings.bounces)
    }
}

/// What a traced ray found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    pub surface: SurfaceId,
    pub point: Vec3,
    /// Shading normal, facing against the incoming ray
    pub normal: Vec3,
    pub color: Color,
}

/// Trace `ray` through the scene and shade what it hits.
///
/// Returns `None` when the ray escapes. The ray origin is nudged forward
/// before the query, so continuation rays may start exactly on a surface.
pub fn trace(scene: &Scene, ray: &Ray, depth: Depth, rng: &mut dyn RngCore) -> Option<TraceHit> {
    let ray = ray.nudged();
    let hit = scene.nearest_hit(&ray)?;
    let material = &scene.surface(hit.surface).material;
    let dir = ray.direction();

    let mut normal = face_forward(hit.normal, dir);
    if material.roughness > 0.0 {
        normal = face_forward(perturb_normal(normal, material.roughness, rng), dir);
    }

    let diffuse_weight = material.diffuse_weight();
    let reflection_weight = material.reflection_weight();
    let refraction_weight = material.refraction_weight();

    let mut diffuse = Color::ZERO;
    if diffuse_weight != Color::ZERO {
        for light in scene.lights() {
            diffuse += illuminate(scene, light, hit.surface, hit.point, normal);
        }

        if depth.gi > 0 {
            let bounce_ray = Ray::new(hit.point, bounce_direction(normal, rng));
            let next = Depth {
                gi: depth.gi - 1,
                ..depth
            };
            if let Some(bounce) = trace(scene, &bounce_ray, next, rng) {
                let virtual_light = Light::point(bounce.point, bounce.color);
                diffuse += illuminate(scene, &virtual_light, hit.surface, hit.point, normal);
            }
        }
    }

    let mut reflection = Color::ZERO;
    let mut refraction = Color::ZERO;
    if depth.bounces > 0 {
        let next = Depth {
            bounces: depth.bounces - 1,
            ..depth
        };

        // Outer `None`: no refraction needed. Inner `None`: total internal reflection.
        let refracted = (refraction_weight != Color::ZERO).then(|| {
            let eta = if dir.dot(hit.geometric_normal) < 0.0 {
                1.0 / material.ior
            } else {
                material.ior
            };
            refract(dir, normal, eta)
        });
        let total_internal = matches!(refracted, Some(None));

        if reflection_weight != Color::ZERO || total_internal {
            let reflected = Ray::new(hit.point, reflect(dir, normal));
            reflection = trace_color(scene, &reflected, next, rng);
        }

        refraction = match refracted {
            Some(Some(t)) => trace_color(scene, &Ray::new(hit.point, t), next, rng),
            Some(None) => reflection,
            None => Color::ZERO,
        };
    }

    Some(TraceHit {
        surface: hit.surface,
        point: hit.point,
        normal,
        color: diffuse_weight * diffuse
            + reflection_weight * reflection
            + refraction_weight * refraction,
    })
}

fn trace_color(scene: &Scene, ray: &Ray, depth: Depth, rng: &mut dyn RngCore) -> Color {
    trace(scene, ray, depth, rng).map_or(Color::ZERO, |hit| hit.color)
}

/// Flip `normal` so it faces against `dir`.
#[inline]
pub fn face_forward(normal: Vec3, dir: Vec3) -> Vec3 {
    if normal.dot(dir) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Mirror `dir` about `normal`.
#[inline]
pub fn reflect(dir: Vec3, normal: Vec3) -> Vec3 {
    dir - 2.0 * dir.dot(normal) * normal
}

/// Refract `dir` through a surface with normal `normal` facing the incoming
/// side, where `eta` is the ratio of the incident to transmitted index.
///
/// Returns `None` on total internal reflection.
pub fn refract(dir: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -dir.dot(normal);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((eta * dir + (eta * cos_i - k.sqrt()) * normal).normalize())
}

/// Jitter a normal with independent Gaussian noise per axis.
fn perturb_normal(normal: Vec3, roughness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let Ok(noise) = Normal::new(0.0, roughness) else {
        return normal;
    };
    let jitter = Vec3::new(rng.sample(noise), rng.sample(noise), rng.sample(noise));
    (normal + jitter).try_normalize().unwrap_or(normal)
}

/// Random direction in the hemisphere about `normal`, biased toward it.
fn bounce_direction(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    (normal + random_in_unit_sphere(rng))
        .try_normalize()
        .unwrap_or(normal)
}

fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
