//! Scene assembly and ray queries.
//!
//! A `Scene` is built once: the caller sets camera and render settings, then
//! adds surfaces and lights. Every surface is stored in an arena and inserted
//! into the spatial index as it is added. Rendering only reads the scene.

use crate::bvh::{Bvh, BvhStats};
use crate::surface::{Surface, SurfaceId};
use crate::{Camera, Light};
use umbra_core::RenderSettings;
use umbra_math::{Ray, Vec3};

/// Result of a nearest-hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub surface: SurfaceId,
    /// Distance along the (normalized) ray
    pub distance: f32,
    pub point: Vec3,
    /// Outward surface normal at `point`, not yet flipped toward the ray
    pub normal: Vec3,
    /// True surface normal, used to tell entering from exiting
    pub geometric_normal: Vec3,
}

/// Everything needed to render one image.
#[derive(Debug)]
pub struct Scene {
    pub camera: Camera,
    pub settings: RenderSettings,
    surfaces: Vec<Surface>,
    lights: Vec<Light>,
    bvh: Bvh,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            camera: Camera::default(),
            settings,
            surfaces: Vec::new(),
            lights: Vec::new(),
            bvh: Bvh::new(),
        }
    }

    /// Set the camera, builder style.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Add a surface and index it.
    pub fn add_surface(&mut self, surface: Surface) -> SurfaceId {
        if !surface.might_intersect(&self.bvh.bounds()) {
            log::warn!(
                "Surface {} lies outside the indexed world bounds and will not be visible",
                self.surfaces.len()
            );
        }

        let id = SurfaceId(self.surfaces.len());
        self.surfaces.push(surface);
        self.bvh.insert(id, &self.surfaces);
        id
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.index()]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn bvh_stats(&self) -> BvhStats {
        self.bvh.stats()
    }

    /// Nearest surface hit by `ray`, through the spatial index.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Intersection> {
        let (surface, distance) = self.bvh.nearest(ray, &self.surfaces)?;
        Some(self.intersection(ray, surface, distance))
    }

    /// Nearest surface hit by `ray`, testing every surface.
    pub fn brute_force_nearest(&self, ray: &Ray) -> Option<Intersection> {
        let (surface, distance) = self
            .surfaces
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.intersect(ray).map(|t| (SurfaceId(i), t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        Some(self.intersection(ray, surface, distance))
    }

    /// Whether a surface other than `exclude` blocks `ray` before `max_dist`.
    pub fn occluded(&self, ray: &Ray, max_dist: f32, exclude: Option<SurfaceId>) -> bool {
        self.bvh.occluded(ray, max_dist, exclude, &self.surfaces)
    }

    fn intersection(&self, ray: &Ray, surface: SurfaceId, distance: f32) -> Intersection {
        let point = ray.at(distance);
        let hit_surface = self.surface(surface);
        Intersection {
            surface,
            distance,
            point,
            normal: hit_surface.normal_at(point),
            geometric_normal: hit_surface.geometric_normal_at(point),
        }
    }
}
