//! Direct lighting with shadow rays.

use crate::{Light, Scene, SurfaceId};
use umbra_core::Color;
use umbra_math::{Ray, Vec3, RAY_EPSILON};

/// Contribution of a single light to a shaded point.
///
/// Casts a shadow ray toward the light. Any surface other than `surface` that
/// sits between the point and the light blocks it completely. The result is
/// the Lambertian term times the light intensity and surface color, clamped
/// to `[0, 1]` per channel.
pub fn illuminate(
    scene: &Scene,
    light: &Light,
    surface: SurfaceId,
    point: Vec3,
    normal: Vec3,
) -> Color {
    let to_light = light.direction_to(point);
    let shadow_ray = Ray::new(point, to_light).nudged();

    // The nudge eats into the distance, and a bounce light sits on a surface
    // of its own, so stop just short of it.
    let max_dist = light.distance(point) - 2.0 * RAY_EPSILON;
    if scene.occluded(&shadow_ray, max_dist, Some(surface)) {
        return Color::ZERO;
    }

    let lambert = to_light.dot(normal).max(0.0);
    let color = scene.surface(surface).color_at(point);
    (lambert * light.intensity(point) * color).clamp(Color::ZERO, Color::ONE)
}
