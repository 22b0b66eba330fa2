//! Light sources.

use umbra_core::Color;
use umbra_math::Vec3;

/// Upper bound on the inverse-square gain of a point light, so surfaces
/// touching a bulb do not blow up to infinity.
pub const MAX_POINT_LIGHT_GAIN: f32 = 100.0;

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Infinitely distant light ("sun"); `direction` points toward the light.
    Directional { direction: Vec3, color: Color },
    /// Positional light ("bulb") with inverse-square falloff.
    Point { position: Vec3, color: Color },
}

impl Light {
    /// Directional light shining from `direction` (need not be normalized).
    pub fn directional(direction: Vec3, color: Color) -> Self {
        Light::Directional {
            direction: direction.normalize(),
            color,
        }
    }

    pub fn point(position: Vec3, color: Color) -> Self {
        Light::Point { position, color }
    }

    /// Unit vector from `p` toward the light.
    pub fn direction_to(&self, p: Vec3) -> Vec3 {
        match self {
            Light::Directional { direction, .. } => *direction,
            Light::Point { position, .. } => (*position - p).normalize(),
        }
    }

    /// Distance from `p` to the light; infinite for directional lights.
    pub fn distance(&self, p: Vec3) -> f32 {
        match self {
            Light::Directional { .. } => f32::INFINITY,
            Light::Point { position, .. } => (*position - p).length(),
        }
    }

    /// Light arriving at `p` before any surface term.
    pub fn intensity(&self, p: Vec3) -> Color {
        match self {
            Light::Directional { color, .. } => *color,
            Light::Point { color, .. } => {
                let d = self.distance(p);
                *color * (1.0 / (d * d)).min(MAX_POINT_LIGHT_GAIN)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_light_is_constant() {
        let sun = Light::directional(Vec3::new(0.0, 2.0, 0.0), Color::ONE);
        for p in [Vec3::ZERO, Vec3::new(10.0, -4.0, 3.0)] {
            assert_eq!(sun.direction_to(p), Vec3::Y);
            assert_eq!(sun.intensity(p), Color::ONE);
            assert!(sun.distance(p).is_infinite());
        }
    }

    #[test]
    fn test_point_light_falloff() {
        let bulb = Light::point(Vec3::new(0.0, 2.0, 0.0), Color::ONE);
        let p = Vec3::ZERO;

        assert_eq!(bulb.direction_to(p), Vec3::Y);
        assert!((bulb.distance(p) - 2.0).abs() < 1e-6);
        assert!((bulb.intensity(p) - Color::splat(0.25)).length() < 1e-6);
    }

    #[test]
    fn test_point_light_gain_is_capped() {
        let bulb = Light::point(Vec3::ZERO, Color::ONE);
        let close = bulb.intensity(Vec3::new(0.0, 0.001, 0.0));
        assert_eq!(close, Color::splat(MAX_POINT_LIGHT_GAIN));

        let at_light = bulb.intensity(Vec3::ZERO);
        assert_eq!(at_light, Color::splat(MAX_POINT_LIGHT_GAIN));
    }
}
