//! Surface material coefficients.

use std::sync::Arc;

use umbra_math::Vec3;

use crate::texture::Texture;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Index of refraction used when a scene does not set one (fused silica).
pub const DEFAULT_IOR: f32 = 1.458;

/// Material attributes shared by every surface.
///
/// `shininess` and `transparency` are per-channel weights, which allows tinted
/// mirrors and colored glass. The integrator blends reflection, refraction and
/// diffuse terms as
/// `s·reflect + (1-s)·t·refract + (1-s)·(1-t)·diffuse`.
#[derive(Clone, Debug)]
pub struct Material {
    /// Flat base color, used when there is no texture
    pub color: Color,

    /// Optional texture sampled at the surface's (s, t) coordinates
    pub texture: Option<Arc<Texture>>,

    /// Specular reflection weight
    pub shininess: Color,

    /// Transmission weight
    pub transparency: Color,

    /// Index of refraction
    pub ior: f32,

    /// Standard deviation of the Gaussian normal perturbation
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            texture: None,
            shininess: Color::ZERO,
            transparency: Color::ZERO,
            ior: DEFAULT_IOR,
            roughness: 0.0,
        }
    }
}

impl Material {
    /// Create a plain diffuse material.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_shininess(mut self, shininess: Color) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_transparency(mut self, transparency: Color) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_ior(mut self, ior: f32) -> Self {
        self.ior = ior;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// Weight of the reflection term per channel.
    pub fn reflection_weight(&self) -> Color {
        self.shininess
    }

    /// Weight of the refraction term per channel.
    pub fn refraction_weight(&self) -> Color {
        (Color::ONE - self.shininess) * self.transparency
    }

    /// Weight of the diffuse (direct + indirect) term per channel.
    pub fn diffuse_weight(&self) -> Color {
        (Color::ONE - self.shininess) * (Color::ONE - self.transparency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_is_white_diffuse() {
        let m = Material::default();
        assert_eq!(m.color, Color::ONE);
        assert_eq!(m.diffuse_weight(), Color::ONE);
        assert_eq!(m.reflection_weight(), Color::ZERO);
        assert_eq!(m.refraction_weight(), Color::ZERO);
        assert!((m.ior - 1.458).abs() < 1e-6);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let m = Material::default()
            .with_shininess(Color::new(0.2, 0.5, 1.0))
            .with_transparency(Color::new(0.5, 0.25, 0.0));
        let total = m.reflection_weight() + m.refraction_weight() + m.diffuse_weight();
        assert!((total - Color::ONE).length() < 1e-6);
    }
}
