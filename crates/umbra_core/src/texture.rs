//! Texture loading and sampling.
//!
//! Textures are decoded once during scene assembly, converted from sRGB to
//! linear RGB, and sampled by surfaces at parametric (s, t) coordinates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use umbra_math::Vec3;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Texture buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Texture has zero size")]
    Empty,
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded texture.
///
/// Stores linear RGB texels in row-major order, row 0 at the top of the image.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Linear RGB texels
    pixels: Vec<Vec3>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Build a texture from a decoded 8-bit sRGB RGBA buffer.
    ///
    /// Alpha is ignored.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        bytes: &[u8],
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(TextureError::BufferSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
            path: path.into(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            path: "<solid>".to_string(),
        }
    }

    /// Sample the texture at surface coordinates (s, t) with nearest-texel lookup.
    ///
    /// `s` runs left to right and `t` top to bottom, both over [0, 1];
    /// coordinates outside that range are clamped to the border.
    pub fn sample(&self, s: f32, t: f32) -> Vec3 {
        let s = if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let x = (s * (self.width - 1) as f32) as u32;
        let y = (t * (self.height - 1) as f32) as u32;
        self.texel(x, y)
    }

    /// Get the texel at integer coordinates.
    pub fn texel(&self, x: u32, y: u32) -> Vec3 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Vec3>()
    }
}

/// Cache for loaded textures.
///
/// A scene that switches back to a texture it already used shares the same
/// decoded buffer.
pub struct TextureCache {
    /// Cached textures by the path they were requested with
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Register an already decoded texture under `path`.
    pub fn insert(&mut self, path: &str, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(path.to_string(), texture.clone());
        texture
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: path.display().to_string(),
        source,
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Texture::from_rgba8(width, height, rgba.as_raw(), path.to_string_lossy())
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: white, black / black, red
        let bytes = [
            255, 255, 255, 255, 0, 0, 0, 255, //
            0, 0, 0, 255, 255, 0, 0, 255,
        ];
        Texture::from_rgba8(2, 2, &bytes, "checker").unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);

        let sample = tex.sample(0.5, 0.5);
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_sample_corners() {
        let tex = checker();

        assert!((tex.sample(0.0, 0.0) - Vec3::ONE).length() < 1e-4);
        assert_eq!(tex.sample(1.0, 0.0), Vec3::ZERO);
        assert_eq!(tex.sample(0.0, 1.0), Vec3::ZERO);
        assert!((tex.sample(1.0, 1.0) - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = checker();

        assert_eq!(tex.sample(-3.0, -3.0), tex.sample(0.0, 0.0));
        assert_eq!(tex.sample(7.0, 7.0), tex.sample(1.0, 1.0));
        assert_eq!(tex.sample(f32::NAN, 0.0), tex.sample(0.0, 0.0));
    }

    #[test]
    fn test_from_rgba8_rejects_wrong_length() {
        let result = Texture::from_rgba8(2, 2, &[0; 12], "short");
        assert!(matches!(
            result,
            Err(TextureError::BufferSize {
                expected: 16,
                actual: 12,
                ..
            })
        ));
        assert!(matches!(
            Texture::from_rgba8(0, 4, &[], "empty"),
            Err(TextureError::Empty)
        ));
    }

    #[test]
    fn test_texture_cache_insert_and_get() {
        let mut cache = TextureCache::new();
        assert!(cache.is_empty());

        let inserted = cache.insert("checker.png", checker());
        let fetched = cache.get("checker.png").unwrap();
        assert!(Arc::ptr_eq(&inserted, &fetched));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_texture_cache_missing_file() {
        let mut cache = TextureCache::with_base_dir("/nonexistent-umbra-dir");
        assert!(matches!(
            cache.load("missing.png"),
            Err(TextureError::Load { .. })
        ));
    }

    #[test]
    fn test_srgb_to_linear() {
        // Black stays black
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);

        // White stays white
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
