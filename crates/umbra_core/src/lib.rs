//! Umbra Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Textures**: decoded image buffers sampled at 2D surface coordinates,
//!   plus a path-keyed cache that decodes files through the `image` crate
//! - **Materials**: base color or texture and the specular, transmissive and
//!   roughness coefficients every surface carries
//! - **Render settings**: image size, sampling and recursion limits, lens and
//!   exposure options
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::{Material, RenderSettings, TextureCache};
//!
//! let mut textures = TextureCache::with_base_dir("scenes/");
//! let earth = textures.load("earth.png")?;
//! let material = Material::default().with_texture(earth);
//! let settings = RenderSettings::default().with_resolution(640, 480);
//! ```

pub mod material;
pub mod settings;
pub mod texture;

// Re-export commonly used types
pub use material::{Color, Material, DEFAULT_IOR};
pub use settings::{DepthOfField, RenderSettings, DEFAULT_BUCKET_SIZE};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
