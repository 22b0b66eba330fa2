//! Per-pixel sampling, tone mapping and whole-image rendering.
//!
//! The image is split into buckets that render in parallel. Every bucket
//! draws from its own seeded generator, so output does not depend on how
//! rayon schedules the work.

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{trace, Depth, Scene};
use rand::RngCore;
use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;
use umbra_core::Color;

/// Errors from rendering into a caller-supplied buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("output buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Exposure compensation, `1 - exp(-c * v)` per channel.
#[inline]
pub fn expose(c: Color, exposure: f32) -> Color {
    Color::ONE - (-c * exposure).exp()
}

/// sRGB transfer curve for a linear value, clamped to `[0, 1]`.
///
/// NaN maps to 0.
#[inline]
pub fn gamma(linear: f32) -> f32 {
    if linear.is_nan() {
        return 0.0;
    }
    let l = linear.clamp(0.0, 1.0);
    if l <= 0.0031308 {
        12.92 * l
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert a pixel color to 8-bit RGBA.
///
/// Pixels that saw no geometry are fully transparent black.
pub fn color_to_rgba(color: Option<Color>, exposure: Option<f32>) -> [u8; 4] {
    let Some(color) = color else {
        return [0, 0, 0, 0];
    };
    let color = match exposure {
        Some(v) => expose(color, v),
        None => color,
    };
    let r = (255.0 * gamma(color.x)) as u8;
    let g = (255.0 * gamma(color.y)) as u8;
    let b = (255.0 * gamma(color.z)) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
///
/// Averages the samples whose ray hit something; `None` when none did.
pub fn render_pixel(scene: &Scene, x: u32, y: u32, rng: &mut dyn RngCore) -> Option<Color> {
    let settings = &scene.settings;
    let depth = Depth::from_settings(settings);

    let mut sum = Color::ZERO;
    let mut hits = 0u32;
    for _ in 0..settings.aa.max(1) {
        let Some(ray) = scene.camera.primary_ray(settings, x, y, rng) else {
            continue;
        };
        if let Some(hit) = trace(scene, &ray, depth, rng) {
            sum += hit.color;
            hits += 1;
        }
    }

    (hits > 0).then(|| sum / hits as f32)
}

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

/// Render the scene into a freshly allocated image.
pub fn render(scene: &Scene) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(scene.settings.width, scene.settings.height);
    render_into(scene, &mut image.pixels)?;
    Ok(image)
}

/// Render the scene into `output`, which must hold `4 * width * height` bytes.
pub fn render_into(scene: &Scene, output: &mut [u8]) -> RenderResult<()> {
    let settings = &scene.settings;
    let (width, height) = (settings.width, settings.height);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    let expected = settings.pixel_count() * 4;
    if output.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: output.len(),
        });
    }

    let buckets = generate_buckets(width, height, settings.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp, gi depth {}, {} bounces ({} buckets)",
        width,
        height,
        settings.aa,
        settings.gi_depth,
        settings.bounces,
        buckets.len()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .into_par_iter()
        .map(|bucket| render_bucket(&bucket, scene))
        .collect();

    for result in &results {
        let bucket = result.bucket;
        for (i, rgba) in result.pixels.iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            let offset = (y as usize * width as usize + x as usize) * 4;
            output[offset..offset + 4].copy_from_slice(rgba);
        }
    }

    let elapsed = start.elapsed();
    log::info!(
        "Rendered in {:.2?} ({:.0} pixels/s)",
        elapsed,
        settings.pixel_count() as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}
