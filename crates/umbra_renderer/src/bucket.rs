//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use crate::renderer::{color_to_rgba, render_pixel};
use crate::Scene;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }
    
    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
/// 
/// A `bucket_size` of zero is treated as one pixel.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;
    
    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }
    
    // Sort by distance from center (spiral order)
    sort_spiral(&mut buckets, width, height);
    
    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }
    
    buckets
}

/// Sort buckets by distance from image center (spiral order).
/// 
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    
    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;
        
        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);
        
        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Seed for the generator of the bucket whose top-left corner is `(x, y)`.
pub fn bucket_seed(base: u64, x: u32, y: u32) -> u64 {
    let origin = (u64::from(y) << 32) | u64::from(x);
    base ^ origin.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render a single bucket to tone-mapped RGBA pixels.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(bucket: &Bucket, scene: &Scene) -> BucketResult {
    let settings = &scene.settings;
    let mut rng = StdRng::seed_from_u64(bucket_seed(settings.seed, bucket.x, bucket.y));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(scene, global_x, global_y, &mut rng);
            pixels.push(color_to_rgba(color, settings.exposure));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// RGBA pixels in row-major order
    pub pixels: Vec<[u8; 4]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 4]>) -> Self {
        Self { bucket, pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid
        
        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }
    
    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets
        
        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }
    
    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid
        
        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
    }

    #[test]
    fn test_buckets_cover_every_pixel_once() {
        let (width, height) = (37, 23);
        let mut seen = vec![0u8; (width * height) as usize];
        for bucket in generate_buckets(width, height, 8) {
            for y in bucket.y..bucket.y + bucket.height {
                for x in bucket.x..bucket.x + bucket.width {
                    seen[(y * width + x) as usize] += 1;
                }
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_zero_bucket_size_is_clamped() {
        let buckets = generate_buckets(3, 2, 0);
        assert_eq!(buckets.len(), 6);
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let a = bucket_seed(7, 0, 0);
        let b = bucket_seed(7, 64, 0);
        let c = bucket_seed(7, 0, 64);
        assert!(a != b && b != c && a != c);
        assert_eq!(bucket_seed(7, 64, 0), b);
        assert_ne!(bucket_seed(8, 64, 0), b);
    }

    #[test]
    fn test_render_bucket_pixel_layout() {
        use crate::{Light, Sphere, Surface};
        use umbra_core::{Color, Material, RenderSettings};
        use umbra_math::Vec3;

        let settings = RenderSettings::default().with_resolution(8, 8);
        let mut scene = Scene::new(settings);
        scene.add_surface(Surface::new(
            Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.4),
            Material::default(),
        ));
        scene.add_light(Light::directional(Vec3::Z, Color::ONE));

        let corner = Bucket::new(0, 0, 4, 4, 0);
        let result = render_bucket(&corner, &scene);
        assert_eq!(result.pixels.len(), 16);
        // Top-left pixel misses; bottom-right lies inside the silhouette for any jitter
        assert_eq!(result.pixels[0], [0, 0, 0, 0]);
        assert_eq!(result.pixels[15][3], 255);
    }
}
