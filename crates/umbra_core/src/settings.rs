//! Render configuration.

/// Thin-lens depth-of-field parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOfField {
    /// Distance from the eye to the plane of perfect focus
    pub focus: f32,
    /// Radius of the lens disk the ray origins are jittered over
    pub lens: f32,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Anti-aliasing samples per pixel
    pub aa: u32,
    /// Remaining diffuse global-illumination bounces for a camera ray
    pub gi_depth: u32,
    /// Remaining specular (reflection/refraction) bounces for a camera ray
    pub bounces: u32,
    /// Hemispherical fisheye projection instead of rectilinear
    pub fisheye: bool,
    /// Depth of field, disabled when `None`
    pub dof: Option<DepthOfField>,
    /// Exposure compensation applied before gamma, disabled when `None`
    pub exposure: Option<f32>,
    /// Base seed for every random source used while rendering
    pub seed: u64,
    /// Side length of the square tiles the image is scheduled in
    pub bucket_size: u32,
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            aa: 1,
            gi_depth: 0,
            bounces: 4,
            fisheye: false,
            dof: None,
            exposure: None,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderSettings {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set sampling and recursion limits.
    pub fn with_quality(mut self, aa: u32, gi_depth: u32, bounces: u32) -> Self {
        self.aa = aa.max(1);
        self.gi_depth = gi_depth;
        self.bounces = bounces;
        self
    }

    pub fn with_fisheye(mut self, fisheye: bool) -> Self {
        self.fisheye = fisheye;
        self
    }

    /// Enable depth of field.
    pub fn with_dof(mut self, focus: f32, lens: f32) -> Self {
        self.dof = Some(DepthOfField { focus, lens });
        self
    }

    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = Some(exposure);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size.max(1);
        self
    }

    /// Number of output pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.aa, 1);
        assert_eq!(settings.gi_depth, 0);
        assert_eq!(settings.bounces, 4);
        assert!(!settings.fisheye);
        assert!(settings.dof.is_none());
        assert!(settings.exposure.is_none());
    }

    #[test]
    fn test_builders() {
        let settings = RenderSettings::default()
            .with_resolution(4, 3)
            .with_quality(0, 2, 1)
            .with_dof(5.0, 0.1)
            .with_exposure(1.5);

        assert_eq!(settings.pixel_count(), 12);
        // at least one sample per pixel
        assert_eq!(settings.aa, 1);
        assert_eq!(settings.gi_depth, 2);
        assert_eq!(settings.dof, Some(DepthOfField { focus: 5.0, lens: 0.1 }));
        assert_eq!(settings.exposure, Some(1.5));
    }
}
