//! Camera for primary ray generation.

use crate::gen_f32;
use rand::RngCore;
use umbra_core::RenderSettings;
use umbra_math::{Ray, Vec3};

/// Pinhole (or thin-lens) camera described by an eye point and a basis.
///
/// The length of `forward` acts as a zoom factor: a longer forward vector
/// narrows the field of view. `right` and `up` are kept unit length and
/// orthogonal to `forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Camera at the origin looking down -Z with +Y up.
    pub fn new() -> Self {
        Self {
            eye: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    /// Point the camera along `forward`, keeping its length as zoom.
    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward;
        self.right = self.forward.cross(self.up).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.right = self.forward.cross(self.up).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }

    pub fn set_right(&mut self, right: Vec3) {
        self.right = right;
        self.up = self.right.cross(self.forward).normalize();
        self.right = self.forward.cross(self.up).normalize();
    }

    pub fn with_eye(mut self, eye: Vec3) -> Self {
        self.set_eye(eye);
        self
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.set_forward(forward);
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.set_up(up);
        self
    }

    pub fn with_right(mut self, right: Vec3) -> Self {
        self.set_right(right);
        self
    }

    /// Generate one primary ray through pixel `(x, y)`.
    ///
    /// The sample position is jittered uniformly within the pixel. Returns
    /// `None` for fisheye samples that fall outside the image circle.
    pub fn primary_ray(
        &self,
        settings: &RenderSettings,
        x: u32,
        y: u32,
        rng: &mut dyn RngCore,
    ) -> Option<Ray> {
        let (jx, jy) = (gen_f32(rng), gen_f32(rng));

        let w = settings.width as f32;
        let h = settings.height as f32;
        let scale = w.max(h);
        let mut sx = (2.0 * (x as f32 + jx) - w) / scale;
        let mut sy = (h - 2.0 * (y as f32 + jy)) / scale;

        let direction = if settings.fisheye {
            let zoom = self.forward.length();
            sx /= zoom;
            sy /= zoom;
            let r2 = sx * sx + sy * sy;
            if r2 > 1.0 {
                return None;
            }
            self.forward.normalize() * (1.0 - r2).sqrt() + sx * self.right + sy * self.up
        } else {
            self.forward + sx * self.right + sy * self.up
        };
        let direction = direction.normalize();

        let Some(dof) = settings.dof else {
            return Some(Ray::new(self.eye, direction));
        };

        let focal_point = self.eye + direction * dof.focus;
        let lens = random_in_unit_disk(rng) * dof.lens;
        let origin = self.eye + lens.x * self.right + lens.y * self.up;
        Some(Ray::new(origin, (focal_point - origin).normalize()))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit disk (z = 0).
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
