//! Surface response shared by every object kind.

use rtx_math::Color;

/// How a surface splits incoming light.
///
/// `reflectance` and `transmittance` are per-channel ratios; `diffuse` blends
/// between a mirror-like (0.0) and a matte (1.0) response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    reflectance: Color,
    transmittance: Color,
    eta: f32,
    diffuse: f32,
    /// reflectance + transmittance, used when refraction turns into total reflection
    combined: Color,
}

impl Material {
    /// An opaque material with the given reflectance and no transmission.
    pub fn new(reflectance: Color) -> Self {
        Self {
            reflectance,
            transmittance: Color::ZERO,
            eta: 1.0,
            diffuse: 0.0,
            combined: reflectance,
        }
    }

    /// Let light through with the given per-channel ratio and refractive index.
    pub fn with_transmittance(mut self, transmittance: Color, eta: f32) -> Self {
        self.transmittance = transmittance;
        self.eta = if eta > 0.0 { eta } else { 1.0 };
        self.combined = self.reflectance + transmittance;
        self
    }

    /// Set the diffuse-vs-specular blend, clamped to [0, 1].
    pub fn with_diffuse(mut self, diffuse: f32) -> Self {
        self.diffuse = diffuse.clamp(0.0, 1.0);
        self
    }

    pub fn reflectance(&self) -> Color {
        self.reflectance
    }

    pub fn transmittance(&self) -> Color {
        self.transmittance
    }

    /// Refractive index of the medium behind the surface.
    pub fn eta(&self) -> f32 {
        self.eta
    }

    pub fn diffuse(&self) -> f32 {
        self.diffuse
    }

    /// Cached `reflectance + transmittance`.
    pub fn combined_ratio(&self) -> Color {
        self.combined
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::splat(0.5)).with_diffuse(1.0)
    }
}
