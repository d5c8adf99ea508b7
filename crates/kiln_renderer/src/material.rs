//! Surface material coefficients for Phong shading.

/// Phong-style material.
///
/// All coefficients default to zero, so a default material is black under
/// direct light and neither reflects nor transmits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse coefficient.
    pub kd: f64,
    /// Specular coefficient.
    pub ks: f64,
    /// Specular exponent.
    pub shininess: i32,
    /// Transparency (refraction) coefficient.
    pub kt: f64,
    /// Reflection coefficient.
    pub kr: f64,
    /// Distance from the surface to the jitter disc used for glossy and
    /// blurry secondary rays. `f64::INFINITY` means a single ideal ray.
    pub glossiness: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: 0.0,
            ks: 0.0,
            shininess: 0,
            kt: 0.0,
            kr: 0.0,
            glossiness: f64::INFINITY,
        }
    }
}

impl Material {
    /// Set the diffuse coefficient.
    pub fn with_kd(mut self, kd: f64) -> Self {
        self.kd = kd;
        self
    }

    /// Set the specular coefficient.
    pub fn with_ks(mut self, ks: f64) -> Self {
        self.ks = ks;
        self
    }

    /// Set the specular exponent.
    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Set the transparency coefficient.
    pub fn with_kt(mut self, kt: f64) -> Self {
        self.kt = kt;
        self
    }

    /// Set the reflection coefficient.
    pub fn with_kr(mut self, kr: f64) -> Self {
        self.kr = kr;
        self
    }

    /// Set the glossy disc distance; `f64::INFINITY` for ideal rays.
    pub fn with_glossiness(mut self, glossiness: f64) -> Self {
        self.glossiness = glossiness;
        self
    }

    /// Blocks light completely when it sits between a point and a light.
    pub fn is_opaque(&self) -> bool {
        self.kt == 0.0
    }

    /// Whether secondary rays are spread into a bundle.
    pub fn is_glossy(&self) -> bool {
        self.glossiness.is_finite() && self.glossiness > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let m = Material::default();
        assert_eq!(m.kd, 0.0);
        assert_eq!(m.shininess, 0);
        assert!(m.is_opaque());
        assert!(!m.is_glossy());
    }

    #[test]
    fn test_builders() {
        let m = Material::default()
            .with_kd(0.4)
            .with_ks(0.3)
            .with_shininess(100)
            .with_kt(0.5)
            .with_kr(0.2)
            .with_glossiness(5.0);
        assert_eq!(m.kd, 0.4);
        assert_eq!(m.ks, 0.3);
        assert_eq!(m.shininess, 100);
        assert_eq!(m.kr, 0.2);
        assert!(!m.is_opaque());
        assert!(m.is_glossy());
        assert!(!m.with_glossiness(0.0).is_glossy());
    }
}
