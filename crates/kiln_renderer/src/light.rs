//! Light sources.

use kiln_math::{align_zero, Color, MathResult, Point3, Vector};

/// Uniform light added once to every visible point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient contribution.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color::ZERO,
    };

    /// Ambient light of a fixed intensity.
    pub fn new(intensity: Color) -> Self {
        Self { intensity }
    }

    /// Ambient light given as a color scaled by an attenuation factor.
    pub fn with_factor(color: Color, ka: f64) -> Self {
        Self::new(color * ka)
    }

    /// Intensity added to every visible point.
    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

/// A light that illuminates points from a direction.
pub trait LightSource: Send + Sync {
    /// Light arriving at `point`.
    fn intensity(&self, point: &Point3) -> Color;

    /// Unit direction the light travels to reach `point` (from the light
    /// toward the point). Fails when `point` sits on the light itself.
    fn direction_to(&self, point: &Point3) -> MathResult<Vector>;

    /// Distance from `point` to the light, infinite for directional lights.
    fn distance(&self, point: &Point3) -> f64;
}

/// Light from infinitely far away, e.g. the sun.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    color: Color,
    direction: Vector,
}

impl DirectionalLight {
    /// Light travelling along `direction` (normalized here).
    pub fn new(color: Color, direction: Vector) -> Self {
        Self {
            color,
            direction: direction.normalized(),
        }
    }
}

impl LightSource for DirectionalLight {
    fn intensity(&self, _point: &Point3) -> Color {
        self.color
    }

    fn direction_to(&self, _point: &Point3) -> MathResult<Vector> {
        Ok(self.direction)
    }

    fn distance(&self, _point: &Point3) -> f64 {
        f64::INFINITY
    }
}

/// Omnidirectional light at a position, attenuated as
/// `1 / (kc + kl * d + kq * d^2)`.
#[derive(Debug, Clone)]
pub struct PointLight {
    color: Color,
    position: Point3,
    kc: f64,
    kl: f64,
    kq: f64,
}

impl PointLight {
    /// Unattenuated light (`kc = 1`, `kl = kq = 0`).
    pub fn new(color: Color, position: Point3) -> Self {
        Self {
            color,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    /// Set the attenuation `kc + kl * d + kq * d^2`. Callers keep `kc > 0`
    /// and `kl, kq >= 0`; otherwise the intensity can be infinite or NaN.
    /// Scene descriptions are checked with `Attenuation::is_valid`.
    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Self {
        self.kc = kc;
        self.kl = kl;
        self.kq = kq;
        self
    }

    /// Where the light sits.
    pub fn position(&self) -> Point3 {
        self.position
    }
}

impl LightSource for PointLight {
    fn intensity(&self, point: &Point3) -> Color {
        let d2 = point.distance_squared(&self.position);
        self.color / (self.kc + self.kl * d2.sqrt() + self.kq * d2)
    }

    fn direction_to(&self, point: &Point3) -> MathResult<Vector> {
        Ok(point.subtract(&self.position)?.normalized())
    }

    fn distance(&self, point: &Point3) -> f64 {
        point.distance(&self.position)
    }
}

/// A point light concentrated around a direction. Intensity falls off as
/// `max(0, dir . L)^beam_exponent`; larger exponents narrow the beam.
#[derive(Debug, Clone)]
pub struct SpotLight {
    light: PointLight,
    direction: Vector,
    beam_exponent: f64,
}

impl SpotLight {
    /// Spot at `position` aimed along `direction`, unattenuated, beam exponent 1.
    pub fn new(color: Color, position: Point3, direction: Vector) -> Self {
        Self {
            light: PointLight::new(color, position),
            direction: direction.normalized(),
            beam_exponent: 1.0,
        }
    }

    /// Set the attenuation. Same contract as [`PointLight::with_attenuation`].
    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Self {
        self.light = self.light.with_attenuation(kc, kl, kq);
        self
    }

    /// Set the falloff exponent around the beam direction.
    pub fn with_beam_exponent(mut self, beam_exponent: f64) -> Self {
        self.beam_exponent = beam_exponent;
        self
    }
}

impl LightSource for SpotLight {
    fn intensity(&self, point: &Point3) -> Color {
        let Ok(l) = self.light.direction_to(point) else {
            return Color::ZERO;
        };
        let factor = align_zero(self.direction.dot(&l));
        if factor <= 0.0 {
            return Color::ZERO;
        }
        self.light.intensity(point) * factor.powf(self.beam_exponent)
    }

    fn direction_to(&self, point: &Point3) -> MathResult<Vector> {
        self.light.direction_to(point)
    }

    fn distance(&self, point: &Point3) -> f64 {
        self.light.distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_ambient() {
        let a = AmbientLight::with_factor(Color::new(100.0, 50.0, 0.0), 0.5);
        assert_eq!(a.intensity(), Color::new(50.0, 25.0, 0.0));
        assert_eq!(AmbientLight::default(), AmbientLight::NONE);
    }

    #[test]
    fn test_directional() {
        let light = DirectionalLight::new(Color::splat(10.0), Vector::new(0.0, 0.0, -2.0).unwrap());
        let p = Point3::new(3.0, 4.0, 5.0);
        assert_eq!(light.direction_to(&p).unwrap(), -Vector::Z);
        assert_eq!(light.intensity(&p), Color::splat(10.0));
        assert_eq!(light.distance(&p), f64::INFINITY);
    }

    #[test]
    fn test_point_light_attenuation() {
        let light = PointLight::new(Color::splat(100.0), Point3::new(0.0, 0.0, 10.0))
            .with_attenuation(1.0, 0.1, 0.01);
        // 1 + 0.1 * 10 + 0.01 * 100 = 3
        assert!(close(light.intensity(&Point3::ZERO), Color::splat(100.0 / 3.0)));
        assert_eq!(light.direction_to(&Point3::ZERO).unwrap(), -Vector::Z);
        assert!((light.distance(&Point3::ZERO) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_light_default_is_unattenuated() {
        let light = PointLight::new(Color::splat(100.0), Point3::new(0.0, 0.0, 10.0));
        assert!(close(light.intensity(&Point3::new(50.0, 0.0, 0.0)), Color::splat(100.0)));
        assert!(light.direction_to(&Point3::new(0.0, 0.0, 10.0)).is_err());
    }

    #[test]
    fn test_spot_light_beam() {
        let spot = SpotLight::new(Color::splat(100.0), Point3::new(0.0, 0.0, 10.0), -Vector::Z);
        assert!(close(spot.intensity(&Point3::ZERO), Color::splat(100.0)));
        // behind the spot
        assert_eq!(spot.intensity(&Point3::new(0.0, 0.0, 20.0)), Color::ZERO);
        // sideways
        assert_eq!(spot.intensity(&Point3::new(5.0, 0.0, 10.0)), Color::ZERO);

        // 60 degrees off the beam axis: cos = 0.5
        let off_axis = Point3::new(10.0 * 3.0_f64.sqrt(), 0.0, 0.0);
        assert!(close(spot.intensity(&off_axis), Color::splat(50.0)));
        let narrow = spot.with_beam_exponent(3.0);
        assert!(close(narrow.intensity(&off_axis), Color::splat(12.5)));
    }
}
