//! Direction vectors.
//!
//! A [`Vector`] is never the zero vector: every operation that could produce
//! one returns [`MathError::ZeroVector`] instead. All operations are pure and
//! return new values.

use std::ops::Neg;

use glam::DVec3;

use crate::util::{align_vec, vec_eq};
use crate::{MathError, MathResult};

/// A non-zero vector in 3D space.
#[derive(Debug, Clone, Copy)]
pub struct Vector(DVec3);

impl Vector {
    /// Unit vector along +X.
    pub const X: Vector = Vector(DVec3::X);
    /// Unit vector along +Y.
    pub const Y: Vector = Vector(DVec3::Y);
    /// Unit vector along +Z.
    pub const Z: Vector = Vector(DVec3::Z);

    /// Create a vector from components, rejecting the zero vector.
    pub fn new(x: f64, y: f64, z: f64) -> MathResult<Self> {
        Self::from_dvec(DVec3::new(x, y, z))
    }

    /// Wrap a raw `DVec3`, rejecting the zero vector.
    pub fn from_dvec(v: DVec3) -> MathResult<Self> {
        let v = align_vec(v);
        if v == DVec3::ZERO {
            return Err(MathError::ZeroVector);
        }
        Ok(Self(v))
    }

    /// X component.
    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Y component.
    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Z component.
    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Component by axis index (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.0.x,
            1 => self.0.y,
            _ => self.0.z,
        }
    }

    /// The raw components.
    #[inline]
    pub fn as_dvec(&self) -> DVec3 {
        self.0
    }

    /// Vector sum. Fails if the result is zero.
    pub fn add(&self, other: &Vector) -> MathResult<Vector> {
        Self::from_dvec(self.0 + other.0)
    }

    /// Vector difference. Fails if the result is zero.
    pub fn subtract(&self, other: &Vector) -> MathResult<Vector> {
        Self::from_dvec(self.0 - other.0)
    }

    /// Scale by `factor`. Fails for a zero factor.
    pub fn scale(&self, factor: f64) -> MathResult<Vector> {
        Self::from_dvec(self.0 * factor)
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.0.dot(other.0)
    }

    /// Cross product. Fails for parallel vectors.
    pub fn cross(&self, other: &Vector) -> MathResult<Vector> {
        Self::from_dvec(self.0.cross(other.0))
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.0.length_squared()
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.0.length()
    }

    /// Unit-length copy of this vector.
    pub fn normalized(&self) -> Vector {
        Self(align_vec(self.0 / self.0.length()))
    }

    /// The same vector pointing the other way.
    #[inline]
    pub fn reversed(&self) -> Vector {
        Self(-self.0)
    }

    /// Rotate around `axis` by `degrees`, counter-clockwise when looking
    /// down the axis toward its origin (right-hand rule).
    pub fn rotate(&self, axis: &Vector, degrees: f64) -> MathResult<Vector> {
        let k = axis.normalized().0;
        let (sin, cos) = degrees.to_radians().sin_cos();
        let v = self.0;
        Self::from_dvec(v * cos + k.cross(v) * sin + k * k.dot(v) * (1.0 - cos))
    }

    /// Some unit vector orthogonal to this one.
    pub fn any_orthogonal(&self) -> Vector {
        Self(self.normalized().0.any_orthonormal_vector())
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        vec_eq(self.0, other.0)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.reversed()
    }
}

impl From<Vector> for DVec3 {
    fn from(v: Vector) -> DVec3 {
        v.0
    }
}
