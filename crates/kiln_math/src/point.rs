use glam::DVec3;

use crate::util::{align_vec, vec_eq};
use crate::{MathResult, Vector};

/// A location in 3D space.
///
/// Coordinates within 2^-20 of zero are snapped to zero on construction, and
/// equality is tolerant to the same epsilon.
#[derive(Debug, Clone, Copy)]
pub struct Point3(DVec3);

impl Point3 {
    /// The origin.
    pub const ZERO: Point3 = Point3(DVec3::ZERO);

    /// Create a point, snapping near-zero coordinates to zero.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_dvec(DVec3::new(x, y, z))
    }

    /// Wrap raw components as a point.
    pub fn from_dvec(v: DVec3) -> Self {
        Self(align_vec(v))
    }

    /// X coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Z coordinate.
    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Coordinate by axis index (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.0.x,
            1 => self.0.y,
            _ => self.0.z,
        }
    }

    /// The raw coordinates.
    #[inline]
    pub fn as_dvec(&self) -> DVec3 {
        self.0
    }

    /// Move this point by a direction vector.
    pub fn add(&self, v: &Vector) -> Point3 {
        Self::from_dvec(self.0 + v.as_dvec())
    }

    /// Move this point by a raw (possibly zero) offset.
    pub fn translate(&self, offset: DVec3) -> Point3 {
        Self::from_dvec(self.0 + offset)
    }

    /// The vector from `other` to `self`. Fails when the points coincide.
    pub fn subtract(&self, other: &Point3) -> MathResult<Vector> {
        Vector::from_dvec(self.0 - other.0)
    }

    /// Squared distance to `other`.
    pub fn distance_squared(&self, other: &Point3) -> f64 {
        self.0.distance_squared(other.0)
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point3) -> f64 {
        self.0.distance(other.0)
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Point3) -> Point3 {
        Self(self.0.min(other.0))
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Point3) -> Point3 {
        Self(self.0.max(other.0))
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        vec_eq(self.0, other.0)
    }
}

impl From<DVec3> for Point3 {
    fn from(v: DVec3) -> Self {
        Self::from_dvec(v)
    }
}
