use crate::{Point3, Vector};

/// A ray in 3D space with an origin and a unit direction.
///
/// The direction is normalized on construction, so `t` in [`Ray::point_at`]
/// is always a true distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vector,
}

impl Ray {
    /// Create a new ray. `direction` is normalized.
    pub fn new(origin: Point3, direction: Vector) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Create a ray whose origin is pushed `delta` off a surface along its
    /// `normal`, on the side that `direction` heads toward.
    ///
    /// Used for shadow, reflection and refraction rays so they do not
    /// immediately hit the surface they start on.
    pub fn offset(point: Point3, direction: Vector, normal: &Vector, delta: f64) -> Self {
        let shift = if normal.dot(&direction) > 0.0 { delta } else { -delta };
        Self::new(point.translate(normal.as_dvec() * shift), direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Get the (unit) direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin.translate(self.direction.as_dvec() * t)
    }

    /// The point of `points` nearest to the ray origin.
    pub fn find_closest_point(&self, points: &[Point3]) -> Option<Point3> {
        points
            .iter()
            .min_by(|a, b| {
                a.distance_squared(&self.origin)
                    .total_cmp(&b.distance_squared(&self.origin))
            })
            .copied()
    }
}
