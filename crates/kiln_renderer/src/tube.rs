//! Infinite tube around an axis ray.

use kiln_math::{align_zero, Aabb, DVec3, Point3, Ray, Vector};

use crate::geometry::{positive, within_range, GeometryError, GeometryResult, Surface};

/// An infinite cylinder surface (no caps) of fixed radius around `axis`.
#[derive(Debug, Clone)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    /// Create a tube around `axis`. The radius must be positive.
    pub fn new(axis: Ray, radius: f64) -> GeometryResult<Self> {
        Ok(Self {
            axis,
            radius: positive("tube radius", radius)?,
        })
    }

    /// Axis ray.
    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed position of `point` along the axis, measured from its origin.
    pub(crate) fn axial_offset(&self, point: &Point3) -> f64 {
        let ap = point.as_dvec() - self.axis.origin().as_dvec();
        align_zero(ap.dot(self.axis.direction().as_dvec()))
    }

    /// Distances along `ray` where it crosses the side surface, ascending.
    ///
    /// With `v` the ray direction, `ab` the axis direction and `ao` the
    /// vector from the axis origin to the ray origin, solves
    /// `|v x ab|^2 t^2 + 2 (v x ab).(ao x ab) t + |ao x ab|^2 - r^2 = 0`.
    pub(crate) fn side_distances(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        let ab = self.axis.direction().as_dvec();
        let ao = ray.origin().as_dvec() - self.axis.origin().as_dvec();
        let v_x_ab = ray.direction().as_dvec().cross(ab);
        let ao_x_ab = ao.cross(ab);

        let a = align_zero(v_x_ab.length_squared());
        if a == 0.0 {
            // parallel to the axis
            return Vec::new();
        }
        let b = 2.0 * v_x_ab.dot(ao_x_ab);
        let c = ao_x_ab.length_squared() - self.radius * self.radius;

        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            return Vec::new();
        }

        let sqrtd = discriminant.sqrt();
        [(-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)]
            .into_iter()
            .map(align_zero)
            .filter(|t| within_range(*t, max_distance))
            .collect()
    }
}

impl Surface for Tube {
    fn normal_at(&self, point: &Point3) -> GeometryResult<Vector> {
        let t = self.axial_offset(point);
        let center: DVec3 = self.axis.point_at(t).as_dvec();
        Ok(Vector::from_dvec(point.as_dvec() - center)?.normalized())
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3> {
        self.side_distances(ray, max_distance)
            .into_iter()
            .map(|t| ray.point_at(t))
            .collect()
    }

    fn bounds(&self) -> GeometryResult<Aabb> {
        Err(GeometryError::Unbounded { kind: "tube" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_tube() -> Tube {
        Tube::new(Ray::new(Point3::new(1.0, 0.0, 0.0), Vector::X), 1.0).unwrap()
    }

    #[test]
    fn test_invalid_radius() {
        assert!(Tube::new(Ray::new(Point3::ZERO, Vector::X), 0.0).is_err());
    }

    #[test]
    fn test_normal() {
        let tube = Tube::new(Ray::new(Point3::ZERO, Vector::X), 1.0).unwrap();
        assert_eq!(tube.normal_at(&Point3::new(5.0, 0.0, 1.0)).unwrap(), Vector::Z);
        assert_eq!(tube.normal_at(&Point3::new(-3.0, -1.0, 0.0)).unwrap(), -Vector::Y);
    }

    #[test]
    fn test_normal_on_axis_fails() {
        let tube = Tube::new(Ray::new(Point3::ZERO, Vector::X), 1.0).unwrap();
        assert!(tube.normal_at(&Point3::new(-5.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_ray_crosses_tube() {
        let ray = Ray::new(Point3::new(3.0, 0.0, 5.0), -Vector::Z);
        assert_eq!(
            x_tube().intersect(&ray, f64::INFINITY),
            vec![Point3::new(3.0, 0.0, 1.0), Point3::new(3.0, 0.0, -1.0)]
        );
    }

    #[test]
    fn test_ray_from_inside() {
        let ray = Ray::new(Point3::new(3.0, 0.0, 0.0), Vector::Y);
        assert_eq!(
            x_tube().intersect(&ray, f64::INFINITY),
            vec![Point3::new(3.0, 1.0, 0.0)]
        );
    }

    #[test]
    fn test_ray_misses_and_parallel() {
        let ray = Ray::new(Point3::new(3.0, 5.0, 5.0), -Vector::Z);
        assert!(x_tube().intersect(&ray, f64::INFINITY).is_empty());

        let ray = Ray::new(Point3::new(0.0, 0.5, 0.0), Vector::X);
        assert!(x_tube().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_tangent_ray_misses() {
        let ray = Ray::new(Point3::new(3.0, 1.0, 5.0), -Vector::Z);
        assert!(x_tube().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_max_distance() {
        let ray = Ray::new(Point3::new(3.0, 0.0, 5.0), -Vector::Z);
        assert_eq!(x_tube().intersect(&ray, 5.0), vec![Point3::new(3.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_unbounded() {
        assert_eq!(
            x_tube().bounds(),
            Err(GeometryError::Unbounded { kind: "tube" })
        );
    }
}
