//! Finite capped cylinder.

use kiln_math::{align_zero, Aabb, DVec3, Point3, Ray, Vector};

use crate::geometry::{positive, GeometryResult, Surface};
use crate::{Plane, Tube};

/// A tube cut to `[0, height]` along its axis and closed by two discs.
///
/// The base cap lies at the axis origin, the top cap `height` further along
/// the axis direction.
#[derive(Debug, Clone)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    base: Plane,
    top: Plane,
    bbox: Aabb,
}

impl Cylinder {
    /// Create a cylinder along `axis`. Radius and height must be positive.
    pub fn new(axis: Ray, radius: f64, height: f64) -> GeometryResult<Self> {
        let tube = Tube::new(axis, radius)?;
        let height = positive("cylinder height", height)?;
        let direction = axis.direction();
        let base = Plane::new(axis.origin(), direction.reversed());
        let top = Plane::new(axis.point_at(height), direction);

        // Each cap is a disc; its extent along world axis i is
        // r * sqrt(1 - a_i^2) for unit axis direction a.
        let a = direction.as_dvec();
        let extent = |c: f64| (1.0 - c * c).max(0.0).sqrt() * radius;
        let disc = DVec3::new(extent(a.x), extent(a.y), extent(a.z));
        let (b, t) = (base.point().as_dvec(), top.point().as_dvec());
        let bbox = Aabb::from_points(
            Point3::from_dvec(b.min(t) - disc),
            Point3::from_dvec(b.max(t) + disc),
        );

        Ok(Self {
            tube,
            height,
            base,
            top,
            bbox,
        })
    }

    /// Axis ray; the base cap is centred on its origin.
    pub fn axis(&self) -> &Ray {
        self.tube.axis()
    }

    /// Radius of the side and caps.
    pub fn radius(&self) -> f64 {
        self.tube.radius()
    }

    /// Length along the axis.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Hit distance on a cap, if the hit lies strictly inside the disc.
    fn cap_distance(&self, cap: &Plane, ray: &Ray, max_distance: f64) -> Option<f64> {
        let t = cap.intersect_distance(ray, max_distance)?;
        let r = self.radius();
        let inside = align_zero(ray.point_at(t).distance_squared(&cap.point()) - r * r) < 0.0;
        inside.then_some(t)
    }
}

impl Surface for Cylinder {
    fn normal_at(&self, point: &Point3) -> GeometryResult<Vector> {
        let h = self.tube.axial_offset(point);
        if h == 0.0 {
            return Ok(self.base.normal());
        }
        if align_zero(h - self.height) == 0.0 {
            return Ok(self.top.normal());
        }
        self.tube.normal_at(point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3> {
        let mut hits: Vec<f64> = self
            .tube
            .side_distances(ray, max_distance)
            .into_iter()
            .filter(|t| {
                let h = self.tube.axial_offset(&ray.point_at(*t));
                h >= 0.0 && align_zero(h - self.height) <= 0.0
            })
            .collect();

        hits.extend(self.cap_distance(&self.base, ray, max_distance));
        hits.extend(self.cap_distance(&self.top, ray, max_distance));
        hits.sort_by(f64::total_cmp);

        hits.into_iter().map(|t| ray.point_at(t)).collect()
    }

    fn bounds(&self) -> GeometryResult<Aabb> {
        Ok(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_cylinder() -> Cylinder {
        Cylinder::new(Ray::new(Point3::ZERO, Vector::X), 3.0, 10.0).unwrap()
    }

    #[test]
    fn test_invalid_dimensions() {
        let axis = Ray::new(Point3::ZERO, Vector::X);
        assert!(Cylinder::new(axis, 0.0, 1.0).is_err());
        assert!(Cylinder::new(axis, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_normals() {
        let c = x_cylinder();
        // side
        assert_eq!(c.normal_at(&Point3::new(8.0, 0.0, 3.0)).unwrap(), Vector::Z);
        // top cap
        assert_eq!(c.normal_at(&Point3::new(10.0, 1.0, -1.0)).unwrap(), Vector::X);
        // base cap points away from the body
        assert_eq!(c.normal_at(&Point3::new(0.0, 1.0, 1.0)).unwrap(), -Vector::X);
        // interior of the axis has no normal
        assert!(c.normal_at(&Point3::new(5.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_side_hits_within_height() {
        let ray = Ray::new(Point3::new(5.0, 0.0, 10.0), -Vector::Z);
        assert_eq!(
            x_cylinder().intersect(&ray, f64::INFINITY),
            vec![Point3::new(5.0, 0.0, 3.0), Point3::new(5.0, 0.0, -3.0)]
        );
    }

    #[test]
    fn test_side_beyond_height_misses() {
        let ray = Ray::new(Point3::new(15.0, 0.0, 10.0), -Vector::Z);
        assert!(x_cylinder().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_ray_along_axis_hits_both_caps() {
        let ray = Ray::new(Point3::new(-5.0, 1.0, 0.0), Vector::X);
        assert_eq!(
            x_cylinder().intersect(&ray, f64::INFINITY),
            vec![Point3::new(0.0, 1.0, 0.0), Point3::new(10.0, 1.0, 0.0)]
        );
    }

    #[test]
    fn test_ray_through_cap_and_side() {
        let ray = Ray::new(Point3::new(-1.0, 0.0, 0.0), Vector::new(1.0, 0.0, 1.0).unwrap());
        let hits = x_cylinder().intersect(&ray, f64::INFINITY);
        assert_eq!(hits, vec![Point3::new(0.0, 0.0, 1.0), Point3::new(2.0, 0.0, 3.0)]);
    }

    #[test]
    fn test_cap_rim_excluded() {
        let ray = Ray::new(Point3::new(-5.0, 0.0, 3.0), Vector::X);
        assert!(x_cylinder().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_bounds() {
        let b = x_cylinder().bounds().unwrap();
        assert_eq!(b.min(), Point3::new(0.0, -3.0, -3.0));
        assert_eq!(b.max(), Point3::new(10.0, 3.0, 3.0));
    }
}
