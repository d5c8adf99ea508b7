//! Sphere primitive.

use kiln_math::{align_zero, Aabb, DVec3, Point3, Ray, Vector};

use crate::geometry::{positive, within_range, GeometryResult, Surface};

/// A sphere given by center and radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: Point3, radius: f64) -> GeometryResult<Self> {
        let radius = positive("sphere radius", radius)?;
        let rvec = DVec3::splat(radius);
        let bbox = Aabb::from_points(center.translate(-rvec), center.translate(rvec));

        Ok(Self {
            center,
            radius,
            bbox,
        })
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn normal_at(&self, point: &Point3) -> GeometryResult<Vector> {
        Ok(point.subtract(&self.center)?.normalized())
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3> {
        // Project the center onto the ray: tm is the foot of the
        // perpendicular, d2 its squared distance to the center.
        let u = self.center.as_dvec() - ray.origin().as_dvec();
        let tm = align_zero(ray.direction().as_dvec().dot(u));
        let d2 = align_zero(u.length_squared() - tm * tm);
        let th2 = align_zero(self.radius * self.radius - d2);
        if th2 < 0.0 {
            return Vec::new();
        }

        let th = align_zero(th2.sqrt());
        let roots = if th == 0.0 {
            vec![tm]
        } else {
            vec![tm - th, tm + th]
        };

        roots
            .into_iter()
            .filter(|t| within_range(*t, max_distance))
            .map(|t| ray.point_at(t))
            .collect()
    }

    fn bounds(&self) -> GeometryResult<Aabb> {
        Ok(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeometryError;

    fn sphere() -> Sphere {
        Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0).unwrap()
    }

    #[test]
    fn test_invalid_radius() {
        assert!(matches!(
            Sphere::new(Point3::ZERO, 0.0),
            Err(GeometryError::InvalidDimension { .. })
        ));
        assert!(Sphere::new(Point3::ZERO, -2.0).is_err());
    }

    #[test]
    fn test_normal() {
        let n = sphere().normal_at(&Point3::new(2.0, 0.0, 0.0)).unwrap();
        assert_eq!(n, Vector::X);
        assert!(sphere().normal_at(&Point3::new(1.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_normal_is_radial_everywhere() {
        let center = Point3::new(1.0, 2.0, 3.0);
        let s = Sphere::new(center, 2.0).unwrap();
        for (theta, phi) in [(30.0_f64, 10.0_f64), (75.0, 200.0), (120.0, 315.0), (160.0, 45.0)] {
            let (theta, phi) = (theta.to_radians(), phi.to_radians());
            let radial = DVec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            let p = Point3::from_dvec(center.as_dvec() + radial * 2.0);
            let n = s.normal_at(&p).unwrap();
            let outward = p.subtract(&center).unwrap();
            assert!((n.length() - 1.0).abs() < 1e-12);
            assert!(n.as_dvec().cross(outward.as_dvec()).length() < 1e-12);
            assert!(n.dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_ray_misses() {
        let ray = Ray::new(Point3::new(-1.0, 0.0, 0.0), Vector::new(1.0, 1.0, 0.0).unwrap());
        assert!(sphere().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_ray_crosses_twice() {
        let s = Sphere::new(Point3::ZERO, 5.0).unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), -Vector::Z);
        assert_eq!(
            s.intersect(&ray, f64::INFINITY),
            vec![Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, -5.0)]
        );
    }

    #[test]
    fn test_ray_starts_inside() {
        let s = Sphere::new(Point3::ZERO, 5.0).unwrap();
        let ray = Ray::new(Point3::ZERO, Vector::X);
        assert_eq!(s.intersect(&ray, f64::INFINITY), vec![Point3::new(5.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_ray_after_sphere() {
        let s = Sphere::new(Point3::ZERO, 5.0).unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vector::Z);
        assert!(s.intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_tangent_ray_single_point() {
        let s = Sphere::new(Point3::ZERO, 5.0).unwrap();
        let ray = Ray::new(Point3::new(5.0, 0.0, 10.0), -Vector::Z);
        assert_eq!(s.intersect(&ray, f64::INFINITY), vec![Point3::new(5.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_max_distance_clips() {
        let s = Sphere::new(Point3::ZERO, 5.0).unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), -Vector::Z);
        assert_eq!(s.intersect(&ray, 6.0), vec![Point3::new(0.0, 0.0, 5.0)]);
        assert!(s.intersect(&ray, 4.0).is_empty());
    }

    #[test]
    fn test_hit_distance_round_trip() {
        let s = Sphere::new(Point3::new(1.0, 2.0, 3.0), 2.0).unwrap();
        let ray = Ray::new(Point3::new(-4.0, 0.5, 1.0), Vector::new(1.0, 0.3, 0.4).unwrap());
        let hits = s.intersect(&ray, f64::INFINITY);
        assert_eq!(hits.len(), 2);
        for p in hits {
            let t = p.distance(&ray.origin());
            assert_eq!(ray.point_at(t), p);
            assert!((p.distance(&s.center()) - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bounds() {
        let b = Sphere::new(Point3::ZERO, 5.0).unwrap().bounds().unwrap();
        assert_eq!(b.min(), Point3::new(-5.0, -5.0, -5.0));
        assert_eq!(b.max(), Point3::new(5.0, 5.0, 5.0));
    }
}
