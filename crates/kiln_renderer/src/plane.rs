//! Infinite plane.

use kiln_math::{align_zero, Aabb, Point3, Ray, Vector};

use crate::geometry::{within_range, GeometryError, GeometryResult, Surface};

/// An infinite plane through a reference point.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Point3,
    normal: Vector,
}

impl Plane {
    /// Plane through `point` with the given normal (normalized here).
    pub fn new(point: Point3, normal: Vector) -> Self {
        Self {
            point,
            normal: normal.normalized(),
        }
    }

    /// Plane through three points. The normal is `(p1 - p2) x (p2 - p3)`,
    /// and `p1` becomes the reference point.
    pub fn from_points(p1: Point3, p2: Point3, p3: Point3) -> GeometryResult<Self> {
        let degenerate = |_| GeometryError::DegenerateVertices;
        let v1 = p1.subtract(&p2).map_err(degenerate)?;
        let v2 = p2.subtract(&p3).map_err(degenerate)?;
        let normal = v1.cross(&v2).map_err(degenerate)?;
        Ok(Self::new(p1, normal))
    }

    /// Reference point on the plane.
    pub fn point(&self) -> Point3 {
        self.point
    }

    /// Unit normal.
    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Distance along `ray` to the plane, if it lies in `(0, max_distance]`.
    pub(crate) fn intersect_distance(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        let to_plane = self.point.subtract(&ray.origin()).ok()?;
        let nv = align_zero(self.normal.dot(&ray.direction()));
        if nv == 0.0 {
            return None;
        }

        let t = align_zero(self.normal.dot(&to_plane) / nv);
        within_range(t, max_distance).then_some(t)
    }
}

impl Surface for Plane {
    fn normal_at(&self, _point: &Point3) -> GeometryResult<Vector> {
        Ok(self.normal)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3> {
        self.intersect_distance(ray, max_distance)
            .map(|t| ray.point_at(t))
            .into_iter()
            .collect()
    }

    fn bounds(&self) -> GeometryResult<Aabb> {
        Err(GeometryError::Unbounded { kind: "plane" })
    }
}
