//! Convex planar polygons, triangles included.

use kiln_math::{align_zero, is_zero, Aabb, Point3, Ray, Vector};

use crate::geometry::{GeometryError, GeometryResult, Surface};
use crate::Plane;

/// A convex polygon. Vertices are ordered along its edge path.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Point3>,
    plane: Plane,
    bbox: Aabb,
}

impl Polygon {
    /// Build a polygon, validating that the vertices:
    /// - number at least three,
    /// - contain no repeated or colinear consecutive points,
    /// - all lie in the plane of the first three,
    /// - turn the same way at every corner (convex, ordered),
    /// - wind around the interior exactly once.
    pub fn new(vertices: Vec<Point3>) -> GeometryResult<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(GeometryError::TooFewVertices(n));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let normal = plane.normal();

        for v in &vertices[3..] {
            let offset = v
                .subtract(&vertices[0])
                .map_err(|_| GeometryError::DegenerateVertices)?;
            if !is_zero(offset.dot(&normal)) {
                return Err(GeometryError::NonCoplanar);
            }
        }

        let edge = |i: usize| {
            vertices[(i + 1) % n]
                .subtract(&vertices[i % n])
                .map_err(|_| GeometryError::DegenerateVertices)
        };

        let mut turn = None;
        for i in 0..n {
            let corner = edge(i)?
                .cross(&edge(i + 1)?)
                .map_err(|_| GeometryError::DegenerateVertices)?;
            let positive = corner.dot(&normal) > 0.0;
            match turn {
                None => turn = Some(positive),
                Some(previous) if previous != positive => return Err(GeometryError::NonConvex),
                Some(_) => {}
            }
        }

        // Same-sign corners still admit a star that winds more than once.
        // Every other vertex must sit strictly on the inner side of each edge.
        let inward = turn == Some(true);
        for i in 0..n {
            let e = edge(i)?;
            for j in (0..n).filter(|&j| j != i && j != (i + 1) % n) {
                let side = vertices[j]
                    .subtract(&vertices[i])
                    .and_then(|to| e.cross(&to))
                    .map(|c| align_zero(c.dot(&normal)))
                    .unwrap_or(0.0);
                if side == 0.0 || (side > 0.0) != inward {
                    return Err(GeometryError::NonConvex);
                }
            }
        }

        let (min, max) = vertices[1..]
            .iter()
            .fold((vertices[0], vertices[0]), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let bbox = Aabb::from_points(min, max);

        Ok(Self {
            vertices,
            plane,
            bbox,
        })
    }

    /// Convenience constructor for a triangle.
    pub fn triangle(a: Point3, b: Point3, c: Point3) -> GeometryResult<Self> {
        Self::new(vec![a, b, c])
    }

    /// Vertices in edge order.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// The supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Whether a point already known to lie in the plane is strictly inside.
    /// Points on an edge or vertex are outside.
    fn contains(&self, point: &Point3) -> bool {
        let normal = self.plane.normal();
        let n = self.vertices.len();
        let mut side = None;

        for i in 0..n {
            let (Ok(a), Ok(b)) = (
                self.vertices[i].subtract(point),
                self.vertices[(i + 1) % n].subtract(point),
            ) else {
                return false;
            };
            let Ok(cross) = a.cross(&b) else {
                return false;
            };
            let d = align_zero(cross.dot(&normal));
            if d == 0.0 {
                return false;
            }
            match side {
                None => side = Some(d > 0.0),
                Some(previous) if previous != (d > 0.0) => return false,
                Some(_) => {}
            }
        }
        true
    }
}

impl Surface for Polygon {
    fn normal_at(&self, _point: &Point3) -> GeometryResult<Vector> {
        Ok(self.plane.normal())
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3> {
        self.plane
            .intersect(ray, max_distance)
            .into_iter()
            .filter(|p| self.contains(p))
            .collect()
    }

    fn bounds(&self) -> GeometryResult<Aabb> {
        Ok(self.bbox)
    }
}
