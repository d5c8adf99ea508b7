//! Geometry capability traits and intersection results.
//!
//! Every primitive implements [`Surface`] (normal, raw intersections, bounds).
//! A [`Geometry`] pairs a primitive [`Shape`] with its emission and material
//! and is the unit the rest of the renderer works with through
//! [`Intersectable`].

use kiln_math::{align_zero, Aabb, Color, MathError, Point3, Ray, Vector};
use thiserror::Error;

use crate::{Cylinder, Material, Plane, Polygon, Sphere, Tube};

/// Errors raised while building or querying geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon has repeated or colinear vertices")]
    DegenerateVertices,

    #[error("all polygon vertices must lie in the same plane")]
    NonCoplanar,

    #[error("polygon vertices must be ordered along a convex edge path")]
    NonConvex,

    #[error("{what} must be positive, got {value}")]
    InvalidDimension { what: &'static str, value: f64 },

    #[error("{kind} is unbounded and has no bounding box")]
    Unbounded { kind: &'static str },

    #[error("bounding box needs at least one geometry")]
    EmptyBox,
}

/// Result alias for geometry construction and queries.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Returns true if `t` is a usable hit distance: strictly in front of the ray
/// origin and no further than `max_distance`.
#[inline]
pub(crate) fn within_range(t: f64, max_distance: f64) -> bool {
    align_zero(t) > 0.0 && align_zero(t - max_distance) <= 0.0
}

/// Validates a radius or height.
pub(crate) fn positive(what: &'static str, value: f64) -> GeometryResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::InvalidDimension { what, value })
    }
}

/// What every primitive can do.
pub trait Surface {
    /// Unit normal at a point on the surface.
    fn normal_at(&self, point: &Point3) -> GeometryResult<Vector>;

    /// Points where `ray` crosses the surface within `(0, max_distance]`,
    /// nearest first.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3>;

    /// Axis-aligned bounds, or [`GeometryError::Unbounded`].
    fn bounds(&self) -> GeometryResult<Aabb>;
}

/// The closed set of primitive shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Polygon(Polygon),
    Cylinder(Cylinder),
    Tube(Tube),
}

impl Shape {
    fn as_surface(&self) -> &dyn Surface {
        match self {
            Shape::Sphere(s) => s,
            Shape::Plane(p) => p,
            Shape::Polygon(p) => p,
            Shape::Cylinder(c) => c,
            Shape::Tube(t) => t,
        }
    }

    /// Short name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Sphere(_) => "sphere",
            Shape::Plane(_) => "plane",
            Shape::Polygon(p) if p.vertices().len() == 3 => "triangle",
            Shape::Polygon(_) => "polygon",
            Shape::Cylinder(_) => "cylinder",
            Shape::Tube(_) => "tube",
        }
    }
}

impl Surface for Shape {
    fn normal_at(&self, point: &Point3) -> GeometryResult<Vector> {
        self.as_surface().normal_at(point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point3> {
        self.as_surface().intersect(ray, max_distance)
    }

    fn bounds(&self) -> GeometryResult<Aabb> {
        self.as_surface().bounds()
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Shape::Plane(p)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

impl From<Cylinder> for Shape {
    fn from(c: Cylinder) -> Self {
        Shape::Cylinder(c)
    }
}

impl From<Tube> for Shape {
    fn from(t: Tube) -> Self {
        Shape::Tube(t)
    }
}

/// A primitive with its emission color and material.
#[derive(Debug, Clone)]
pub struct Geometry {
    shape: Shape,
    emission: Color,
    material: Material,
    /// Cached bounds, `None` for unbounded shapes.
    bounds: Option<Aabb>,
}

impl Geometry {
    /// Black, non-reflective geometry with the default material.
    pub fn new(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let bounds = shape.bounds().ok();
        Self {
            shape,
            emission: Color::ZERO,
            material: Material::default(),
            bounds,
        }
    }

    /// Set the emission color.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Set the material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// The underlying primitive.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Light emitted by the surface.
    pub fn emission(&self) -> Color {
        self.emission
    }

    /// Shading coefficients.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Unit normal at a point on the surface.
    pub fn normal_at(&self, point: &Point3) -> GeometryResult<Vector> {
        self.shape.normal_at(point)
    }

    /// Whether this geometry can live inside a bounding volume hierarchy.
    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }
}

/// An intersection: the hit point and the geometry it lies on.
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint<'a> {
    pub geometry: &'a Geometry,
    pub point: Point3,
}

impl<'a> GeoPoint<'a> {
    /// Pair a hit point with its geometry.
    pub fn new(geometry: &'a Geometry, point: Point3) -> Self {
        Self { geometry, point }
    }
}

impl PartialEq for GeoPoint<'_> {
    /// Same geometry instance and (epsilon-)equal point.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.geometry, other.geometry) && self.point == other.point
    }
}

/// Anything a ray can be tested against.
pub trait Intersectable: Send + Sync {
    /// All intersections within `(0, max_distance]`. Order is not significant
    /// for composites; a single primitive reports nearest first.
    fn find_geo_intersections<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>>;

    /// Intersection points only, over the whole ray.
    fn find_intersections(&self, ray: &Ray) -> Vec<Point3> {
        self.find_geo_intersections(ray, f64::INFINITY)
            .into_iter()
            .map(|gp| gp.point)
            .collect()
    }

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> GeometryResult<Aabb>;
}

impl Intersectable for Geometry {
    fn find_geo_intersections<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        self.shape
            .intersect(ray, max_distance)
            .into_iter()
            .map(|point| GeoPoint::new(self, point))
            .collect()
    }

    fn bounding_box(&self) -> GeometryResult<Aabb> {
        self.bounds.ok_or(GeometryError::Unbounded {
            kind: self.shape.kind(),
        })
    }
}
