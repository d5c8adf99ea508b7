//! Composite of geometries, groups and bounding boxes.

use kiln_math::{Aabb, Ray};

use crate::bvh::{self, BoundingBox};
use crate::geometry::{GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable};

/// One member of a [`Geometries`] composite.
#[derive(Debug, Clone)]
pub enum Item {
    Geometry(Geometry),
    Group(Geometries),
    Boxed(BoundingBox),
}

impl Item {
    fn as_intersectable(&self) -> &dyn Intersectable {
        match self {
            Item::Geometry(g) => g,
            Item::Group(g) => g,
            Item::Boxed(b) => b,
        }
    }

    fn flatten_into(self, out: &mut Vec<Geometry>) {
        match self {
            Item::Geometry(g) => out.push(g),
            Item::Group(group) => group.items.into_iter().for_each(|i| i.flatten_into(out)),
            Item::Boxed(b) => out.extend(b.into_geometries()),
        }
    }
}

impl From<Geometry> for Item {
    fn from(g: Geometry) -> Self {
        Item::Geometry(g)
    }
}

impl From<Geometries> for Item {
    fn from(g: Geometries) -> Self {
        Item::Group(g)
    }
}

impl From<BoundingBox> for Item {
    fn from(b: BoundingBox) -> Self {
        Item::Boxed(b)
    }
}

/// A collection of intersectables that answers as their union.
///
/// Duplicates are not suppressed: a geometry added twice reports its hits
/// twice.
#[derive(Debug, Clone, Default)]
pub struct Geometries {
    items: Vec<Item>,
}

impl Geometries {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a geometry, a nested group or a bounding box.
    pub fn add(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    /// Builder form of [`Geometries::add`].
    pub fn with(mut self, item: impl Into<Item>) -> Self {
        self.add(item);
        self
    }

    /// Direct members, groups and boxes included.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of direct members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of leaf geometries, counting through groups and boxes.
    pub fn geometry_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                Item::Geometry(_) => 1,
                Item::Group(g) => g.geometry_count(),
                Item::Boxed(b) => b.geometry_count(),
            })
            .sum()
    }

    /// All leaf geometries, with groups and boxes dissolved.
    pub fn flatten(self) -> Vec<Geometry> {
        let mut out = Vec::new();
        self.items.into_iter().for_each(|i| i.flatten_into(&mut out));
        out
    }

    /// Rebuild as a bounding volume hierarchy over all contained geometries.
    /// Rebuilding an existing hierarchy yields an equivalent one.
    pub fn create_hierarchy(self) -> GeometryResult<Self> {
        bvh::build(self.flatten())
    }
}

impl FromIterator<Geometry> for Geometries {
    fn from_iter<I: IntoIterator<Item = Geometry>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Item::Geometry).collect(),
        }
    }
}

impl Extend<Geometry> for Geometries {
    fn extend<I: IntoIterator<Item = Geometry>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Item::Geometry));
    }
}

impl Intersectable for Item {
    fn find_geo_intersections<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        self.as_intersectable().find_geo_intersections(ray, max_distance)
    }

    fn bounding_box(&self) -> GeometryResult<Aabb> {
        self.as_intersectable().bounding_box()
    }
}

impl Intersectable for Geometries {
    fn find_geo_intersections<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        self.items
            .iter()
            .flat_map(|item| item.find_geo_intersections(ray, max_distance))
            .collect()
    }

    fn bounding_box(&self) -> GeometryResult<Aabb> {
        let mut boxes = self.items.iter().map(Intersectable::bounding_box);
        let first = boxes.next().ok_or(GeometryError::EmptyBox)??;
        boxes.try_fold(first, |acc, b| Ok(Aabb::surrounding(&acc, &b?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Point3, Polygon, Sphere, Vector};

    fn sphere(x: f64) -> Geometry {
        Geometry::new(Sphere::new(Point3::new(x, 0.0, 0.0), 1.0).unwrap())
    }

    fn along_x() -> Ray {
        Ray::new(Point3::new(-10.0, 0.0, 0.0), Vector::X)
    }

    #[test]
    fn test_empty_collection() {
        let g = Geometries::new();
        assert!(g.is_empty());
        assert!(g.find_intersections(&along_x()).is_empty());
        assert_eq!(g.bounding_box(), Err(GeometryError::EmptyBox));
    }

    #[test]
    fn test_union_of_members() {
        let g: Geometries = [sphere(0.0), sphere(5.0), sphere(0.0).with_emission(kiln_math::Color::ONE)]
            .into_iter()
            .collect();
        // duplicates at the same place are kept
        assert_eq!(g.find_intersections(&along_x()).len(), 6);
    }

    #[test]
    fn test_nested_groups() {
        let inner = Geometries::new().with(sphere(5.0));
        let mut outer = Geometries::new().with(sphere(0.0)).with(inner);
        assert_eq!(outer.len(), 2);
        assert_eq!(outer.geometry_count(), 2);
        assert_eq!(outer.find_intersections(&along_x()).len(), 4);

        outer.extend([sphere(-5.0)]);
        assert_eq!(outer.len(), 3);
        assert_eq!(outer.find_intersections(&along_x()).len(), 6);
        assert_eq!(outer.flatten().len(), 3);
    }

    #[test]
    fn test_bounding_box_union() {
        let triangle = Polygon::triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(10.0, 0.0, 10.0),
        )
        .unwrap();
        let g = Geometries::new()
            .with(Geometry::new(Sphere::new(Point3::ZERO, 5.0).unwrap()))
            .with(Geometry::new(triangle));
        let b = g.bounding_box().unwrap();
        assert_eq!(b.min(), Point3::new(-5.0, -5.0, -5.0));
        assert_eq!(b.max(), Point3::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_unbounded_member() {
        let g = Geometries::new()
            .with(sphere(0.0))
            .with(Geometry::new(Plane::new(Point3::ZERO, Vector::Z)));
        assert_eq!(g.bounding_box(), Err(GeometryError::Unbounded { kind: "plane" }));
    }

    #[test]
    fn test_max_distance_applies_to_members() {
        let g: Geometries = [sphere(0.0), sphere(5.0)].into_iter().collect();
        assert_eq!(g.find_geo_intersections(&along_x(), 12.0).len(), 2);
        assert_eq!(g.find_geo_intersections(&along_x(), 10.0).len(), 1);
    }
}
