//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Bounded geometries are wrapped in a box that is split recursively: the
//! longest axis of the box is cut at its midpoint and every geometry goes to
//! the side its own box centroid falls on. A split that would leave one side
//! empty stops the recursion, so the tree always terminates.

use kiln_math::{Aabb, Interval, Point3, Ray};
use log::{debug, info};

use crate::geometries::Geometries;
use crate::geometry::{GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable};

/// A node of the hierarchy.
#[derive(Debug, Clone)]
pub enum BoundingBox {
    /// Geometries tested one by one once the box is hit.
    Leaf { bbox: Aabb, geometries: Vec<Geometry> },
    /// Two children whose boxes lie inside `bbox`.
    Branch {
        bbox: Aabb,
        left: Box<BoundingBox>,
        right: Box<BoundingBox>,
    },
}

impl BoundingBox {
    /// Wrap geometries in a single leaf whose box is the union of theirs.
    pub fn wrap(geometries: Vec<Geometry>) -> GeometryResult<Self> {
        let mut boxes = geometries.iter().map(Intersectable::bounding_box);
        let first = boxes.next().ok_or(GeometryError::EmptyBox)??;
        let bbox = boxes.try_fold(first, |acc, b| -> GeometryResult<Aabb> {
            Ok(Aabb::surrounding(&acc, &b?))
        })?;
        Ok(BoundingBox::Leaf { bbox, geometries })
    }

    /// Recursively split a leaf along the longest axis of its box.
    /// Branches are returned unchanged.
    pub fn split(self) -> GeometryResult<Self> {
        let (bbox, geometries) = match self {
            BoundingBox::Leaf { bbox, geometries } => (bbox, geometries),
            branch @ BoundingBox::Branch { .. } => return Ok(branch),
        };

        let axis = bbox.longest_axis();
        let mid = bbox.centroid().coord(axis);
        let (left, right): (Vec<_>, Vec<_>) = geometries.into_iter().partition(|g| {
            g.bounding_box()
                .map_or(false, |b| b.centroid().coord(axis) < mid)
        });

        if left.is_empty() || right.is_empty() {
            let geometries = if left.is_empty() { right } else { left };
            debug!(
                "BVH leaf with {} geometries (no split on axis {})",
                geometries.len(),
                axis
            );
            return Ok(BoundingBox::Leaf { bbox, geometries });
        }

        Ok(BoundingBox::Branch {
            bbox,
            left: Box::new(Self::wrap(left)?.split()?),
            right: Box::new(Self::wrap(right)?.split()?),
        })
    }

    /// Box enclosing everything below this node.
    pub fn bbox(&self) -> Aabb {
        match self {
            BoundingBox::Leaf { bbox, .. } | BoundingBox::Branch { bbox, .. } => *bbox,
        }
    }

    /// Minimum corner of the node's box.
    pub fn min(&self) -> Point3 {
        self.bbox().min()
    }

    /// Maximum corner of the node's box.
    pub fn max(&self) -> Point3 {
        self.bbox().max()
    }

    /// Slab test against the box over the whole forward ray.
    pub fn is_hit(&self, ray: &Ray) -> bool {
        self.bbox().is_hit(ray)
    }

    /// Number of levels, a lone leaf being 1.
    pub fn depth(&self) -> usize {
        match self {
            BoundingBox::Leaf { .. } => 1,
            BoundingBox::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of leaves below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            BoundingBox::Leaf { .. } => 1,
            BoundingBox::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Number of geometries below this node.
    pub fn geometry_count(&self) -> usize {
        match self {
            BoundingBox::Leaf { geometries, .. } => geometries.len(),
            BoundingBox::Branch { left, right, .. } => {
                left.geometry_count() + right.geometry_count()
            }
        }
    }

    /// Dissolve the tree back into its geometries.
    pub fn into_geometries(self) -> Vec<Geometry> {
        match self {
            BoundingBox::Leaf { geometries, .. } => geometries,
            BoundingBox::Branch { left, right, .. } => {
                let mut out = left.into_geometries();
                out.extend(right.into_geometries());
                out
            }
        }
    }
}

impl Intersectable for BoundingBox {
    fn find_geo_intersections<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        if !self.bbox().hit(ray, Interval::forward(max_distance)) {
            return Vec::new();
        }

        match self {
            BoundingBox::Leaf { geometries, .. } => geometries
                .iter()
                .flat_map(|g| g.find_geo_intersections(ray, max_distance))
                .collect(),
            BoundingBox::Branch { left, right, .. } => {
                let mut hits = left.find_geo_intersections(ray, max_distance);
                hits.extend(right.find_geo_intersections(ray, max_distance));
                hits
            }
        }
    }

    fn bounding_box(&self) -> GeometryResult<Aabb> {
        Ok(self.bbox())
    }
}

/// Build a hierarchy over `geometries`.
///
/// Unbounded geometries (planes, tubes) cannot be boxed and stay in a flat
/// list next to the tree.
pub fn build(geometries: Vec<Geometry>) -> GeometryResult<Geometries> {
    let (bounded, unbounded): (Vec<_>, Vec<_>) =
        geometries.into_iter().partition(Geometry::is_bounded);

    let unbounded_count = unbounded.len();
    let mut root: Geometries = unbounded.into_iter().collect();
    if bounded.is_empty() {
        info!("BVH skipped: {} unbounded geometries only", unbounded_count);
        return Ok(root);
    }

    let tree = BoundingBox::wrap(bounded)?.split()?;
    info!(
        "Built BVH: {} geometries in {} leaves, depth {}, {} unbounded kept flat",
        tree.geometry_count(),
        tree.leaf_count(),
        tree.depth(),
        unbounded_count
    );
    root.add(tree);
    Ok(root)
}
