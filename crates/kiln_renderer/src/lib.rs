//! Kiln renderer - recursive CPU ray tracing.
//!
//! Geometry primitives and their intersection math, a bounding volume
//! hierarchy, Phong lights and materials, and a recursive tracer with
//! shadows, reflection, transparency and glossy ray bundles. Pixels are
//! rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod cylinder;
mod description;
mod geometries;
mod geometry;
mod light;
mod material;
mod plane;
mod polygon;
mod renderer;
mod scene;
mod sphere;
mod tracer;
mod tube;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{build, BoundingBox};
pub use camera::{Camera, CameraError, CameraResult, RaySource};
pub use cylinder::Cylinder;
pub use description::{
    AmbientDescription, Attenuation, GeometryDescription, LightDescription, MaterialDescription,
    SceneDescription, SceneError, SceneResult, ShapeDescription,
};
pub use geometries::{Geometries, Item};
pub use geometry::{
    GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable, Shape, Surface,
};
pub use light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
pub use material::Material;
pub use plane::Plane;
pub use polygon::Polygon;
pub use renderer::{
    color_to_rgba, render, render_into, render_pixel, ImageBuffer, ImageSink, RenderConfig,
    RenderError, RenderResult,
};
pub use scene::Scene;
pub use sphere::Sphere;
pub use tracer::{RayTracer, TracerConfig};
pub use tube::Tube;

/// Re-export the math types the renderer API is expressed in
pub use kiln_math::{Aabb, Color, DVec3, Interval, MathError, MathResult, Point3, Ray, Vector};
