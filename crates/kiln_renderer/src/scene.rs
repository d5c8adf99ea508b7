//! Scene container.

use kiln_math::Color;
use log::info;

use crate::geometries::{Geometries, Item};
use crate::geometry::GeometryResult;
use crate::light::{AmbientLight, LightSource};

/// Everything the tracer reads: geometry, lights and the background.
///
/// Assembled once with the builders below and treated as read-only while
/// rendering.
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient: AmbientLight,
    pub geometries: Geometries,
    pub lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    /// An empty scene with a black background and no ambient light.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }

    /// Set the color seen by rays that hit nothing.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Set the ambient light.
    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    /// Replace the whole geometry collection.
    pub fn with_geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self
    }

    /// Add a geometry, group or bounding box.
    pub fn with_geometry(mut self, item: impl Into<Item>) -> Self {
        self.geometries.add(item);
        self
    }

    /// Add a light source.
    pub fn with_light(mut self, light: impl LightSource + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    /// Replace the geometry list by its bounding volume hierarchy.
    pub fn accelerate(mut self) -> GeometryResult<Self> {
        let geometries = std::mem::take(&mut self.geometries);
        self.geometries = geometries.create_hierarchy()?;
        info!("Scene '{}' accelerated", self.name);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Intersectable, Plane, PointLight, Point3, Ray, Sphere, Vector};

    #[test]
    fn test_builders() {
        let scene = Scene::new("test")
            .with_background(Color::splat(20.0))
            .with_ambient(AmbientLight::with_factor(Color::splat(100.0), 0.1))
            .with_geometry(Geometry::new(Sphere::new(Point3::ZERO, 1.0).unwrap()))
            .with_light(PointLight::new(Color::splat(255.0), Point3::new(0.0, 0.0, 10.0)));
        assert_eq!(scene.name, "test");
        assert_eq!(scene.background, Color::splat(20.0));
        assert_eq!(scene.ambient.intensity(), Color::splat(10.0));
        assert_eq!(scene.geometries.len(), 1);
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn test_accelerate_preserves_hits() {
        let scene = Scene::new("accelerate")
            .with_geometry(Geometry::new(Sphere::new(Point3::ZERO, 1.0).unwrap()))
            .with_geometry(Geometry::new(Sphere::new(Point3::new(4.0, 0.0, 0.0), 1.0).unwrap()))
            .with_geometry(Geometry::new(Plane::new(Point3::new(0.0, -2.0, 0.0), Vector::Y)));
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vector::X);
        let before = scene.geometries.find_intersections(&ray).len();

        let scene = scene.accelerate().unwrap();
        assert_eq!(scene.geometries.find_intersections(&ray).len(), before);
        assert_eq!(scene.geometries.geometry_count(), 3);
    }
}
