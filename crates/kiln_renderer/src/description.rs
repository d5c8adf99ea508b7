//! Parsed scene input.
//!
//! These plain data types are what a scene file parser produces. They are
//! serde-enabled so any textual format can feed them, and convert into a
//! validated [`Scene`].

use kiln_math::{Color, MathError, MathResult, Point3, Ray, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, GeometryResult};
use crate::light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
use crate::{Cylinder, Geometry, Material, Plane, Polygon, Scene, Sphere, Tube};

/// Errors converting descriptions into a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("geometry #{index}: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: GeometryError,
    },

    #[error("light #{index}: {source}")]
    Light {
        index: usize,
        #[source]
        source: MathError,
    },

    #[error("light #{index}: attenuation needs kc > 0 and non-negative kl, kq, got {attenuation:?}")]
    Attenuation {
        index: usize,
        attenuation: Attenuation,
    },
}

/// Result alias for scene assembly.
pub type SceneResult<T> = Result<T, SceneError>;

fn point(p: [f64; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn vector(v: [f64; 3]) -> MathResult<Vector> {
    Vector::new(v[0], v[1], v[2])
}

fn default_one() -> f64 {
    1.0
}

/// Primitive parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
    },
    Triangle {
        vertices: [[f64; 3]; 3],
    },
    Polygon {
        vertices: Vec<[f64; 3]>,
    },
    Cylinder {
        origin: [f64; 3],
        direction: [f64; 3],
        radius: f64,
        height: f64,
    },
    Tube {
        origin: [f64; 3],
        direction: [f64; 3],
        radius: f64,
    },
}

impl ShapeDescription {
    fn build(&self) -> GeometryResult<Geometry> {
        let geometry = match self {
            ShapeDescription::Sphere { center, radius } => {
                Geometry::new(Sphere::new(point(*center), *radius)?)
            }
            ShapeDescription::Plane { point: p, normal } => {
                Geometry::new(Plane::new(point(*p), vector(*normal)?))
            }
            ShapeDescription::Triangle { vertices: [a, b, c] } => {
                Geometry::new(Polygon::triangle(point(*a), point(*b), point(*c))?)
            }
            ShapeDescription::Polygon { vertices } => {
                Geometry::new(Polygon::new(vertices.iter().copied().map(point).collect())?)
            }
            ShapeDescription::Cylinder {
                origin,
                direction,
                radius,
                height,
            } => {
                let axis = Ray::new(point(*origin), vector(*direction)?);
                Geometry::new(Cylinder::new(axis, *radius, *height)?)
            }
            ShapeDescription::Tube {
                origin,
                direction,
                radius,
            } => {
                let axis = Ray::new(point(*origin), vector(*direction)?);
                Geometry::new(Tube::new(axis, *radius)?)
            }
        };
        Ok(geometry)
    }
}

/// Material coefficients; missing fields default to zero and a missing
/// glossiness means a perfect mirror / clear transmission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    pub kd: f64,
    pub ks: f64,
    pub shininess: i32,
    pub kt: f64,
    pub kr: f64,
    pub glossiness: Option<f64>,
}

impl From<&MaterialDescription> for Material {
    fn from(m: &MaterialDescription) -> Self {
        Material::default()
            .with_kd(m.kd)
            .with_ks(m.ks)
            .with_shininess(m.shininess)
            .with_kt(m.kt)
            .with_kr(m.kr)
            .with_glossiness(m.glossiness.unwrap_or(f64::INFINITY))
    }
}

/// A primitive with its emission and material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescription {
    pub shape: ShapeDescription,
    #[serde(default)]
    pub emission: [f64; 3],
    #[serde(default)]
    pub material: MaterialDescription,
}

impl GeometryDescription {
    /// Validate and build the geometry.
    pub fn build(&self) -> GeometryResult<Geometry> {
        Ok(self
            .shape
            .build()?
            .with_emission(Color::from_array(self.emission))
            .with_material(Material::from(&self.material)))
    }
}

/// Constant, linear and quadratic attenuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    #[serde(default = "default_one")]
    pub kc: f64,
    #[serde(default)]
    pub kl: f64,
    #[serde(default)]
    pub kq: f64,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }
}

impl Attenuation {
    /// Whether `kc + kl * d + kq * d^2` stays positive and finite for every
    /// distance `d >= 0`.
    pub fn is_valid(&self) -> bool {
        [self.kc, self.kl, self.kq].iter().all(|k| k.is_finite())
            && self.kc > 0.0
            && self.kl >= 0.0
            && self.kq >= 0.0
    }
}

/// Light parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightDescription {
    Directional {
        color: [f64; 3],
        direction: [f64; 3],
    },
    Point {
        color: [f64; 3],
        position: [f64; 3],
        #[serde(default)]
        attenuation: Attenuation,
    },
    Spot {
        color: [f64; 3],
        position: [f64; 3],
        direction: [f64; 3],
        #[serde(default)]
        attenuation: Attenuation,
        #[serde(default = "default_one")]
        beam_exponent: f64,
    },
}

impl LightDescription {
    /// Distance attenuation, for lights that have one.
    pub fn attenuation(&self) -> Option<Attenuation> {
        match self {
            LightDescription::Directional { .. } => None,
            LightDescription::Point { attenuation, .. }
            | LightDescription::Spot { attenuation, .. } => Some(*attenuation),
        }
    }

    /// Validate and build the light.
    pub fn build(&self) -> MathResult<Box<dyn LightSource>> {
        let light: Box<dyn LightSource> = match self {
            LightDescription::Directional { color, direction } => Box::new(DirectionalLight::new(
                Color::from_array(*color),
                vector(*direction)?,
            )),
            LightDescription::Point {
                color,
                position,
                attenuation: a,
            } => Box::new(
                PointLight::new(Color::from_array(*color), point(*position))
                    .with_attenuation(a.kc, a.kl, a.kq),
            ),
            LightDescription::Spot {
                color,
                position,
                direction,
                attenuation: a,
                beam_exponent,
            } => Box::new(
                SpotLight::new(Color::from_array(*color), point(*position), vector(*direction)?)
                    .with_attenuation(a.kc, a.kl, a.kq)
                    .with_beam_exponent(*beam_exponent),
            ),
        };
        Ok(light)
    }
}

/// Ambient color and its scale factor `ka`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientDescription {
    pub color: [f64; 3],
    #[serde(default = "default_one")]
    pub ka: f64,
}

/// A whole scene as produced by a parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub background: [f64; 3],
    #[serde(default)]
    pub ambient: Option<AmbientDescription>,
    #[serde(default)]
    pub geometries: Vec<GeometryDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

impl SceneDescription {
    /// Validate every descriptor and assemble the scene. The first invalid
    /// entry aborts the conversion.
    pub fn into_scene(self) -> SceneResult<Scene> {
        let mut scene = Scene::new(self.name).with_background(Color::from_array(self.background));
        if let Some(a) = self.ambient {
            scene = scene.with_ambient(AmbientLight::with_factor(Color::from_array(a.color), a.ka));
        }

        for (index, description) in self.geometries.iter().enumerate() {
            let geometry = description
                .build()
                .map_err(|source| SceneError::Geometry { index, source })?;
            scene.geometries.add(geometry);
        }

        for (index, description) in self.lights.iter().enumerate() {
            if let Some(attenuation) = description.attenuation().filter(|a| !a.is_valid()) {
                return Err(SceneError::Attenuation { index, attenuation });
            }
            let light = description
                .build()
                .map_err(|source| SceneError::Light { index, source })?;
            scene.lights.push(light);
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Intersectable;

    const SCENE: &str = r#"{
        "name": "json",
        "background": [10, 20, 30],
        "ambient": { "color": [255, 255, 255], "ka": 0.1 },
        "geometries": [
            { "shape": { "kind": "sphere", "center": [0, 0, -50], "radius": 20 },
              "emission": [0, 0, 100],
              "material": { "kd": 0.5, "ks": 0.5, "shininess": 100, "kt": 0.3 } },
            { "shape": { "kind": "triangle", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]] } },
            { "shape": { "kind": "plane", "point": [0, -30, 0], "normal": [0, 1, 0] },
              "material": { "kr": 0.8, "glossiness": 4.0 } },
            { "shape": { "kind": "cylinder", "origin": [0, 0, 0], "direction": [0, 1, 0],
                         "radius": 2, "height": 5 } }
        ],
        "lights": [
            { "kind": "directional", "color": [200, 200, 200], "direction": [0, -1, -1] },
            { "kind": "point", "color": [500, 300, 0], "position": [-50, 50, 0],
              "attenuation": { "kl": 0.0005, "kq": 0.0005 } },
            { "kind": "spot", "color": [255, 0, 0], "position": [0, 50, 0],
              "direction": [0, -1, 0], "beam_exponent": 4 }
        ]
    }"#;

    #[test]
    fn test_json_scene() {
        let description: SceneDescription = serde_json::from_str(SCENE).unwrap();
        assert_eq!(description.geometries.len(), 4);
        assert_eq!(description.geometries[2].material.glossiness, Some(4.0));
        assert_eq!(description.geometries[1].material, MaterialDescription::default());

        let scene = description.into_scene().unwrap();
        assert_eq!(scene.name, "json");
        assert_eq!(scene.background, Color::new(10.0, 20.0, 30.0));
        assert!((scene.ambient.intensity() - Color::splat(25.5)).length() < 1e-9);
        assert_eq!(scene.geometries.len(), 4);
        assert_eq!(scene.lights.len(), 3);

        let ray = Ray::new(Point3::ZERO, -Vector::Z);
        let hits = scene.geometries.find_geo_intersections(&ray, f64::INFINITY);
        let sphere_hit = hits
            .iter()
            .find(|gp| gp.point == Point3::new(0.0, 0.0, -30.0))
            .unwrap();
        assert_eq!(sphere_hit.geometry.emission(), Color::new(0.0, 0.0, 100.0));
        assert_eq!(sphere_hit.geometry.material().kt, 0.3);
        assert!(!sphere_hit.geometry.material().is_glossy());
    }

    #[test]
    fn test_attenuation_defaults() {
        let light: LightDescription = serde_json::from_str(
            r#"{ "kind": "point", "color": [1, 1, 1], "position": [0, 0, 0] }"#,
        )
        .unwrap();
        match light {
            LightDescription::Point { attenuation, .. } => {
                assert_eq!(attenuation, Attenuation::default())
            }
            other => panic!("unexpected light {other:?}"),
        }
    }

    #[test]
    fn test_invalid_geometry_reports_index() {
        let description = SceneDescription {
            name: "bad".into(),
            background: [0.0; 3],
            ambient: None,
            geometries: vec![
                GeometryDescription {
                    shape: ShapeDescription::Sphere {
                        center: [0.0; 3],
                        radius: 1.0,
                    },
                    emission: [0.0; 3],
                    material: MaterialDescription::default(),
                },
                GeometryDescription {
                    shape: ShapeDescription::Polygon {
                        vertices: vec![[0.0; 3], [1.0, 0.0, 0.0]],
                    },
                    emission: [0.0; 3],
                    material: MaterialDescription::default(),
                },
            ],
            lights: Vec::new(),
        };
        let err = description.into_scene().err().unwrap();
        assert_eq!(
            err,
            SceneError::Geometry {
                index: 1,
                source: GeometryError::TooFewVertices(2),
            }
        );
    }

    #[test]
    fn test_degenerate_attenuation_rejected() {
        let description: SceneDescription = serde_json::from_str(
            r#"{
                "name": "dark",
                "lights": [
                    { "kind": "directional", "color": [1, 1, 1], "direction": [0, -1, 0] },
                    { "kind": "spot", "color": [1, 1, 1], "position": [0, 0, 0],
                      "direction": [0, -1, 0], "attenuation": { "kc": 0 } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            description.into_scene().err(),
            Some(SceneError::Attenuation {
                index: 1,
                attenuation: Attenuation {
                    kc: 0.0,
                    kl: 0.0,
                    kq: 0.0,
                },
            })
        );

        assert!(Attenuation::default().is_valid());
        assert!(Attenuation { kc: 0.5, kl: 0.1, kq: 0.01 }.is_valid());
        assert!(!Attenuation { kc: 1.0, kl: -0.1, kq: 0.0 }.is_valid());
        assert!(!Attenuation { kc: f64::NAN, kl: 0.0, kq: 0.0 }.is_valid());
    }

    #[test]
    fn test_zero_light_direction_rejected() {
        let light = LightDescription::Directional {
            color: [1.0; 3],
            direction: [0.0; 3],
        };
        assert_eq!(light.build().err(), Some(MathError::ZeroVector));
    }
}
