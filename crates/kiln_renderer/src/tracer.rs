//! Recursive ray tracer.
//!
//! The color of a hit point is its emission plus direct (local) lighting from
//! every light, plus reflected and transmitted (global) light gathered by
//! tracing secondary rays. Recursion stops at `max_level` or once the
//! accumulated weight `k` of a branch drops to `min_k`. Scene ambient light is
//! added once per primary ray.

use kiln_math::{align_zero, Color, Point3, Ray, Vector};
use log::trace;
use rand::{Rng, RngCore};

use crate::geometry::{GeoPoint, Intersectable};
use crate::light::LightSource;
use crate::Scene;

/// Tracer tuning.
#[derive(Debug, Clone)]
pub struct TracerConfig {
    /// Maximum recursion depth, the primary hit being level `max_level`.
    pub max_level: u32,
    /// Branches whose accumulated weight drops to this value are cut off.
    pub min_k: f64,
    /// Offset applied to secondary ray origins along the surface normal.
    pub delta: f64,
    /// Rays per glossy bundle.
    pub glossy_samples: u32,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_level: 10,
            min_k: 0.001,
            delta: 0.1,
            glossy_samples: 16,
        }
    }
}

/// Traces rays through a borrowed, read-only scene.
pub struct RayTracer<'s> {
    scene: &'s Scene,
    config: TracerConfig,
}

impl<'s> RayTracer<'s> {
    /// Tracer over `scene` with the default configuration.
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            config: TracerConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: TracerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// The scene being traced.
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    /// Color seen along `ray`. `rng` is only drawn from for glossy bundles.
    pub fn trace_ray(&self, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        match self.find_closest_intersection(ray) {
            None => self.scene.background,
            Some(gp) => {
                self.calc_color(&gp, ray, self.config.max_level, 1.0, rng)
                    + self.scene.ambient.intensity()
            }
        }
    }

    fn find_closest_intersection(&self, ray: &Ray) -> Option<GeoPoint<'s>> {
        let scene: &'s Scene = self.scene;
        let origin = ray.origin();
        scene
            .geometries
            .find_geo_intersections(ray, f64::INFINITY)
            .into_iter()
            .min_by(|a, b| {
                a.point
                    .distance_squared(&origin)
                    .total_cmp(&b.point.distance_squared(&origin))
            })
    }

    /// Trace a secondary ray; misses see the background.
    fn trace_secondary(&self, ray: &Ray, level: u32, k: f64, rng: &mut dyn RngCore) -> Color {
        match self.find_closest_intersection(ray) {
            None => self.scene.background,
            Some(gp) => self.calc_color(&gp, ray, level, k, rng),
        }
    }

    fn calc_color(
        &self,
        gp: &GeoPoint<'_>,
        ray: &Ray,
        level: u32,
        k: f64,
        rng: &mut dyn RngCore,
    ) -> Color {
        let color = gp.geometry.emission() + self.calc_local_effects(gp, ray, k);
        if level <= 1 {
            color
        } else {
            color + self.calc_global_effects(gp, ray, level, k, rng)
        }
    }

    fn calc_local_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, k: f64) -> Color {
        let n = match gp.geometry.normal_at(&gp.point) {
            Ok(n) => n,
            Err(e) => {
                trace!("No normal at {:?}: {}", gp.point, e);
                return Color::ZERO;
            }
        };
        let v = ray.direction();
        let nv = align_zero(n.dot(&v));
        if nv == 0.0 {
            return Color::ZERO;
        }

        let material = gp.geometry.material();
        let mut color = Color::ZERO;
        for light in &self.scene.lights {
            let Ok(l) = light.direction_to(&gp.point) else {
                continue;
            };
            let nl = align_zero(n.dot(&l));
            // light and viewer on different sides of the surface
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(light.as_ref(), &l, &n, gp.point);
            if ktr * k <= self.config.min_k {
                continue;
            }

            let intensity = light.intensity(&gp.point) * ktr;
            color += intensity * (material.kd * nl.abs());
            color += specular(material.ks, material.shininess, &l, &n, &v, nl, intensity);
        }
        color
    }

    /// Fraction of a light's intensity that reaches `point` through the
    /// geometry in between: the product of every occluder's `kt`.
    fn transparency(&self, light: &dyn LightSource, l: &Vector, n: &Vector, point: Point3) -> f64 {
        let shadow_ray = Ray::offset(point, l.reversed(), n, self.config.delta);
        let distance = light.distance(&point);

        let mut ktr = 1.0;
        for occluder in self
            .scene
            .geometries
            .find_geo_intersections(&shadow_ray, distance)
        {
            let kt = occluder.geometry.material().kt;
            if kt == 0.0 {
                return 0.0;
            }
            ktr *= kt;
        }
        ktr
    }

    fn calc_global_effects(
        &self,
        gp: &GeoPoint<'_>,
        ray: &Ray,
        level: u32,
        k: f64,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Ok(n) = gp.geometry.normal_at(&gp.point) else {
            return Color::ZERO;
        };
        let material = gp.geometry.material();
        let v = ray.direction();
        let mut color = Color::ZERO;

        let kkr = k * material.kr;
        if kkr > self.config.min_k {
            match reflect(&v, &n) {
                Some(r) => {
                    let rays = self.construct_ray_bundle(gp.point, r, &n, material.glossiness, rng);
                    color += self.average(&rays, level - 1, kkr, rng) * material.kr;
                }
                None => trace!("Reflection undefined at {:?}", gp.point),
            }
        }

        let kkt = k * material.kt;
        if kkt > self.config.min_k {
            let rays = self.construct_ray_bundle(gp.point, v, &n, material.glossiness, rng);
            color += self.average(&rays, level - 1, kkt, rng) * material.kt;
        }

        color
    }

    fn average(&self, rays: &[Ray], level: u32, k: f64, rng: &mut dyn RngCore) -> Color {
        let mut total = Color::ZERO;
        for ray in rays {
            total += self.trace_secondary(ray, level, k, &mut *rng);
        }
        total / rays.len().max(1) as f64
    }

    /// Rays leaving `point` around `direction`.
    ///
    /// The first ray is always the ideal one, offset off the surface along
    /// `normal`. For a finite positive `glossiness` the remaining rays start
    /// at the same origin and aim at random points of a unit disc that lies
    /// perpendicular to `direction`, `glossiness` units along it. Smaller
    /// glossiness means a wider cone.
    pub fn construct_ray_bundle(
        &self,
        point: Point3,
        direction: Vector,
        normal: &Vector,
        glossiness: f64,
        rng: &mut dyn RngCore,
    ) -> Vec<Ray> {
        let ideal = Ray::offset(point, direction, normal, self.config.delta);
        let samples = self.config.glossy_samples as usize;
        if !(glossiness.is_finite() && glossiness > 0.0) || samples <= 1 {
            return vec![ideal];
        }

        let head = ideal.origin();
        let axis = ideal.direction();
        let target = head.as_dvec() + axis.as_dvec() * glossiness;
        let spoke = normal
            .cross(&axis)
            .map(|v| v.normalized())
            .unwrap_or_else(|_| axis.any_orthogonal());

        let mut rays = Vec::with_capacity(samples);
        rays.push(ideal);
        for _ in 1..samples {
            let angle = rng.gen::<f64>() * 360.0;
            // sqrt keeps the samples uniform over the disc area
            let radius = rng.gen::<f64>().sqrt();
            let Ok(offset) = spoke.rotate(&axis, angle) else {
                continue;
            };
            let aim = target + offset.as_dvec() * radius - head.as_dvec();
            if let Ok(dir) = Vector::from_dvec(aim) {
                rays.push(Ray::new(head, dir));
            }
        }
        rays
    }
}

/// Mirror `v` about the surface normal: `v - 2 (v.n) n`.
fn reflect(v: &Vector, n: &Vector) -> Option<Vector> {
    let vn = align_zero(v.dot(n));
    if vn == 0.0 {
        return Some(*v);
    }
    v.subtract(&n.scale(2.0 * vn).ok()?).ok()
}

fn specular(
    ks: f64,
    shininess: i32,
    l: &Vector,
    n: &Vector,
    v: &Vector,
    nl: f64,
    intensity: Color,
) -> Color {
    if ks == 0.0 {
        return Color::ZERO;
    }
    let Some(r) = n.scale(2.0 * nl).ok().and_then(|s| l.subtract(&s).ok()) else {
        return Color::ZERO;
    };
    let vr = align_zero(-v.dot(&r.normalized()));
    if vr <= 0.0 {
        return Color::ZERO;
    }
    intensity * (ks * vr.powi(shininess))
}
