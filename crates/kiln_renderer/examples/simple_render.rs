//! Render a small scene to a PPM file.
//!
//! Run with: cargo run --example simple_render --release

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::atomic::AtomicBool;

use kiln_renderer::{
    color_to_rgba, render, AmbientLight, Camera, Color, Cylinder, DirectionalLight, Geometry,
    ImageBuffer, Material, Plane, Point3, PointLight, Polygon, Ray, RayTracer, RenderConfig,
    Scene, Sphere, SpotLight, Vector,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let width = 400;
    let height = 300;

    let scene = build_scene()?.accelerate()?;
    let camera = Camera::new(Point3::new(0.0, 40.0, 400.0), -Vector::Z, Vector::Y)?
        .with_view_plane(200.0, 150.0)
        .with_distance(250.0)
        .pitch(-5.0)?;
    let tracer = RayTracer::new(&scene);

    let image = render(
        &camera,
        &tracer,
        width,
        height,
        &RenderConfig::default(),
        &AtomicBool::new(false),
    )?;

    let filename = "simple_render.ppm";
    save_ppm(&image, filename)?;
    log::info!("Saved {}", filename);
    Ok(())
}

fn build_scene() -> anyhow::Result<Scene> {
    let floor = Geometry::new(Plane::new(Point3::new(0.0, -50.0, 0.0), Vector::Y))
        .with_emission(Color::splat(20.0))
        .with_material(Material::default().with_kd(0.5).with_kr(0.4).with_glossiness(8.0));

    let glass = Geometry::new(Sphere::new(Point3::new(-60.0, 0.0, -50.0), 50.0)?)
        .with_emission(Color::new(0.0, 0.0, 60.0))
        .with_material(
            Material::default()
                .with_kd(0.2)
                .with_ks(0.6)
                .with_shininess(120)
                .with_kt(0.6),
        );

    let mirror = Geometry::new(Sphere::new(Point3::new(70.0, -10.0, -120.0), 40.0)?)
        .with_emission(Color::splat(10.0))
        .with_material(Material::default().with_kd(0.1).with_ks(0.4).with_shininess(200).with_kr(0.8));

    let pillar = Geometry::new(Cylinder::new(
        Ray::new(Point3::new(0.0, -50.0, -200.0), Vector::Y),
        20.0,
        120.0,
    )?)
    .with_emission(Color::new(80.0, 40.0, 0.0))
    .with_material(Material::default().with_kd(0.6).with_ks(0.3).with_shininess(30));

    let backdrop = Geometry::new(Polygon::new(vec![
        Point3::new(-200.0, -50.0, -300.0),
        Point3::new(200.0, -50.0, -300.0),
        Point3::new(200.0, 150.0, -300.0),
        Point3::new(-200.0, 150.0, -300.0),
    ])?)
    .with_emission(Color::new(30.0, 30.0, 40.0))
    .with_material(Material::default().with_kd(0.8));

    let shard = Geometry::new(Polygon::triangle(
        Point3::new(100.0, -50.0, 0.0),
        Point3::new(140.0, -50.0, -40.0),
        Point3::new(120.0, 20.0, -20.0),
    )?)
    .with_emission(Color::new(0.0, 70.0, 20.0))
    .with_material(Material::default().with_kd(0.5).with_ks(0.5).with_shininess(60));

    Ok(Scene::new("simple")
        .with_background(Color::new(10.0, 10.0, 25.0))
        .with_ambient(AmbientLight::with_factor(Color::splat(255.0), 0.1))
        .with_geometry(floor)
        .with_geometry(glass)
        .with_geometry(mirror)
        .with_geometry(pillar)
        .with_geometry(backdrop)
        .with_geometry(shard)
        .with_light(DirectionalLight::new(
            Color::new(120.0, 110.0, 100.0),
            Vector::new(-1.0, -1.0, -1.0)?,
        ))
        .with_light(
            PointLight::new(Color::splat(400.0), Point3::new(-100.0, 150.0, 100.0))
                .with_attenuation(1.0, 0.0005, 0.0005),
        )
        .with_light(
            SpotLight::new(
                Color::new(500.0, 300.0, 300.0),
                Point3::new(100.0, 200.0, 0.0),
                Vector::new(-1.0, -2.0, -1.0)?,
            )
            .with_attenuation(1.0, 0.0001, 0.00005)
            .with_beam_exponent(4.0),
        ))
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    Ok(())
}
