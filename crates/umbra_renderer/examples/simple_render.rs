//! Simple ray tracer example.
//!
//! Builds a small scene in code, renders it and saves a PNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use umbra_renderer::{
    render, Camera, Color, Light, Material, Plane, RenderSettings, Scene, Sphere, Surface, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = RenderSettings::default()
        .with_resolution(800, 450)
        .with_quality(4, 1, 4)
        .with_dof(9.0, 0.1)
        .with_seed(2024);
    let camera = Camera::new()
        .with_eye(Vec3::new(0.0, 2.0, 8.0))
        .with_forward(Vec3::new(0.0, -0.2, -1.5));

    let start = std::time::Instant::now();
    let scene = build_scene(settings, camera);
    log::info!(
        "Scene built in {:?}: {} surfaces, {:?}",
        start.elapsed(),
        scene.surfaces().len(),
        scene.bvh_stats()
    );

    let image = render(&scene)?;

    let filename = "output.png";
    image::save_buffer(
        filename,
        image.as_bytes(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn build_scene(settings: RenderSettings, camera: Camera) -> Scene {
    let mut scene = Scene::new(settings).with_camera(camera);

    // Ground
    scene.add_surface(Surface::new(
        Plane::new(0.0, 1.0, 0.0, 0.0),
        Material::diffuse(Color::new(0.5, 0.5, 0.5)),
    ));

    // Three main spheres
    scene.add_surface(Surface::new(
        Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0),
        Material::default()
            .with_shininess(Color::splat(0.1))
            .with_transparency(Color::ONE)
            .with_ior(1.5),
    ));
    scene.add_surface(Surface::new(
        Sphere::new(Vec3::new(-2.5, 1.0, 0.0), 1.0),
        Material::diffuse(Color::new(0.4, 0.2, 0.1)).with_roughness(0.05),
    ));
    scene.add_surface(Surface::new(
        Sphere::new(Vec3::new(2.5, 1.0, 0.0), 1.0),
        Material::diffuse(Color::new(0.7, 0.6, 0.5)).with_shininess(Color::splat(0.8)),
    ));

    // Small random spheres
    let mut rng = StdRng::seed_from_u64(7);
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(2.5, 0.2, 0.0)).length() <= 1.2 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                Material::diffuse(Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                ))
            } else if choose_mat < 0.95 {
                Material::diffuse(Color::splat(0.8))
                    .with_shininess(Color::splat(0.5 + 0.5 * rng.gen::<f32>()))
            } else {
                Material::default().with_transparency(Color::ONE).with_ior(1.5)
            };
            scene.add_surface(Surface::new(Sphere::new(center, 0.2), material));
        }
    }

    scene.add_light(Light::directional(Vec3::new(1.0, 2.0, 1.5), Color::splat(0.9)));
    scene.add_light(Light::point(Vec3::new(-3.0, 4.0, 3.0), Color::splat(8.0)));
    scene
}
