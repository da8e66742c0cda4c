//! Built-in scenes.

use lux_math::{Mat4, Vec3};

use crate::{AreaLight, Camera, FaceMask, Material, Scene, SceneError, TriangleMask};

/// A scene together with the view it was authored for.
#[derive(Debug, Clone)]
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: Camera,
    pub light: AreaLight,
}

/// The classic Cornell box: a 2x2x2 room with a red left wall, a green right
/// wall, a ceiling light, a glass block and a tall metal block.
///
/// `aspect` is the output image's width divided by its height.
pub fn cornell_box(aspect: f32) -> Result<SceneSetup, SceneError> {
    let mut scene = Scene::new();
    let white = Vec3::new(0.725, 0.71, 0.68);

    // Light quad, just below the ceiling, facing down
    let transform = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_scale(Vec3::new(0.5, 1.98, 0.5));
    scene.create_cube(
        FaceMask::POSITIVE_Y,
        &transform,
        true,
        TriangleMask::LIGHT,
        Material::lambertian(Vec3::ONE),
    )?;

    // Room
    let room = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
    scene.create_cube(
        FaceMask::NEGATIVE_Y | FaceMask::POSITIVE_Y | FaceMask::NEGATIVE_Z,
        &room,
        true,
        TriangleMask::GEOMETRY,
        Material::lambertian(white),
    )?;
    scene.create_cube(
        FaceMask::NEGATIVE_X,
        &room,
        true,
        TriangleMask::GEOMETRY,
        Material::lambertian(Vec3::new(0.63, 0.065, 0.05)),
    )?;
    scene.create_cube(
        FaceMask::POSITIVE_X,
        &room,
        true,
        TriangleMask::GEOMETRY,
        Material::lambertian(Vec3::new(0.14, 0.45, 0.091)),
    )?;

    // Short box: glass
    let transform = Mat4::from_translation(Vec3::new(0.3275, 0.3, 0.3725))
        * Mat4::from_rotation_y(-0.3)
        * Mat4::from_scale(Vec3::splat(0.6));
    scene.create_cube(FaceMask::ALL, &transform, false, TriangleMask::GLASS, Material::dielectric(1.5))?;

    // Tall box: brushed metal
    let transform = Mat4::from_translation(Vec3::new(-0.335, 0.6, -0.29))
        * Mat4::from_rotation_y(0.3)
        * Mat4::from_scale(Vec3::new(0.6, 1.2, 0.6));
    scene.create_cube(
        FaceMask::ALL,
        &transform,
        false,
        TriangleMask::GEOMETRY,
        Material::metallic(Vec3::new(0.8, 0.8, 0.8), 0.15),
    )?;

    log::info!("Built Cornell box: {} triangles, {} materials", scene.triangle_count(), scene.materials().len());

    let camera = Camera::look_at(Vec3::new(0.0, 1.0, 3.38), Vec3::new(0.0, 1.0, 0.0), Vec3::Y, 45.0, aspect);
    let light = AreaLight {
        position: Vec3::new(0.0, 1.99, 0.0),
        forward: Vec3::NEG_Y,
        right: Vec3::new(0.25, 0.0, 0.0),
        up: Vec3::new(0.0, 0.0, 0.25),
        color: Vec3::splat(4.0),
    };

    Ok(SceneSetup { scene, camera, light })
}
