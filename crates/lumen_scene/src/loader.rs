//! Turns scene descriptions into renderable scenes.

use crate::description::{ObjectDeclaration, SceneDescription};
use crate::{SceneError, SceneResult};
use lumen_math::{Transform, Vec3};
use lumen_renderer::{
    Camera, Color, ImageBuffer, Light, Material, Mesh, PhongMaterial, Scene, Sphere, Triangle,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything needed to render a scene file.
pub struct LoadedScene {
    pub scene: Scene,
    pub camera: Camera,
    pub image: ImageBuffer,
}

/// Load a scene file. Relative mesh paths resolve against its directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<LoadedScene> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let loaded = load_scene_from_str(&json, base_dir)?;

    log::info!(
        "Loaded scene {}: {} objects, {} lights, {}x{}",
        path.display(),
        loaded.scene.object_count(),
        loaded.scene.lights().len(),
        loaded.image.width,
        loaded.image.height
    );
    Ok(loaded)
}

/// Load a scene from JSON text, resolving mesh paths against `base_dir`.
pub fn load_scene_from_str(json: &str, base_dir: &Path) -> SceneResult<LoadedScene> {
    let description: SceneDescription = serde_json::from_str(json)?;
    build_scene(&description, base_dir)
}

fn build_scene(description: &SceneDescription, base_dir: &Path) -> SceneResult<LoadedScene> {
    let image = description.image;
    if image.width == 0 || image.height == 0 {
        return Err(SceneError::InvalidImageSize {
            width: image.width,
            height: image.height,
        });
    }

    let materials: HashMap<&str, Arc<dyn Material>> = description
        .materials
        .iter()
        .map(|(name, decl)| {
            let diffuse = Color::from_array(decl.diffuse);
            let material = PhongMaterial::new(diffuse)
                .with_ambient(decl.ambient.map_or(diffuse, Color::from_array))
                .with_specular(Color::from_array(decl.specular), decl.shininess)
                .with_reflection(decl.reflection);
            (name.as_str(), Arc::new(material) as Arc<dyn Material>)
        })
        .collect();

    let mut scene = Scene::new();
    scene.global_ambient = Color::from_array(description.ambient);
    scene.background = Color::from_array(description.background);

    let render = description.render;
    if let Some(bsp) = render.bsp {
        scene.acceleration.use_bsp = bsp;
    }
    if let Some(bounding_boxes) = render.bounding_boxes {
        scene.acceleration.use_bounding_boxes = bounding_boxes;
    }

    for light in &description.lights {
        scene.add_light(Light::new(
            Vec3::from_array(light.position),
            Color::from_array(light.color),
        ));
    }

    for object in &description.objects {
        let material = materials
            .get(object.material())
            .cloned()
            .ok_or_else(|| SceneError::UnknownMaterial(object.material().to_owned()))?;

        match object {
            ObjectDeclaration::Sphere {
                radius, transform, ..
            } => {
                scene.add(Sphere::new(*radius, material).with_transform(Transform::from(*transform)));
            }
            ObjectDeclaration::Triangle {
                vertices, transform, ..
            } => {
                let [a, b, c] = vertices.map(Vec3::from_array);
                scene.add(Triangle::new(a, b, c, material).with_transform(Transform::from(*transform)));
            }
            ObjectDeclaration::Mesh {
                path, transform, ..
            } => {
                let path = resolve(base_dir, path);
                let faces = load_obj_faces(&path)?;
                log::debug!("Loaded mesh {} ({} triangles)", path.display(), faces.len());
                scene.add(Mesh::new(faces, material).with_transform(Transform::from(*transform)));
            }
        }
    }

    let mut camera = Camera::new(Vec3::from_array(description.camera.position));
    if let Some(multithreading) = render.multithreading {
        camera.settings.use_multithreading = multithreading;
    }
    if let Some(reflections) = render.reflections {
        camera.settings.max_reflections = reflections;
    }
    if render.threads.is_some() {
        camera.settings.thread_count = render.threads;
    }

    Ok(LoadedScene {
        scene,
        camera,
        image: ImageBuffer::new(image.width, image.height),
    })
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Read every triangle of every model in an OBJ file.
///
/// Polygons are triangulated on import. A file without faces is an error.
pub fn load_obj_faces<P: AsRef<Path>>(path: P) -> SceneResult<Vec<[Vec3; 3]>> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| SceneError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut faces = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let vertex = |index: u32| {
            let i = index as usize * 3;
            Vec3::new(
                f64::from(mesh.positions[i]),
                f64::from(mesh.positions[i + 1]),
                f64::from(mesh.positions[i + 2]),
            )
        };
        for face in mesh.indices.chunks_exact(3) {
            faces.push([vertex(face[0]), vertex(face[1]), vertex(face[2])]);
        }
    }

    if faces.is_empty() {
        return Err(SceneError::EmptyMesh(path.to_path_buf()));
    }
    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{Culling, Intersectable, Ray, SceneObject};

    /// Fresh directory under the system temp dir for one test.
    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-scene-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const BASIC: &str = r#"{
        "image": { "width": 32, "height": 16 },
        "camera": { "position": [0, 1, -2] },
        "ambient": [0.1, 0.1, 0.1],
        "materials": {
            "red": { "diffuse": [1, 0, 0], "specular": [1, 1, 1], "shininess": 20, "reflection": 0.25 }
        },
        "lights": [ { "position": [0, 5, -5] } ],
        "objects": [
            { "type": "sphere", "radius": 1.0, "material": "red",
              "transform": { "translation": [0, 0, 3] } },
            { "type": "triangle", "vertices": [[-1, -1, 0], [0, 1, 0], [1, -1, 0]], "material": "red" }
        ]
    }"#;

    #[test]
    fn test_load_basic_scene() {
        let mut loaded = load_scene_from_str(BASIC, Path::new(".")).unwrap();

        assert_eq!((loaded.image.width, loaded.image.height), (32, 16));
        assert_eq!(loaded.camera.position(), Vec3::new(0.0, 1.0, -2.0));
        assert_eq!(loaded.camera.settings.max_reflections, 5);
        assert_eq!(loaded.scene.object_count(), 2);
        assert_eq!(loaded.scene.lights().len(), 1);
        assert_eq!(loaded.scene.lights()[0].color, Color::ONE);
        assert_eq!(loaded.scene.global_ambient, Color::splat(0.1));

        loaded.scene.prepare();
        match &loaded.scene.objects()[0] {
            SceneObject::Sphere(sphere) => {
                assert_eq!(sphere.center(), Vec3::new(0.0, 0.0, 3.0));
                assert_eq!(sphere.material().reflection(), 0.25);
            }
            _ => panic!("first object should be a sphere"),
        }
    }

    #[test]
    fn test_render_block_overrides_settings() {
        let json = r#"{
            "render": { "multithreading": false, "reflections": 2, "threads": 3, "bsp": false, "bounding_boxes": false },
            "objects": []
        }"#;
        let loaded = load_scene_from_str(json, Path::new(".")).unwrap();

        assert!(!loaded.camera.settings.use_multithreading);
        assert_eq!(loaded.camera.settings.max_reflections, 2);
        assert_eq!(loaded.camera.settings.thread_count, Some(3));
        assert!(!loaded.scene.acceleration.use_bsp);
        assert!(!loaded.scene.acceleration.use_bounding_boxes);
        // Defaults for omitted blocks
        assert_eq!((loaded.image.width, loaded.image.height), (640, 360));
        assert_eq!(loaded.camera.position(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_rotation_is_in_degrees() {
        let json = r#"{
            "materials": { "m": { "diffuse": [1, 1, 1] } },
            "objects": [
                { "type": "triangle", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "material": "m",
                  "transform": { "rotation": [0, 0, 90] } }
            ]
        }"#;
        let mut loaded = load_scene_from_str(json, Path::new(".")).unwrap();
        loaded.scene.prepare();

        match &loaded.scene.objects()[0] {
            SceneObject::Triangle(triangle) => {
                let v1 = triangle.vertices()[1];
                assert!((v1 - Vec3::Y).length() < 1e-12);
            }
            _ => panic!("expected a triangle"),
        }
    }

    #[test]
    fn test_unknown_material() {
        let json = r#"{ "objects": [ { "type": "sphere", "radius": 1, "material": "missing" } ] }"#;
        match load_scene_from_str(json, Path::new(".")) {
            Err(SceneError::UnknownMaterial(name)) => assert_eq!(name, "missing"),
            other => panic!("expected unknown material, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_image_size() {
        let json = r#"{ "image": { "width": 0, "height": 10 }, "objects": [] }"#;
        assert!(matches!(
            load_scene_from_str(json, Path::new(".")),
            Err(SceneError::InvalidImageSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let json = r#"{ "objects": [ { "type": "cone" } ] }"#;
        assert!(matches!(
            load_scene_from_str(json, Path::new(".")),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_scene("/definitely/not/here/scene.json").err().unwrap();
        assert!(matches!(err, SceneError::Io { .. }));
        assert!(err.to_string().contains("scene.json"));
    }

    #[test]
    fn test_mesh_relative_to_scene_file() {
        let dir = temp_dir("mesh");
        // Unit quad at z = 2 facing the camera, written as one polygon
        std::fs::write(
            dir.join("quad.obj"),
            "v -1 -1 2\nv -1 1 2\nv 1 1 2\nv 1 -1 2\nf 1 2 3 4\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("scene.json"),
            r#"{
                "materials": { "grey": { "diffuse": [0.5, 0.5, 0.5] } },
                "objects": [ { "type": "mesh", "path": "quad.obj", "material": "grey" } ]
            }"#,
        )
        .unwrap();

        let mut loaded = load_scene(dir.join("scene.json")).unwrap();
        loaded.scene.prepare();

        match &loaded.scene.objects()[0] {
            SceneObject::Mesh(mesh) => assert_eq!(mesh.triangle_count(), 2),
            _ => panic!("expected a mesh"),
        }
        let ray = Ray::new(Vec3::new(0.2, 0.3, 0.0), Vec3::Z);
        let hit = loaded.scene.closest_intersection(&ray, Culling::Front).unwrap();
        assert!((hit.position.z - 2.0).abs() < 1e-9);
        assert!(loaded.scene.objects()[0].bounding_box().contains(Vec3::new(0.0, 0.0, 2.0)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_obj_is_rejected() {
        let dir = temp_dir("empty");
        let path = dir.join("empty.obj");
        std::fs::write(&path, "# nothing here\nv 0 0 0\n").unwrap();

        assert!(matches!(load_obj_faces(&path), Err(SceneError::EmptyMesh(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
