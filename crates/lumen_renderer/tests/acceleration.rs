//! Indexed closest-hit resolution must agree with brute force.

use lumen_renderer::{
    AccelerationConfig, Color, Culling, Intersectable, Material, Mesh, PhongMaterial, Ray, Scene,
    Sphere, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn random_point(rng: &mut StdRng, extent: f64) -> Vec3 {
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// Spheres, loose triangles and one mesh scattered through a 20 unit cube.
fn random_scene(seed: u64, acceleration: AccelerationConfig) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let material: Arc<dyn Material> = Arc::new(PhongMaterial::new(Color::ONE));

    let mut scene = Scene::new();
    scene.acceleration = acceleration;

    for _ in 0..60 {
        let center = random_point(&mut rng, 10.0);
        let radius = rng.gen_range(0.2..1.0);
        scene.add(Sphere::at(center, radius, Arc::clone(&material)));
    }

    for _ in 0..40 {
        let anchor = random_point(&mut rng, 10.0);
        let a = anchor + random_point(&mut rng, 1.5);
        let b = anchor + random_point(&mut rng, 1.5);
        scene.add(Triangle::new(anchor, a, b, Arc::clone(&material)));
    }

    let mesh_center = random_point(&mut rng, 5.0);
    let faces = (0..200)
        .map(|_| {
            let anchor = mesh_center + random_point(&mut rng, 3.0);
            [
                anchor,
                anchor + random_point(&mut rng, 0.5),
                anchor + random_point(&mut rng, 0.5),
            ]
        })
        .collect();
    scene.add(Mesh::new(faces, Arc::clone(&material)));

    scene.prepare();
    scene
}

fn brute_force() -> AccelerationConfig {
    AccelerationConfig {
        use_bounding_boxes: false,
        use_bsp: false,
        ..AccelerationConfig::default()
    }
}

fn random_rays(seed: u64, count: usize) -> Vec<Ray> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let origin = random_point(&mut rng, 15.0);
            // Aim somewhere inside the populated region
            let target = random_point(&mut rng, 8.0);
            Ray::towards(origin, target)
        })
        .collect()
}

#[test]
fn test_indexed_matches_brute_force_for_every_culling_mode() {
    let indexed = random_scene(7, AccelerationConfig::default());
    let brute = random_scene(7, brute_force());
    assert!(!indexed.bsp().is_empty());
    assert!(brute.bsp().is_empty());

    let mut hits = 0;
    for ray in random_rays(11, 2000) {
        for culling in [Culling::Front, Culling::Back, Culling::Off] {
            let a = indexed.closest_intersection(&ray, culling);
            let b = brute.closest_intersection(&ray, culling);
            match (a, b) {
                (Some(a), Some(b)) => {
                    hits += 1;
                    assert!(
                        (a.position - b.position).length() < 1e-9,
                        "{:?} {:?}: indexed {:?} vs brute {:?}",
                        ray,
                        culling,
                        a.position,
                        b.position
                    );
                }
                (None, None) => {}
                (a, b) => panic!(
                    "{:?} {:?}: indexed hit {} vs brute hit {}",
                    ray,
                    culling,
                    a.is_some(),
                    b.is_some()
                ),
            }
        }
    }
    // Make sure the comparison was not vacuous
    assert!(hits > 200, "only {hits} hits");
}

#[test]
fn test_bounding_boxes_alone_match_brute_force() {
    let boxes_only = random_scene(
        23,
        AccelerationConfig {
            use_bsp: false,
            ..AccelerationConfig::default()
        },
    );
    let brute = random_scene(23, brute_force());

    for ray in random_rays(29, 500) {
        let a = boxes_only.closest_intersection(&ray, Culling::Front).map(|h| h.position);
        let b = brute.closest_intersection(&ray, Culling::Front).map(|h| h.position);
        match (a, b) {
            (Some(a), Some(b)) => assert!((a - b).length() < 1e-9),
            (None, None) => {}
            _ => panic!("bounding-box pruning changed the result for {:?}", ray),
        }
    }
}

#[test]
fn test_candidates_contain_brute_force_closest() {
    let scene = random_scene(3, AccelerationConfig::default());
    let mut candidates = Vec::new();

    for ray in random_rays(5, 1000) {
        let closest = scene
            .objects()
            .iter()
            .enumerate()
            .filter_map(|(i, object)| object.intersect(&ray, Culling::Off).map(|h| (i, h.distance_squared)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((index, _)) = closest {
            assert!(scene.bsp().intersects(&ray, &mut candidates));
            assert!(
                candidates.contains(&index),
                "index pruned object {index} for {:?}",
                ray
            );
        }
    }
}

#[test]
fn test_empty_scene_index_reports_nothing() {
    let mut scene = Scene::new();
    scene.prepare();

    let mut candidates = vec![1, 2, 3];
    for ray in random_rays(1, 50) {
        assert!(!scene.bsp().intersects(&ray, &mut candidates));
        assert!(candidates.is_empty());
        assert!(scene.closest_intersection(&ray, Culling::Off).is_none());
    }
}
