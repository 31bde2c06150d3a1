//! Surface shading.

use crate::{Culling, Intersection, Scene};
use lumen_math::{Ray, Vec3, Vec3Ext};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Offset applied to shadow-ray origins so they do not re-hit their own
/// surface.
const SHADOW_BIAS: f64 = 1e-6;

/// Trait for materials that compute the color seen at an intersection.
///
/// Implementations may query the scene (lights, shadow rays) but must not
/// mutate it: shading runs concurrently from every render worker.
pub trait Material: Send + Sync {
    /// Direct color at `hit`, seen along `ray`. `camera_ray` is the primary
    /// ray the current path started from.
    fn shade(&self, ray: &Ray, camera_ray: &Ray, hit: &Intersection<'_>, scene: &Scene) -> Color;

    /// Fraction of the reflected ray's color added on top of `shade`.
    /// Zero disables reflection rays.
    fn reflection(&self) -> f64 {
        0.0
    }
}

/// Phong material with hard shadows.
#[derive(Debug, Clone)]
pub struct PhongMaterial {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f64,
    pub reflection: f64,
}

impl PhongMaterial {
    /// Matte material of the given diffuse color.
    pub fn new(diffuse: Color) -> Self {
        Self {
            ambient: diffuse,
            diffuse,
            specular: Color::ZERO,
            shininess: 1.0,
            reflection: 0.0,
        }
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_specular(mut self, specular: Color, shininess: f64) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Set the reflection coefficient, clamped to [0, 1].
    pub fn with_reflection(mut self, reflection: f64) -> Self {
        self.reflection = reflection.clamp(0.0, 1.0);
        self
    }
}

impl Material for PhongMaterial {
    fn shade(&self, _ray: &Ray, _camera_ray: &Ray, hit: &Intersection<'_>, scene: &Scene) -> Color {
        let mut color = self.ambient * scene.global_ambient;

        for light in scene.lights() {
            let to_light = light.position - hit.position;
            let light_distance_sq = to_light.length_squared();
            let l = to_light.normalize_or_zero();

            let n_dot_l = hit.normal.dot(l);
            if n_dot_l <= 0.0 {
                continue;
            }

            let shadow_ray = Ray::new(hit.position + l * SHADOW_BIAS, l);
            if let Some(blocker) = scene.closest_intersection(&shadow_ray, Culling::Front) {
                if blocker.distance_squared < light_distance_sq {
                    continue;
                }
            }

            color += self.diffuse * light.color * n_dot_l;

            if self.specular != Color::ZERO {
                let r = (-l).reflect_about(hit.normal);
                let r_dot_v = r.dot(hit.view).max(0.0);
                color += self.specular * light.color * r_dot_v.powf(self.shininess);
            }
        }

        color
    }

    fn reflection(&self) -> f64 {
        self.reflection
    }
}
