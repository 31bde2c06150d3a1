// Local-to-world placement of scene objects.
//
// glam::DMat4 already provides transform_point3(), transform_vector3() and
// inverse(); this adds AABB transformation and a TRS description.

use crate::{Aabb, EulerRot, Mat4, Quat, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let (lo, hi) = (aabb.min, aabb.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];

        let first = self.transform_point3(corners[0]);
        let (min, max) = corners[1..]
            .iter()
            .map(|&corner| self.transform_point3(corner))
            .fold((first, first), |(min, max), p| (min.min(p), max.max(p)));

        Aabb::from_points(min, max)
    }
}

/// Translation, rotation and scale of an object, applied in S-R-T order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-world matrix.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }

    /// Transform a point (translation applies).
    pub fn apply_point(&self, point: Vec3) -> Vec3 {
        self.matrix().transform_point3(point)
    }

    /// Transform a direction (translation does not apply).
    pub fn apply_vector(&self, vector: Vec3) -> Vec3 {
        self.matrix().transform_vector3(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_identity() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::IDENTITY.apply_point(point), point);
        assert_eq!(Transform::default().apply_vector(point), point);
    }

    #[test]
    fn test_translation_affects_points_not_vectors() {
        let t = Transform::from_translation(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(t.apply_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(11.0, 22.0, 33.0));
        assert_eq!(t.apply_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_rotation_z() {
        let t = Transform::IDENTITY.with_rotation(Vec3::new(0.0, 0.0, PI / 2.0));
        let rotated = t.apply_vector(Vec3::X);
        assert!((rotated - Vec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_scale_then_translate() {
        let t = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0));
        assert_eq!(t.apply_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::splat(5.0));
        let transformed = mat.transform_aabb(&Aabb::from_points(Vec3::ZERO, Vec3::ONE));

        assert!((transformed.min - Vec3::splat(5.0)).length() < 1e-9);
        assert!((transformed.max - Vec3::splat(6.0)).length() < 1e-9);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        let mat = Mat4::from_rotation_y(PI / 4.0);
        let transformed = mat.transform_aabb(&Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE));

        let half_diagonal = 2.0_f64.sqrt();
        assert!((transformed.max.x - half_diagonal).abs() < 1e-9);
        assert!((transformed.max.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_empty_aabb_stays_empty() {
        let mat = Mat4::from_translation(Vec3::ONE);
        assert!(mat.transform_aabb(&Aabb::EMPTY).is_empty());
    }
}
