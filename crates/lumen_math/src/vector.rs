use crate::Vec3;

/// Vector operations the renderer needs on top of what glam provides.
pub trait Vec3Ext {
    /// Projection of `self` onto the line spanned by `dir`.
    ///
    /// `dir` does not have to be unit length. Projecting onto a zero vector
    /// yields the zero vector.
    fn project_on(self, dir: Vec3) -> Vec3;

    /// Mirror reflection of `self` about the plane with normal `normal`.
    ///
    /// `normal` is expected to be unit length.
    fn reflect_about(self, normal: Vec3) -> Vec3;

    /// Component-wise inverse. Zero components map to infinities of the
    /// matching sign, which the slab test handles explicitly.
    fn inverse(self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn project_on(self, dir: Vec3) -> Vec3 {
        let len_sq = dir.length_squared();
        if len_sq == 0.0 {
            return Vec3::ZERO;
        }
        dir * (self.dot(dir) / len_sq)
    }

    #[inline]
    fn reflect_about(self, normal: Vec3) -> Vec3 {
        self - normal * (2.0 * self.dot(normal))
    }

    #[inline]
    fn inverse(self) -> Vec3 {
        Vec3::new(1.0 / self.x, 1.0 / self.y, 1.0 / self.z)
    }
}
