//! Lumen math types.
//!
//! Double precision throughout: glam's `DVec3`/`DMat4`/`DQuat` are re-exported
//! under the short names the rest of the workspace uses.

pub use glam::{DMat4 as Mat4, DQuat as Quat, DVec3 as Vec3, EulerRot};

mod aabb;
mod interval;
mod ray;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Mat4Ext, Transform};
pub use vector::Vec3Ext;
