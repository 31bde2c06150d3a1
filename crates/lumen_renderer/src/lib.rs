//! Lumen renderer - recursive Whitted-style raycasting.
//!
//! Scene geometry (spheres, triangles, triangle meshes) is indexed by a
//! binary space-partitioning tree over bounding boxes. Each camera ray
//! resolves its closest hit through that index, is shaded by the hit
//! material and spawns mirror reflections up to a bounce limit. Frames are
//! rendered in horizontal row bands, one worker per hardware thread.

mod band;
mod bsp;
mod camera;
mod framebuffer;
mod intersection;
mod light;
mod material;
mod mesh;
mod object;
mod scene;
mod sphere;
mod triangle;

pub use band::{detect_thread_count, partition_rows, render_band, RowBand};
pub use bsp::{BspNode, BspParams, BspTree};
pub use camera::{Camera, RenderSettings, ViewPlane};
pub use framebuffer::{color_to_rgb, ImageBuffer};
pub use intersection::{Culling, Intersectable, Intersection};
pub use light::Light;
pub use material::{Color, Material, PhongMaterial};
pub use mesh::Mesh;
pub use object::SceneObject;
pub use scene::{AccelerationConfig, Scene, REFLECTION_BIAS};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Transform, Vec3};
