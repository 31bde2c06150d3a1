//! Scene loading for Lumen.
//!
//! Reads a JSON scene description, imports referenced OBJ meshes and
//! assembles a ready-to-render [`Scene`](lumen_renderer::Scene), camera
//! and output image.

pub mod description;
mod error;
mod loader;

pub use description::SceneDescription;
pub use error::{SceneError, SceneResult};
pub use loader::{load_obj_faces, load_scene, load_scene_from_str, LoadedScene};
