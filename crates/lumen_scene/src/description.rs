//! Serde model of the JSON scene format.
//!
//! Vectors are plain `[x, y, z]` arrays. Every top-level block except
//! `objects` may be omitted.

use lumen_math::{Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub image: ImageDeclaration,
    #[serde(default)]
    pub camera: CameraDeclaration,
    #[serde(default)]
    pub render: RenderDeclaration,
    #[serde(default)]
    pub ambient: [f64; 3],
    #[serde(default)]
    pub background: [f64; 3],
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDeclaration>,
    #[serde(default)]
    pub lights: Vec<LightDeclaration>,
    pub objects: Vec<ObjectDeclaration>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ImageDeclaration {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageDeclaration {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CameraDeclaration {
    pub position: [f64; 3],
}

impl Default for CameraDeclaration {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -1.0],
        }
    }
}

/// Overrides for render and acceleration settings; unset keys keep the
/// defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct RenderDeclaration {
    pub multithreading: Option<bool>,
    pub reflections: Option<u32>,
    pub threads: Option<usize>,
    pub bsp: Option<bool>,
    pub bounding_boxes: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaterialDeclaration {
    /// Defaults to the diffuse color
    #[serde(default)]
    pub ambient: Option<[f64; 3]>,
    pub diffuse: [f64; 3],
    #[serde(default)]
    pub specular: [f64; 3],
    #[serde(default = "default_shininess")]
    pub shininess: f64,
    #[serde(default)]
    pub reflection: f64,
}

fn default_shininess() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LightDeclaration {
    pub position: [f64; 3],
    #[serde(default = "white")]
    pub color: [f64; 3],
}

fn white() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ObjectDeclaration {
    Sphere {
        radius: f64,
        material: String,
        #[serde(default)]
        transform: TransformDeclaration,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        material: String,
        #[serde(default)]
        transform: TransformDeclaration,
    },
    Mesh {
        /// Relative paths are resolved against the scene file's directory
        path: PathBuf,
        material: String,
        #[serde(default)]
        transform: TransformDeclaration,
    },
}

impl ObjectDeclaration {
    pub fn material(&self) -> &str {
        match self {
            ObjectDeclaration::Sphere { material, .. }
            | ObjectDeclaration::Triangle { material, .. }
            | ObjectDeclaration::Mesh { material, .. } => material,
        }
    }
}

/// Rotation is given in degrees, applied X then Y then Z.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformDeclaration {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for TransformDeclaration {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl From<TransformDeclaration> for Transform {
    fn from(decl: TransformDeclaration) -> Self {
        let [rx, ry, rz] = decl.rotation;
        Transform::from_translation(Vec3::from_array(decl.translation))
            .with_rotation(Vec3::new(rx.to_radians(), ry.to_radians(), rz.to_radians()))
            .with_scale(Vec3::from_array(decl.scale))
    }
}
