use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load mesh {}: {source}", path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("Mesh {} contains no triangles", .0.display())]
    EmptyMesh(PathBuf),
}

pub type SceneResult<T> = Result<T, SceneError>;
