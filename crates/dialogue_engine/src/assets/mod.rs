//! Asset loading
//!
//! The play mode receives its scene, sound samples and font through an
//! [`AssetLoader`] handed to its constructor. [`DirectoryAssets`] serves
//! them from a data directory on disk.

mod camera;
mod sample;

pub use camera::Camera;
pub use sample::{AudioFormat, SoundSample};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Scene must hold exactly one camera
    #[error("Expecting scene to have exactly one camera, but it has {0}")]
    CameraCount(usize),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Scene state the dialogue mode needs: its cameras
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Cameras in scene order
    pub cameras: Vec<Camera>,
}

impl Scene {
    /// The scene's only camera
    ///
    /// # Errors
    ///
    /// [`AssetError::CameraCount`] unless there is exactly one camera.
    pub fn single_camera_mut(&mut self) -> AssetResult<&mut Camera> {
        match self.cameras.as_mut_slice() {
            [camera] => Ok(camera),
            cameras => Err(AssetError::CameraCount(cameras.len())),
        }
    }
}

/// Source of named game assets
pub trait AssetLoader {
    /// Load a scene by asset name
    ///
    /// # Errors
    ///
    /// Missing or malformed scene.
    fn load_scene(&mut self, name: &str) -> AssetResult<Scene>;

    /// Load an encoded sound sample by asset name
    ///
    /// # Errors
    ///
    /// Missing file or unrecognised audio data.
    fn load_sample(&mut self, name: &str) -> AssetResult<SoundSample>;

    /// Load font file bytes by asset name
    ///
    /// # Errors
    ///
    /// Missing or unreadable font file.
    fn load_font(&mut self, name: &str) -> AssetResult<Vec<u8>>;

    /// Filesystem path of a named asset
    fn data_path(&self, name: &str) -> PathBuf;
}

/// Assets stored as files under one directory
///
/// Scenes are RON documents describing the scene's cameras.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Serve assets from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str) -> AssetResult<Vec<u8>> {
        let path = self.data_path(name);
        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(&path)?;
        log::debug!("Read asset {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes)
    }
}

impl AssetLoader for DirectoryAssets {
    fn load_scene(&mut self, name: &str) -> AssetResult<Scene> {
        let bytes = self.read(name)?;
        let source = String::from_utf8(bytes)
            .map_err(|e| AssetError::InvalidData(format!("{}: {}", name, e)))?;
        ron::from_str(&source).map_err(|e| AssetError::InvalidData(format!("{}: {}", name, e)))
    }

    fn load_sample(&mut self, name: &str) -> AssetResult<SoundSample> {
        SoundSample::from_bytes(self.read(name)?)
    }

    fn load_font(&mut self, name: &str) -> AssetResult<Vec<u8>> {
        self.read(name)
    }

    fn data_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
