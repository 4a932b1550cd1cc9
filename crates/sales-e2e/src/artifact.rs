//! Screenshot artifacts

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::E2eResult;

/// A screenshot the run left on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotArtifact {
    pub path: PathBuf,
    pub sha256: String,
    pub width: u32,
    pub height: u32,
}

impl ScreenshotArtifact {
    /// Hash the file and read its dimensions. Fails if it is not a decodable image.
    pub fn inspect(path: &Path) -> E2eResult<Self> {
        let data = std::fs::read(path)?;
        let (width, height) = image::image_dimensions(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&data);

        Ok(Self {
            path: path.to_path_buf(),
            sha256: hex::encode(hasher.finalize()),
            width,
            height,
        })
    }
}
