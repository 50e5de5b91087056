//! Resource loading from disk.

use aot_orchestrator::{GenerationError, ResourceLoader};
use async_trait::async_trait;
use std::path::Path;

/// Reads templates and translation files with `tokio::fs`.
#[derive(Debug, Default)]
pub struct FsResourceLoader;

impl FsResourceLoader {
    /// Creates a loader.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResourceLoader for FsResourceLoader {
    async fn resolve(&self, path: &Path) -> Result<String, GenerationError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GenerationError::Resource {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
