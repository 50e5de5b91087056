//! The resource loader collaborator.

use crate::error::GenerationError;
use async_trait::async_trait;
use std::path::Path;

/// Loads non-code resources (templates, styles) referenced by sources.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Returns the content of the resource at `path`.
    async fn resolve(&self, path: &Path) -> Result<String, GenerationError>;
}
