use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A directory entry as seen through `Storage::list_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Entries of `path` sorted by name. Snapshot, not a live iterator.
    fn list_dir(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<StorageEntry>>> + Send;
    fn is_dir(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
}

/// Settings for the batch QR generator.
pub trait ConfigProvider: Send + Sync {
    fn root_dir(&self) -> &str;
    fn marker_dir(&self) -> &str;
    fn link_list(&self) -> &str;
    fn require_root(&self) -> bool;
    fn module_size(&self) -> u32;
    fn quiet_zone(&self) -> u32;
    fn ec_level(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;
    type Output: Send;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<Self::Output>;
}
