use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Files rooted at `base_path`; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}
