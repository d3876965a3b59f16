use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;
use tokio::fs;

/// Storage rooted at the output directory; every path is relative to it.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_folders() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage
            .write_file("output_notifications_1/Уведомление_кв_1.docx", b"doc")
            .await
            .unwrap();

        let data = storage
            .read_file("output_notifications_1/Уведомление_кв_1.docx")
            .await
            .unwrap();
        assert_eq!(data, b"doc");
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        assert!(storage.read_file("missing.zip").await.is_err());
    }
}
