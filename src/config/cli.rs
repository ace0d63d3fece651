use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Writes card files under a base directory, creating it on first use.
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
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    fn describe(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("cards").join("run1");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.write_file("bingo_1.pdf", b"%PDF-1.3").await.unwrap();

        let written = std::fs::read(base.join("bingo_1.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.3");
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let storage = LocalStorage::new(blocker.to_str().unwrap().to_string());
        assert!(storage.write_file("bingo_1.pdf", b"data").await.is_err());
    }

    #[test]
    fn test_describe_joins_base_path() {
        let storage = LocalStorage::new("out".to_string());
        assert_eq!(
            storage.describe("bingo_2.pdf"),
            Path::new("out").join("bingo_2.pdf").display().to_string()
        );
    }
}
