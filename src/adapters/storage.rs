use crate::core::Storage;
use crate::utils::error::{CurError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    fn expand(&self, pattern: &str) -> Result<Vec<String>> {
        // 一般路徑直接使用，不當成 glob 解析
        if self.resolve(pattern).is_file() {
            return Ok(vec![pattern.to_string()]);
        }

        let full_pattern = self.resolve(pattern);
        let mut paths = Vec::new();
        for entry in glob::glob(&full_pattern.to_string_lossy())? {
            match entry {
                Ok(path) if path.is_file() => {
                    let relative = path
                        .strip_prefix(&self.base_path)
                        .map(Path::to_path_buf)
                        .unwrap_or(path);
                    paths.push(relative.to_string_lossy().into_owned());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("⚠️ Cannot read {}: {}", e.path().display(), e.error()),
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(CurError::NoInputFiles {
                pattern: pattern.to_string(),
            });
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());

        storage.write_file("reports/ec2_usage.csv", b"cost\n1\n").await.unwrap();
        let data = storage.read_file("reports/ec2_usage.csv").await.unwrap();
        assert_eq!(data, b"cost\n1\n");
    }

    #[test]
    fn test_expand_glob() {
        let dir = TempDir::new().unwrap();
        for name in ["cur-2024-06.csv", "cur-2024-05.csv", "notes.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());

        let paths = storage.expand("cur-*.csv").unwrap();
        assert_eq!(paths, vec!["cur-2024-05.csv", "cur-2024-06.csv"]);

        let single = storage.expand("notes.txt").unwrap();
        assert_eq!(single, vec!["notes.txt"]);

        let err = storage.expand("missing-*.csv").unwrap_err();
        assert!(matches!(err, CurError::NoInputFiles { .. }));
    }
}
