use crate::core::Storage;
use crate::utils::error::{ExportError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Writes exports below `base_path` on the local filesystem.
///
/// Directories are created one level at a time; a missing parent is an error.
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
    fn root(&self) -> &str {
        &self.base_path
    }

    async fn ensure_root(&self) -> Result<bool> {
        let root = Path::new(&self.base_path);
        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(false),
            Ok(_) => Err(ExportError::NotADirectory {
                path: self.base_path.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir(root).map_err(|source| ExportError::CreateDirectory {
                    path: self.base_path.clone(),
                    source,
                })?;
                tracing::debug!("Created output root {}", self.base_path);
                Ok(true)
            }
            Err(e) => Err(ExportError::Io(e)),
        }
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::create_dir(&full_path).map_err(|source| ExportError::CreateDirectory {
            path: full_path.display().to_string(),
            source,
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::write(&full_path, data).map_err(|source| ExportError::WriteFile {
            path: full_path.display().to_string(),
            source,
        })
    }
}
