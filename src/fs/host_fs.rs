//! Host File System
//!
//! Passes paths straight through to the real filesystem with `tokio::fs`.
//! Used by the CLI so script paths and command arguments name host files.

use async_trait::async_trait;

use super::types::*;

#[derive(Debug, Default, Clone, Copy)]
pub struct HostFs;

impl HostFs {
    pub fn new() -> Self {
        HostFs
    }
}

#[async_trait]
impl FileSystem for HostFs {
    async fn read_file(&self, path: &str) -> Result<String, FsError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io(e, path, "open"))?;
        if meta.is_dir() {
            return Err(FsError::IsDirectory {
                path: path.to_string(),
                operation: "read".to_string(),
            });
        }
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FsError::from_io(e, path, "open"))?;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), FsError> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FsError::from_io(e, path, "write"))
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn stat(&self, path: &str) -> Result<FsStat, FsError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io(e, path, "stat"))?;
        Ok(FsStat {
            is_file: meta.is_file(),
            is_directory: meta.is_dir(),
            size: meta.len(),
        })
    }

    async fn mkdir(&self, path: &str, options: &MkdirOptions) -> Result<(), FsError> {
        let result = if options.recursive {
            tokio::fs::create_dir_all(path).await
        } else {
            tokio::fs::create_dir(path).await
        };
        result.map_err(|e| FsError::from_io(e, path, "mkdir"))
    }

    async fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let mut dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| FsError::from_io(e, path, "scandir"))?;
        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(e, path, "scandir"))?
        {
            let is_directory = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_directory,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn rm(&self, path: &str, options: &RmOptions) -> Result<(), FsError> {
        let meta = match tokio::fs::symlink_metadata(path).await {
            Ok(meta) => meta,
            Err(e) if options.force && e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(FsError::from_io(e, path, "rm")),
        };
        let result = if !meta.is_dir() {
            tokio::fs::remove_file(path).await
        } else if options.recursive {
            tokio::fs::remove_dir_all(path).await
        } else {
            if !self.readdir(path).await?.is_empty() {
                return Err(FsError::NotEmpty {
                    path: path.to_string(),
                    operation: "rm".to_string(),
                });
            }
            tokio::fs::remove_dir(path).await
        };
        result.map_err(|e| FsError::from_io(e, path, "rm"))
    }
}
