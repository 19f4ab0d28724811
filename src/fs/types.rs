//! File System Types
//!
//! Core types and traits for the file system collaborator. The shell only
//! needs a narrow surface: reading scripts and command inputs, checking
//! paths for `cd` and `test`, and the file commands (`ls`, `mkdir`, `touch`,
//! `rm`).

use async_trait::async_trait;
use thiserror::Error;

/// File system errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("ENOENT: no such file or directory, {operation} '{path}'")]
    NotFound { path: String, operation: String },

    #[error("EEXIST: file already exists, {operation} '{path}'")]
    AlreadyExists { path: String, operation: String },

    #[error("EISDIR: illegal operation on a directory, {operation} '{path}'")]
    IsDirectory { path: String, operation: String },

    #[error("ENOTDIR: not a directory, {operation} '{path}'")]
    NotDirectory { path: String, operation: String },

    #[error("ENOTEMPTY: directory not empty, {operation} '{path}'")]
    NotEmpty { path: String, operation: String },

    #[error("EACCES: permission denied, {operation} '{path}'")]
    PermissionDenied { path: String, operation: String },

    #[error("{message}")]
    Other { message: String },
}

impl FsError {
    /// Map a host I/O error onto the same taxonomy the in-memory backend uses
    pub fn from_io(err: std::io::Error, path: &str, operation: &str) -> Self {
        let path = path.to_string();
        let operation = operation.to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound { path, operation },
            std::io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path, operation },
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path, operation },
            _ => FsError::Other {
                message: format!("{}: {} '{}'", err, operation, path),
            },
        }
    }
}

/// File status information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStat {
    pub is_file: bool,
    pub is_directory: bool,
    pub size: u64,
}

/// Options for mkdir operation
#[derive(Debug, Clone, Default)]
pub struct MkdirOptions {
    pub recursive: bool,
}

/// Options for rm operation
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Remove directories and their contents
    pub recursive: bool,
    /// Ignore missing paths
    pub force: bool,
}

/// Directory entry with its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

/// Abstract filesystem interface that can be implemented by different backends.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read the contents of a file as a string (utf8, lossy)
    async fn read_file(&self, path: &str) -> Result<String, FsError>;

    /// Write content to a file, creating it if it doesn't exist
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), FsError>;

    /// Check if a path exists
    async fn exists(&self, path: &str) -> bool;

    /// Get file/directory information
    async fn stat(&self, path: &str) -> Result<FsStat, FsError>;

    /// Create a directory
    async fn mkdir(&self, path: &str, options: &MkdirOptions) -> Result<(), FsError>;

    /// Entries of a directory, sorted by name
    async fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;

    /// Remove a file or directory
    async fn rm(&self, path: &str, options: &RmOptions) -> Result<(), FsError>;

    /// Resolve a relative path against a base path
    fn resolve_path(&self, base: &str, path: &str) -> String {
        if path.starts_with('/') {
            normalize_path(path)
        } else if base == "/" {
            normalize_path(&format!("/{}", path))
        } else {
            normalize_path(&format!("{}/{}", base, path))
        }
    }
}

/// Collapse `.`/`..` and duplicate separators into an absolute path
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    let mut resolved: Vec<&str> = Vec::new();
    for part in path.split('/').filter(|p| !p.is_empty() && *p != ".") {
        if part == ".." {
            resolved.pop();
        } else {
            resolved.push(part);
        }
    }
    if resolved.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", resolved.join("/"))
    }
}

/// Parent directory of a normalized path
pub fn dirname(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(pos) => normalized[..pos].to_string(),
    }
}
