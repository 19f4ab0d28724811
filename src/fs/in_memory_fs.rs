//! In-Memory File System Implementation
//!
//! A pure in-memory file system; the default backend for a shell session.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::types::*;

#[derive(Debug, Clone)]
enum FsEntry {
    File { content: Vec<u8> },
    Directory,
}

/// In-memory virtual file system.
pub struct InMemoryFs {
    data: RwLock<HashMap<String, FsEntry>>,
}

impl InMemoryFs {
    /// Create a new filesystem containing only `/`.
    pub fn new() -> Self {
        Self::with_files::<&str, &str>(&[])
    }

    /// Create with initial files; parent directories are created as needed.
    pub fn with_files<P: AsRef<str>, C: AsRef<str>>(files: &[(P, C)]) -> Self {
        let mut data = HashMap::new();
        data.insert("/".to_string(), FsEntry::Directory);
        for (path, content) in files {
            let normalized = normalize_path(path.as_ref());
            ensure_parent_dirs(&mut data, &normalized);
            data.insert(normalized, FsEntry::File { content: content.as_ref().as_bytes().to_vec() });
        }
        Self { data: RwLock::new(data) }
    }

    /// Standard layout for a new session: `/bin`, `/usr/bin`, `/tmp` and the
    /// given home directory.
    pub fn with_home(home: &str) -> Self {
        let mut data = HashMap::new();
        data.insert("/".to_string(), FsEntry::Directory);
        for dir in ["/bin", "/usr/bin", "/tmp", home] {
            let normalized = normalize_path(dir);
            ensure_parent_dirs(&mut data, &normalized);
            data.insert(normalized, FsEntry::Directory);
        }
        Self { data: RwLock::new(data) }
    }
}

impl Default for InMemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_parent_dirs(data: &mut HashMap<String, FsEntry>, path: &str) {
    let dir = dirname(path);
    if dir == "/" {
        return;
    }
    if !data.contains_key(&dir) {
        ensure_parent_dirs(data, &dir);
        data.insert(dir, FsEntry::Directory);
    }
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn read_file(&self, path: &str) -> Result<String, FsError> {
        let data = self.data.read().await;
        match data.get(&normalize_path(path)) {
            Some(FsEntry::File { content }) => Ok(String::from_utf8_lossy(content).to_string()),
            Some(FsEntry::Directory) => Err(FsError::IsDirectory {
                path: path.to_string(),
                operation: "read".to_string(),
            }),
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "open".to_string(),
            }),
        }
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), FsError> {
        let mut data = self.data.write().await;
        let normalized = normalize_path(path);
        if let Some(FsEntry::Directory) = data.get(&normalized) {
            return Err(FsError::IsDirectory {
                path: path.to_string(),
                operation: "write".to_string(),
            });
        }
        ensure_parent_dirs(&mut data, &normalized);
        data.insert(normalized, FsEntry::File { content: content.to_vec() });
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.data.read().await.contains_key(&normalize_path(path))
    }

    async fn stat(&self, path: &str) -> Result<FsStat, FsError> {
        let data = self.data.read().await;
        match data.get(&normalize_path(path)) {
            Some(FsEntry::File { content }) => Ok(FsStat {
                is_file: true,
                is_directory: false,
                size: content.len() as u64,
            }),
            Some(FsEntry::Directory) => Ok(FsStat {
                is_file: false,
                is_directory: true,
                size: 0,
            }),
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "stat".to_string(),
            }),
        }
    }

    async fn mkdir(&self, path: &str, options: &MkdirOptions) -> Result<(), FsError> {
        let mut data = self.data.write().await;
        let normalized = normalize_path(path);

        match data.get(&normalized) {
            Some(FsEntry::File { .. }) => {
                return Err(FsError::AlreadyExists {
                    path: path.to_string(),
                    operation: "mkdir".to_string(),
                })
            }
            Some(FsEntry::Directory) if options.recursive => return Ok(()),
            Some(FsEntry::Directory) => {
                return Err(FsError::AlreadyExists {
                    path: path.to_string(),
                    operation: "mkdir".to_string(),
                })
            }
            None => {}
        }

        let parent = dirname(&normalized);
        match data.get(&parent) {
            Some(FsEntry::Directory) => {}
            Some(FsEntry::File { .. }) => {
                return Err(FsError::NotDirectory {
                    path: path.to_string(),
                    operation: "mkdir".to_string(),
                })
            }
            None if options.recursive => ensure_parent_dirs(&mut data, &normalized),
            None => {
                return Err(FsError::NotFound {
                    path: path.to_string(),
                    operation: "mkdir".to_string(),
                })
            }
        }

        data.insert(normalized, FsEntry::Directory);
        Ok(())
    }

    async fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let data = self.data.read().await;
        let normalized = normalize_path(path);
        match data.get(&normalized) {
            Some(FsEntry::Directory) => {}
            Some(FsEntry::File { .. }) => {
                return Err(FsError::NotDirectory {
                    path: path.to_string(),
                    operation: "scandir".to_string(),
                })
            }
            None => {
                return Err(FsError::NotFound {
                    path: path.to_string(),
                    operation: "scandir".to_string(),
                })
            }
        }

        let prefix = child_prefix(&normalized);
        let mut entries: Vec<DirEntry> = data
            .iter()
            .filter_map(|(p, entry)| {
                let name = p.strip_prefix(&prefix)?;
                if name.is_empty() || name.contains('/') {
                    return None;
                }
                Some(DirEntry {
                    name: name.to_string(),
                    is_directory: matches!(entry, FsEntry::Directory),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn rm(&self, path: &str, options: &RmOptions) -> Result<(), FsError> {
        let mut data = self.data.write().await;
        let normalized = normalize_path(path);

        match data.get(&normalized) {
            None if options.force => return Ok(()),
            None => {
                return Err(FsError::NotFound {
                    path: path.to_string(),
                    operation: "rm".to_string(),
                })
            }
            Some(FsEntry::File { .. }) => {}
            Some(FsEntry::Directory) => {
                let prefix = child_prefix(&normalized);
                let children: Vec<String> =
                    data.keys().filter(|k| k.starts_with(&prefix)).cloned().collect();
                if !children.is_empty() && !options.recursive {
                    return Err(FsError::NotEmpty {
                        path: path.to_string(),
                        operation: "rm".to_string(),
                    });
                }
                for child in children {
                    data.remove(&child);
                }
            }
        }

        // The root itself always stays
        if normalized != "/" {
            data.remove(&normalized);
        }
        Ok(())
    }
}

fn child_prefix(dir: &str) -> String {
    if dir == "/" {
        "/".to_string()
    } else {
        format!("{}/", dir)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_file_ops() {
        let fs = InMemoryFs::new();
        fs.write_file("/test.txt", b"hello").await.unwrap();
        assert!(fs.exists("/test.txt").await);
        assert_eq!(fs.read_file("/test.txt").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_with_files_creates_parents() {
        let fs = InMemoryFs::with_files(&[("/home/user/notes.txt", "a\nb\n")]);
        assert!(fs.stat("/home/user").await.unwrap().is_directory);
        assert_eq!(fs.stat("/home/user/notes.txt").await.unwrap().size, 4);
    }

    #[tokio::test]
    async fn test_with_home_layout() {
        let fs = InMemoryFs::with_home("/home/user");
        assert!(fs.stat("/home/user").await.unwrap().is_directory);
        assert!(fs.exists("/tmp").await);
        assert!(fs.exists("/usr/bin").await);
    }

    #[tokio::test]
    async fn test_read_missing_and_directory() {
        let fs = InMemoryFs::with_home("/home/user");
        assert!(matches!(fs.read_file("/nope").await, Err(FsError::NotFound { .. })));
        assert!(matches!(fs.read_file("/home").await, Err(FsError::IsDirectory { .. })));
    }

    #[tokio::test]
    async fn test_mkdir() {
        let fs = InMemoryFs::new();
        assert!(fs.mkdir("/a/b", &MkdirOptions { recursive: false }).await.is_err());
        fs.mkdir("/a/b", &MkdirOptions { recursive: true }).await.unwrap();
        assert!(fs.stat("/a").await.unwrap().is_directory);
        fs.mkdir("/a/c", &MkdirOptions::default()).await.unwrap();
        assert!(fs.mkdir("/a/c", &MkdirOptions::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_readdir_lists_direct_children() {
        let fs = InMemoryFs::with_files(&[("/d/b.txt", "b"), ("/d/a.txt", "a"), ("/d/sub/deep.txt", "x")]);
        let entries = fs.readdir("/d").await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
        assert!(entries[2].is_directory);
        assert!(matches!(fs.readdir("/d/a.txt").await, Err(FsError::NotDirectory { .. })));
        assert!(matches!(fs.readdir("/nope").await, Err(FsError::NotFound { .. })));
        assert_eq!(fs.readdir("/").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rm() {
        let fs = InMemoryFs::with_files(&[("/d/a.txt", "a"), ("/d/sub/deep.txt", "x"), ("/f.txt", "f")]);
        fs.rm("/f.txt", &RmOptions::default()).await.unwrap();
        assert!(!fs.exists("/f.txt").await);

        assert!(matches!(fs.rm("/d", &RmOptions::default()).await, Err(FsError::NotEmpty { .. })));
        fs.rm("/d", &RmOptions { recursive: true, force: false }).await.unwrap();
        assert!(!fs.exists("/d/sub/deep.txt").await);
        assert!(!fs.exists("/d").await);

        assert!(matches!(fs.rm("/d", &RmOptions::default()).await, Err(FsError::NotFound { .. })));
        fs.rm("/d", &RmOptions { recursive: false, force: true }).await.unwrap();
    }

    #[test]
    fn test_resolve_path() {
        let fs = InMemoryFs::new();
        assert_eq!(fs.resolve_path("/home/user", "notes.txt"), "/home/user/notes.txt");
        assert_eq!(fs.resolve_path("/home/user", "../x"), "/home/x");
        assert_eq!(fs.resolve_path("/", "tmp"), "/tmp");
        assert_eq!(fs.resolve_path("/home", "/etc"), "/etc");
    }
}
