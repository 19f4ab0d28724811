//! File System Module
//!
//! File system collaborator used for script loading and command inputs.
//! Implementations:
//! - InMemoryFs: pure in-memory file system (default for sessions)
//! - HostFs: pass-through to the real filesystem (used by the CLI)

pub mod types;
pub mod in_memory_fs;
pub mod host_fs;

pub use types::*;
pub use in_memory_fs::InMemoryFs;
pub use host_fs::HostFs;
