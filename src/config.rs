//! Shell configuration file (TOML)
//!
//! ```toml
//! cwd = "/home/user"
//! unresolved_variables = "empty"
//!
//! [env]
//! EDITOR = "vi"
//!
//! [limits]
//! max_loop_iterations = 500
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::interpreter::types::{ExecutionLimits, ExpansionPolicy};
use crate::shell::ShellOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read by the CLI from `--config <file>`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Starting working directory
    pub cwd: Option<String>,

    /// Variables exported into the session on top of the defaults
    pub env: IndexMap<String, String>,

    pub limits: ExecutionLimits,

    /// What an undefined `$name` expands to
    pub unresolved_variables: ExpansionPolicy,
}

impl ShellConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ShellConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Session options carrying these settings
    pub fn into_options(self) -> ShellOptions {
        ShellOptions {
            env: self.env,
            cwd: self.cwd,
            limits: self.limits,
            expansion: self.unresolved_variables,
            ..Default::default()
        }
    }
}
