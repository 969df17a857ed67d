//! Error type shared by every generator.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for code generation operations
#[derive(Debug)]
pub enum CodegenError {
    /// Empty or missing identifier where a class name is required
    InvalidIdentifier(String),
    /// Reading or writing a file failed
    Io { path: PathBuf, source: io::Error },
    /// A YAML document could not be parsed
    Yaml(serde_yaml::Error),
    /// A manifest entry is incomplete or inconsistent
    Config(String),
    /// A macro template or its parameters are unusable
    Template(String),
}

impl CodegenError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        CodegenError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_yaml::Error> for CodegenError {
    fn from(err: serde_yaml::Error) -> Self {
        CodegenError::Yaml(err)
    }
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::InvalidIdentifier(msg) => write!(f, "Invalid identifier: {}", msg),
            CodegenError::Io { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
            CodegenError::Yaml(e) => write!(f, "YAML error: {}", e),
            CodegenError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CodegenError::Template(msg) => write!(f, "Template error: {}", msg),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodegenError::Io { source, .. } => Some(source),
            CodegenError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;
