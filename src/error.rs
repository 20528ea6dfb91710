use std::path::PathBuf;
use thiserror::Error;

/// Docsight error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A source file could not be read
    #[error("{reason}: {}", .path.display())]
    FileAccess { path: PathBuf, reason: String },

    /// A source file does not parse as Python
    #[error("SyntaxError: {message} (line {line}, column {column})")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Content generation error: {0}")]
    Generation(String),

    #[error("Write-back error: {0}")]
    WriteBack(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for docsight operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a file access error from the underlying I/O failure
    pub fn file_access(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let reason = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
            std::io::ErrorKind::InvalidData => "File is not valid UTF-8".to_string(),
            _ => format!("Cannot read file ({})", err),
        };
        Error::FileAccess {
            path: path.into(),
            reason,
        }
    }

    /// Create a syntax error at a 1-based location
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create a content generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Error::Generation(msg.into())
    }

    /// Create a write-back error
    pub fn write_back(msg: impl Into<String>) -> Self {
        Error::WriteBack(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
