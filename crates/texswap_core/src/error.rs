use camino::Utf8PathBuf;
use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("unknown language '{0}' (expected one of EN, ES, FR, DE, IT)")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("failed to read mapping file {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse mapping table")]
    Parse(#[from] serde_json::Error),
}

/// Reasons a file name cannot go through the positional fallback rename.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FallbackError {
    #[error("file name '{0}' is shorter than 8 characters")]
    TooShort(String),
    #[error("file name '{name}' has '{found}' where a digit is expected")]
    NotADigit { name: String, found: char },
    #[error("file name '{name}' has digit {digit}, which would become negative")]
    NegativeDigit { name: String, digit: u32 },
}

/// Aborts a whole swap run.
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("source directory '{0}' does not exist")]
    SourceDirectoryMissing(Utf8PathBuf),
}

/// A failure isolated to a single source file. The run continues past these.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to copy {source_path} to {destination_path}")]
    CopyFailed {
        source_path: Utf8PathBuf,
        destination_path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create directory {path}")]
    CreateDirFailed {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot rename {path}")]
    MalformedFallbackInput {
        path: Utf8PathBuf,
        #[source]
        source: FallbackError,
    },
    #[error("failed to read directory entry")]
    Walk(#[from] walkdir::Error),
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

impl FileError {
    /// The path this failure is about, when it is known.
    pub fn path(&self) -> Option<String> {
        match self {
            FileError::CopyFailed { source_path, .. } => Some(source_path.to_string()),
            FileError::CreateDirFailed { path, .. } => Some(path.to_string()),
            FileError::MalformedFallbackInput { path, .. } => Some(path.to_string()),
            FileError::Walk(error) => error.path().map(|p| p.display().to_string()),
            FileError::NonUtf8Path(path) => Some(path.display().to_string()),
        }
    }
}
