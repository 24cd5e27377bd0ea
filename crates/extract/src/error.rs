//! Error types for source analysis.

use std::path::PathBuf;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while analyzing a JS/TS source file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The file's syntax could not be parsed.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// Path of the offending file
        path: PathBuf,
        /// Parser error message
        message: String,
    },

    /// The file extension is not a supported JS/TS language.
    #[error("unsupported file type: {}", path.display())]
    UnsupportedFileType {
        /// Path of the offending file
        path: PathBuf,
    },
}
