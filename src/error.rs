//! Centralized error types for eml2pdf.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the conversion library.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The output document already exists and overwriting was not allowed.
    #[error("Output exists: {0}")]
    OutputExists(PathBuf),

    /// The input file or directory does not exist.
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    /// The message could not be decoded.
    #[error("Could not parse message: {0}")]
    Parse(PathBuf),

    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the PDF failed.
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    /// The external HTML renderer ran but did not produce a document.
    #[error("Renderer '{program}' failed: {reason}")]
    Render { program: String, reason: String },

    /// The external HTML renderer could not be started.
    ///
    /// Never returned from a conversion: it makes the composer fall back to
    /// the direct-layout canvas.
    #[error("Renderer not available: {0}")]
    RendererUnavailable(String),
}

/// Convenience alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error: 2 when the output already exists, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::OutputExists(_) => 2,
            _ => 1,
        }
    }
}
