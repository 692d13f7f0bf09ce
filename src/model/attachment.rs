//! Attachment records.
//!
//! An [`Attachment`] exists only after its payload has been written, so
//! `saved_path` always points at a file on disk.

use std::path::PathBuf;

/// An attachment extracted from a message and saved to disk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Attachment {
    /// Sanitized filename the payload was saved under.
    pub filename: String,

    /// MIME content type (e.g. `"image/jpeg"`, `"application/pdf"`).
    pub content_type: String,

    /// Decoded payload size in bytes.
    pub size: u64,

    /// Location of the saved payload.
    pub saved_path: PathBuf,
}

impl Attachment {
    /// One-line listing used by both renderers: `name (type, N bytes)`.
    pub fn describe(&self) -> String {
        format!("{} ({}, {} bytes)", self.filename, self.content_type, self.size)
    }
}
