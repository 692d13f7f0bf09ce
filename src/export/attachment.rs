//! Save attachment payloads from a message to disk.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::model::attachment::Attachment;
use crate::parser::eml::DecodedMessage;

static UNSAFE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid filename pattern"));

/// Extensions preferred over `mime_guess`'s alphabetical first pick.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("text/plain", ".txt"),
    ("text/html", ".html"),
    ("text/csv", ".csv"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("application/pdf", ".pdf"),
    ("application/zip", ".zip"),
    ("application/octet-stream", ".bin"),
    ("message/rfc822", ".eml"),
];

/// Write every `attachment`/`inline` leaf of `msg` into `output_dir`.
///
/// The directory is created if needed. Attachments are returned in walk order;
/// unnamed ones are called `attachment-<n><ext>` where `n` counts saved
/// attachments starting at 1.
pub fn save_attachments(msg: &DecodedMessage, output_dir: &Path) -> Result<Vec<Attachment>> {
    std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;

    let mut saved = Vec::new();
    for part in msg.walk().filter(|p| p.is_extractable()) {
        let index = saved.len() + 1;
        let fallback = format!(
            "attachment-{index}{}",
            guess_extension(&part.content_type).unwrap_or_default()
        );
        let filename = sanitize_filename(part.filename.as_deref().unwrap_or(""), &fallback);
        let path = output_dir.join(&filename);

        std::fs::write(&path, &part.payload).map_err(|e| ConvertError::io(&path, e))?;
        debug!(
            filename = %filename,
            size = part.payload.len(),
            "Saved attachment"
        );

        saved.push(Attachment {
            filename,
            content_type: part.content_type.clone(),
            size: part.payload.len() as u64,
            saved_path: path,
        });
    }
    Ok(saved)
}

/// Make a declared attachment name safe to join onto a directory.
///
/// Path separators become `_`, an empty (or dots-only) name becomes
/// `default`, and each run of characters outside `[A-Za-z0-9._-]` becomes one `_`.
pub fn sanitize_filename(name: &str, default: &str) -> String {
    let name = name.trim().replace(['\\', '/'], "_");
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return default.to_string();
    }
    UNSAFE_RUNS.replace_all(&name, "_").into_owned()
}

/// Best-effort file extension (with leading dot) for a content type.
pub fn guess_extension(content_type: &str) -> Option<String> {
    let content_type = content_type.to_ascii_lowercase();
    if let Some((_, ext)) = PREFERRED_EXTENSIONS
        .iter()
        .find(|(ct, _)| *ct == content_type)
    {
        return Some((*ext).to_string());
    }
    mime_guess::get_mime_extensions_str(&content_type)
        .and_then(|exts| exts.first())
        .map(|ext| format!(".{ext}"))
}
