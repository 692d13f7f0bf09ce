//! Parser for individual `.eml` files (RFC 5322 messages, optionally MIME multipart).
//!
//! MIME decoding is delegated to `mail-parser`; the result is flattened into a
//! [`DecodedMessage`] so the rest of the crate never touches parser internals.

use std::path::Path;

use base64::Engine;
use mail_parser::decoders::quoted_printable::quoted_printable_decode;
use mail_parser::{Encoding, MessageParser, MimeHeaders, PartType};
use tracing::warn;

use crate::error::{ConvertError, Result};
use crate::model::part::{Disposition, Part};
use crate::parser::header::{HeaderBlock, LENIENT_BASE64};

/// A decoded message: its top-level headers and every MIME part in document order.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    headers: HeaderBlock,
    parts: Vec<Part>,
}

impl DecodedMessage {
    /// Build a message from already-decoded pieces. The first part is the root.
    pub fn from_parts(headers: HeaderBlock, parts: Vec<Part>) -> Self {
        Self { headers, parts }
    }

    /// A message with no headers and an empty `text/plain` body.
    pub fn empty() -> Self {
        Self::from_parts(HeaderBlock::default(), vec![Part::text("text/plain", "")])
    }

    /// Decode raw message bytes.
    ///
    /// Blank input is an [empty](DecodedMessage::empty) message. Returns `None`
    /// when the bytes hold no header fields at all.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let data = skip_preamble(raw);
        if data.iter().all(u8::is_ascii_whitespace) {
            return Some(Self::empty());
        }
        let message = MessageParser::default().parse(data)?;
        let source = message.raw_message();
        let parts: Vec<Part> = message
            .parts
            .iter()
            .map(|part| convert_part(part, source))
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(Self {
            headers: HeaderBlock::parse(data),
            parts,
        })
    }

    /// Top-level header value (case-insensitive name); absent headers are empty.
    pub fn header(&self, name: &str) -> String {
        self.headers.get_or_empty(name)
    }

    /// The message root.
    pub fn root(&self) -> Option<&Part> {
        self.parts.first()
    }

    /// Depth-first walk over all parts, root first.
    pub fn walk(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }
}

/// Read and decode a single `.eml` file.
pub fn read_eml(path: impl AsRef<Path>) -> Result<DecodedMessage> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    DecodedMessage::parse(&data).ok_or_else(|| ConvertError::Parse(path.to_path_buf()))
}

fn convert_part(part: &mail_parser::MessagePart<'_>, source: &[u8]) -> Part {
    let content_type = part
        .content_type()
        .map(|ct| match ct.subtype() {
            Some(sub) => format!("{}/{}", ct.ctype(), sub),
            None => ct.ctype().to_string(),
        })
        .map(|ct| ct.to_ascii_lowercase())
        .unwrap_or_else(|| "text/plain".to_string());

    let disposition = part
        .content_disposition()
        .map(|d| Disposition::parse(d.ctype()));

    let filename = part.attachment_name().map(str::to_string);

    let (text, is_container) = match &part.body {
        PartType::Text(text) | PartType::Html(text) => (Some(text.to_string()), false),
        PartType::Multipart(_) => (None, true),
        _ => (None, false),
    };

    let payload = if is_container {
        Vec::new()
    } else {
        decoded_payload(part, source)
    };

    Part {
        content_type,
        disposition,
        filename,
        payload,
        text,
        is_container,
    }
}

/// The part body with only its transfer encoding undone; text stays in its declared charset.
fn decoded_payload(part: &mail_parser::MessagePart<'_>, source: &[u8]) -> Vec<u8> {
    let raw = source.get(part.raw_body_offset()..part.raw_end_offset());
    match raw.and_then(|raw| transfer_decode(raw, part.encoding)) {
        Some(bytes) => bytes,
        None => {
            warn!(
                offset = part.raw_body_offset(),
                "Could not transfer-decode part body, keeping parsed contents"
            );
            part.contents().to_vec()
        }
    }
}

fn transfer_decode(raw: &[u8], encoding: Encoding) -> Option<Vec<u8>> {
    match encoding {
        Encoding::Base64 => {
            let compact: Vec<u8> = raw
                .iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            LENIENT_BASE64.decode(compact).ok()
        }
        Encoding::QuotedPrintable => quoted_printable_decode(raw),
        Encoding::None => Some(raw.to_vec()),
    }
}

/// Skip a UTF-8 BOM and a leading mbox `From ` separator line.
fn skip_preamble(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
