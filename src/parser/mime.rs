//! Content extraction: header fields and body selection from a decoded message.

use crate::model::mail::{EmailContent, EmailHeaders, FlatEmailContent};
use crate::parser::eml::DecodedMessage;

/// The first plain-text and first HTML body found in a message.
#[derive(Debug, Default)]
struct BodyCandidates {
    plain: Option<String>,
    html: Option<String>,
}

/// Pull Subject, From, To and Date. Absent headers become empty strings.
pub fn extract_headers(msg: &DecodedMessage) -> EmailHeaders {
    EmailHeaders {
        subject: msg.header("subject"),
        sender: msg.header("from"),
        recipient: msg.header("to"),
        date: msg.header("date"),
    }
}

/// Dual-mode extraction: plain-text and HTML bodies kept separately.
pub fn extract_content(msg: &DecodedMessage) -> EmailContent {
    let candidates = select_bodies(msg);
    EmailContent {
        headers: extract_headers(msg),
        body_text: candidates.plain.unwrap_or_default(),
        body_html: candidates.html.unwrap_or_default(),
    }
}

/// Flattened extraction: one body, plain text preferred over flattened HTML.
pub fn extract_flattened(msg: &DecodedMessage) -> FlatEmailContent {
    extract_content(msg).flatten()
}

/// Single pass over the parts; the first `text/plain` and first `text/html` win.
///
/// Parts marked `attachment` are never body candidates. A non-multipart
/// message is HTML when its type is `text/html` and plain text otherwise.
fn select_bodies(msg: &DecodedMessage) -> BodyCandidates {
    let mut found = BodyCandidates::default();

    let Some(root) = msg.root() else {
        return found;
    };

    if !root.is_container {
        let body = root.body_text().trim().to_string();
        if root.content_type == "text/html" {
            found.html = Some(body);
        } else {
            found.plain = Some(body);
        }
        return found;
    }

    for part in msg.walk() {
        if part.is_container || part.is_attachment() {
            continue;
        }
        match part.content_type.as_str() {
            "text/plain" if found.plain.is_none() => {
                found.plain = Some(part.body_text().trim().to_string());
            }
            "text/html" if found.html.is_none() => {
                found.html = Some(part.body_text().trim().to_string());
            }
            _ => {}
        }
        if found.plain.is_some() && found.html.is_some() {
            break;
        }
    }
    found
}
