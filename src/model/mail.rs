//! Extracted message content.

use crate::parser::html::html_to_text;

/// The four header fields shown at the top of every rendered document.
///
/// Missing headers are empty strings, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct EmailHeaders {
    pub subject: String,
    pub sender: String,
    pub recipient: String,
    /// The `Date:` header exactly as written in the message.
    pub date: String,
}

/// Headers plus the plain-text and HTML bodies kept apart.
///
/// Used by the rich renderer, which prefers real HTML. Either body may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailContent {
    pub headers: EmailHeaders,
    pub body_text: String,
    pub body_html: String,
}

/// Headers plus a single plain-text body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatEmailContent {
    pub headers: EmailHeaders,
    pub body: String,
}

impl EmailContent {
    /// Collapse to a single body: plain text when present, otherwise the HTML flattened to text.
    pub fn flatten(&self) -> FlatEmailContent {
        let body = if self.body_text.is_empty() && !self.body_html.is_empty() {
            html_to_text(&self.body_html)
        } else {
            self.body_text.clone()
        };
        FlatEmailContent {
            headers: self.headers.clone(),
            body,
        }
    }
}
