//! Styled HTML document handed to the external renderer.

use html_escape::encode_text;

use crate::model::attachment::Attachment;
use crate::model::mail::EmailContent;

const STYLE: &str = "\
      body { font-family: Arial, sans-serif; font-size: 12px; color: #111; }
      .meta { margin-bottom: 16px; }
      .meta div { margin: 2px 0; }
      .content { margin-top: 8px; }
      pre { white-space: pre-wrap; font-family: Arial, sans-serif; }
      h2 { margin-top: 24px; font-size: 14px; }";

/// Build a standalone HTML page with the header block, the body, and the attachment list.
///
/// The HTML body is embedded as-is. Without one, the plain text is escaped
/// and wrapped in `<pre>` so its line breaks survive.
pub fn build_email_html(content: &EmailContent, attachments: &[Attachment]) -> String {
    let headers = &content.headers;

    let body = if content.body_html.is_empty() && !content.body_text.is_empty() {
        format!("<pre>{}</pre>", encode_text(&content.body_text))
    } else {
        content.body_html.clone()
    };

    let mut listing = String::new();
    if !attachments.is_empty() {
        listing.push_str("<h2>Attachments</h2><ul>");
        for att in attachments {
            listing.push_str(&format!(
                "<li><strong>{}</strong> ({}, {} bytes)</li>",
                encode_text(&att.filename),
                encode_text(&att.content_type),
                att.size
            ));
        }
        listing.push_str("</ul>");
    }

    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <style>
{STYLE}
    </style>
  </head>
  <body>
    <div class="meta">
      <div><strong>Subject:</strong> {subject}</div>
      <div><strong>From:</strong> {from}</div>
      <div><strong>To:</strong> {to}</div>
      <div><strong>Date:</strong> {date}</div>
    </div>
    <div class="content">{body}</div>
    {listing}
  </body>
</html>
"#,
        subject = encode_text(&headers.subject),
        from = encode_text(&headers.sender),
        to = encode_text(&headers.recipient),
        date = encode_text(&headers.date),
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::model::mail::EmailHeaders;

    fn content(text: &str, html: &str) -> EmailContent {
        EmailContent {
            headers: EmailHeaders {
                subject: "Tom & Jerry".into(),
                sender: "Sender <s@example.com>".into(),
                recipient: "to@example.com".into(),
                date: "Thu, 04 Jan 2024 10:00:00 +0000".into(),
            },
            body_text: text.into(),
            body_html: html.into(),
        }
    }

    #[test]
    fn test_headers_are_escaped() {
        let html = build_email_html(&content("x", ""), &[]);
        assert!(html.contains("<strong>Subject:</strong> Tom &amp; Jerry"));
        assert!(html.contains("Sender &lt;s@example.com&gt;"));
    }

    #[test]
    fn test_html_body_embedded_verbatim() {
        let html = build_email_html(&content("plain", "<p><b>rich</b></p>"), &[]);
        assert!(html.contains(r#"<div class="content"><p><b>rich</b></p></div>"#));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn test_plain_body_in_pre() {
        let html = build_email_html(&content("a < b\nnext", ""), &[]);
        assert!(html.contains("<pre>a &lt; b\nnext</pre>"));
    }

    #[test]
    fn test_attachment_listing() {
        let att = Attachment {
            filename: "note.txt".into(),
            content_type: "text/plain".into(),
            size: 5,
            saved_path: PathBuf::from("note.txt"),
        };
        let html = build_email_html(&content("x", ""), &[att]);
        assert!(html.contains("<h2>Attachments</h2>"));
        assert!(html.contains("<li><strong>note.txt</strong> (text/plain, 5 bytes)</li>"));

        let without = build_email_html(&content("x", ""), &[]);
        assert!(!without.contains("Attachments"));
    }
}
