//! Direct text layout: word wrap and page-break pagination on a letter page.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.
//! Layout is kept apart from PDF writing so page breaks can be checked
//! without parsing a document.

use crate::model::attachment::Attachment;
use crate::model::mail::FlatEmailContent;

/// Page size, margins, and line metrics for the direct-layout canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: i64,
    pub height: i64,
    /// Left margin and x position of every line.
    pub left: i64,
    /// Baseline of the first line on a page.
    pub top: i64,
    /// A line whose baseline would be at or below this starts a new page.
    pub bottom: i64,
    pub line_height: i64,
    /// Maximum characters per wrapped line.
    pub max_chars: usize,
}

impl Default for PageGeometry {
    /// US letter, one-inch margins, 14 pt lines, 90 characters per line.
    fn default() -> Self {
        Self {
            width: 612,
            height: 792,
            left: 72,
            top: 756,
            bottom: 72,
            line_height: 14,
            max_chars: 90,
        }
    }
}

/// Which of the two Helvetica faces a line is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A single positioned line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: i64,
    pub y: i64,
    pub style: FontStyle,
    pub size: i64,
    pub text: String,
}

/// All lines drawn on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

const SUBJECT_SIZE: i64 = 12;
const TEXT_SIZE: i64 = 11;

/// Greedily pack whitespace-separated words into lines of at most `width` characters.
///
/// A word longer than `width` is emitted whole on its own line. Text with no
/// words yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut line = first.to_string();
    let mut line_len = first.chars().count();
    for word in words {
        let word_len = word.chars().count();
        if line_len + 1 + word_len <= width {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
            line_len = word_len;
        }
    }
    lines.push(line);
    lines
}

/// A vertical cursor over a growing list of pages.
#[derive(Debug)]
pub struct PageLayout {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: i64,
}

impl PageLayout {
    pub fn new(geometry: PageGeometry) -> Self {
        let y = geometry.top;
        Self {
            geometry,
            pages: vec![Page::default()],
            y,
        }
    }

    /// Move the cursor down by `points`.
    pub fn advance(&mut self, points: i64) {
        self.y -= points;
    }

    /// Draw at the cursor without a page-break check.
    fn draw(&mut self, style: FontStyle, size: i64, text: &str) {
        let line = TextLine {
            x: self.geometry.left,
            y: self.y,
            style,
            size,
            text: text.to_string(),
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }

    /// Break the page if the cursor reached the bottom, draw, then move down one line.
    pub fn draw_line(&mut self, style: FontStyle, size: i64, text: &str) {
        if self.y <= self.geometry.bottom {
            self.pages.push(Page::default());
            self.y = self.geometry.top;
        }
        self.draw(style, size, text);
        self.y -= self.geometry.line_height;
    }

    /// Lay out paragraphs separated by `\n`.
    ///
    /// A blank paragraph only moves the cursor down one line so paragraph
    /// breaks stay visible.
    pub fn draw_paragraphs(&mut self, text: &str) {
        for paragraph in text.split('\n') {
            if paragraph.trim().is_empty() {
                self.advance(self.geometry.line_height);
                continue;
            }
            for line in wrap_text(paragraph, self.geometry.max_chars) {
                self.draw_line(FontStyle::Regular, TEXT_SIZE, &line);
            }
        }
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Lay out a whole message: header block, body, and attachment listing.
pub fn layout_email(
    content: &FlatEmailContent,
    attachments: &[Attachment],
    geometry: &PageGeometry,
) -> Vec<Page> {
    let line_height = geometry.line_height;
    let mut layout = PageLayout::new(geometry.clone());
    let headers = &content.headers;

    layout.draw(
        FontStyle::Bold,
        SUBJECT_SIZE,
        &format!("Subject: {}", headers.subject),
    );
    for (label, value) in [
        ("From", &headers.sender),
        ("To", &headers.recipient),
        ("Date", &headers.date),
    ] {
        layout.advance(line_height);
        layout.draw(FontStyle::Regular, TEXT_SIZE, &format!("{label}: {value}"));
    }
    layout.advance(line_height * 3 / 2);

    layout.draw_paragraphs(&content.body);

    if !attachments.is_empty() {
        layout.advance(line_height);
        layout.draw_line(FontStyle::Bold, TEXT_SIZE, "Attachments:");
        for attachment in attachments {
            let entry = format!("- {}", attachment.describe());
            for line in wrap_text(&entry, geometry.max_chars) {
                layout.draw_line(FontStyle::Regular, TEXT_SIZE, &line);
            }
        }
    }

    layout.finish()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::model::mail::EmailHeaders;

    fn content(body: &str) -> FlatEmailContent {
        FlatEmailContent {
            headers: EmailHeaders {
                subject: "Hello".into(),
                sender: "a@b.com".into(),
                recipient: "c@d.com".into(),
                date: "today".into(),
            },
            body: body.to_string(),
        }
    }

    fn all_lines(pages: &[Page]) -> impl Iterator<Item = &TextLine> {
        pages.iter().flat_map(|p| p.lines.iter())
    }

    #[test]
    fn test_wrap_basic() {
        assert_eq!(wrap_text("a b c", 3), vec!["a b", "c"]);
        assert_eq!(wrap_text("  spaced   out  ", 90), vec!["spaced out"]);
    }

    #[test]
    fn test_wrap_empty_yields_nothing() {
        assert!(wrap_text("", 90).is_empty());
        assert!(wrap_text("   \t ", 90).is_empty());
    }

    #[test]
    fn test_wrap_exact_width_fits() {
        assert_eq!(wrap_text("abcd efgh", 9), vec!["abcd efgh"]);
        assert_eq!(wrap_text("abcd efghi", 9), vec!["abcd", "efghi"]);
    }

    #[test]
    fn test_wrap_long_word_unsplit() {
        let long = "x".repeat(120);
        let text = format!("short {long} tail");
        let lines = wrap_text(&text, 90);
        assert_eq!(lines, vec!["short".to_string(), long.clone(), "tail".to_string()]);
        assert_eq!(wrap_text(&long, 90), vec![long]);
    }

    #[test]
    fn test_wrap_bound() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(40);
        for line in wrap_text(&text, 90) {
            assert!(line.chars().count() <= 90 || !line.contains(' '));
        }
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        let text = "é".repeat(5) + " " + &"ü".repeat(4);
        assert_eq!(wrap_text(&text, 10), vec![text.clone()]);
    }

    #[test]
    fn test_header_positions() {
        let pages = layout_email(&content("Body"), &[], &PageGeometry::default());
        assert_eq!(pages.len(), 1);
        let lines = &pages[0].lines;
        assert_eq!(lines[0].text, "Subject: Hello");
        assert_eq!(lines[0].style, FontStyle::Bold);
        assert_eq!((lines[0].x, lines[0].y), (72, 756));
        assert_eq!(lines[1].text, "From: a@b.com");
        assert_eq!(lines[1].y, 742);
        assert_eq!(lines[2].y, 728);
        assert_eq!(lines[3].text, "Date: today");
        assert_eq!(lines[3].y, 714);
        // 1.5 line heights below the Date line
        assert_eq!(lines[4].text, "Body");
        assert_eq!(lines[4].y, 693);
    }

    #[test]
    fn test_blank_paragraph_advances_cursor() {
        let pages = layout_email(&content("one\n\ntwo"), &[], &PageGeometry::default());
        let lines = &pages[0].lines;
        assert_eq!(lines[4].text, "one");
        assert_eq!(lines[5].text, "two");
        assert_eq!(lines[4].y - lines[5].y, 28);
    }

    #[test]
    fn test_long_body_paginates() {
        let body = (0..200)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let geometry = PageGeometry::default();
        let pages = layout_email(&content(&body), &[], &geometry);
        assert!(pages.len() > 1);
        for line in all_lines(&pages) {
            assert!(line.y > geometry.bottom, "{line:?}");
            assert!(line.y <= geometry.top);
        }
        let second = &pages[1].lines;
        assert_eq!(second[0].y, geometry.top);
        let drawn = all_lines(&pages)
            .filter(|l| l.text.starts_with("line number"))
            .count();
        assert_eq!(drawn, 200);
    }

    #[test]
    fn test_attachment_listing() {
        let attachments = vec![Attachment {
            filename: "note.txt".into(),
            content_type: "text/plain".into(),
            size: 5,
            saved_path: PathBuf::from("attachments/m/note.txt"),
        }];
        let pages = layout_email(&content("Body"), &attachments, &PageGeometry::default());
        let lines = &pages[0].lines;
        let header = lines.iter().position(|l| l.text == "Attachments:").unwrap();
        assert_eq!(lines[header].style, FontStyle::Bold);
        assert_eq!(lines[header + 1].text, "- note.txt (text/plain, 5 bytes)");
        // One blank line between the body and the listing
        assert_eq!(lines[header - 1].y - lines[header].y, 28);
    }

    #[test]
    fn test_attachment_listing_breaks_page() {
        let geometry = PageGeometry::default();
        let body = vec!["x"; 48].join("\n");
        let attachments: Vec<Attachment> = (0..5)
            .map(|i| Attachment {
                filename: format!("file{i}.bin"),
                content_type: "application/octet-stream".into(),
                size: i,
                saved_path: PathBuf::from(format!("file{i}.bin")),
            })
            .collect();
        let pages = layout_email(&content(&body), &attachments, &geometry);
        assert_eq!(pages.len(), 2);
        for line in all_lines(&pages) {
            assert!(line.y > geometry.bottom, "{line:?}");
        }
    }

    #[test]
    fn test_empty_body_has_only_headers() {
        let pages = layout_email(&content(""), &[], &PageGeometry::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 4);
    }
}
