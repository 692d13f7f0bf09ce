//! HTML-to-text flattening for messages that only carry an HTML body.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-run pattern"));

/// Elements whose text never reaches the output.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Reduce an HTML document to readable plain text.
///
/// - `script` and `style` contents are dropped
/// - every other text node is kept, joined with `\n`
/// - runs of three or more newlines collapse to a single blank line
/// - the result is trimmed
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            chunks.push(&**text);
        }
    }

    let joined = chunks.join("\n");
    BLANK_RUNS.replace_all(&joined, "\n\n").trim().to_string()
}
