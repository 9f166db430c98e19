use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

// Subtrees that never carry visible listing text.
const SKIPPED: &[&str] = &["head", "script", "style", "noscript", "template"];

const LINE_BLOCKS: &[&str] = &[
    "br", "tr", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "table",
    "thead", "tbody", "tfoot", "caption", "section", "article", "header", "footer", "nav",
    "blockquote", "pre", "dl", "dt", "dd", "hr", "form",
];

const CELLS: &[&str] = &["td", "th"];

static ROW_MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<t[rdh]\b").expect("row markup pattern compiles"));

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table\b").expect("table pattern compiles"));

/// Decode an HTML document into plain text, one visual line per output line.
///
/// Table rows, paragraphs, headings and `<br>` become line breaks; table
/// cells become single spaces so a row reads left to right on one line.
/// Entities are decoded by the HTML parser. Whitespace inside each line is
/// collapsed and blank lines are dropped.
pub fn html_to_text(html: &str) -> String {
    // The HTML5 tree builder discards row and cell tags outside a table.
    let document = if ROW_MARKUP_RE.is_match(html) && !TABLE_RE.is_match(html) {
        Html::parse_document(&format!("<table>{}</table>", html))
    } else {
        Html::parse_document(html)
    };

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(normalize_ws)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED.contains(&name) {
        return;
    }

    let separator = if LINE_BLOCKS.contains(&name) {
        "\n"
    } else if CELLS.contains(&name) {
        " "
    } else {
        ""
    };

    out.push_str(separator);
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Node::Text(text) = child.value() {
            // raw newlines in markup carry no meaning; only tags decide lines
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        }
    }
    out.push_str(separator);
}

/// Collapse whitespace runs (NBSP included) into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
