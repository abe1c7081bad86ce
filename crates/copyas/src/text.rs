//! Text-level filters applied before or after a dialect conversion.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("BLANK_LINES_RE: hardcoded regex is valid"));

static TRAILING_SPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)[ \t]+$").expect("TRAILING_SPACE_RE: hardcoded regex is valid")
});

/// Normalize blank lines: at most one empty line between blocks, none at
/// either end.
fn collapse_blank_lines(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    BLANK_LINES_RE.replace_all(&text, "\n\n").trim().to_string()
}

/// Tidy generated Markdown. Applying it twice gives the same result as once.
pub fn convert_markdown_to_beautify_markdown(markdown: &str) -> String {
    collapse_blank_lines(markdown)
}

/// Tidy an HTML fragment: trailing spaces and runs of blank lines removed.
pub fn convert_html_to_beautify_html(html: &str) -> String {
    let html = html.replace("\r\n", "\n");
    collapse_blank_lines(&TRAILING_SPACE_RE.replace_all(&html, ""))
}

/// Trim every line and the text as a whole
pub fn convert_text_to_trimmed_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Decode HTML entities such as `&amp;` and `&#x27;`
pub fn convert_text_to_decode_entities_text(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Quote text as a string literal, escaping quotes and control characters
pub fn convert_text_to_raw_string(text: &str) -> String {
    match serde_json::to_string(text) {
        Ok(quoted) => quoted,
        Err(err) => {
            debug!("could not quote text: {}", err);
            text.to_string()
        }
    }
}
