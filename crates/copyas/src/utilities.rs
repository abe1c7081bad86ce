//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Node, NodeRef};

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu",
    "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul", "video",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose content never contributes text
pub const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "meta", "link",
    "object", "embed", "iframe", "frame", "frameset", "applet", "base",
];

static ATTRIBUTE_BREAKS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\n+\s*)+").expect("ATTRIBUTE_BREAKS_RE: hardcoded regex is valid")
});

/// Escapes of `; / ? : @ & = + $ , #` plus `[` and `]`
static RESERVED_ESCAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%(?:2[346BCFbcf]|3[ABDFabdf]|40|5[BDbd])")
        .expect("RESERVED_ESCAPE_RE: hardcoded regex is valid")
});

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag never contributes text
pub fn is_skipped(tag: &str) -> bool {
    SKIPPED_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Repeat a string n times
pub fn repeat(s: &str, n: usize) -> String {
    s.repeat(n)
}

/// Escape markdown special characters
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '[' | ']' | '#' | '+' | '-' | '!' | '`' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Clean an attribute value: fold line breaks and trim
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| ATTRIBUTE_BREAKS_RE.replace_all(v, "\n").trim().to_string())
        .unwrap_or_default()
}

/// Percent-decode a URI the way `decodeURI` does: escapes of reserved
/// characters and of `#` are kept, everything else is decoded. Brackets stay
/// encoded too so the result can sit inside `[[...]]` link syntax.
///
/// The input comes back unchanged when it does not decode to valid UTF-8.
pub fn safe_decode_uri(uri: &str) -> String {
    let mut result = String::with_capacity(uri.len());
    let mut last = 0;
    for escape in RESERVED_ESCAPE_RE.find_iter(uri) {
        match urlencoding::decode(&uri[last..escape.start()]) {
            Ok(decoded) => result.push_str(&decoded),
            Err(err) => {
                log::debug!("keeping undecodable uri {:?}: {}", uri, err);
                return uri.to_string();
            }
        }
        result.push_str(escape.as_str());
        last = escape.end();
    }
    match urlencoding::decode(&uri[last..]) {
        Ok(decoded) => result.push_str(&decoded),
        Err(err) => {
            log::debug!("keeping undecodable uri {:?}: {}", uri, err);
            return uri.to_string();
        }
    }
    result
}

/// Collapse whitespace runs into single spaces
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Whether a sibling slot acts as a block boundary for whitespace purposes.
///
/// A missing sibling is a boundary unless the parent is an inline element.
pub fn is_block_boundary(sibling: Option<&Node>, parent: Option<&NodeRef>) -> bool {
    match sibling {
        Some(node) => node.is_block() || node.is_tag("br"),
        None => parent.map_or(true, |p| !p.is_element() || p.node.is_block()),
    }
}

/// Wrap trimmed content in `mark`, adding a space on either side when the
/// adjacent sibling's text would otherwise run into the delimiter.
pub fn wrap_inline_mark(node: &NodeRef, content: &str, mark: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }

    let left = match node.previous_sibling() {
        Some(prev) if !prev.text_content().ends_with(' ') => " ",
        _ => "",
    };
    let right = match node.next_sibling() {
        Some(next) if !next.text_content().starts_with(' ') => " ",
        _ => "",
    };

    format!("{}{}{}{}{}", left, mark, content, mark, right)
}
