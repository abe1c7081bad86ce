//! HTML-to-HTML filters: sanitizing, link resolution and tag/attribute stripping.
//!
//! Each filter parses the fragment, rewrites the owned [`Node`] tree and
//! serializes it back. The tree functions are public so callers holding a
//! tree can apply them without a round-trip through a string.

use log::trace;

use crate::formatters::convert_url_to_formatted_url;
use crate::html::parse_html;
use crate::node::Node;
use crate::utilities::is_skipped;

/// Attributes holding a URL, per element
const URL_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("img", "src"),
    ("audio", "src"),
    ("video", "src"),
    ("video", "poster"),
    ("source", "src"),
    ("track", "src"),
];

fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    compact.to_ascii_lowercase().starts_with("javascript:")
}

/// Remove scripts, styles, embedded content, comments, event handlers and
/// `javascript:` URLs from the tree.
pub fn sanitize(node: &mut Node) {
    node.children.retain(|child| {
        if child.is_comment() {
            return false;
        }
        if child.is_element() && is_skipped(&child.tag_name()) {
            trace!("dropping <{}>", child.tag_name());
            return false;
        }
        true
    });

    if node.is_element() {
        node.attributes.retain(|name, value| {
            let url_attr = matches!(name.as_str(), "href" | "src" | "action" | "formaction");
            !name.starts_with("on") && !(url_attr && is_script_url(value))
        });
    }

    for child in &mut node.children {
        sanitize(child);
    }
}

/// Resolve every URL-bearing attribute against `base`
pub fn resolve_links(node: &mut Node, base: &str) {
    if node.is_element() {
        let tag = node.tag_name();
        for (_, attr) in URL_ATTRIBUTES.iter().filter(|(t, _)| *t == tag) {
            if let Some(value) = node.attr(attr) {
                let resolved = convert_url_to_formatted_url(value.trim(), base);
                node.set_attr(attr, &resolved);
            }
        }
    }

    for child in &mut node.children {
        resolve_links(child, base);
    }
}

/// Replace every element except `<a>` by its children
pub fn unwrap_all_but_links(node: &mut Node) {
    let children = std::mem::take(&mut node.children);
    for mut child in children {
        unwrap_all_but_links(&mut child);
        if child.is_element() && !child.is_tag("a") {
            node.children.append(&mut child.children);
        } else {
            node.children.push(child);
        }
    }
}

/// Remove every attribute from every element
pub fn strip_attributes(node: &mut Node) {
    node.attributes.clear();
    for child in &mut node.children {
        strip_attributes(child);
    }
}

fn rewrite(html: &str, f: impl FnOnce(&mut Node)) -> String {
    let mut node = parse_html(html);
    f(&mut node);
    node.inner_html()
}

/// Sanitize an HTML fragment
pub fn convert_html_to_safe_html(html: &str) -> String {
    rewrite(html, sanitize)
}

/// Resolve relative link, image and media URLs against `base`.
///
/// Without a base URL the fragment is only re-serialized.
pub fn convert_html_to_formatted_link_html(html: &str, base: Option<&str>) -> String {
    rewrite(html, |node| {
        if let Some(base) = base {
            resolve_links(node, base);
        }
    })
}

/// Keep only `<a>` elements, unwrapping everything else
pub fn convert_html_to_only_a_tag_html(html: &str) -> String {
    rewrite(html, unwrap_all_but_links)
}

/// Strip all attributes
pub fn convert_html_to_no_attr_html(html: &str) -> String {
    rewrite(html, strip_attributes)
}
