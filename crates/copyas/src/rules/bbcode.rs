//! BBCode rules.

use super::{Filter, Rule};
use crate::utilities::clean_attribute;

/// Create all BBCode rules
pub fn bbcode_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        code_block_rule(),
        code_rule(),
        tag_rule("bold", &["strong", "b"], "b"),
        tag_rule("italic", &["em", "i"], "i"),
        tag_rule("underline", &["u", "ins"], "u"),
        tag_rule("strike", &["del", "s", "strike"], "s"),
        link_rule(),
        image_rule(),
    ]
}

/// A rule wrapping non-blank content in `[bb_tag]…[/bb_tag]`
fn tag_rule(name: &str, tags: &[&str], bb_tag: &'static str) -> Rule {
    Rule::for_tags(name, tags, move |_, content, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("[{}]{}[/{}]", bb_tag, content, bb_tag)
    })
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("paragraph", "p", |_, content, _| {
        format!("\n\n{}\n\n", content.trim())
    })
}

fn line_break_rule() -> Rule {
    Rule::for_tag("lineBreak", "br", |_, _, _| "\n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(
        "heading",
        &["h1", "h2", "h3", "h4", "h5", "h6"],
        |_, content, _| {
            let content = content.trim();
            if content.is_empty() {
                return String::new();
            }
            format!("\n\n[b]{}[/b]\n\n", content)
        },
    )
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", "blockquote", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n[quote]{}[/quote]\n\n", content)
    })
}

fn list_rule() -> Rule {
    Rule::for_tags("list", &["ul", "ol"], |node, content, _| {
        let open = if node.node.is_tag("ol") {
            let start = node
                .attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            format!("[list={}]", start)
        } else {
            "[list]".to_string()
        };
        format!("\n\n{}\n{}\n[/list]\n\n", open, content.trim_matches('\n'))
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("listItem", "li", |_, content, _| {
        format!("[*]{}\n", content.trim())
    })
}

fn code_block_rule() -> Rule {
    Rule::for_tag("codeBlock", "pre", |node, _, _| {
        format!("\n\n[code]{}[/code]\n\n", node.text_content().trim_end_matches('\n'))
    })
}

fn code_rule() -> Rule {
    Rule::new(
        "code",
        Filter::predicate(|tag, node, _| tag == "code" && !node.has_ancestor("pre")),
        |node, _, _| {
            let content = node.text_content();
            if content.is_empty() {
                return String::new();
            }
            format!("[code]{}[/code]", content)
        },
    )
}

fn link_rule() -> Rule {
    Rule::new(
        "link",
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attr("href")),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            if content.is_empty() {
                return String::new();
            }
            if href.is_empty() {
                return content.to_string();
            }
            format!("[url={}]{}[/url]", href, content)
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("image", "img", |node, _, _| {
        let src = clean_attribute(node.attr("src"));
        if src.is_empty() {
            return String::new();
        }
        format!("[img]{}[/img]", src)
    })
}
