//! Markdown rules for HTML to Markdown conversion.

use super::{Filter, Rule};
use crate::node::{Node, NodeRef};
use crate::service::{CodeBlockStyle, HeadingStyle};
use crate::utilities::{clean_attribute, repeat};

/// Create all Markdown rules
pub fn markdown_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        fenced_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        emphasis_rule(),
        strong_rule(),
        strikethrough_rule(),
        code_rule(),
        image_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("paragraph", "p", |_, content, _| {
        format!("\n\n{}\n\n", content.trim())
    })
}

fn line_break_rule() -> Rule {
    Rule::for_tag("lineBreak", "br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(
        "heading",
        &["h1", "h2", "h3", "h4", "h5", "h6"],
        |node, content, options| {
            let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

            let content = content.trim();
            if content.is_empty() {
                return String::new();
            }

            match options.heading_style {
                HeadingStyle::Setext if level <= 2 => {
                    let underline = if level == 1 { "=" } else { "-" };
                    format!(
                        "\n\n{}\n{}\n\n",
                        content,
                        repeat(underline, content.chars().count())
                    )
                }
                _ => format!("\n\n{} {}\n\n", repeat("#", level), content),
            }
        },
    )
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", "blockquote", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content.lines().map(|line| format!("> {}", line)).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags("list", &["ul", "ol"], |node, content, _| {
        let nested = node.parent_tag().as_deref() == Some("li") && node.is_last_element_child();
        if nested {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("listItem", "li", |node, content, options| {
        let content = content
            .trim_start_matches('\n')
            .trim_end_matches('\n')
            .replace('\n', "\n    ");

        let prefix = match node.parent() {
            Some(parent) if parent.node.is_tag("ol") => {
                let start = parent
                    .attr("start")
                    .and_then(|s| s.trim().parse::<i64>().ok())
                    .unwrap_or(1);
                format!("{}.  ", start.saturating_add(node.element_index() as i64))
            }
            _ => format!("{}   ", options.bullet_list_marker),
        };

        let separator = if node.next_sibling().is_some() { "\n" } else { "" };
        format!("{}{}{}", prefix, content.trim_end(), separator)
    })
}

fn code_child<'a>(node: &NodeRef<'a>) -> Option<&'a Node> {
    node.element_children().find(|c| c.is_tag("code"))
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        "indentedCodeBlock",
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && code_child(node).is_some()
                && matches!(options.code_block_style, CodeBlockStyle::Indented)
        }),
        |node, _, _| {
            let code_content = code_child(node).map(Node::text_content).unwrap_or_default();
            let indented: Vec<String> = code_content
                .trim_end_matches('\n')
                .lines()
                .map(|line| format!("    {}", line))
                .collect();

            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        "fencedCodeBlock",
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && code_child(node).is_some()
                && matches!(options.code_block_style, CodeBlockStyle::Fenced)
        }),
        |node, _, options| {
            let Some(code_node) = code_child(node) else {
                return String::new();
            };

            let code_content = code_node.text_content();
            let language = code_node
                .attr("class")
                .unwrap_or("")
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
                .unwrap_or("");

            let fence = &options.fence;
            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code_content.trim_end(),
                fence
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("horizontalRule", "hr", |_, _, options| {
        format!("\n\n{}\n\n", options.hr)
    })
}

fn inline_link_rule() -> Rule {
    Rule::new(
        "inlineLink",
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attr("href")),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            let title = clean_attribute(node.attr("title"));

            if href.is_empty() {
                return content.to_string();
            }

            let title_part = if title.is_empty() {
                String::new()
            } else {
                format!(" \"{}\"", title.replace('"', "\\\""))
            };

            format!("[{}]({}{})", content, href, title_part)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::for_tags("emphasis", &["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags("strong", &["strong", "b"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags("strikethrough", &["del", "s", "strike"], |_, content, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("~~{}~~", content)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        "code",
        Filter::predicate(|tag, node, _| {
            // Match <code> that is NOT inside <pre>
            tag == "code" && node.parent_tag().as_deref() != Some("pre")
        }),
        |node, _, _| {
            let content = node.text_content();
            if content.is_empty() {
                return String::new();
            }

            let max_consecutive_backticks = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_consecutive_backticks + 1);
            let needs_space = max_consecutive_backticks > 0
                && (content.starts_with('`') || content.ends_with('`'));

            if needs_space {
                format!("{} {} {}", backticks, content, backticks)
            } else {
                format!("{}{}{}", backticks, content, backticks)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("image", "img", |node, _, _| {
        let alt = clean_attribute(node.attr("alt"));
        let src = clean_attribute(node.attr("src"));
        let title = clean_attribute(node.attr("title"));

        if src.is_empty() {
            return String::new();
        }

        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title)
        };

        format!("![{}]({}{})", alt, src, title_part)
    })
}
