//! Org-mode rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule};
use crate::formatters::convert_url_to_formatted_url;
use crate::node::{Node, NodeRef};
use crate::service::ConversionOptions;
use crate::utilities::{clean_attribute, repeat, safe_decode_uri, wrap_inline_mark};

static LEADING_NEWLINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\n+").expect("LEADING_NEWLINES_RE: hardcoded regex is valid"));

static TRAILING_NEWLINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n+$").expect("TRAILING_NEWLINES_RE: hardcoded regex is valid"));

const LIST_INDENT: &str = "  ";

/// Create all Org-mode rules
pub fn org_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        checkbox_in_list_rule(),
        horizontal_rule(),
        italic_rule(),
        bold_rule(),
        strike_rule(),
        underline_rule(),
        subscript_rule(),
        source_block_rule(),
        code_rule(),
        image_rule(),
        inline_link_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("paragraph", "p", |_, content, _| format!("\n\n{}\n\n", content))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("lineBreak", "br", |_, _, _| "\n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(
        "heading",
        &["h1", "h2", "h3", "h4", "h5", "h6"],
        |node, content, _| {
            let content = content.trim();
            if content.is_empty() {
                return String::new();
            }
            let level: usize = node.tag_name()[1..].parse().unwrap_or(1);
            format!("\n\n{} {}\n\n", repeat("*", level), content)
        },
    )
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", "blockquote", |_, content, _| {
        format!("\n\n#+begin_quote\n{}\n#+end_quote\n\n", content)
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
    Rule::for_tag("listItem", "li", |node, content, _| {
        let content = LEADING_NEWLINES_RE.replace(content, "");
        let content = TRAILING_NEWLINES_RE.replace(&content, "\n");
        let content = content.replace('\n', &format!("\n{}", LIST_INDENT));

        let prefix = match node.parent() {
            Some(parent) if parent.node.is_tag("ol") => {
                let start = parent
                    .attr("start")
                    .and_then(|s| s.trim().parse::<i64>().ok())
                    .unwrap_or(1);
                format!("{} ", start.saturating_add(node.element_index() as i64))
            }
            _ => "- ".to_string(),
        };

        let separator = if node.next_sibling().is_some() && !content.ends_with('\n') {
            "\n"
        } else {
            ""
        };

        format!("{}{}{}", prefix, content, separator)
    })
}

fn checkbox_in_list_rule() -> Rule {
    Rule::new(
        "checkboxInList",
        Filter::predicate(|tag, node, _| {
            tag == "input"
                && node
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
                && node.parent_tag().as_deref() == Some("li")
        }),
        |node, _, _| {
            if node.has_attr("checked") {
                "[X] ".to_string()
            } else {
                "[ ] ".to_string()
            }
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("horizontalRule", "hr", |_, _, _| "\n\n-----\n\n".to_string())
}

fn italic_rule() -> Rule {
    Rule::for_tags("italic", &["em", "i"], |node, content, _| {
        wrap_inline_mark(node, content, "/")
    })
}

fn bold_rule() -> Rule {
    Rule::for_tags("bold", &["strong", "b"], |node, content, _| {
        wrap_inline_mark(node, content, "*")
    })
}

fn strike_rule() -> Rule {
    Rule::for_tags("strike", &["strike", "s", "del"], |node, content, _| {
        wrap_inline_mark(node, content, "+")
    })
}

fn underline_rule() -> Rule {
    Rule::for_tag("underline", "u", |node, content, _| {
        wrap_inline_mark(node, content, "_")
    })
}

fn subscript_rule() -> Rule {
    Rule::for_tag("subscript", "sub", |_, content, _| format!("_{{{}}}", content))
}

/// Whether `node` is the only child of a `<pre>`, i.e. the body of a code block
fn is_code_block_body(node: &NodeRef) -> bool {
    node.parent_tag().as_deref() == Some("pre")
        && node.previous_sibling().is_none()
        && node.next_sibling().is_none()
}

fn source_block_rule() -> Rule {
    Rule::for_tag("sourceBlock", "pre", |node, _, _| {
        let code = node.element_children().find(|c| c.is_tag("code"));
        let language = code
            .and_then(|c| c.attr("class"))
            .and_then(|class| {
                class
                    .split_whitespace()
                    .find_map(|c| c.strip_prefix("language-"))
            })
            .unwrap_or("");
        let text = code.map(Node::text_content).unwrap_or_else(|| node.text_content());

        let header = if language.is_empty() {
            "#+begin_src".to_string()
        } else {
            format!("#+begin_src {}", language)
        };
        format!("\n\n{}\n{}\n#+end_src\n\n", header, text.trim_end_matches('\n'))
    })
}

fn code_rule() -> Rule {
    Rule::new(
        "code",
        Filter::predicate(|tag, node, _| {
            (tag == "code" || tag == "kbd") && !is_code_block_body(node)
        }),
        |node, content, _| {
            if content.contains('=') && content.contains('~') {
                return format!("\n\n: {} \n\n", content);
            }
            let mut mark = if content.contains('=') { "~" } else { "=" };
            if node.has_ancestor("table") {
                mark = "~";
                if content.contains('~') {
                    return content.to_string();
                }
            }
            wrap_inline_mark(node, content, mark)
        },
    )
}

/// Resolve an image source against the configured base URL
fn image_source(src: &str, options: &ConversionOptions) -> String {
    match options.base_url.as_deref() {
        Some(base) => convert_url_to_formatted_url(src, base),
        None => src.to_string(),
    }
}

fn image_rule() -> Rule {
    Rule::for_tag("img", "img", |node, _, options| {
        let mut src = image_source(node.attr("src").unwrap_or(""), options);
        if options.decode_uri {
            src = safe_decode_uri(&src);
        }
        let title = clean_attribute(node.attr("title"));
        format!("#+CAPTION: {}\n\n[[{}]]", title, src)
    })
}

fn inline_link_rule() -> Rule {
    Rule::new(
        "inlineLink",
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attr("href")),
        |node, content, options| {
            // Heading anchors and similar invisible links
            if content.is_empty() {
                return String::new();
            }
            let href = safe_decode_uri(node.attr("href").unwrap_or(""));

            if let [only] = node.node.children.as_slice() {
                if only.is_tag("img") {
                    let src = image_source(only.attr("src").unwrap_or(""), options);
                    if href == src {
                        return format!("[[{}]]", href);
                    }
                    return format!("[[{}][{}]]", href, safe_decode_uri(&src));
                }
            }

            format!("[[{}][{}]]", href, content)
        },
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{ConversionOptions, ConversionService, Dialect};

    fn org(html: &str) -> String {
        ConversionService::new(Dialect::Org).convert_html(html).unwrap()
    }

    #[test]
    fn test_headings_are_not_capped() {
        for level in 1..=6 {
            let html = format!("<h{0}>Title</h{0}>", level);
            assert_eq!(org(&html), format!("{} Title", "*".repeat(level)));
        }
        assert_eq!(org("<h2>  </h2>"), "");
    }

    #[test]
    fn test_paragraphs_are_separated_by_one_blank_line() {
        assert_eq!(org("<p>one</p><p>two</p>"), "one\n\ntwo");
        assert_eq!(org("<p>one<br>two</p>"), "one\ntwo");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            org("<blockquote>quoted</blockquote>"),
            "#+begin_quote\nquoted\n#+end_quote"
        );
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(org("<ul><li>a</li><li>b</li></ul>"), "- a\n- b");
    }

    #[test]
    fn test_ordered_list_start_offset() {
        assert_eq!(org(r#"<ol start="5"><li>a</li><li>b</li></ol>"#), "5 a\n6 b");
        assert_eq!(org("<ol><li>a</li><li>b</li></ol>"), "1 a\n2 b");
    }

    #[test]
    fn test_ordered_list_start_at_the_integer_limit() {
        assert_eq!(
            org(r#"<ol start="9223372036854775807"><li>a</li><li>b</li></ol>"#),
            "9223372036854775807 a\n9223372036854775807 b"
        );
    }

    #[test]
    fn test_nested_list_is_indented() {
        assert_eq!(
            org("<ul><li>a<ul><li>b</li><li>c</li></ul></li><li>d</li></ul>"),
            "- a\n  - b\n  - c\n- d"
        );
    }

    #[test]
    fn test_checkbox_in_list() {
        assert_eq!(
            org(r#"<ul><li><input type="checkbox" checked>done</li><li><input type="checkbox">todo</li></ul>"#),
            "- [X] done\n- [ ] todo"
        );
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(org("<p>a</p><hr><p>b</p>"), "a\n\n-----\n\nb");
    }

    #[test]
    fn test_inline_marks() {
        assert_eq!(org("<em>it</em>"), "/it/");
        assert_eq!(org("<b>bold</b>"), "*bold*");
        assert_eq!(org("<del>gone</del>"), "+gone+");
        assert_eq!(org("<u>under</u>"), "_under_");
        assert_eq!(org("H<sub>2</sub>O"), "H_{2}O");
    }

    #[test]
    fn test_inline_marks_get_spacing() {
        assert_eq!(org("<p>a<em>b</em>c</p>"), "a /b/ c");
        assert_eq!(org("<p>a <em>b</em> c</p>"), "a /b/ c");
    }

    #[test]
    fn test_empty_emphasis() {
        assert_eq!(org("<em></em>"), "");
        assert_eq!(org("<strong> </strong>"), "");
    }

    #[test]
    fn test_code_delimiters() {
        assert_eq!(org("<code>x</code>"), "=x=");
        assert_eq!(org("<code>a=b</code>"), "~a=b~");
        assert_eq!(org("<kbd>Ctrl</kbd>"), "=Ctrl=");
        assert_eq!(org("<code>a=b~c</code>"), ": a=b~c");
        assert_eq!(org("<p>x</p><code>a=b~c</code><p>y</p>"), "x\n\n: a=b~c \n\ny");
    }

    #[test]
    fn test_code_in_table() {
        assert_eq!(
            org("<table><tr><td><code>x</code></td></tr></table>"),
            "~x~"
        );
        assert_eq!(
            org("<table><tr><td><code>x~y</code></td></tr></table>"),
            "x~y"
        );
    }

    #[test]
    fn test_source_block() {
        assert_eq!(
            org(r#"<pre><code class="language-rust">fn main() {}
</code></pre>"#),
            "#+begin_src rust\nfn main() {}\n#+end_src"
        );
    }

    #[test]
    fn test_image_caption() {
        assert_eq!(
            org(r#"<img src="a.png" title="A picture">"#),
            "#+CAPTION: A picture\n\n[[a.png]]"
        );
        assert_eq!(org(r#"<img src="a.png">"#), "#+CAPTION: \n\n[[a.png]]");
    }

    #[test]
    fn test_image_resolved_against_base() {
        let options = ConversionOptions {
            decode_uri: true,
            base_url: Some("https://x.com/docs/".to_string()),
            ..Default::default()
        };
        let service = ConversionService::with_options(Dialect::Org, options);
        assert_eq!(
            service.convert_html(r#"<img src="/a%20b.png">"#).unwrap(),
            "#+CAPTION: \n\n[[https://x.com/a b.png]]"
        );
        assert_eq!(
            service.convert_html(r#"<img src="c.png">"#).unwrap(),
            "#+CAPTION: \n\n[[https://x.com/docs/c.png]]"
        );
    }

    #[test]
    fn test_link_keeps_reserved_escapes() {
        assert_eq!(
            org(r#"<a href="https://x.com/s?q=a%26b%23c%5Dd%E4%B8%AD">x</a>"#),
            "[[https://x.com/s?q=a%26b%23c%5Dd中][x]]"
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            org(r#"<a href="https://example.com">Example</a>"#),
            "[[https://example.com][Example]]"
        );
        assert_eq!(org(r#"<a href="https://example.com"></a>"#), "");
        assert_eq!(org("<a>plain</a>"), "plain");
        assert_eq!(
            org(r#"<a href="https://example.com/%E4%B8%AD">zh</a>"#),
            "[[https://example.com/中][zh]]"
        );
    }

    #[test]
    fn test_link_around_image() {
        assert_eq!(org(r#"<a href="u"><img src="u"></a>"#), "[[u]]");
        assert_eq!(org(r#"<a href="page"><img src="pic.png"></a>"#), "[[page][pic.png]]");
    }
}
