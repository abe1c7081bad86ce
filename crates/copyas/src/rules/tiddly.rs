//! TiddlyWiki wikitext rules.

use super::{Filter, Rule};
use crate::utilities::{clean_attribute, repeat};

const MAX_HEADING_LEVEL: usize = 4;

/// Create all TiddlyWiki rules
pub fn tiddly_rules() -> Vec<Rule> {
    vec![heading_rule(), emphasis_rule(), link_rule(), image_rule()]
}

fn heading_rule() -> Rule {
    Rule::for_tags(
        "heading",
        &["h1", "h2", "h3", "h4", "h5", "h6"],
        |node, content, _| {
            let level: usize = node.tag_name()[1..].parse().unwrap_or(1);
            format!("\n{}{}\n", repeat("!", level.min(MAX_HEADING_LEVEL)), content)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::for_tags("emphasis", &["em", "i", "strong", "b"], |node, content, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        let split = match node.tag_name().as_str() {
            "strong" | "b" => "''",
            _ => "//",
        };
        format!("{}{}{}", split, content, split)
    })
}

fn link_rule() -> Rule {
    Rule::new(
        "link",
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attr("href")),
        |node, content, _| {
            let href = node.attr("href").unwrap_or("");
            let title = clean_attribute(node.attr("title"));
            let title = if title.is_empty() {
                title
            } else {
                format!(" \"{}\"", title)
            };
            format!("[[{}|{}{}]]", content, href, title)
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("image", "img", |node, _, _| {
        format!("[img[{}]]", node.attr("src").unwrap_or(""))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{ConversionService, Dialect};

    fn tid(html: &str) -> String {
        ConversionService::new(Dialect::TiddlyWiki)
            .convert_html(html)
            .unwrap()
    }

    #[test]
    fn test_headings() {
        assert_eq!(tid("<h1>Hello World</h1>"), "!Hello World");
        assert_eq!(tid("<h2>Hello World</h2>"), "!!Hello World");
        assert_eq!(tid("<h3>Hello World</h3>"), "!!!Hello World");
        assert_eq!(tid("<h4>Hello World</h4>"), "!!!!Hello World");
    }

    #[test]
    fn test_headings_are_capped() {
        assert_eq!(tid("<h5>Deep</h5>"), "!!!!Deep");
        assert_eq!(tid("<h6>Deeper</h6>"), "!!!!Deeper");
    }

    #[test]
    fn test_consecutive_headings_start_on_their_own_line() {
        assert_eq!(tid("<h1>One</h1><h2>Two</h2>"), "!One\n\n!!Two");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            tid(r#"<a href="https://www.baidu.com">Test</a>"#),
            "[[Test|https://www.baidu.com]]"
        );
        assert_eq!(
            tid(r#"<a href="https://x.com" title="X">Test</a>"#),
            r#"[[Test|https://x.com "X"]]"#
        );
        assert_eq!(tid("<a>Test</a>"), "Test");
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(tid("<em>Test<em>"), "//Test//");
        assert_eq!(tid("<strong>Test<strong>"), "''Test''");
        assert_eq!(tid("<strong>Test</strong>"), "''Test''");
        assert_eq!(tid("<i>Test</i>"), "//Test//");
        assert_eq!(tid("<em></em>"), "");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            tid(r#"<img src="https://hello.world" />"#),
            "[img[https://hello.world]]"
        );
    }

    #[test]
    fn test_unhandled_elements_fall_back_to_default() {
        assert_eq!(tid("<p>one</p><p>two</p>"), "one\n\ntwo");
        assert_eq!(tid("<span>inline</span> text"), "inline text");
    }
}
