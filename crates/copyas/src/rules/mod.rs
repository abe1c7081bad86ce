//! Rule system for HTML to dialect conversion.

mod bbcode;
mod markdown;
mod org;
mod plain;
mod rule;
mod tiddly;

pub use bbcode::bbcode_rules;
pub use markdown::markdown_rules;
pub use org::org_rules;
pub use plain::plain_text_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};
pub use tiddly::tiddly_rules;

use crate::node::NodeRef;
use crate::service::ConversionOptions;
use crate::utilities::{escape_markdown, is_block, is_skipped};

/// Target markup dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// CommonMark-style Markdown
    Markdown,
    /// Emacs Org-mode markup
    Org,
    /// TiddlyWiki wikitext
    TiddlyWiki,
    /// Forum BBCode
    BBCode,
    /// Plain text
    PlainText,
}

/// Ordered collection of rules for one conversion.
///
/// Custom rules are consulted before the dialect rules; within each group
/// the first rule whose filter matches wins. Rule names carry no identity,
/// so registering a second rule under an existing name keeps both.
pub struct Rules {
    /// Custom rules added by the user (checked first)
    custom_rules: Vec<Rule>,
    /// Remove rules (remove entirely)
    remove_rules: Vec<Filter>,
    /// Built-in dialect rules
    dialect_rules: Vec<Rule>,
    /// Escaping applied to text nodes, if the dialect needs one
    escape: Option<fn(&str) -> String>,
}

impl Rules {
    /// Create the rule table for a dialect
    pub fn new(dialect: Dialect) -> Self {
        let (dialect_rules, escape): (Vec<Rule>, Option<fn(&str) -> String>) = match dialect {
            Dialect::Markdown => (markdown_rules(), Some(escape_markdown as fn(&str) -> String)),
            Dialect::Org => (org_rules(), None),
            Dialect::TiddlyWiki => (tiddly_rules(), None),
            Dialect::BBCode => (bbcode_rules(), None),
            Dialect::PlainText => (plain_text_rules(), None),
        };

        Self {
            custom_rules: Vec::new(),
            remove_rules: Vec::new(),
            dialect_rules,
            escape,
        }
    }

    /// Create a rule table with no rules at all
    pub fn empty() -> Self {
        Self {
            custom_rules: Vec::new(),
            remove_rules: Vec::new(),
            dialect_rules: Vec::new(),
            escape: None,
        }
    }

    /// Add a custom rule
    pub fn add(&mut self, rule: Rule) {
        self.custom_rules.push(rule);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Number of conversion rules, custom and built-in
    pub fn len(&self) -> usize {
        self.custom_rules.len() + self.dialect_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the appropriate rule for a node
    pub fn for_node<'a>(&'a self, node: &NodeRef, options: &ConversionOptions) -> Option<&'a Rule> {
        let tag = node.tag_name();

        self.custom_rules
            .iter()
            .chain(self.dialect_rules.iter())
            .find(|rule| rule.filter.matches(&tag, node, options))
    }

    /// Check if a node should be removed
    pub fn should_remove(&self, node: &NodeRef, options: &ConversionOptions) -> bool {
        let tag = node.tag_name();
        self.remove_rules
            .iter()
            .any(|filter| filter.matches(&tag, node, options))
    }

    /// Escape text node content for the dialect
    pub fn escape(&self, text: &str) -> String {
        match self.escape {
            Some(escape) => escape(text),
            None => text.to_string(),
        }
    }

    /// Baseline replacement for elements no rule matched
    pub fn default_replacement(&self, node: &NodeRef, content: &str) -> String {
        let tag = node.tag_name();
        if is_skipped(&tag) {
            String::new()
        } else if is_block(&tag) {
            format!("\n\n{}\n\n", content)
        } else {
            content.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_first_structural_match_wins() {
        let mut rules = Rules::empty();
        rules.add(Rule::for_tag("header1", "h1", |_, content, _| format!("first:{}", content)));
        rules.add(Rule::for_tags("header1", &["h1", "em"], |_, content, _| {
            format!("second:{}", content)
        }));

        let options = ConversionOptions::default();
        let h1 = Node::element("h1");
        let em = Node::element("em");

        let rule = rules.for_node(&NodeRef::new(&h1), &options).unwrap();
        assert_eq!(rule.replace(&NodeRef::new(&h1), "x", &options), "first:x");

        let rule = rules.for_node(&NodeRef::new(&em), &options).unwrap();
        assert_eq!(rule.replace(&NodeRef::new(&em), "x", &options), "second:x");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_custom_rules_shadow_dialect_rules() {
        let mut rules = Rules::new(Dialect::TiddlyWiki);
        rules.add(Rule::for_tag("image", "img", |_, _, _| "custom".to_string()));

        let options = ConversionOptions::default();
        let img = Node::element_with_attrs("img", vec![("src", "a.png")]);
        let node = NodeRef::new(&img);
        let rule = rules.for_node(&node, &options).unwrap();
        assert_eq!(rule.replace(&node, "", &options), "custom");
    }

    #[test]
    fn test_default_replacement() {
        let rules = Rules::empty();
        let div = Node::element("div");
        let span = Node::element("span");
        let script = Node::element("script");

        assert_eq!(rules.default_replacement(&NodeRef::new(&div), "x"), "\n\nx\n\n");
        assert_eq!(rules.default_replacement(&NodeRef::new(&span), "x"), "x");
        assert_eq!(rules.default_replacement(&NodeRef::new(&script), "x"), "");
    }

    #[test]
    fn test_remove_filter() {
        let mut rules = Rules::new(Dialect::Org);
        rules.remove(Filter::tag("aside"));

        let options = ConversionOptions::default();
        let aside = Node::element("aside");
        assert!(rules.should_remove(&NodeRef::new(&aside), &options));
        assert!(!rules.should_remove(&NodeRef::new(&Node::element("p")), &options));
    }
}
