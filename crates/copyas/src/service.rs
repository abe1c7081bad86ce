//! ConversionService - the main entry point for HTML to dialect conversion.

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Node, NodeRef, NodeType};
use crate::rules::{Dialect, Filter, Rule, Rules};
use crate::utilities::{collapse_whitespace, is_block_boundary, is_skipped};
use crate::{ConvertError, Result};

/// Maximum element nesting the reducer will descend into
const MAX_DEPTH: usize = 512;

static EXCESS_NEWLINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("EXCESS_NEWLINES_RE: hardcoded regex is valid"));

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    Setext,
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    Indented,
    /// Use fenced code blocks (```)
    #[default]
    Fenced,
}

/// Options for ConversionService
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Heading style (setext or atx), Markdown only
    pub heading_style: HeadingStyle,

    /// Horizontal rule string, Markdown only
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Percent-decode link and image targets (Org)
    pub decode_uri: bool,

    /// Base URL used to resolve relative image sources (Org)
    pub base_url: Option<String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "---".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
            decode_uri: false,
            base_url: None,
        }
    }
}

/// The main service for converting a node tree into one dialect
pub struct ConversionService {
    dialect: Dialect,
    options: ConversionOptions,
    rules: Rules,
}

impl ConversionService {
    /// Create a service for `dialect` with default options
    pub fn new(dialect: Dialect) -> Self {
        Self::with_options(dialect, ConversionOptions::default())
    }

    /// Create a service for `dialect` with custom options
    pub fn with_options(dialect: Dialect, options: ConversionOptions) -> Self {
        Self {
            dialect,
            options,
            rules: Rules::new(dialect),
        }
    }

    /// Create a service with an explicit rule table
    pub fn with_rules(dialect: Dialect, options: ConversionOptions, rules: Rules) -> Self {
        Self {
            dialect,
            options,
            rules,
        }
    }

    /// Convert a node tree
    pub fn convert(&self, root: &Node) -> Result<String> {
        if self.rules.is_empty() {
            return Err(ConvertError::EmptyRuleSet);
        }

        let output = self.reduce(&NodeRef::new(root), 0)?;
        Ok(post_process(&output))
    }

    /// Parse an HTML string and convert it
    #[cfg(feature = "html")]
    pub fn convert_html(&self, html: &str) -> Result<String> {
        let node = crate::html::parse_html(html);
        self.convert(&node)
    }

    /// Add a custom rule, consulted before the dialect rules
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.add(rule);
        self
    }

    /// Remove elements matching the filter
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Get the current options
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConversionOptions {
        &mut self.options
    }

    /// Post-order walk: children first, then the node's own replacement
    fn reduce(&self, node: &NodeRef, depth: usize) -> Result<String> {
        if depth > MAX_DEPTH {
            return Err(ConvertError::ConversionError(format!(
                "nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }

        match node.node.node_type {
            NodeType::Text => Ok(self.text_replacement(node)),
            NodeType::Comment => Ok(String::new()),
            NodeType::Document | NodeType::DocumentFragment => self.reduce_children(node, depth),
            NodeType::Element => self.reduce_element(node, depth),
        }
    }

    fn reduce_children(&self, node: &NodeRef, depth: usize) -> Result<String> {
        let mut output = String::new();
        for child in node.child_refs() {
            output.push_str(&self.reduce(&child, depth + 1)?);
        }
        Ok(output)
    }

    fn reduce_element(&self, node: &NodeRef, depth: usize) -> Result<String> {
        let tag = node.tag_name();
        if tag.is_empty() {
            return Err(ConvertError::InvalidInput(
                "element node without a tag name".to_string(),
            ));
        }

        if self.rules.should_remove(node, &self.options) {
            trace!("removing <{}>", tag);
            return Ok(String::new());
        }

        let rule = self.rules.for_node(node, &self.options);
        if rule.is_none() && is_skipped(&tag) {
            return Ok(String::new());
        }

        let content = self.reduce_children(node, depth)?;
        Ok(match rule {
            Some(rule) => {
                debug!("<{}> handled by rule {}", tag, rule.name);
                rule.replace(node, &content, &self.options)
            }
            None => self.rules.default_replacement(node, &content),
        })
    }

    fn text_replacement(&self, node: &NodeRef) -> String {
        let text = node.node.node_value.as_deref().unwrap_or("");
        if node.has_ancestor("pre") {
            return text.to_string();
        }

        let mut collapsed = collapse_whitespace(text);
        if is_block_boundary(node.previous_sibling(), node.parent()) {
            collapsed = collapsed.trim_start().to_string();
        }
        if is_block_boundary(node.next_sibling(), node.parent()) {
            collapsed = collapsed.trim_end().to_string();
        }

        self.rules.escape(&collapsed)
    }
}

/// Collapse runs of blank lines and strip the surrounding newlines.
///
/// Leading spaces are kept so an indented code block at the start survives.
fn post_process(output: &str) -> String {
    let collapsed = EXCESS_NEWLINES_RE.replace_all(output, "\n\n");
    collapsed.trim_start_matches('\n').trim_end().to_string()
}
