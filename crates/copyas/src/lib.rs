//! # copyas
//!
//! Convert HTML fragments, links and media URLs into Org-mode, TiddlyWiki
//! wikitext, Markdown, BBCode and plain text.
//!
//! ## Design
//!
//! Conversion walks an owned DOM [`Node`] tree bottom-up. Each element's
//! children are converted first; the resulting text is handed to the first
//! [`Rule`] whose [`Filter`] matches the element. Elements no rule matches
//! fall back to a baseline replacement (block elements get blank lines,
//! inline elements pass their content through).
//!
//! The tree can come from the bundled scraper adapter (feature `html`, on by
//! default) or be built by hand from any other DOM source.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use copyas::{ConversionService, Dialect, Node};
//!
//! let service = ConversionService::new(Dialect::TiddlyWiki);
//!
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//!
//! assert_eq!(service.convert(&h1).unwrap(), "!Hello World");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use copyas::convert_html_to_org;
//!
//! assert_eq!(convert_html_to_org("<h2>Hello <em>World</em></h2>"), "** Hello /World/");
//! ```

#[cfg(feature = "html")]
mod convert;
pub mod formatters;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod rules;
#[cfg(feature = "html")]
pub mod sanitize;
mod service;
pub mod text;
mod utilities;

#[cfg(feature = "html")]
pub use convert::{
    convert_html_to_bbcode, convert_html_to_markdown, convert_html_to_org,
    convert_html_to_org_with_base, convert_html_to_plain_text, convert_html_to_tid,
};
pub use formatters::*;
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeRef, NodeType};
pub use rules::{
    bbcode_rules, markdown_rules, org_rules, plain_text_rules, tiddly_rules, Dialect, Filter,
    Rule, Rules,
};
#[cfg(feature = "html")]
pub use sanitize::{
    convert_html_to_formatted_link_html, convert_html_to_no_attr_html,
    convert_html_to_only_a_tag_html, convert_html_to_safe_html,
};
pub use service::{CodeBlockStyle, ConversionOptions, ConversionService, HeadingStyle};
pub use text::*;
pub use utilities::{clean_attribute, escape_markdown, is_block, is_void};

/// Error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No conversion rules registered")]
    EmptyRuleSet,
}

pub type Result<T> = std::result::Result<T, ConvertError>;
