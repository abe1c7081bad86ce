//! One-call HTML conversions, one per dialect.
//!
//! Each call builds a fresh [`ConversionService`]; nothing is shared between
//! calls. A failed conversion is logged and yields an empty string.

use log::warn;

use crate::rules::Dialect;
use crate::service::{ConversionOptions, ConversionService};

fn convert_with(dialect: Dialect, options: ConversionOptions, html: &str) -> String {
    match ConversionService::with_options(dialect, options).convert_html(html) {
        Ok(output) => output,
        Err(err) => {
            warn!("{:?} conversion abandoned: {}", dialect, err);
            String::new()
        }
    }
}

/// Convert an HTML fragment to Org-mode
pub fn convert_html_to_org(html: &str) -> String {
    convert_with(Dialect::Org, ConversionOptions::default(), html)
}

/// Convert to Org-mode, percent-decoding links and resolving image sources
/// against `base_url`
pub fn convert_html_to_org_with_base(html: &str, base_url: &str) -> String {
    let options = ConversionOptions {
        decode_uri: true,
        base_url: Some(base_url.to_string()),
        ..Default::default()
    };
    convert_with(Dialect::Org, options, html)
}

/// Convert an HTML fragment to TiddlyWiki wikitext
pub fn convert_html_to_tid(html: &str) -> String {
    convert_with(Dialect::TiddlyWiki, ConversionOptions::default(), html)
}

/// Convert an HTML fragment to Markdown
pub fn convert_html_to_markdown(html: &str) -> String {
    convert_with(Dialect::Markdown, ConversionOptions::default(), html)
}

/// Convert an HTML fragment to BBCode
pub fn convert_html_to_bbcode(html: &str) -> String {
    convert_with(Dialect::BBCode, ConversionOptions::default(), html)
}

/// Convert an HTML fragment to plain text
pub fn convert_html_to_plain_text(html: &str) -> String {
    convert_with(Dialect::PlainText, ConversionOptions::default(), html)
}
