//! Plain text rules: markup is dropped, block structure becomes line breaks.

use super::Rule;
use crate::utilities::clean_attribute;

/// Create all plain text rules
pub fn plain_text_rules() -> Vec<Rule> {
    vec![line_break_rule(), list_item_rule(), row_rule(), cell_rule(), image_rule()]
}

fn line_break_rule() -> Rule {
    Rule::for_tag("lineBreak", "br", |_, _, _| "\n".to_string())
}

fn list_item_rule() -> Rule {
    Rule::for_tag("listItem", "li", |_, content, _| {
        format!("\n{}\n", content.trim())
    })
}

fn row_rule() -> Rule {
    Rule::for_tag("tableRow", "tr", |_, content, _| {
        format!("\n{}\n", content.trim_end_matches('\t'))
    })
}

fn cell_rule() -> Rule {
    Rule::for_tags("tableCell", &["td", "th"], |_, content, _| {
        format!("{}\t", content.trim())
    })
}

fn image_rule() -> Rule {
    Rule::for_tag("image", "img", |node, _, _| clean_attribute(node.attr("alt")))
}
