use copyas::{
    convert_html_to_org, convert_html_to_tid, convert_markdown_to_beautify_markdown,
    convert_url_to_link_org, convert_url_to_link_tid, ConversionService, ConvertError, Dialect,
    Filter, Node, Rule, Rules,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn tiddlywiki_scenarios() {
    init_logging();
    assert_eq!(convert_html_to_tid("<h1>Hello World</h1>"), "!Hello World");
    assert_eq!(
        convert_html_to_tid(r#"<a href="https://www.baidu.com">Test</a>"#),
        "[[Test|https://www.baidu.com]]"
    );
    assert_eq!(convert_html_to_tid("<strong>Test</strong>"), "''Test''");
    assert_eq!(
        convert_html_to_tid(r#"<img src="https://hello.world" />"#),
        "[img[https://hello.world]]"
    );
}

#[test]
fn headings_per_level() {
    init_logging();
    for level in 1..=6usize {
        let html = format!("<h{0}>X</h{0}>", level);
        assert_eq!(convert_html_to_org(&html), format!("{} X", "*".repeat(level)));
        assert_eq!(convert_html_to_tid(&html), format!("{}X", "!".repeat(level.min(4))));
    }
}

#[test]
fn empty_emphasis_produces_nothing() {
    assert_eq!(convert_html_to_org("<em></em>"), "");
    assert_eq!(convert_html_to_tid("<em></em>"), "");
}

#[test]
fn ordered_list_honours_start() {
    assert_eq!(
        convert_html_to_org(r#"<ol start="5"><li>a</li><li>b</li></ol>"#),
        "5 a\n6 b"
    );
}

#[test]
fn org_image_link_to_itself_collapses() {
    assert_eq!(convert_html_to_org(r#"<a href="u"><img src="u"></a>"#), "[[u]]");
}

#[test]
fn org_code_with_both_marks_becomes_fixed_width() {
    assert_eq!(
        convert_html_to_org("<p>x</p><code>a=b~c</code><p>y</p>"),
        "x\n\n: a=b~c \n\ny"
    );
}

#[test]
fn url_links() {
    assert_eq!(
        convert_url_to_link_tid("https://x.com", Some("Title")),
        "[[Title|https://x.com]]"
    );
    assert_eq!(convert_url_to_link_tid("https://x.com", None), "[[https://x.com]]");
    assert_eq!(
        convert_url_to_link_org("https://x.com", Some("Title")),
        "[[https://x.com][Title]]"
    );
}

#[test]
fn malformed_html_degrades_locally() {
    assert_eq!(convert_html_to_tid("<em>open <strong>nested"), "//open ''nested''//");
    assert_eq!(convert_html_to_org("<p>unclosed"), "unclosed");
}

#[test]
fn hand_built_tree_converts_without_parsing() {
    let mut list = Node::element("ul");
    for item in ["one", "two"] {
        let mut li = Node::element("li");
        li.add_child(Node::text(item));
        list.add_child(li);
    }

    let service = ConversionService::new(Dialect::Org);
    assert_eq!(service.convert(&list).unwrap(), "- one\n- two");
}

#[test]
fn custom_rule_set_without_dialect_rules() {
    let mut rules = Rules::empty();
    rules.add(Rule::new("shout", Filter::tag("b"), |_, content, _| {
        content.to_uppercase()
    }));
    let service = ConversionService::with_rules(Dialect::PlainText, Default::default(), rules);
    assert_eq!(service.convert_html("<b>hey</b> you").unwrap(), "HEY you");

    let empty =
        ConversionService::with_rules(Dialect::PlainText, Default::default(), Rules::empty());
    assert!(matches!(
        empty.convert_html("<b>hey</b>"),
        Err(ConvertError::EmptyRuleSet)
    ));
}

#[test]
fn beautified_output_is_stable() {
    let org = convert_html_to_org("<h1>A</h1><p>b</p><ul><li>c</li></ul>");
    assert_eq!(convert_markdown_to_beautify_markdown(&org), org);
}
