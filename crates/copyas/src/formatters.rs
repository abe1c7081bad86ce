//! URL formatters: links, images and media references in every target dialect.
//!
//! Link text is inserted verbatim. Callers building HTML links from page
//! content pass already-sanitized HTML as the text.

use html_escape::encode_double_quoted_attribute;
use log::debug;
use url::Url;

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

/// `text` on one line, the URL on the next
pub fn convert_url_to_link_plain(url: &str, text: Option<&str>) -> String {
    match non_empty(text) {
        Some(text) => format!("{}\n{}", text, url),
        None => url.to_string(),
    }
}

/// `[text](url)`, or an autolink `<url>` without text
pub fn convert_url_to_link_markdown(url: &str, text: Option<&str>) -> String {
    match non_empty(text) {
        Some(text) => format!("[{}]({})", text, url),
        None => format!("<{}>", url),
    }
}

pub fn convert_url_to_link_html(url: &str, text: Option<&str>) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(url),
        non_empty(text).unwrap_or(url)
    )
}

pub fn convert_url_to_link_bbcode(url: &str, text: Option<&str>) -> String {
    match non_empty(text) {
        Some(text) => format!("[url={}]{}[/url]", url, text),
        None => format!("[url]{}[/url]", url),
    }
}

/// `[[text|url]]`, or `[[url]]` without text
pub fn convert_url_to_link_tid(url: &str, text: Option<&str>) -> String {
    match non_empty(text) {
        Some(text) => format!("[[{}|{}]]", text, url),
        None => format!("[[{}]]", url),
    }
}

/// `[[url][text]]`, or `[[url]]` without text
pub fn convert_url_to_link_org(url: &str, text: Option<&str>) -> String {
    match non_empty(text) {
        Some(text) => format!("[[{}][{}]]", url, text),
        None => format!("[[{}]]", url),
    }
}

pub fn convert_url_to_image_markdown(url: &str) -> String {
    format!("![]({})", url)
}

pub fn convert_url_to_image_html(url: &str) -> String {
    format!("<img src=\"{}\">", encode_double_quoted_attribute(url))
}

pub fn convert_url_to_image_bbcode(url: &str) -> String {
    format!("[img]{}[/img]", url)
}

pub fn convert_url_to_image_tid(url: &str) -> String {
    format!("[img[{}]]", url)
}

pub fn convert_url_to_image_org(url: &str) -> String {
    format!("[[{}]]", url)
}

pub fn convert_url_to_audio_html(url: &str) -> String {
    format!(
        "<audio controls src=\"{}\"></audio>",
        encode_double_quoted_attribute(url)
    )
}

pub fn convert_url_to_video_html(url: &str) -> String {
    format!(
        "<video controls src=\"{}\"></video>",
        encode_double_quoted_attribute(url)
    )
}

/// Resolve `url` against `base`.
///
/// Absolute URLs come back normalized. When either side cannot be parsed the
/// input is returned unchanged.
pub fn convert_url_to_formatted_url(url: &str, base: &str) -> String {
    let resolved = Url::parse(base).and_then(|base| base.join(url));
    match resolved {
        Ok(resolved) => resolved.to_string(),
        Err(err) => {
            debug!("keeping {:?} unresolved against {:?}: {}", url, base, err);
            url.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tid_links() {
        assert_eq!(
            convert_url_to_link_tid("https://x.com", Some("Title")),
            "[[Title|https://x.com]]"
        );
        assert_eq!(convert_url_to_link_tid("https://x.com", None), "[[https://x.com]]");
        assert_eq!(convert_url_to_link_tid("https://x.com", Some("")), "[[https://x.com]]");
    }

    #[test]
    fn test_org_links() {
        assert_eq!(
            convert_url_to_link_org("https://x.com", Some("Title")),
            "[[https://x.com][Title]]"
        );
        assert_eq!(convert_url_to_link_org("https://x.com", None), "[[https://x.com]]");
    }

    #[test]
    fn test_other_links() {
        assert_eq!(convert_url_to_link_plain("u", Some("T")), "T\nu");
        assert_eq!(convert_url_to_link_plain("u", None), "u");
        assert_eq!(convert_url_to_link_markdown("u", Some("T")), "[T](u)");
        assert_eq!(convert_url_to_link_markdown("u", None), "<u>");
        assert_eq!(convert_url_to_link_bbcode("u", Some("T")), "[url=u]T[/url]");
        assert_eq!(convert_url_to_link_bbcode("u", None), "[url]u[/url]");
        assert_eq!(
            convert_url_to_link_html("https://x.com/?a=1&b=\"2\"", Some("<b>T</b>")),
            "<a href=\"https://x.com/?a=1&amp;b=&quot;2&quot;\"><b>T</b></a>"
        );
    }

    #[test]
    fn test_images_and_media() {
        assert_eq!(convert_url_to_image_markdown("a.png"), "![](a.png)");
        assert_eq!(convert_url_to_image_html("a.png"), "<img src=\"a.png\">");
        assert_eq!(convert_url_to_image_bbcode("a.png"), "[img]a.png[/img]");
        assert_eq!(convert_url_to_image_tid("a.png"), "[img[a.png]]");
        assert_eq!(convert_url_to_image_org("a.png"), "[[a.png]]");
        assert_eq!(
            convert_url_to_audio_html("a.mp3"),
            "<audio controls src=\"a.mp3\"></audio>"
        );
        assert_eq!(
            convert_url_to_video_html("a.mp4"),
            "<video controls src=\"a.mp4\"></video>"
        );
    }

    #[test]
    fn test_formatted_url() {
        assert_eq!(
            convert_url_to_formatted_url("../img/a.png", "https://example.com/docs/page/"),
            "https://example.com/docs/img/a.png"
        );
        assert_eq!(
            convert_url_to_formatted_url("https://other.org/x", "https://example.com/"),
            "https://other.org/x"
        );
        assert_eq!(convert_url_to_formatted_url("a.png", "not a url"), "a.png");
    }
}
