//! Typed menu actions and their conversion pipelines.

use std::fmt;
use std::str::FromStr;

use copyas::{
    convert_html_to_bbcode, convert_html_to_beautify_html, convert_html_to_formatted_link_html,
    convert_html_to_markdown, convert_html_to_no_attr_html, convert_html_to_only_a_tag_html,
    convert_html_to_org, convert_html_to_org_with_base, convert_html_to_plain_text,
    convert_html_to_safe_html, convert_html_to_tid,
    convert_markdown_to_beautify_markdown, convert_text_to_raw_string,
    convert_text_to_trimmed_text, convert_url_to_audio_html, convert_url_to_formatted_url,
    convert_url_to_image_bbcode, convert_url_to_image_html, convert_url_to_image_markdown,
    convert_url_to_image_org, convert_url_to_image_tid, convert_url_to_link_bbcode,
    convert_url_to_link_html, convert_url_to_link_markdown, convert_url_to_link_org,
    convert_url_to_link_plain, convert_url_to_link_tid, convert_url_to_video_html,
};
use indexmap::IndexMap;
use log::{debug, warn};

use crate::collaborators::{ImageFetcher, PageSource};
use crate::data_uri::{convert_url_to_image_data_uri, ImageFormat};
use crate::{ActionError, Result};

/// Kind of media under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Audio,
    Video,
}

/// What was clicked. Mirrors the browser's context-menu click data.
#[derive(Debug, Clone, Default)]
pub struct ClickInfo {
    pub page_url: Option<String>,
    pub frame_id: Option<u32>,
    pub frame_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub src_url: Option<String>,
    pub media_type: Option<MediaType>,
}

/// The tab the click happened in
#[derive(Debug, Clone, Default)]
pub struct TabInfo {
    pub id: Option<u32>,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Menu a group of actions is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuContext {
    Page,
    Frame,
    Link,
    Selection,
    Image,
    Audio,
    Video,
}

impl MenuContext {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuContext::Page => "page",
            MenuContext::Frame => "frame",
            MenuContext::Link => "link",
            MenuContext::Selection => "selection",
            MenuContext::Image => "image",
            MenuContext::Audio => "audio",
            MenuContext::Video => "video",
        }
    }
}

/// Output format for links and images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Plain,
    Markdown,
    Html,
    BBCode,
    Tid,
    Org,
}

impl Target {
    fn suffix(self) -> &'static str {
        match self {
            Target::Plain => "plain",
            Target::Markdown => "markdown",
            Target::Html => "html",
            Target::BBCode => "bbcode",
            Target::Tid => "tid",
            Target::Org => "org",
        }
    }

    fn link(self, url: &str, text: Option<&str>) -> String {
        match self {
            Target::Plain => convert_url_to_link_plain(url, text),
            Target::Markdown => convert_url_to_link_markdown(url, text),
            Target::Html => convert_url_to_link_html(url, text),
            Target::BBCode => convert_url_to_link_bbcode(url, text),
            Target::Tid => convert_url_to_link_tid(url, text),
            Target::Org => convert_url_to_link_org(url, text),
        }
    }

    fn image(self, url: &str) -> String {
        match self {
            Target::Plain => url.to_string(),
            Target::Markdown => convert_url_to_image_markdown(url),
            Target::Html => convert_url_to_image_html(url),
            Target::BBCode => convert_url_to_image_bbcode(url),
            Target::Tid => convert_url_to_image_tid(url),
            Target::Org => convert_url_to_image_org(url),
        }
    }

    /// Link text derived from the HTML inside a right-clicked link
    fn link_text(self, html: &str) -> String {
        let safe = convert_html_to_beautify_html(&convert_html_to_safe_html(html));
        match self {
            Target::Plain => convert_html_to_plain_text(&safe),
            Target::Markdown => {
                convert_markdown_to_beautify_markdown(&convert_html_to_markdown(&safe))
            }
            Target::Html => safe,
            Target::BBCode => convert_html_to_bbcode(&safe),
            Target::Tid => convert_html_to_tid(&safe),
            Target::Org => convert_html_to_org(&safe),
        }
    }
}

/// Output format for a copied selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFormat {
    Markdown,
    Html,
    HtmlOnlyATag,
    HtmlNoAttr,
    BBCode,
    Plain,
    PlainTrimmed,
    RawString,
    Tid,
    Org,
}

impl SelectionFormat {
    fn suffix(self) -> &'static str {
        match self {
            SelectionFormat::Markdown => "markdown",
            SelectionFormat::Html => "html",
            SelectionFormat::HtmlOnlyATag => "html_only_a_tag",
            SelectionFormat::HtmlNoAttr => "html_no_attr",
            SelectionFormat::BBCode => "bbcode",
            SelectionFormat::Plain => "plain",
            SelectionFormat::PlainTrimmed => "plain_trimmed",
            SelectionFormat::RawString => "raw_string",
            SelectionFormat::Tid => "tid",
            SelectionFormat::Org => "org",
        }
    }

    fn uses_text(self) -> bool {
        matches!(
            self,
            SelectionFormat::Plain | SelectionFormat::PlainTrimmed | SelectionFormat::RawString
        )
    }

    fn render_text(self, text: String) -> String {
        match self {
            SelectionFormat::PlainTrimmed => convert_text_to_trimmed_text(&text),
            SelectionFormat::RawString => convert_text_to_raw_string(&text),
            _ => text,
        }
    }

    fn render_html(self, html: &str, base: Option<&str>) -> String {
        let safe = convert_html_to_safe_html(html);
        if self == SelectionFormat::HtmlNoAttr {
            return convert_html_to_beautify_html(&convert_html_to_no_attr_html(&safe));
        }

        let linked = convert_html_to_formatted_link_html(&safe, base);
        match self {
            SelectionFormat::HtmlOnlyATag => {
                convert_html_to_beautify_html(&convert_html_to_only_a_tag_html(&linked))
            }
            SelectionFormat::Markdown => convert_markdown_to_beautify_markdown(
                &convert_html_to_markdown(&convert_html_to_beautify_html(&linked)),
            ),
            SelectionFormat::BBCode => {
                convert_html_to_bbcode(&convert_html_to_beautify_html(&linked))
            }
            SelectionFormat::Tid => convert_html_to_tid(&convert_html_to_beautify_html(&linked)),
            SelectionFormat::Org => {
                let html = convert_html_to_beautify_html(&linked);
                match base {
                    Some(base) => convert_html_to_org_with_base(&html, base),
                    None => convert_html_to_org(&html),
                }
            }
            _ => convert_html_to_beautify_html(&linked),
        }
    }
}

/// One menu entry or command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The tab's own URL as a link titled with the tab title
    TabUrl(Target),
    /// The clicked frame's URL as a link titled with the frame's document title
    FrameUrl(Target),
    /// The clicked link, titled with its converted content
    Link(Target),
    Selection(SelectionFormat),
    /// The clicked image referenced by URL
    Image(Target),
    /// The clicked image embedded as a data URI
    ImageDataUri(Target, ImageFormat),
    /// The bare data URI, re-encoded when a format is given
    DataUri(Option<ImageFormat>),
    AudioHtml,
    VideoHtml,
}

impl Action {
    /// Every action offered in a menu, in menu order
    pub fn all() -> Vec<Action> {
        use SelectionFormat as S;
        use Target::*;

        let formats = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Webp];
        let mut actions = Vec::new();

        for target in [Plain, Markdown, BBCode, Html, Tid, Org] {
            actions.push(Action::TabUrl(target));
        }
        for target in [Plain, Markdown, BBCode, Html, Tid, Org] {
            actions.push(Action::FrameUrl(target));
        }
        for target in [Markdown, BBCode, Html, Tid, Org] {
            actions.push(Action::Link(target));
        }
        for format in [
            S::Markdown,
            S::BBCode,
            S::Html,
            S::HtmlOnlyATag,
            S::HtmlNoAttr,
            S::Plain,
            S::PlainTrimmed,
            S::RawString,
            S::Tid,
            S::Org,
        ] {
            actions.push(Action::Selection(format));
        }

        actions.push(Action::Image(Markdown));
        actions.extend(formats.map(|f| Action::ImageDataUri(Markdown, f)));
        actions.push(Action::Image(BBCode));
        actions.push(Action::Image(Html));
        actions.extend(formats.map(|f| Action::ImageDataUri(Html, f)));
        actions.push(Action::Image(Tid));
        actions.push(Action::Image(Org));
        actions.push(Action::DataUri(None));
        actions.extend(formats.map(|f| Action::DataUri(Some(f))));

        actions.push(Action::AudioHtml);
        actions.push(Action::VideoHtml);
        actions
    }

    /// Stable identifier, e.g. `selection_to_org` or `image_to_data_uri_png`
    pub fn id(&self) -> String {
        match self {
            Action::TabUrl(t) => format!("tab_url_to_{}", t.suffix()),
            Action::FrameUrl(t) => format!("frame_url_to_{}", t.suffix()),
            Action::Link(t) => format!("link_to_{}", t.suffix()),
            Action::Selection(s) => format!("selection_to_{}", s.suffix()),
            Action::Image(t) => format!("image_to_{}", t.suffix()),
            Action::ImageDataUri(t, f) => format!("image_to_{}_data_uri_{}", t.suffix(), f),
            Action::DataUri(None) => "image_to_data_uri_raw".to_string(),
            Action::DataUri(Some(f)) => format!("image_to_data_uri_{}", f),
            Action::AudioHtml => "audio_to_html".to_string(),
            Action::VideoHtml => "video_to_html".to_string(),
        }
    }

    pub fn context(&self) -> MenuContext {
        match self {
            Action::TabUrl(_) => MenuContext::Page,
            Action::FrameUrl(_) => MenuContext::Frame,
            Action::Link(_) => MenuContext::Link,
            Action::Selection(_) => MenuContext::Selection,
            Action::Image(_) | Action::ImageDataUri(..) | Action::DataUri(_) => MenuContext::Image,
            Action::AudioHtml => MenuContext::Audio,
            Action::VideoHtml => MenuContext::Video,
        }
    }

    /// Run the action.
    ///
    /// Returns `Ok(None)` when the click does not carry what the action
    /// needs. Collaborator failures are returned as errors.
    pub async fn run(
        &self,
        info: &ClickInfo,
        tab: Option<&TabInfo>,
        page: &dyn PageSource,
        images: &dyn ImageFetcher,
    ) -> Result<Option<String>> {
        debug!("running {}", self.id());
        let result = match *self {
            Action::TabUrl(target) => Ok(tab
                .and_then(|tab| tab.url.as_deref().map(|url| (url, tab.title.as_deref())))
                .map(|(url, title)| target.link(url, title))),
            Action::FrameUrl(target) => self.frame_url(target, info, tab, page).await,
            Action::Link(target) => self.link(target, info, tab, page).await,
            Action::Selection(format) => self.selection(format, info, tab, page).await,
            Action::Image(target) => {
                Ok(media_url(info, tab, MediaType::Image).map(|url| target.image(&url)))
            }
            Action::ImageDataUri(target, format) => {
                match media_url(info, tab, MediaType::Image) {
                    Some(url) => {
                        let uri = convert_url_to_image_data_uri(images, &url, Some(format)).await?;
                        Ok(Some(target.image(&uri)))
                    }
                    None => Ok(None),
                }
            }
            Action::DataUri(format) => match media_url(info, tab, MediaType::Image) {
                Some(url) => convert_url_to_image_data_uri(images, &url, format)
                    .await
                    .map(Some),
                None => Ok(None),
            },
            Action::AudioHtml => Ok(media_url(info, tab, MediaType::Audio)
                .map(|url| convert_url_to_audio_html(&url))),
            Action::VideoHtml => Ok(media_url(info, tab, MediaType::Video)
                .map(|url| convert_url_to_video_html(&url))),
        };

        if let Err(err) = &result {
            warn!("{} failed: {}", self.id(), err);
        }
        result
    }

    async fn frame_url(
        &self,
        target: Target,
        info: &ClickInfo,
        tab: Option<&TabInfo>,
        page: &dyn PageSource,
    ) -> Result<Option<String>> {
        let Some(frame_url) = info.frame_url.as_deref() else {
            return Ok(None);
        };

        match tab.and_then(|tab| Some((tab.id?, tab.url.as_deref()?))) {
            Some((tab_id, tab_url)) => {
                let url = convert_url_to_formatted_url(frame_url, tab_url);
                let title = page.document_title(tab_id, info.frame_id).await?;
                Ok(Some(target.link(&url, Some(&title))))
            }
            None => Ok(Some(target.link(frame_url, None))),
        }
    }

    async fn link(
        &self,
        target: Target,
        info: &ClickInfo,
        tab: Option<&TabInfo>,
        page: &dyn PageSource,
    ) -> Result<Option<String>> {
        let Some(link_url) = info.link_url.as_deref() else {
            return Ok(None);
        };
        let link_text = info.link_text.as_deref();

        match tab.and_then(|tab| Some((tab.id?, tab.url.as_deref()?))) {
            Some((tab_id, tab_url)) => {
                let base = info.frame_url.as_deref().unwrap_or(tab_url);
                let url = convert_url_to_formatted_url(link_url, base);
                let html = page.active_element_html(tab_id, info.frame_id).await?;
                let title = target.link_text(&html);
                let text = if title.is_empty() {
                    link_text
                } else {
                    Some(title.as_str())
                };
                Ok(Some(target.link(&url, text)))
            }
            None => Ok(Some(target.link(link_url, link_text))),
        }
    }

    async fn selection(
        &self,
        format: SelectionFormat,
        info: &ClickInfo,
        tab: Option<&TabInfo>,
        page: &dyn PageSource,
    ) -> Result<Option<String>> {
        let Some(tab) = tab else {
            return Ok(None);
        };
        let Some(tab_id) = tab.id else {
            return Ok(None);
        };

        if format.uses_text() {
            let text = page.selection_text(tab_id, info.frame_id).await?;
            return Ok(Some(format.render_text(text)));
        }

        let html = page.selection_html(tab_id, info.frame_id).await?;
        let base = info
            .frame_url
            .as_deref()
            .or(info.page_url.as_deref())
            .or(tab.url.as_deref());
        Ok(Some(format.render_html(&html, base)))
    }
}

/// Source URL of the clicked media, resolved against the frame or tab URL
fn media_url(info: &ClickInfo, tab: Option<&TabInfo>, media: MediaType) -> Option<String> {
    if info.media_type != Some(media) {
        return None;
    }
    let src = info.src_url.as_deref()?;

    let base = tab
        .and_then(|tab| tab.url.as_deref())
        .map(|tab_url| info.frame_url.as_deref().unwrap_or(tab_url));
    Some(match base {
        Some(base) => convert_url_to_formatted_url(src, base),
        None => src.to_string(),
    })
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self> {
        Action::all()
            .into_iter()
            .find(|action| action.id() == s)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}

/// Actions grouped by the menu they appear in
pub fn menus() -> IndexMap<MenuContext, Vec<Action>> {
    let mut menus: IndexMap<MenuContext, Vec<Action>> = IndexMap::new();
    for action in Action::all() {
        menus.entry(action.context()).or_default().push(action);
    }
    menus
}
