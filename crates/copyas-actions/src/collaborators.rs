//! Outside collaborators an action awaits before converting.

use crate::data_uri::ImageFormat;
use crate::Result;

/// Read access to the content of a browser tab.
///
/// `frame_id` selects a frame inside the tab; `None` means the top-level
/// document. A tab that closed or navigated away mid-call should surface as
/// [`ActionError::Page`](crate::ActionError::Page).
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// HTML of the current selection
    async fn selection_html(&self, tab_id: u32, frame_id: Option<u32>) -> Result<String>;

    /// Text of the current selection
    async fn selection_text(&self, tab_id: u32, frame_id: Option<u32>) -> Result<String>;

    /// Inner HTML of the focused element, usually the right-clicked link
    async fn active_element_html(&self, tab_id: u32, frame_id: Option<u32>) -> Result<String>;

    async fn document_title(&self, tab_id: u32, frame_id: Option<u32>) -> Result<String>;
}

/// An image as delivered by an [`ImageFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `image/png`
    pub mime: String,
}

#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Load the image at `url`. With a `format`, the image is re-encoded to
    /// it; without one, the original bytes are returned.
    async fn fetch_image(&self, url: &str, format: Option<ImageFormat>) -> Result<FetchedImage>;
}
