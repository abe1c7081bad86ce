//! # copyas-actions
//!
//! Context-menu and command actions built on the `copyas` converters.
//!
//! An [`Action`] reads what it needs from the page through a [`PageSource`]
//! (selection, focused link, document title) or an [`ImageFetcher`], then
//! runs the conversion pipeline for its target format. Actions whose click
//! context does not apply, such as an image action on a video, resolve to
//! `Ok(None)`.

mod actions;
mod collaborators;
mod data_uri;

pub use actions::{
    menus, Action, ClickInfo, MediaType, MenuContext, SelectionFormat, TabInfo, Target,
};
pub use collaborators::{FetchedImage, ImageFetcher, PageSource};
pub use data_uri::{convert_url_to_image_data_uri, encode_data_uri, ImageFormat};

/// Error type for actions
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Page content unavailable: {0}")]
    Page(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] copyas::ConvertError),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, ActionError>;
