//! Image to `data:` URI conversion.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use log::debug;

use crate::collaborators::ImageFetcher;
use crate::{ActionError, Result};

/// Encodings an image can be converted to before embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(ActionError::UnsupportedMedia(format!(
                "no image format named {:?}",
                other
            ))),
        }
    }
}

/// Build `data:<mime>;base64,<payload>`
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded_capacity = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut uri = String::with_capacity(encoded_capacity + mime.len() + 13);

    uri.push_str("data:");
    uri.push_str(mime);
    uri.push_str(";base64,");
    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut uri);

    uri
}

/// Fetch the image at `url` and return it as a data URI.
///
/// Without a `format` the image keeps its own encoding. The fetched payload
/// must be an image, and match `format` when one was requested.
pub async fn convert_url_to_image_data_uri(
    fetcher: &dyn ImageFetcher,
    url: &str,
    format: Option<ImageFormat>,
) -> Result<String> {
    let image = fetcher.fetch_image(url, format).await?;
    let mime = image
        .mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if !mime.starts_with("image/") {
        return Err(ActionError::UnsupportedMedia(format!(
            "{} is {:?}, not an image",
            url, image.mime
        )));
    }
    if let Some(format) = format {
        if mime != format.mime() {
            return Err(ActionError::UnsupportedMedia(format!(
                "{} was delivered as {}, expected {}",
                url,
                mime,
                format.mime()
            )));
        }
    }

    debug!("encoding {} bytes of {} from {}", image.bytes.len(), mime, url);
    Ok(encode_data_uri(&mime, &image.bytes))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::collaborators::FetchedImage;

    struct FixedImage(&'static str);

    #[async_trait::async_trait]
    impl ImageFetcher for FixedImage {
        async fn fetch_image(&self, _url: &str, format: Option<ImageFormat>) -> Result<FetchedImage> {
            Ok(FetchedImage {
                bytes: b"img".to_vec(),
                mime: format.map(|f| f.mime()).unwrap_or(self.0).to_string(),
            })
        }
    }

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(encode_data_uri("image/png", b"img"), "data:image/png;base64,aW1n");
        assert_eq!(encode_data_uri("image/gif", b""), "data:image/gif;base64,");
    }

    #[test]
    fn test_format_names() {
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Webp.to_string(), "webp");
        assert!("bmp".parse::<ImageFormat>().is_err());
    }

    #[tokio::test]
    async fn test_raw_and_converted() {
        let fetcher = FixedImage("image/gif; charset=binary");
        assert_eq!(
            convert_url_to_image_data_uri(&fetcher, "a.gif", None).await.unwrap(),
            "data:image/gif;base64,aW1n"
        );
        assert_eq!(
            convert_url_to_image_data_uri(&fetcher, "a.gif", Some(ImageFormat::Jpeg))
                .await
                .unwrap(),
            "data:image/jpeg;base64,aW1n"
        );
    }

    #[tokio::test]
    async fn test_non_image_is_rejected() {
        let fetcher = FixedImage("text/html");
        let err = convert_url_to_image_data_uri(&fetcher, "page", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::UnsupportedMedia(_)));
    }
}
