// ABOUTME: Provider abstraction shared by every image host adapter
// ABOUTME: Defines the ImageProvider trait plus request/response helpers common to adapters

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::error::UploadError;
use crate::mime;
use crate::transport::HttpResponse;
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub mod catbox;
pub mod freeimage;
pub mod imgbb;
pub mod imghippo;
pub mod imgur;
pub mod weibo;

pub use catbox::CatboxProvider;
pub use freeimage::FreeimageProvider;
pub use imgbb::ImgbbProvider;
pub use imghippo::ImghippoProvider;
pub use imgur::ImgurProvider;
pub use weibo::WeiboProvider;

/// One image host. Implementations validate credentials when constructed and
/// hold no state besides them.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn descriptor(&self) -> &'static ProviderDescriptor;

    /// Upload `data`. A missing `filename` becomes `image<ext>`; a missing
    /// `mime` is sniffed from the bytes.
    async fn upload(
        &self,
        data: &[u8],
        filename: Option<&str>,
        mime: Option<&str>,
    ) -> Result<UploadResult>;

    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    fn display_name(&self) -> &'static str {
        self.descriptor().display_name
    }

    fn max_file_size(&self) -> u64 {
        self.descriptor().max_file_size
    }

    fn supported_types(&self) -> &'static [&'static str] {
        self.descriptor().supported_types
    }

    fn supports(&self, mime: &str) -> bool {
        self.descriptor().supports(mime)
    }
}

/// Upload payload with filename, MIME type and display name resolved
pub(crate) struct UploadFile {
    pub data: Bytes,
    pub filename: String,
    pub mime: String,
    pub name: String,
}

impl UploadFile {
    pub(crate) fn new(data: &[u8], filename: Option<&str>, mime: Option<&str>) -> Self {
        let mime = mime
            .filter(|m| !m.is_empty())
            .or_else(|| mime::detect(data))
            .unwrap_or("application/octet-stream")
            .to_string();

        let filename = filename
            .and_then(|f| Path::new(f).file_name())
            .map(|f| f.to_string_lossy().into_owned())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| format!("image{}", mime::extension_for(&mime)));

        let name = Path::new(&filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Self {
            data: Bytes::copy_from_slice(data),
            filename,
            mime,
            name,
        }
    }

    pub(crate) fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// Decode a JSON body, classifying malformed payloads as invalid responses
pub(crate) fn parse_json<T: DeserializeOwned>(provider: &str, response: &HttpResponse) -> Result<T> {
    response.json().map_err(|err| {
        UploadError::invalid_response(
            provider,
            format!("unexpected response body: {}", snippet(&response.text())),
        )
        .with_source(err)
    })
}

/// Last path segment of `url` without its extension
pub(crate) fn url_file_stem(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Path::new(segment)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// First 200 characters of a body, for error messages
pub(crate) fn snippet(text: &str) -> String {
    const MAX_CHARS: usize = 200;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= MAX_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_CHARS).collect();
        format!("{}...", cut)
    }
}

/// Error payload shape shared by the Chevereto-based hosts (ImgBB, Freeimage)
#[derive(Debug, Deserialize)]
pub(crate) struct CheveretoError {
    pub message: Option<String>,
}

// Hosts report numeric fields as either numbers or strings.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::png_bytes;

    #[test]
    fn test_upload_file_defaults() {
        let file = UploadFile::new(&png_bytes(), None, None);
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.filename, "image.png");
        assert_eq!(file.name, "image");
    }

    #[test]
    fn test_upload_file_keeps_explicit_values() {
        let file = UploadFile::new(&png_bytes(), Some("/tmp/holiday.jpeg"), Some("image/jpeg"));
        assert_eq!(file.mime, "image/jpeg");
        assert_eq!(file.filename, "holiday.jpeg");
        assert_eq!(file.name, "holiday");
    }

    #[test]
    fn test_upload_file_unknown_bytes() {
        let file = UploadFile::new(b"not an image", None, None);
        assert_eq!(file.mime, "application/octet-stream");
        assert_eq!(file.filename, "image.jpg");
    }

    #[test]
    fn test_base64() {
        let file = UploadFile::new(b"abc", Some("a.png"), Some("image/png"));
        assert_eq!(file.base64(), "YWJj");
    }

    #[test]
    fn test_url_file_stem() {
        assert_eq!(
            url_file_stem("https://files.catbox.moe/abc123.png"),
            Some("abc123".to_string())
        );
        assert_eq!(
            url_file_stem("https://i.imghippo.com/files/Hx8261Ao.png/"),
            Some("Hx8261Ao".to_string())
        );
        assert_eq!(url_file_stem("not a url"), None);
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("  "), "<empty body>");
        assert_eq!(snippet(" short "), "short");
        let long = "x".repeat(300);
        assert_eq!(snippet(&long).len(), 203);
    }

    #[test]
    fn test_parse_json_invalid_body() {
        #[derive(Debug, Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            success: bool,
        }

        let response = HttpResponse::new(200, "<html>oops</html>");
        let err = parse_json::<Shape>("ImgBB", &response).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::InvalidResponse);
        assert!(err.message().contains("<html>oops</html>"));
    }

    #[test]
    fn test_lenient_numbers() {
        #[derive(Deserialize)]
        struct Dims {
            #[serde(default, deserialize_with = "lenient_u32")]
            width: Option<u32>,
            #[serde(default, deserialize_with = "lenient_u64")]
            size: Option<u64>,
        }

        let dims: Dims = serde_json::from_str(r#"{"width": "640", "size": 42}"#).unwrap();
        assert_eq!(dims.width, Some(640));
        assert_eq!(dims.size, Some(42));

        let dims: Dims = serde_json::from_str(r#"{"width": null}"#).unwrap();
        assert_eq!(dims.width, None);
        assert_eq!(dims.size, None);
    }
}
