// ABOUTME: Freeimage.host adapter: urlencoded base64 uploads authenticated by API key
// ABOUTME: Success requires status_code 200 and an image object in the JSON reply

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;

use super::{CheveretoError, ImageProvider, UploadFile, lenient_u32, lenient_u64, parse_json};
use crate::config::ProviderConfig;
use crate::constants::{limits, urls};
use crate::error::UploadError;
use crate::mime::COMMON_IMAGE_TYPES;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "freeimage",
    display_name: "Freeimage",
    requires_config: true,
    max_file_size: limits::FREEIMAGE_MAX_SIZE,
    supported_types: COMMON_IMAGE_TYPES,
};

#[derive(Debug, Deserialize)]
struct FreeimageResponse {
    #[serde(default, deserialize_with = "lenient_u32")]
    status_code: Option<u32>,
    image: Option<FreeimageImage>,
    error: Option<CheveretoError>,
    status_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FreeimageImage {
    id_encoded: Option<String>,
    url: String,
    url_viewer: Option<String>,
    delete_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    height: Option<u32>,
}

pub struct FreeimageProvider {
    api_key: SecretString,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl FreeimageProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            api_key: config.require("api_key", DESCRIPTOR.display_name)?,
            endpoint: urls::FREEIMAGE_API.to_string(),
            transport,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, file: &UploadFile) -> HttpRequest {
        HttpRequest::post(self.endpoint.as_str()).body(RequestBody::Form(vec![
            ("key".to_string(), self.api_key.expose_secret().to_string()),
            ("action".to_string(), "upload".to_string()),
            ("source".to_string(), file.base64()),
            ("format".to_string(), "json".to_string()),
        ]))
    }

    fn parse_response(&self, response: &HttpResponse, file: &UploadFile) -> Result<UploadResult> {
        let body: FreeimageResponse = parse_json(DESCRIPTOR.display_name, response)?;

        match body.image {
            Some(image) if body.status_code == Some(200) => {
                let id = image
                    .id_encoded
                    .or_else(|| super::url_file_stem(&image.url))
                    .unwrap_or_else(|| image.url.clone());
                Ok(UploadResult::new(id, image.url, &file.name)
                    .with_viewer_url(image.url_viewer)
                    .with_delete_url(image.delete_url)
                    .with_size(image.size)
                    .with_dimensions(image.width, image.height))
            }
            _ => {
                let message = body
                    .error
                    .and_then(|error| error.message)
                    .or(body.status_txt)
                    .unwrap_or_else(|| "upload was not successful".to_string());
                Err(UploadError::api(DESCRIPTOR.display_name, message))
            }
        }
    }
}

#[async_trait]
impl ImageProvider for FreeimageProvider {
    fn descriptor(&self) -> &'static ProviderDescriptor {
        &DESCRIPTOR
    }

    async fn upload(
        &self,
        data: &[u8],
        filename: Option<&str>,
        mime: Option<&str>,
    ) -> Result<UploadResult> {
        let file = UploadFile::new(data, filename, mime);
        let response = self.transport.send(&self.build_request(&file)).await?;
        self.parse_response(&response, &file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::test_helpers::{StubTransport, mock_freeimage_success, png_bytes};
    use serde_json::json;

    fn provider(stub: &StubTransport) -> FreeimageProvider {
        let config = ProviderConfig::new().with("apiKey", "freeimage-key");
        FreeimageProvider::new(&config, Arc::new(stub.clone())).unwrap()
    }

    #[test]
    fn test_missing_api_key_fails_at_construction() {
        let config = ProviderConfig::new().with("api_key", "   ");
        let err = FreeimageProvider::new(&config, Arc::new(StubTransport::new()))
            .err()
            .unwrap();
        assert_eq!(err.category(), ErrorCategory::ConfigError);
        assert_eq!(err.message(), "Freeimage requires 'api_key' to be configured");
    }

    #[tokio::test]
    async fn test_upload_success() {
        let stub = StubTransport::new();
        stub.push_json(mock_freeimage_success());

        let result = provider(&stub)
            .upload(&png_bytes(), Some("pic.png"), None)
            .await
            .unwrap();

        assert_eq!(result.id(), "Xz1A3f");
        assert_eq!(result.url(), "https://iili.io/Xz1A3f.png");
        assert_eq!(result.viewer_url(), Some("https://freeimage.host/i/Xz1A3f"));
        assert_eq!(
            result.delete_url(),
            Some("https://freeimage.host/Xz1A3f/delete/abcdef")
        );
        assert_eq!(result.size(), Some(42));
    }

    #[tokio::test]
    async fn test_request_is_urlencoded() {
        let stub = StubTransport::new();
        stub.push_json(mock_freeimage_success());

        provider(&stub)
            .upload(b"abc", Some("pic.png"), Some("image/png"))
            .await
            .unwrap();

        let request = stub.last_request();
        assert!(matches!(request.body, RequestBody::Form(_)));
        assert_eq!(request.field("key"), Some("freeimage-key"));
        assert_eq!(request.field("action"), Some("upload"));
        assert_eq!(request.field("source"), Some("YWJj"));
        assert_eq!(request.field("format"), Some("json"));
    }

    #[tokio::test]
    async fn test_error_payload_is_api_error() {
        let stub = StubTransport::new();
        stub.push_json(json!({
            "status_code": 400,
            "error": { "message": "Invalid API key", "code": 100 },
            "status_txt": "Bad Request"
        }));

        let err = provider(&stub).upload(&png_bytes(), None, None).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::ApiError);
        assert_eq!(err.message(), "Freeimage: Invalid API key");
    }

    #[tokio::test]
    async fn test_image_without_200_status_is_rejected() {
        let mut payload = mock_freeimage_success();
        payload["status_code"] = json!(500);
        payload["status_txt"] = json!("Internal Server Error");

        let stub = StubTransport::new();
        stub.push_json(payload);

        let err = provider(&stub).upload(&png_bytes(), None, None).await.unwrap_err();
        assert_eq!(err.message(), "Freeimage: Internal Server Error");
    }
}
