// ABOUTME: ImgHippo adapter: multipart file uploads authenticated by API key
// ABOUTME: The image id is taken from the last path segment of the returned URL

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;

use super::{ImageProvider, UploadFile, lenient_u64, parse_json, url_file_stem};
use crate::config::ProviderConfig;
use crate::constants::{limits, urls};
use crate::error::UploadError;
use crate::mime::COMMON_IMAGE_TYPES;
use crate::transport::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "imghippo",
    display_name: "ImgHippo",
    requires_config: true,
    max_file_size: limits::IMGHIPPO_MAX_SIZE,
    supported_types: COMMON_IMAGE_TYPES,
};

#[derive(Debug, Deserialize)]
struct ImghippoResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<ImghippoImage>,
}

#[derive(Debug, Deserialize)]
struct ImghippoImage {
    url: String,
    view_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: Option<u64>,
}

pub struct ImghippoProvider {
    api_key: SecretString,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl ImghippoProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            api_key: config.require("api_key", DESCRIPTOR.display_name)?,
            endpoint: urls::IMGHIPPO_API.to_string(),
            transport,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, file: &UploadFile) -> HttpRequest {
        HttpRequest::post(self.endpoint.as_str()).body(RequestBody::Multipart(vec![
            FormPart::text("api_key", self.api_key.expose_secret()),
            FormPart::text("title", file.name.as_str()),
            FormPart::file(
                "file",
                file.filename.as_str(),
                file.mime.as_str(),
                file.data.clone(),
            ),
        ]))
    }

    fn parse_response(&self, response: &HttpResponse, file: &UploadFile) -> Result<UploadResult> {
        let body: ImghippoResponse = parse_json(DESCRIPTOR.display_name, response)?;

        match body.data {
            Some(image) if body.success => {
                let id = url_file_stem(&image.url).ok_or_else(|| {
                    UploadError::invalid_response(
                        DESCRIPTOR.display_name,
                        format!("cannot derive an image id from '{}'", image.url),
                    )
                })?;
                Ok(UploadResult::new(id, image.url, &file.name)
                    .with_viewer_url(image.view_url)
                    .with_size(image.size.or(Some(file.data.len() as u64))))
            }
            _ => {
                let message = body
                    .message
                    .unwrap_or_else(|| "upload was not successful".to_string());
                Err(UploadError::api(DESCRIPTOR.display_name, message))
            }
        }
    }
}

#[async_trait]
impl ImageProvider for ImghippoProvider {
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
    use crate::test_helpers::{StubTransport, mock_imghippo_success, png_bytes};
    use serde_json::json;

    fn provider(stub: &StubTransport) -> ImghippoProvider {
        let config = ProviderConfig::new().with("api_key", "hippo-key");
        ImghippoProvider::new(&config, Arc::new(stub.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_upload_success() {
        let stub = StubTransport::new();
        stub.push_json(mock_imghippo_success());

        let result = provider(&stub)
            .upload(&png_bytes(), Some("pic.png"), None)
            .await
            .unwrap();

        assert_eq!(result.id(), "Hx8261Ao");
        assert_eq!(result.url(), "https://i.imghippo.com/files/Hx8261Ao.png");
        assert_eq!(result.viewer_url(), Some("https://imghippo.com/i/Hx8261Ao.png"));
        assert_eq!(result.delete_url(), None);
        assert_eq!(result.size(), Some(42));
    }

    #[tokio::test]
    async fn test_request_sends_file_part() {
        let stub = StubTransport::new();
        stub.push_json(mock_imghippo_success());

        provider(&stub)
            .upload(&png_bytes(), Some("holiday.png"), None)
            .await
            .unwrap();

        let request = stub.last_request();
        assert_eq!(request.field("api_key"), Some("hippo-key"));
        assert_eq!(request.field("title"), Some("holiday"));
        match &request.body {
            RequestBody::Multipart(parts) => assert!(parts.iter().any(|part| matches!(
                part,
                FormPart::File { name, filename, .. } if name == "file" && filename == "holiday.png"
            ))),
            _ => panic!("Expected multipart body"),
        }
    }

    #[tokio::test]
    async fn test_failure_uses_message() {
        let stub = StubTransport::new();
        stub.push_json(json!({ "success": false, "status": 401, "message": "Invalid API key" }));

        let err = provider(&stub).upload(&png_bytes(), None, None).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::ApiError);
        assert_eq!(err.message(), "ImgHippo: Invalid API key");
    }

    #[tokio::test]
    async fn test_missing_size_falls_back_to_payload_length() {
        let stub = StubTransport::new();
        stub.push_json(json!({
            "success": true,
            "data": { "url": "https://i.imghippo.com/files/Ab12.png" }
        }));

        let result = provider(&stub).upload(&png_bytes(), None, None).await.unwrap();
        assert_eq!(result.id(), "Ab12");
        assert_eq!(result.size(), Some(10));
    }
}
