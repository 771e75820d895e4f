// ABOUTME: ImgBB adapter: API-key authenticated uploads of base64 payloads
// ABOUTME: Parses the JSON envelope into a normalized result with viewer and delete links

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;

use super::{CheveretoError, ImageProvider, UploadFile, lenient_u32, lenient_u64, parse_json};
use crate::config::ProviderConfig;
use crate::constants::{limits, urls};
use crate::error::UploadError;
use crate::mime::COMMON_IMAGE_TYPES;
use crate::transport::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "imgbb",
    display_name: "ImgBB",
    requires_config: true,
    max_file_size: limits::IMGBB_MAX_SIZE,
    supported_types: COMMON_IMAGE_TYPES,
};

#[derive(Debug, Deserialize)]
struct ImgbbResponse {
    #[serde(default)]
    success: bool,
    data: Option<ImgbbImage>,
    error: Option<CheveretoError>,
}

#[derive(Debug, Deserialize)]
struct ImgbbImage {
    id: String,
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

pub struct ImgbbProvider {
    api_key: SecretString,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl ImgbbProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            api_key: config.require("api_key", DESCRIPTOR.display_name)?,
            endpoint: urls::IMGBB_API.to_string(),
            transport,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, file: &UploadFile) -> HttpRequest {
        HttpRequest::post(self.endpoint.as_str()).body(RequestBody::Multipart(vec![
            FormPart::text("key", self.api_key.expose_secret()),
            FormPart::text("image", file.base64()),
            FormPart::text("name", file.name.as_str()),
        ]))
    }

    fn parse_response(&self, response: &HttpResponse, file: &UploadFile) -> Result<UploadResult> {
        let body: ImgbbResponse = parse_json(DESCRIPTOR.display_name, response)?;

        match body.data {
            Some(image) if body.success => Ok(UploadResult::new(image.id, image.url, &file.name)
                .with_viewer_url(image.url_viewer)
                .with_delete_url(image.delete_url)
                .with_size(image.size)
                .with_dimensions(image.width, image.height)),
            _ => {
                let message = body
                    .error
                    .and_then(|error| error.message)
                    .unwrap_or_else(|| "upload was not successful".to_string());
                Err(UploadError::api(DESCRIPTOR.display_name, message))
            }
        }
    }
}

#[async_trait]
impl ImageProvider for ImgbbProvider {
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
