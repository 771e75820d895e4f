// ABOUTME: Imgur adapter: anonymous uploads authorized with an application Client-ID
// ABOUTME: Sends base64 payloads and derives viewer/delete links from the returned ids

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;

use super::{ImageProvider, UploadFile, lenient_u32, lenient_u64, parse_json};
use crate::config::ProviderConfig;
use crate::constants::{limits, urls};
use crate::error::UploadError;
use crate::mime::COMMON_IMAGE_TYPES;
use crate::transport::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "imgur",
    display_name: "Imgur",
    requires_config: true,
    max_file_size: limits::IMGUR_MAX_SIZE,
    supported_types: COMMON_IMAGE_TYPES,
};

#[derive(Debug, Deserialize)]
struct ImgurResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    status: Option<u16>,
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ImgurImage {
    id: String,
    link: String,
    deletehash: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    height: Option<u32>,
}

pub struct ImgurProvider {
    client_id: SecretString,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl ImgurProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            client_id: config.require("client_id", DESCRIPTOR.display_name)?,
            endpoint: urls::IMGUR_API.to_string(),
            transport,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, file: &UploadFile) -> HttpRequest {
        HttpRequest::post(self.endpoint.as_str())
            .header(
                "Authorization",
                format!("Client-ID {}", self.client_id.expose_secret()),
            )
            .body(RequestBody::Multipart(vec![
                FormPart::text("image", file.base64()),
                FormPart::text("type", "base64"),
                FormPart::text("name", file.filename.as_str()),
                FormPart::text("title", file.name.as_str()),
            ]))
    }

    fn parse_response(&self, response: &HttpResponse, file: &UploadFile) -> Result<UploadResult> {
        let body: ImgurResponse = parse_json(DESCRIPTOR.display_name, response)?;
        let status = body.status.unwrap_or(response.status);

        let data = match body.data {
            Some(data) if body.success => data,
            data => {
                // Failed uploads put a message (or an object with one) under data.error
                let detail = data
                    .as_ref()
                    .and_then(|d| d.get("error"))
                    .and_then(|e| e.as_str().or_else(|| e.get("message")?.as_str()))
                    .unwrap_or("upload was not successful");
                return Err(UploadError::api(
                    DESCRIPTOR.display_name,
                    format!("status {}: {}", status, detail),
                ));
            }
        };

        let image: ImgurImage = serde_json::from_value(data).map_err(|err| {
            UploadError::invalid_response(DESCRIPTOR.display_name, "image data is incomplete")
                .with_source(err)
        })?;

        let viewer_url = format!("{}/{}", urls::IMGUR_VIEWER_BASE, image.id);
        let delete_url = image
            .deletehash
            .map(|hash| format!("{}/delete/{}", urls::IMGUR_VIEWER_BASE, hash));

        Ok(UploadResult::new(image.id, image.link, &file.name)
            .with_viewer_url(Some(viewer_url))
            .with_delete_url(delete_url)
            .with_size(image.size)
            .with_dimensions(image.width, image.height))
    }
}

#[async_trait]
impl ImageProvider for ImgurProvider {
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
