// ABOUTME: Catbox adapter: anonymous multipart uploads with an optional user hash
// ABOUTME: The API answers with the bare file URL as plain text

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::{ImageProvider, UploadFile, snippet, url_file_stem};
use crate::config::ProviderConfig;
use crate::constants::{limits, urls};
use crate::error::UploadError;
use crate::mime::{IMAGE_BMP, IMAGE_GIF, IMAGE_ICON, IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP};
use crate::transport::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "catbox",
    display_name: "Catbox",
    requires_config: false,
    max_file_size: limits::CATBOX_MAX_SIZE,
    supported_types: &[IMAGE_PNG, IMAGE_JPEG, IMAGE_GIF, IMAGE_WEBP, IMAGE_BMP, IMAGE_ICON],
};

pub struct CatboxProvider {
    user_hash: Option<SecretString>,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl CatboxProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            user_hash: config.get("user_hash").cloned(),
            endpoint: urls::CATBOX_API.to_string(),
            transport,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, file: &UploadFile) -> HttpRequest {
        let mut parts = vec![FormPart::text("reqtype", "fileupload")];
        if let Some(user_hash) = &self.user_hash {
            parts.push(FormPart::text("userhash", user_hash.expose_secret()));
        }
        parts.push(FormPart::file(
            "fileToUpload",
            file.filename.as_str(),
            file.mime.as_str(),
            file.data.clone(),
        ));

        HttpRequest::post(self.endpoint.as_str()).body(RequestBody::Multipart(parts))
    }

    fn parse_response(&self, response: &HttpResponse, file: &UploadFile) -> Result<UploadResult> {
        let body = response.text();
        let url = body.trim();

        if !url.starts_with("https://") {
            return Err(UploadError::api(DESCRIPTOR.display_name, snippet(url)));
        }

        let id = url_file_stem(url).unwrap_or_else(|| url.to_string());
        Ok(UploadResult::new(id, url, &file.name).with_size(Some(file.data.len() as u64)))
    }
}

#[async_trait]
impl ImageProvider for CatboxProvider {
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
