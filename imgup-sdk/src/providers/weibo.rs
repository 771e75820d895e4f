// ABOUTME: Weibo adapter: raw-body uploads authenticated by a logged-in session cookie
// ABOUTME: Extracts the picture id from the XML reply and builds a CDN URL on a random host

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::{ImageProvider, UploadFile, snippet};
use crate::config::ProviderConfig;
use crate::constants::{limits, urls};
use crate::error::UploadError;
use crate::mime::{IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::types::{ProviderDescriptor, UploadResult};
use crate::Result;

pub static DESCRIPTOR: ProviderDescriptor = ProviderDescriptor {
    name: "weibo",
    display_name: "Weibo",
    requires_config: true,
    max_file_size: limits::WEIBO_MAX_SIZE,
    supported_types: &[IMAGE_JPEG, IMAGE_PNG, IMAGE_GIF],
};

const REFERER: &str = "https://weibo.com/";

pub struct WeiboProvider {
    cookies: SecretString,
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl WeiboProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            cookies: config.require("cookies", DESCRIPTOR.display_name)?,
            endpoint: urls::WEIBO_API.to_string(),
            transport,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, file: &UploadFile) -> HttpRequest {
        HttpRequest::post(self.endpoint.as_str())
            .query("s", "xml")
            .query("ori", "1")
            .query("data", "1")
            .query("rotate", "0")
            .query("wm", "")
            .query("app", "miniblog")
            .query("mime", file.mime.as_str())
            .header("Cookie", self.cookies.expose_secret())
            .header("Referer", REFERER)
            .body(RequestBody::Bytes {
                data: file.data.clone(),
                content_type: file.mime.clone(),
            })
    }

    fn parse_response(&self, response: &HttpResponse, file: &UploadFile) -> Result<UploadResult> {
        let body = response.text();

        let Some(pid) = xml_tag(&body, "pid") else {
            // An expired session answers with a login page instead of XML
            if body.to_lowercase().contains("login") {
                return Err(UploadError::auth(
                    DESCRIPTOR.display_name,
                    Some("session cookie expired or invalid, log in again"),
                )
                .with_fatal(false));
            }
            return Err(UploadError::invalid_response(
                DESCRIPTOR.display_name,
                format!("no picture id in response: {}", snippet(&body)),
            ));
        };

        let host = urls::WEIBO_CDN_HOSTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(urls::WEIBO_CDN_HOSTS[0]);
        let url = format!("https://{}/large/{}{}", host, pid, extension_for(&file.mime));

        Ok(UploadResult::new(pid.as_str(), url, &file.name)
            .with_size(xml_tag(&body, "size").and_then(|s| s.parse().ok()))
            .with_dimensions(
                xml_tag(&body, "width").and_then(|w| w.parse().ok()),
                xml_tag(&body, "height").and_then(|h| h.parse().ok()),
            ))
    }
}

// The CDN re-encodes everything except animations as JPEG.
fn extension_for(mime: &str) -> &'static str {
    if mime == IMAGE_GIF { ".gif" } else { ".jpg" }
}

fn xml_tag(body: &str, tag: &str) -> Option<String> {
    let pattern = Regex::new(&format!("<{0}>([^<]+)</{0}>", regex::escape(tag))).ok()?;
    pattern
        .captures(body)
        .map(|captures| captures[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl ImageProvider for WeiboProvider {
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
