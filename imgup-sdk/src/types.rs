// ABOUTME: Shared domain types for uploads: normalized results and provider descriptors
// ABOUTME: Formatted link strings are derived once from the URL and display name

use serde::Serialize;

/// Pre-rendered embeddings of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedLinks {
    url: String,
    markdown: String,
    html: String,
    bbcode: String,
}

impl FormattedLinks {
    pub fn new(url: &str, name: &str) -> Self {
        Self {
            url: url.to_string(),
            markdown: format!("![{}]({})", name, url),
            html: format!("<img src=\"{}\" alt=\"{}\">", url, name),
            bbcode: format!("[IMG]{}[/IMG]", url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn bbcode(&self) -> &str {
        &self.bbcode
    }
}

/// Provider-agnostic result of a successful upload.
///
/// `url` and `formatted` can only be set together through [`UploadResult::new`],
/// so the rendered links always describe the stored URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    id: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    viewer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    formatted: FormattedLinks,
}

impl UploadResult {
    pub fn new(id: impl Into<String>, url: impl Into<String>, name: &str) -> Self {
        let url = url.into();
        let formatted = FormattedLinks::new(&url, name);
        Self {
            id: id.into(),
            url,
            viewer_url: None,
            delete_url: None,
            size: None,
            width: None,
            height: None,
            formatted,
        }
    }

    pub fn with_viewer_url(mut self, viewer_url: Option<String>) -> Self {
        self.viewer_url = viewer_url.filter(|u| !u.is_empty());
        self
    }

    pub fn with_delete_url(mut self, delete_url: Option<String>) -> Self {
        self.delete_url = delete_url.filter(|u| !u.is_empty());
        self
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Re-render the formatted links under a different display name
    pub fn renamed(mut self, name: &str) -> Self {
        self.formatted = FormattedLinks::new(&self.url, name);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn viewer_url(&self) -> Option<&str> {
        self.viewer_url.as_deref()
    }

    pub fn delete_url(&self) -> Option<&str> {
        self.delete_url.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn formatted(&self) -> &FormattedLinks {
        &self.formatted
    }
}

/// Static metadata for a provider, available without constructing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub requires_config: bool,
    pub max_file_size: u64,
    pub supported_types: &'static [&'static str],
}

impl ProviderDescriptor {
    pub fn supports(&self, mime: &str) -> bool {
        self.supported_types.contains(&mime)
    }
}

/// Human readable byte size, e.g. `20.0 MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
