// ABOUTME: Upload pipeline: resolve provider, read and validate the file, delegate to the adapter
// ABOUTME: Type and size checks run before any network traffic

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncReadExt;

use crate::config::ProviderConfig;
use crate::error::UploadError;
use crate::mime;
use crate::providers::ImageProvider;
use crate::registry::ProviderKind;
use crate::transport::HttpTransport;
use crate::types::UploadResult;
use crate::Result;

/// Per-upload choices; both fall back to configured defaults
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub provider: Option<String>,
    pub name: Option<String>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Entry point for uploads. Build one with [`Uploader::builder`].
pub struct Uploader {
    providers: HashMap<ProviderKind, ProviderConfig>,
    default_provider: ProviderKind,
    transport: Arc<dyn HttpTransport>,
}

impl Uploader {
    pub(crate) fn new(
        providers: HashMap<ProviderKind, ProviderConfig>,
        default_provider: ProviderKind,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            providers,
            default_provider,
            transport,
        }
    }

    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Explicit name if given and non-blank, otherwise the configured default
    pub fn resolve_provider(&self, requested: Option<&str>) -> Result<ProviderKind> {
        match requested.map(str::trim) {
            Some(name) if !name.is_empty() => name.parse(),
            _ => Ok(self.default_provider),
        }
    }

    /// Construct the adapter for `kind` with its configured credentials
    pub fn provider(&self, kind: ProviderKind) -> Result<Box<dyn ImageProvider>> {
        let empty = ProviderConfig::new();
        let config = self.providers.get(&kind).unwrap_or(&empty);
        kind.create(config, Arc::clone(&self.transport))
    }

    pub async fn upload(
        &self,
        path: impl AsRef<Path>,
        options: &UploadOptions,
    ) -> Result<UploadResult> {
        let path = path.as_ref();
        let provider = self.provider(self.resolve_provider(options.provider.as_deref())?)?;

        // Reject by header and metadata before buffering the whole file
        let size = file_size(path).await?;
        check_file(provider.as_ref(), &read_head(path).await?, size)?;

        let data = tokio::fs::read(path)
            .await
            .map_err(|err| unreadable(path, err))?;
        let filename = path.file_name().map(|name| name.to_string_lossy());

        self.upload_with(provider.as_ref(), &data, filename.as_deref(), options)
            .await
    }

    /// Same as [`Uploader::upload`] for bytes already in memory
    pub async fn upload_bytes(
        &self,
        data: &[u8],
        filename: Option<&str>,
        options: &UploadOptions,
    ) -> Result<UploadResult> {
        let provider = self.provider(self.resolve_provider(options.provider.as_deref())?)?;
        self.upload_with(provider.as_ref(), data, filename, options)
            .await
    }

    async fn upload_with(
        &self,
        provider: &dyn ImageProvider,
        data: &[u8],
        filename: Option<&str>,
        options: &UploadOptions,
    ) -> Result<UploadResult> {
        let size = data.len() as u64;
        let mime = check_file(provider, data, size)?;

        let name = display_name(options.name.as_deref(), filename);
        let upload_name = format!("{}{}", name, mime::extension_for(mime));

        log::debug!(
            "Uploading {} ({}, {} bytes) to {}",
            upload_name,
            mime,
            size,
            provider.display_name()
        );

        let result = provider.upload(data, Some(&upload_name), Some(mime)).await?;
        Ok(result.renamed(&name))
    }
}

/// Type check on the sniffed header, then size check against the provider cap
fn check_file(provider: &dyn ImageProvider, head: &[u8], size: u64) -> Result<&'static str> {
    let detected = mime::detect(head);
    let mime = match detected {
        Some(mime) if provider.supports(mime) => mime,
        _ => {
            return Err(UploadError::file_type(
                detected,
                provider.supported_types(),
                provider.display_name(),
            ));
        }
    };

    if size > provider.max_file_size() {
        return Err(UploadError::file_size(
            size,
            provider.max_file_size(),
            provider.display_name(),
        ));
    }

    Ok(mime)
}

fn unreadable(path: &Path, err: std::io::Error) -> UploadError {
    if err.kind() == std::io::ErrorKind::NotFound {
        UploadError::file_not_found(path.display()).with_source(err)
    } else {
        UploadError::file_not_found(format!("{}: {}", path.display(), err)).with_source(err)
    }
}

async fn file_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|err| unreadable(path, err))?;

    if !metadata.is_file() {
        return Err(UploadError::file_not_found(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    Ok(metadata.len())
}

async fn read_head(path: &Path) -> Result<Vec<u8>> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| unreadable(path, err))?;

    let mut head = Vec::with_capacity(mime::SNIFF_LEN);
    file.take(mime::SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .await
        .map_err(|err| unreadable(path, err))?;
    Ok(head)
}

fn display_name(requested: Option<&str>, filename: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            filename
                .and_then(|f| Path::new(f).file_stem())
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.is_empty())
        })
        .unwrap_or_else(|| "image".to_string())
}
