// ABOUTME: imgup SDK for uploading images to public image hosts
// ABOUTME: Provides MIME sniffing, provider adapters, a retrying transport and the upload pipeline

pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod mime;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod retry;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub type Result<T> = std::result::Result<T, UploadError>;

pub use builder::UploaderConfig;
pub use config::ProviderConfig;
pub use error::{ErrorCategory, UploadError};
pub use pipeline::{UploadOptions, Uploader};
pub use providers::ImageProvider;
pub use registry::{DEFAULT_PROVIDER, ProviderKind};
pub use retry::RetryConfig;
pub use transport::{
    FormPart, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody,
    RetryingTransport,
};
pub use types::{FormattedLinks, ProviderDescriptor, UploadResult, format_size};
