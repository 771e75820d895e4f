// ABOUTME: Builder pattern implementation for Uploader configuration
// ABOUTME: Collects per-provider credentials plus transport timeout and retry settings

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::config::ProviderConfig;
use crate::constants::{retry, timeouts};
use crate::error::UploadError;
use crate::pipeline::Uploader;
use crate::registry::{DEFAULT_PROVIDER, ProviderKind};
use crate::retry::RetryConfig;
use crate::transport::{HttpTransport, ReqwestTransport, RetryingTransport};

#[derive(TypedBuilder)]
#[builder(build_method(into = Result<Uploader, UploadError>))]
pub struct UploaderConfig {
    /// Credentials keyed by provider; providers without an entry get an empty config
    #[builder(default)]
    pub providers: HashMap<ProviderKind, ProviderConfig>,

    /// Provider used when an upload does not name one
    #[builder(default = None)]
    pub default_provider: Option<String>,

    #[builder(default = timeouts::HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = retry::MAX_RETRIES)]
    pub max_retries: u32,

    #[builder(default = retry::RETRY_DELAY)]
    pub retry_delay: Duration,

    /// Replaces the reqwest backend, e.g. with a stub in tests
    #[builder(default = None)]
    pub transport: Option<Arc<dyn HttpTransport>>,
}

impl From<UploaderConfig> for Result<Uploader, UploadError> {
    fn from(config: UploaderConfig) -> Self {
        Uploader::from_config(config)
    }
}

impl Uploader {
    pub fn builder() -> UploaderConfigBuilder<((), (), (), (), (), ())> {
        UploaderConfig::builder()
    }

    pub(crate) fn from_config(config: UploaderConfig) -> Result<Self, UploadError> {
        let default_provider = match config.default_provider.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse()?,
            _ => DEFAULT_PROVIDER,
        };

        let inner: Arc<dyn HttpTransport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        let transport = RetryingTransport::new(inner)
            .with_timeout(config.timeout)
            .with_retry(RetryConfig {
                max_retries: config.max_retries,
                delay: config.retry_delay,
            });

        log::debug!(
            "Uploader ready: default provider {}, timeout {}ms, {} retries",
            default_provider,
            config.timeout.as_millis(),
            config.max_retries
        );

        Ok(Uploader::new(
            config.providers,
            default_provider,
            Arc::new(transport),
        ))
    }
}
