// ABOUTME: Error taxonomy for the imgup SDK with fatal/non-fatal classification
// ABOUTME: Provides category constructors, user-facing messages and retry hints

use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of failure categories surfaced by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    FileSizeOverflow,
    FileTypeRestrict,
    FileNotFound,
    AuthFailure,
    NetworkError,
    ApiError,
    InvalidResponse,
    ConfigError,
}

impl ErrorCategory {
    /// Stable identifier, e.g. `FILE_SIZE_OVERFLOW`
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::FileSizeOverflow => "FILE_SIZE_OVERFLOW",
            ErrorCategory::FileTypeRestrict => "FILE_TYPE_RESTRICT",
            ErrorCategory::FileNotFound => "FILE_NOT_FOUND",
            ErrorCategory::AuthFailure => "AUTH_FAILURE",
            ErrorCategory::NetworkError => "NETWORK_ERROR",
            ErrorCategory::ApiError => "API_ERROR",
            ErrorCategory::InvalidResponse => "INVALID_RESPONSE",
            ErrorCategory::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Configuration and authentication failures cannot be fixed by retrying
    pub fn is_fatal_by_default(self) -> bool {
        matches!(self, ErrorCategory::ConfigError | ErrorCategory::AuthFailure)
    }

    fn prefix(self) -> &'static str {
        match self {
            ErrorCategory::FileSizeOverflow => "File too large",
            ErrorCategory::FileTypeRestrict => "Unsupported file type",
            ErrorCategory::FileNotFound => "File not found",
            ErrorCategory::AuthFailure => "Authentication failed",
            ErrorCategory::NetworkError => "Network error",
            ErrorCategory::ApiError => "API error",
            ErrorCategory::InvalidResponse => "Invalid response",
            ErrorCategory::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct UploadError {
    category: ErrorCategory,
    message: String,
    fatal: bool,
    retryable: bool,
    #[source]
    source: Option<BoxError>,
}

impl UploadError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            fatal: category.is_fatal_by_default(),
            retryable: false,
            source: None,
        }
    }

    pub fn file_size(actual: u64, max: u64, provider: &str) -> Self {
        Self::new(
            ErrorCategory::FileSizeOverflow,
            format!(
                "{} exceeds the {} limit of {}",
                crate::types::format_size(actual),
                provider,
                crate::types::format_size(max)
            ),
        )
    }

    pub fn file_type(mime: Option<&str>, supported: &[&str], provider: &str) -> Self {
        Self::new(
            ErrorCategory::FileTypeRestrict,
            format!(
                "{} is not accepted by {} (supported: {})",
                mime.filter(|m| !m.is_empty()).unwrap_or("unknown"),
                provider,
                supported.join(", ")
            ),
        )
    }

    pub fn file_not_found(path: impl fmt::Display) -> Self {
        Self::new(ErrorCategory::FileNotFound, path.to_string())
    }

    pub fn auth(provider: &str, detail: Option<&str>) -> Self {
        let message = match detail {
            Some(detail) => format!("{}: {}", provider, detail),
            None => format!("{} rejected the supplied credentials", provider),
        };
        Self::new(ErrorCategory::AuthFailure, message)
    }

    pub fn config(provider: &str, missing: &str) -> Self {
        Self::new(
            ErrorCategory::ConfigError,
            format!("{} requires '{}' to be configured", provider, missing),
        )
    }

    pub fn unknown_provider(name: &str, valid: &[&str]) -> Self {
        Self::new(
            ErrorCategory::ConfigError,
            format!(
                "unknown provider '{}'. Valid providers: {}",
                name,
                valid.join(", ")
            ),
        )
    }

    /// Transient transport fault; eligible for retry
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            retryable: true,
            ..Self::new(ErrorCategory::NetworkError, message)
        }
    }

    /// Non-2xx HTTP status; only server errors are eligible for retry
    pub fn http_status(status: u16, status_line: impl Into<String>) -> Self {
        Self {
            retryable: status >= 500,
            ..Self::new(ErrorCategory::NetworkError, status_line)
        }
    }

    pub fn api(provider: &str, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::ApiError,
            format!("{}: {}", provider, message),
        )
    }

    pub fn invalid_response(provider: &str, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::InvalidResponse,
            format!("{}: {}", provider, message),
        )
    }

    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable && !self.fatal
    }

    /// One-line, category-prefixed rendering for end users
    pub fn to_user_message(&self) -> String {
        format!("{}: {}", self.category.prefix(), self.message)
    }

    pub fn help_text(&self) -> Option<&'static str> {
        if self.fatal {
            return Some("Check your configuration and credentials, then try again");
        }
        match self.category {
            ErrorCategory::FileSizeOverflow => {
                Some("Compress the image or pick a provider with a larger size limit")
            }
            ErrorCategory::FileTypeRestrict => {
                Some("Convert the image to a supported format or pick another provider")
            }
            ErrorCategory::FileNotFound => Some("Check the path and try again"),
            ErrorCategory::AuthFailure => Some("Refresh your session cookie and try again"),
            ErrorCategory::NetworkError => Some("Check your internet connection and try again"),
            ErrorCategory::ApiError | ErrorCategory::InvalidResponse => {
                Some("Try again later or pick another provider")
            }
            ErrorCategory::ConfigError => None,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else if err.is_builder() {
            "could not build request".to_string()
        } else {
            err.to_string()
        };
        let retryable = !err.is_builder();
        Self {
            retryable,
            ..Self::network(message)
        }
        .with_source(err)
    }
}

// Local filesystem failures only; socket errors arrive through reqwest
impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        Self::file_not_found(&err).with_source(err)
    }
}
