// ABOUTME: Registry mapping provider names to adapter constructors and descriptors
// ABOUTME: Name lookup is case-insensitive; unknown names are fatal configuration errors

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::UploadError;
use crate::providers::{
    self, CatboxProvider, FreeimageProvider, ImageProvider, ImgbbProvider, ImghippoProvider,
    ImgurProvider, WeiboProvider,
};
use crate::transport::HttpTransport;
use crate::types::ProviderDescriptor;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    Catbox,
    Imgbb,
    Imgur,
    Freeimage,
    Imghippo,
    Weibo,
}

/// Used when neither the caller nor the configuration names a provider
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::Catbox;

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Catbox,
        ProviderKind::Imgbb,
        ProviderKind::Imgur,
        ProviderKind::Freeimage,
        ProviderKind::Imghippo,
        ProviderKind::Weibo,
    ];

    pub fn descriptor(self) -> &'static ProviderDescriptor {
        match self {
            ProviderKind::Catbox => &providers::catbox::DESCRIPTOR,
            ProviderKind::Imgbb => &providers::imgbb::DESCRIPTOR,
            ProviderKind::Imgur => &providers::imgur::DESCRIPTOR,
            ProviderKind::Freeimage => &providers::freeimage::DESCRIPTOR,
            ProviderKind::Imghippo => &providers::imghippo::DESCRIPTOR,
            ProviderKind::Weibo => &providers::weibo::DESCRIPTOR,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Construct the adapter; fails when a required credential is missing
    pub fn create(
        self,
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Box<dyn ImageProvider>> {
        log::debug!("Creating {} provider with {:?}", self.name(), config);

        Ok(match self {
            ProviderKind::Catbox => Box::new(CatboxProvider::new(config, transport)?),
            ProviderKind::Imgbb => Box::new(ImgbbProvider::new(config, transport)?),
            ProviderKind::Imgur => Box::new(ImgurProvider::new(config, transport)?),
            ProviderKind::Freeimage => Box::new(FreeimageProvider::new(config, transport)?),
            ProviderKind::Imghippo => Box::new(ImghippoProvider::new(config, transport)?),
            ProviderKind::Weibo => Box::new(WeiboProvider::new(config, transport)?),
        })
    }
}

impl FromStr for ProviderKind {
    type Err = UploadError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UploadError::unknown_provider(wanted, &valid_names()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve `name` and construct its adapter
pub fn create(
    name: &str,
    config: &ProviderConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Box<dyn ImageProvider>> {
    name.parse::<ProviderKind>()?.create(config, transport)
}

pub fn is_valid(name: &str) -> bool {
    name.parse::<ProviderKind>().is_ok()
}

pub fn describe() -> Vec<&'static ProviderDescriptor> {
    ProviderKind::ALL.iter().map(|kind| kind.descriptor()).collect()
}

pub fn valid_names() -> Vec<&'static str> {
    ProviderKind::ALL.iter().map(|kind| kind.name()).collect()
}
