// ABOUTME: Configuration file loading, validation, and hierarchical merging for imgup
// ABOUTME: Supports TOML config files with XDG Base Directory lookup and environment overrides

use anyhow::{Context, Result, anyhow};
use imgup_sdk::constants::{retry, timeouts};
use imgup_sdk::{ProviderConfig, ProviderKind, Uploader, registry};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{env, paths};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Provider used when `--provider` is not given
    #[serde(default)]
    pub provider: Option<String>,
    /// Per-attempt HTTP timeout
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Credentials per provider, e.g. `[providers.imgbb] api_key = "..."`
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths)
    }

    /// Load configuration from file paths; later paths override earlier ones.
    /// Missing files are skipped.
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            log::debug!("Loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut locations = Vec::new();

        if let Some(home_dir) = dirs::home_dir() {
            locations.push(
                home_dir
                    .join(".config")
                    .join(paths::CONFIG_DIR)
                    .join(paths::CONFIG_FILE),
            );
        }

        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            locations.push(
                PathBuf::from(config_home)
                    .join(paths::CONFIG_DIR)
                    .join(paths::CONFIG_FILE),
            );
        }

        // Project config wins over user-level files
        if let Ok(current_dir) = std::env::current_dir() {
            locations.push(current_dir.join(paths::PROJECT_CONFIG_FILE));
        }

        locations.dedup();
        locations
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        let mut providers = self.providers;
        for (name, settings) in other.providers {
            let name = name.trim().to_lowercase();
            let merged = match providers.remove(&name) {
                Some(existing) => existing.merge(settings),
                None => settings,
            };
            providers.insert(name, merged);
        }

        Config {
            provider: other.provider.or(self.provider),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
            max_retries: other.max_retries.or(self.max_retries),
            providers,
        }
    }

    /// Apply environment overrides on top of the file configuration
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(provider) = read(env::PROVIDER) {
            self.provider = Some(provider);
        }

        if let Some(timeout) = read(env::TIMEOUT) {
            let timeout_ms = timeout.trim().parse::<u64>().with_context(|| {
                format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    env::TIMEOUT,
                    timeout
                )
            })?;
            self.timeout_ms = Some(timeout_ms);
        }

        for (variable, provider, key) in env::PROVIDER_SECRETS {
            if let Some(value) = read(variable) {
                log::debug!("Using {} from the environment", variable);
                self.providers
                    .entry(provider.to_string())
                    .or_default()
                    .insert(key, value);
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Load files, then apply the process environment
    pub fn from_env() -> Result<Self> {
        Self::load()?.apply_env(|key| std::env::var(key).ok())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref provider) = self.provider {
            provider.parse::<ProviderKind>()?;
        }

        for name in self.providers.keys() {
            if !registry::is_valid(name) {
                return Err(anyhow!(
                    "Unknown provider table [providers.{}]. Must be one of: {}",
                    name,
                    registry::valid_names().join(", ")
                ));
            }
        }

        if self.timeout_ms == Some(0) {
            return Err(anyhow!("timeout_ms must be greater than zero"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(timeouts::HTTP_REQUEST_TIMEOUT)
    }

    /// Credentials keyed by provider kind
    pub fn provider_configs(&self) -> Result<HashMap<ProviderKind, ProviderConfig>> {
        let mut configs: HashMap<ProviderKind, ProviderConfig> = HashMap::new();
        for (name, settings) in &self.providers {
            let kind: ProviderKind = name.parse()?;
            let merged = match configs.remove(&kind) {
                Some(existing) => existing.merge(settings.clone()),
                None => settings.clone(),
            };
            configs.insert(kind, merged);
        }
        Ok(configs)
    }

    /// Build an uploader from this configuration
    pub fn uploader(&self) -> Result<Uploader> {
        let uploader = Uploader::builder()
            .providers(self.provider_configs()?)
            .default_provider(self.provider.clone())
            .timeout(self.timeout())
            .max_retries(self.max_retries.unwrap_or(retry::MAX_RETRIES))
            .build()?;
        Ok(uploader)
    }
}
