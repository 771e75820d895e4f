// ABOUTME: Open key/value credential bag handed to provider constructors
// ABOUTME: Keys are normalized and values held as secrets so they never leak via Debug

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::UploadError;
use crate::Result;

/// Resolved settings for a single provider (`api_key`, `client_id`,
/// `user_hash`, `cookies`, ...). `apiKey`, `api_key` and `API-KEY` all
/// address the same entry.
#[derive(Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, String>")]
pub struct ProviderConfig {
    values: HashMap<String, SecretString>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value: String = value.into();
        self.values
            .insert(normalize_key(key), SecretString::new(value.into_boxed_str()));
    }

    /// Value for `key`, treating blank values as absent
    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.values
            .get(&normalize_key(key))
            .filter(|value| !value.expose_secret().trim().is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value for `key`, or a fatal configuration error naming `provider`
    pub fn require(&self, key: &str, provider: &str) -> Result<SecretString> {
        self.get(key)
            .cloned()
            .ok_or_else(|| UploadError::config(provider, key))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Combine two configs; entries in `other` win
    pub fn merge(mut self, other: ProviderConfig) -> ProviderConfig {
        self.values.extend(other.values);
        self
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("ProviderConfig").field("keys", &keys).finish()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ProviderConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = ProviderConfig::new();
        for (key, value) in iter {
            config.insert(key.as_ref(), value);
        }
        config
    }
}

impl From<HashMap<String, String>> for ProviderConfig {
    fn from(values: HashMap<String, String>) -> Self {
        values.into_iter().collect()
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
