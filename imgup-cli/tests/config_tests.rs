// ABOUTME: Tests for configuration file loading, validation, merging and env overrides
// ABOUTME: Tests TOML parsing, XDG path resolution, and hierarchical config merging

use imgup_cli::config::Config;
use imgup_sdk::{ErrorCategory, ProviderKind, UploadError};
use secrecy::ExposeSecret;
use serial_test::serial;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_deserialize_complete() {
    let toml_content = r#"
        provider = "imgbb"
        timeout_ms = 10000
        max_retries = 4

        [providers.imgbb]
        api_key = "imgbb-key"

        [providers.weibo]
        cookies = "SUB=abc; SUBP=def"

        [providers.catbox]
        user_hash = "hash"
    "#;

    let config: Config = toml::from_str(toml_content).expect("Should parse valid TOML");

    assert_eq!(config.provider, Some("imgbb".to_string()));
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.max_retries, Some(4));
    assert_eq!(
        config.providers["imgbb"]
            .get("api_key")
            .unwrap()
            .expose_secret(),
        "imgbb-key"
    );
    assert!(config.providers["weibo"].contains("cookies"));
    assert!(config.providers["catbox"].contains("userHash"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_deserialize_empty() {
    let config: Config = toml::from_str("").expect("Should parse empty TOML");
    assert!(config.provider.is_none());
    assert!(config.timeout_ms.is_none());
    assert!(config.providers.is_empty());
}

#[test]
fn test_secrets_do_not_leak_through_debug() {
    let config: Config = toml::from_str(
        r#"
        [providers.imgur]
        client_id = "super-secret-client"
    "#,
    )
    .unwrap();

    let debug = format!("{:?}", config);
    assert!(debug.contains("clientid"));
    assert!(!debug.contains("super-secret-client"));
}

#[test]
fn test_config_load_hierarchy() {
    let temp_dir = TempDir::new().expect("Should create temp dir");
    let config_dir = temp_dir.path().join(".config").join("imgup");
    std::fs::create_dir_all(&config_dir).expect("Should create config dir");

    let user_config_path = config_dir.join("config.toml");
    std::fs::write(
        &user_config_path,
        r#"
        provider = "imgur"
        max_retries = 1

        [providers.imgur]
        client_id = "user-client"

        [providers.imgbb]
        api_key = "user-key"
    "#,
    )
    .expect("Should write user config");

    let project_config_path = temp_dir.path().join("imgup.toml");
    std::fs::write(
        &project_config_path,
        r#"
        provider = "imgbb"

        [providers.imgbb]
        api_key = "project-key"
    "#,
    )
    .expect("Should write project config");

    let config = Config::load_from_paths(&[&user_config_path, &project_config_path])
        .expect("Should load config hierarchy");

    // Project config overrides user config
    assert_eq!(config.provider, Some("imgbb".to_string()));
    assert_eq!(
        config.providers["imgbb"]
            .get("api_key")
            .unwrap()
            .expose_secret(),
        "project-key"
    );

    // User values survive when not overridden
    assert_eq!(config.max_retries, Some(1));
    assert!(config.providers["imgur"].contains("client_id"));
}

#[test]
fn test_missing_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let config = Config::load_from_paths(&[&missing]).expect("Missing files are not errors");
    assert!(config.provider.is_none());
}

#[test]
fn test_invalid_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("imgup.toml");
    std::fs::write(&path, "provider = \"imgbb\"\n[invalid\n").unwrap();

    let err = Config::load_from_paths(&[&path]).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse TOML config file"));
}

#[test]
fn test_unknown_provider_table_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("imgup.toml");
    std::fs::write(&path, "[providers.flickr]\napi_key = \"x\"\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("providers.flickr"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let config: Config = toml::from_str("timeout_ms = 0").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("IMGUP_PROVIDER", "freeimage"),
        ("FREEIMAGE_API_KEY", "env-key"),
        ("IMGHIPPO_API_KEY", "hippo"),
        ("CATBOX_USER_HASH", "hash"),
    ]
    .into_iter()
    .collect();

    let config = Config::default()
        .apply_env(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.provider, Some("freeimage".to_string()));
    let configs = config.provider_configs().unwrap();
    assert!(configs[&ProviderKind::Freeimage].contains("api_key"));
    assert!(configs[&ProviderKind::Imghippo].contains("api_key"));
    assert!(configs[&ProviderKind::Catbox].contains("user_hash"));
}

#[test]
fn test_env_provider_must_be_valid() {
    let err = Config::default()
        .apply_env(|key| (key == "IMGUP_PROVIDER").then(|| "postimg".to_string()))
        .unwrap_err();
    let upload = err
        .downcast_ref::<UploadError>()
        .expect("invalid provider names surface as SDK errors");
    assert_eq!(upload.category(), ErrorCategory::ConfigError);
    assert!(upload.is_fatal());
    assert!(upload.message().contains("unknown provider 'postimg'"));
}

#[test]
fn test_invalid_file_provider_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("imgup.toml");
    std::fs::write(&path, "provider = \"flickr\"\n").unwrap();

    let err = Config::load_from_paths(&[&path]).unwrap_err();
    let upload = err.downcast_ref::<UploadError>().unwrap();
    assert!(upload.is_fatal());
    assert!(upload.message().contains("Valid providers: catbox"));
}

#[test]
#[serial]
fn test_config_xdg_paths() {
    let temp_dir = TempDir::new().unwrap();
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    let paths = Config::get_config_paths();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let xdg = temp_dir.path().join("imgup").join("config.toml");
    assert!(paths.contains(&xdg));

    // Project config is applied last, so it has the highest precedence
    assert!(paths.last().unwrap().ends_with("imgup.toml"));
}
