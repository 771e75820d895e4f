// ABOUTME: End-to-end integration tests from config loading through argument parsing to upload
// ABOUTME: Only exercises paths that fail validation before any network request is made

use clap::Parser;
use imgup_cli::app;
use imgup_cli::cli::Cli;
use imgup_cli::cli_output::{CliOutput, FATAL_HINT};
use imgup_cli::config::Config;
use imgup_sdk::{ErrorCategory, UploadError, UploadOptions};
use std::io::Write;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> Config {
    let path = dir.path().join("imgup.toml");
    std::fs::write(&path, content).expect("Should write config file");
    Config::load_from_paths(&[&path]).expect("Should load config")
}

#[tokio::test]
async fn test_text_file_is_rejected_before_upload() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "provider = \"catbox\"\n");

    let file = dir.path().join("notes.png");
    std::fs::write(&file, "these are not image bytes").unwrap();

    let err = config
        .uploader()
        .unwrap()
        .upload(&file, &UploadOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::FileTypeRestrict);
    assert_eq!(
        err.to_user_message(),
        "Unsupported file type: unknown is not accepted by Catbox (supported: image/png, image/jpeg, image/gif, image/webp, image/bmp, image/x-icon)"
    );
}

#[tokio::test]
async fn test_oversized_file_is_rejected_before_upload() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
        provider = "imgur"

        [providers.imgur]
        client_id = "client"
    "#,
    );

    // 20 MiB limit; a sparse file keeps this cheap
    let file = dir.path().join("huge.png");
    let mut handle = std::fs::File::create(&file).unwrap();
    handle
        .write_all(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        .unwrap();
    handle.set_len(20 * 1024 * 1024 + 1).unwrap();
    drop(handle);

    let err = config
        .uploader()
        .unwrap()
        .upload(&file, &UploadOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::FileSizeOverflow);
    assert!(err.message().contains("Imgur"));
    assert!(err.message().contains("20.0 MB"));
}

#[tokio::test]
async fn test_cli_run_with_unconfigured_provider() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    let file = dir.path().join("cat.png");

    let cli = Cli::try_parse_from(["imgup", "--provider", "weibo", file.to_str().unwrap()]).unwrap();
    let err = app::run(&cli, &config, false).await.unwrap_err();

    let upload = err
        .downcast_ref::<UploadError>()
        .expect("SDK errors keep their type through anyhow");
    assert_eq!(upload.category(), ErrorCategory::ConfigError);

    let lines = CliOutput::new(false).upload_error_lines(upload);
    assert_eq!(lines[1], format!("hint: {}", FATAL_HINT));
}

#[tokio::test]
async fn test_cli_list_with_json() {
    let cli = Cli::try_parse_from(["imgup", "--list", "--json"]).unwrap();
    assert!(app::run(&cli, &Config::default(), false).await.is_ok());
}

#[tokio::test]
async fn test_cli_list_ignores_broken_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("imgup.toml");
    std::fs::write(&path, "provider = \"imgbb\"\n[invalid\n").unwrap();

    let cli = Cli::try_parse_from(["imgup", "--list"]).unwrap();
    let outcome = app::execute(&cli, || Config::load_from_paths(&[&path]), false).await;
    assert!(outcome.is_ok());

    // The same config still fails an upload
    let cli = Cli::try_parse_from(["imgup", "cat.png"]).unwrap();
    let err = app::execute(&cli, || Config::load_from_paths(&[&path]), false)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse TOML config file"));
}
