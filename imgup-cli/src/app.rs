// ABOUTME: Command execution for the imgup CLI: provider listing and single-file uploads
// ABOUTME: Returns anyhow errors so main can downcast SDK failures for hints and exit codes

use anyhow::{Result, anyhow};
use imgup_sdk::{UploadOptions, registry};

use crate::cli::Cli;
use crate::cli_output::CliOutput;
use crate::config::Config;
use crate::output::{JsonFormatter, OutputFormat, TextFormatter};

pub fn formatter(cli: &Cli, use_color: bool) -> Box<dyn OutputFormat> {
    if cli.json {
        Box::new(JsonFormatter::new(true))
    } else {
        Box::new(TextFormatter::new(use_color))
    }
}

/// Print the provider table; needs no configuration
pub fn list(cli: &Cli, use_color: bool) -> Result<()> {
    let formatter = formatter(cli, use_color);
    println!("{}", formatter.format_providers(&registry::describe())?);
    Ok(())
}

/// Dispatch the parsed command, loading configuration only when an upload needs it
pub async fn execute<F>(cli: &Cli, load_config: F, use_color: bool) -> Result<()>
where
    F: FnOnce() -> Result<Config>,
{
    if cli.list {
        return list(cli, use_color);
    }
    run(cli, &load_config()?, use_color).await
}

/// Run the parsed command against `config`, printing results to stdout
pub async fn run(cli: &Cli, config: &Config, use_color: bool) -> Result<()> {
    if cli.list {
        return list(cli, use_color);
    }

    let formatter = formatter(cli, use_color);

    let path = cli
        .path
        .as_ref()
        .ok_or_else(|| anyhow!("missing image path. Usage: imgup <PATH> [--provider <NAME>]"))?;

    let uploader = config.uploader()?;
    let options = UploadOptions {
        provider: cli.provider.clone(),
        name: cli.name.clone(),
    };
    let provider = uploader.resolve_provider(options.provider.as_deref())?;
    log::info!("Uploading {} to {}", path.display(), provider);

    let result = uploader.upload(path, &options).await?;

    if !cli.json {
        CliOutput::new(use_color).success(&format!(
            "Uploaded to {}",
            provider.descriptor().display_name
        ));
    }
    println!("{}", formatter.format_result(&result)?);
    Ok(())
}
