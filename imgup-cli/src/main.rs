// ABOUTME: Main entry point for the imgup command-line tool
// ABOUTME: Parses arguments, loads configuration and maps failures to exit codes

use clap::Parser;
use imgup_cli::app;
use imgup_cli::cli::Cli;
use imgup_cli::cli_output::CliOutput;
use imgup_cli::config::Config;
use imgup_cli::constants::exit_codes;
use imgup_sdk::UploadError;
use std::io::IsTerminal;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too
            let _ = err.print();
            let code = if err.use_stderr() {
                exit_codes::FAILURE
            } else {
                exit_codes::SUCCESS
            };
            std::process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let use_color = cli.use_color(std::io::stdout().is_terminal());
    let output = CliOutput::new(use_color);

    let outcome = app::execute(&cli, Config::from_env, use_color).await;

    if let Err(err) = outcome {
        match err.downcast_ref::<UploadError>() {
            Some(upload_error) => output.upload_error(upload_error),
            None => output.error(&format!("{:#}", err)),
        }
        std::process::exit(exit_codes::FAILURE);
    }
}
