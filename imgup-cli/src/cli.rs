// ABOUTME: CLI argument definitions for the imgup command-line tool
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgup")]
#[command(about = "Upload an image to a public image host and print its links", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Image file to upload
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Image host to upload to (catbox, imgbb, imgur, freeimage, imghippo, weibo)
    #[arg(long, short)]
    pub provider: Option<String>,

    /// Display name used in the Markdown, HTML and BBCode links
    #[arg(long, short)]
    pub name: Option<String>,

    /// List available providers and exit
    #[arg(long, short, conflicts_with_all = ["provider", "name"])]
    pub list: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Whether output should be colored, honoring `--no-color`, `NO_COLOR`
    /// and dumb terminals
    pub fn use_color(&self, is_terminal: bool) -> bool {
        !self.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").unwrap_or_default() != "dumb"
            && is_terminal
    }
}
