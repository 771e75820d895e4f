// ABOUTME: This module handles output formatting for the imgup CLI
// ABOUTME: It provides text formatting with color support, JSON output and the provider table

use anyhow::Result;
use imgup_sdk::{ProviderDescriptor, UploadResult, format_size};
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub trait OutputFormat {
    fn format_result(&self, result: &UploadResult) -> Result<String>;
    fn format_providers(&self, providers: &[&ProviderDescriptor]) -> Result<String>;
}

pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn label(&self, label: &str) -> String {
        let padded = format!("{:<10}", format!("{}:", label));
        if self.use_color {
            padded.bold().to_string()
        } else {
            padded
        }
    }

    fn link(&self, url: &str) -> String {
        if self.use_color {
            url.cyan().underline().to_string()
        } else {
            url.to_string()
        }
    }

    fn requirement(&self, descriptor: &ProviderDescriptor) -> String {
        match (descriptor.requires_config, self.use_color) {
            (true, true) => "required".yellow().to_string(),
            (true, false) => "required".to_string(),
            (false, true) => "none".green().to_string(),
            (false, false) => "none".to_string(),
        }
    }
}

/// `image/png, image/jpeg` -> `png, jpeg`
fn short_types(types: &[&str]) -> String {
    types
        .iter()
        .map(|mime| mime.rsplit('/').next().unwrap_or(mime))
        .map(|subtype| subtype.trim_start_matches("x-"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Provider")]
    name: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Max Size")]
    max_size: String,
    #[tabled(rename = "Config")]
    config: String,
    #[tabled(rename = "Formats")]
    formats: String,
}

impl OutputFormat for TextFormatter {
    fn format_result(&self, result: &UploadResult) -> Result<String> {
        let links = result.formatted();
        let mut lines = vec![format!("{}{}", self.label("URL"), self.link(result.url()))];

        if let Some(viewer) = result.viewer_url() {
            lines.push(format!("{}{}", self.label("Viewer"), self.link(viewer)));
        }
        if let Some(delete) = result.delete_url() {
            lines.push(format!("{}{}", self.label("Delete"), self.link(delete)));
        }

        let mut details = Vec::new();
        if let Some(size) = result.size() {
            details.push(format_size(size));
        }
        if let (Some(width), Some(height)) = (result.width(), result.height()) {
            details.push(format!("{}x{}", width, height));
        }
        if !details.is_empty() {
            lines.push(format!("{}{}", self.label("Size"), details.join(", ")));
        }

        lines.push(String::new());
        lines.push(format!("{}{}", self.label("Markdown"), links.markdown()));
        lines.push(format!("{}{}", self.label("HTML"), links.html()));
        lines.push(format!("{}{}", self.label("BBCode"), links.bbcode()));

        Ok(lines.join("\n"))
    }

    fn format_providers(&self, providers: &[&ProviderDescriptor]) -> Result<String> {
        let rows: Vec<ProviderRow> = providers
            .iter()
            .map(|descriptor| ProviderRow {
                name: descriptor.name.to_string(),
                display_name: descriptor.display_name.to_string(),
                max_size: format_size(descriptor.max_file_size),
                config: self.requirement(descriptor),
                formats: short_types(descriptor.supported_types),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(table.to_string())
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormat for JsonFormatter {
    fn format_result(&self, result: &UploadResult) -> Result<String> {
        self.render(result)
    }

    fn format_providers(&self, providers: &[&ProviderDescriptor]) -> Result<String> {
        self.render(providers)
    }
}
