// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Renders status lines and upload errors with their category prefix and help hint

use imgup_sdk::UploadError;
use owo_colors::OwoColorize;

/// Shown for failures that retrying cannot fix
pub const FATAL_HINT: &str = "check your configuration";

/// Status and error lines, written to stderr so stdout stays pipeable
pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }

    pub fn success(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "success:".green().bold(), message);
        } else {
            eprintln!("success: {}", message);
        }
    }

    pub fn hint(&self, message: &str) {
        eprintln!("{}", self.hint_line(message));
    }

    pub fn upload_error(&self, error: &UploadError) {
        for line in self.upload_error_lines(error) {
            eprintln!("{}", line);
        }
    }

    fn error_line(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {}", message)
        }
    }

    fn hint_line(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "hint:".blue().bold(), message.dimmed())
        } else {
            format!("hint: {}", message)
        }
    }

    /// Category-prefixed message, then a hint; fatal errors always point at
    /// the configuration
    pub fn upload_error_lines(&self, error: &UploadError) -> Vec<String> {
        let mut lines = vec![self.error_line(&error.to_user_message())];

        if error.is_fatal() {
            lines.push(self.hint_line(FATAL_HINT));
        } else if let Some(help) = error.help_text() {
            lines.push(self.hint_line(help));
        }

        lines
    }
}
