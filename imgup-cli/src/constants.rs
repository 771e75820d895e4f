// ABOUTME: Centralized constants for the imgup command-line tool
// ABOUTME: Contains config file locations, environment variable names and exit codes

/// Configuration file names and directories
pub mod paths {
    /// Project-local config file, looked up in the working directory
    pub const PROJECT_CONFIG_FILE: &str = "imgup.toml";

    /// Directory under the XDG config home
    pub const CONFIG_DIR: &str = "imgup";

    pub const CONFIG_FILE: &str = "config.toml";
}

/// Environment variables that override the config file
pub mod env {
    pub const PROVIDER: &str = "IMGUP_PROVIDER";

    /// Per-attempt timeout in milliseconds
    pub const TIMEOUT: &str = "IMGUP_TIMEOUT";

    /// (variable, provider, config key)
    pub const PROVIDER_SECRETS: [(&str, &str, &str); 6] = [
        ("IMGBB_API_KEY", "imgbb", "api_key"),
        ("IMGUR_CLIENT_ID", "imgur", "client_id"),
        ("FREEIMAGE_API_KEY", "freeimage", "api_key"),
        ("IMGHIPPO_API_KEY", "imghippo", "api_key"),
        ("CATBOX_USER_HASH", "catbox", "user_hash"),
        ("WEIBO_COOKIES", "weibo", "cookies"),
    ];
}

pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}
