// ABOUTME: Centralized constants for the imgup SDK
// ABOUTME: Contains retry configuration, timeouts, provider endpoints and size limits

/// Retry configuration constants
pub mod retry {
    use std::time::Duration;

    /// Maximum number of retries after the first attempt
    pub const MAX_RETRIES: u32 = 2;

    /// Fixed delay between attempts
    pub const RETRY_DELAY: Duration = Duration::from_millis(1000);
}

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for a single HTTP attempt
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);
}

/// Provider API endpoints
pub mod urls {
    pub const CATBOX_API: &str = "https://catbox.moe/user/api.php";
    pub const IMGBB_API: &str = "https://api.imgbb.com/1/upload";
    pub const IMGUR_API: &str = "https://api.imgur.com/3/image";
    pub const FREEIMAGE_API: &str = "https://freeimage.host/api/1/upload";
    pub const IMGHIPPO_API: &str = "https://api.imghippo.com/v1/upload";
    pub const WEIBO_API: &str = "https://picupload.weibo.com/interface/pic_upload.php";

    /// Public page for an Imgur image id
    pub const IMGUR_VIEWER_BASE: &str = "https://imgur.com";

    /// CDN hosts serving Weibo uploads; all of them serve identical content
    pub const WEIBO_CDN_HOSTS: [&str; 8] = [
        "wx1.sinaimg.cn",
        "wx2.sinaimg.cn",
        "wx3.sinaimg.cn",
        "wx4.sinaimg.cn",
        "tva1.sinaimg.cn",
        "tva2.sinaimg.cn",
        "tva3.sinaimg.cn",
        "tva4.sinaimg.cn",
    ];
}

/// Per-provider upload size caps in bytes
pub mod limits {
    const MIB: u64 = 1024 * 1024;

    pub const CATBOX_MAX_SIZE: u64 = 200 * MIB;
    pub const IMGBB_MAX_SIZE: u64 = 32 * MIB;
    pub const IMGUR_MAX_SIZE: u64 = 20 * MIB;
    pub const FREEIMAGE_MAX_SIZE: u64 = 64 * MIB;
    pub const IMGHIPPO_MAX_SIZE: u64 = 50 * MIB;
    pub const WEIBO_MAX_SIZE: u64 = 20 * MIB;
}

/// Identification sent with every request
pub const USER_AGENT: &str = concat!("imgup/", env!("CARGO_PKG_VERSION"));
