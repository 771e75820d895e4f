// ABOUTME: Magic-byte sniffing for image MIME types
// ABOUTME: Classifies raw bytes against a static signature table, independent of filenames

pub const IMAGE_ICON: &str = "image/x-icon";
pub const IMAGE_BMP: &str = "image/bmp";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_WEBP: &str = "image/webp";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_JPEG: &str = "image/jpeg";

/// Raster formats accepted by most hosts
pub const COMMON_IMAGE_TYPES: &[&str] = &[IMAGE_PNG, IMAGE_JPEG, IMAGE_GIF, IMAGE_WEBP, IMAGE_BMP];

/// Bytes read from the head of a file for sniffing
pub const SNIFF_LEN: usize = 512;

/// One row of the signature table.
///
/// Input bytes are compared as `(byte & mask) == pattern` after skipping any
/// leading bytes found in `ignored`.
struct Signature {
    pattern: &'static [u8],
    mask: &'static [u8],
    ignored: &'static [u8],
    mime: &'static str,
}

const FULL_MASK_2: &[u8] = &[0xFF; 2];
const FULL_MASK_3: &[u8] = &[0xFF; 3];
const FULL_MASK_4: &[u8] = &[0xFF; 4];
const FULL_MASK_6: &[u8] = &[0xFF; 6];
const FULL_MASK_8: &[u8] = &[0xFF; 8];

// Order matters: the first matching row wins.
static SIGNATURES: [Signature; 8] = [
    // Windows icon
    Signature {
        pattern: &[0x00, 0x00, 0x01, 0x00],
        mask: FULL_MASK_4,
        ignored: &[],
        mime: IMAGE_ICON,
    },
    // Windows cursor
    Signature {
        pattern: &[0x00, 0x00, 0x02, 0x00],
        mask: FULL_MASK_4,
        ignored: &[],
        mime: IMAGE_ICON,
    },
    Signature {
        pattern: b"BM",
        mask: FULL_MASK_2,
        ignored: &[],
        mime: IMAGE_BMP,
    },
    Signature {
        pattern: b"GIF87a",
        mask: FULL_MASK_6,
        ignored: &[],
        mime: IMAGE_GIF,
    },
    Signature {
        pattern: b"GIF89a",
        mask: FULL_MASK_6,
        ignored: &[],
        mime: IMAGE_GIF,
    },
    // "RIFF" <4 byte chunk size> "WEBPVP"
    Signature {
        pattern: &[
            b'R', b'I', b'F', b'F', 0x00, 0x00, 0x00, 0x00, b'W', b'E', b'B', b'P', b'V', b'P',
        ],
        mask: &[
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ],
        ignored: &[],
        mime: IMAGE_WEBP,
    },
    Signature {
        pattern: &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        mask: FULL_MASK_8,
        ignored: &[],
        mime: IMAGE_PNG,
    },
    // SOI marker followed by the first byte of the next marker
    Signature {
        pattern: &[0xFF, 0xD8, 0xFF],
        mask: FULL_MASK_3,
        ignored: &[],
        mime: IMAGE_JPEG,
    },
];

impl Signature {
    fn matches(&self, input: &[u8]) -> bool {
        let start = input
            .iter()
            .position(|b| !self.ignored.contains(b))
            .unwrap_or(input.len());
        let input = &input[start..];

        if input.len() < self.pattern.len() {
            return false;
        }

        self.pattern
            .iter()
            .zip(self.mask)
            .zip(input)
            .all(|((pattern, mask), byte)| byte & mask == *pattern)
    }
}

/// Detect the image MIME type of `bytes`, or `None` when no signature matches
pub fn detect(bytes: &[u8]) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|signature| signature.matches(bytes))
        .map(|signature| signature.mime)
}

/// Dotted file extension for a MIME type, defaulting to `.jpg`
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        IMAGE_PNG => ".png",
        IMAGE_GIF => ".gif",
        IMAGE_WEBP => ".webp",
        IMAGE_BMP => ".bmp",
        IMAGE_ICON | "image/vnd.microsoft.icon" => ".ico",
        _ => ".jpg",
    }
}
