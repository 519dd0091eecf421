use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;

/// Largest accepted data URL (~10 MiB of image after base64 overhead).
pub const MAX_DATA_URL_BYTES: usize = 13 * 1024 * 1024;

/// Requests declaring a larger body are refused before reading it.
pub const MAX_REQUEST_BYTES: u64 = 15 * 1024 * 1024;

static DATA_URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/(jpeg|jpg|png|webp|gif);base64,").unwrap()
});

/// Why an upload was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRejection {
    Missing,
    TooLarge,
    UnsupportedFormat,
}

impl ImageRejection {
    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "No image provided",
            Self::TooLarge => "Image too large. Maximum size is 10MB",
            Self::UnsupportedFormat => "Invalid image format. Supported formats: JPEG, PNG, WEBP, GIF",
        }
    }
}

/// Check a client-supplied image data URL before it leaves the server.
pub fn validate_image_data_url(data_url: Option<&str>) -> Result<&str, ImageRejection> {
    let data_url = match data_url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ImageRejection::Missing),
    };
    if !DATA_URL_PREFIX.is_match(data_url) {
        return Err(ImageRejection::UnsupportedFormat);
    }
    if data_url.len() > MAX_DATA_URL_BYTES {
        return Err(ImageRejection::TooLarge);
    }
    Ok(data_url)
}

/// Decode the payload of a base64 data URL, or bare base64.
///
/// Returns `None` on malformed input; callers pass the raw bytes on to the
/// gate, which accepts undecodable images anyway.
pub fn decode_data_url(input: &str) -> Option<Vec<u8>> {
    let payload = match input.strip_prefix("data:") {
        Some(rest) => rest.split_once(";base64,")?.1,
        None => input,
    };
    STANDARD.decode(payload.trim()).ok()
}
