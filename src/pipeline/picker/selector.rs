use rand::Rng;
use sha2::{Digest, Sha256};

use super::PickerError;

/// Maximum absolute confidence jitter, in percentage points.
pub const MAX_JITTER: f64 = 3.0;

/// Which catalog row to show and how far to nudge its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub index: usize,
    /// In [-MAX_JITTER, +MAX_JITTER].
    pub jitter: f64,
    /// True when the same bytes always produce this selection.
    pub deterministic: bool,
}

/// Strategy for mapping image bytes to a catalog row.
pub trait DiseaseSelector: Send + Sync {
    fn select(&self, image_bytes: &[u8], catalog_len: usize) -> Result<Selection, PickerError>;

    fn name(&self) -> &'static str;
}

// ──────────────────────────────────────────────
// ContentHashSelector
// ──────────────────────────────────────────────

/// SHA-256 of the bytes: first byte picks the row, second byte the jitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashSelector;

impl DiseaseSelector for ContentHashSelector {
    fn select(&self, image_bytes: &[u8], catalog_len: usize) -> Result<Selection, PickerError> {
        if catalog_len == 0 {
            return Err(PickerError::EmptyCatalog);
        }
        let digest = Sha256::digest(image_bytes);
        Ok(Selection {
            index: digest[0] as usize % catalog_len,
            jitter: byte_to_jitter(digest[1]),
            deterministic: true,
        })
    }

    fn name(&self) -> &'static str {
        "content_hash"
    }
}

/// Linear map of [0, 255] onto [-3, +3].
pub fn byte_to_jitter(byte: u8) -> f64 {
    (byte as f64 / 255.0) * (2.0 * MAX_JITTER) - MAX_JITTER
}

// ──────────────────────────────────────────────
// RandomSelector
// ──────────────────────────────────────────────

/// Uniform random row and jitter. Gives up reproducibility: the same
/// image can produce a different disease on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl DiseaseSelector for RandomSelector {
    fn select(&self, _image_bytes: &[u8], catalog_len: usize) -> Result<Selection, PickerError> {
        if catalog_len == 0 {
            return Err(PickerError::EmptyCatalog);
        }
        let mut rng = rand::thread_rng();
        Ok(Selection {
            index: rng.gen_range(0..catalog_len),
            jitter: rng.gen_range(-MAX_JITTER..MAX_JITTER),
            deterministic: false,
        })
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
