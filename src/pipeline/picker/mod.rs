//! Deterministic disease picker for the demo path.
//!
//! Maps image bytes onto one of the canned catalog rows so that
//! re-uploading the same photo always shows the same disease and
//! confidence. When content hashing is unavailable the picker degrades to
//! a random choice and flags the result as non-deterministic.

pub mod catalog;
pub mod selector;

pub use catalog::*;
pub use selector::*;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::models::enums::Severity;

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("Content hash unavailable: {0}")]
    HashUnavailable(String),

    #[error("Disease catalog is empty")]
    EmptyCatalog,
}

/// What the user sees for an accepted photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub disease_name: String,
    pub severity: Severity,
    /// Percentage, one decimal place.
    pub confidence: f64,
    pub treatment: String,
    pub prevention: String,
    /// False when the random fallback produced this result.
    pub deterministic: bool,
}

pub struct DiseasePicker {
    catalog: Arc<DiseaseCatalog>,
    selector: Arc<dyn DiseaseSelector>,
    fallback: RandomSelector,
}

impl DiseasePicker {
    /// Content-hash selection over the given catalog.
    pub fn new(catalog: Arc<DiseaseCatalog>) -> Self {
        Self::with_selector(catalog, Arc::new(ContentHashSelector))
    }

    pub fn with_selector(catalog: Arc<DiseaseCatalog>, selector: Arc<dyn DiseaseSelector>) -> Self {
        Self {
            catalog,
            selector,
            fallback: RandomSelector,
        }
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// Pick a disease for the image. Always returns a catalog row.
    pub fn pick(&self, image_bytes: &[u8]) -> DetectionResult {
        let len = self.catalog.len();
        let selection = match self.selector.select(image_bytes, len) {
            Ok(sel) => sel,
            Err(e) => {
                tracing::warn!(
                    selector = self.selector.name(),
                    error = %e,
                    "Disease selector failed, falling back to random (result not reproducible)"
                );
                self.fallback_selection(image_bytes, len)
            }
        };

        let record = self.catalog.get_wrapping(selection.index);

        let result = DetectionResult {
            disease_name: record.name.to_string(),
            severity: record.severity,
            confidence: round_one_decimal(record.base_confidence + selection.jitter),
            treatment: record.treatment.to_string(),
            prevention: record.prevention.to_string(),
            deterministic: selection.deterministic,
        };

        tracing::info!(
            disease = %result.disease_name,
            confidence = result.confidence,
            deterministic = result.deterministic,
            "Demo disease picked"
        );
        result
    }

    fn fallback_selection(&self, image_bytes: &[u8], len: usize) -> Selection {
        self.fallback
            .select(image_bytes, len)
            .unwrap_or(Selection {
                index: 0,
                jitter: 0.0,
                deterministic: false,
            })
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
