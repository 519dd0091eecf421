//! Leaf gate classifier: decode the upload, downscale it onto the sampling
//! canvas, scan the pixels and apply the acceptance thresholds.
//!
//! The gate fails open. Anything it cannot decode is allowed through.

use std::sync::Arc;

use image::imageops::FilterType;

use super::scan::{scan_rgba, ScanAccumulator};
use super::{GateDecision, RejectionKind};

/// Side of the square grid photos are sampled on.
pub const DEFAULT_CANVAS_SIZE: u32 = 96;

/// Decision thresholds. Empirically tuned, not derived; kept as data so
/// they can be adjusted without touching the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateThresholds {
    /// Fewer considered pixels than this → image too unclear.
    pub min_considered: u32,
    pub min_leaf_score: f64,
    pub min_green_score: f64,
    pub max_blue_score: f64,
    pub max_neutral_score: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_considered: 400,
            min_leaf_score: 0.42,
            min_green_score: 0.26,
            max_blue_score: 0.25,
            max_neutral_score: 0.7,
        }
    }
}

impl GateThresholds {
    /// Turn a finished scan into a decision.
    pub fn decide(&self, acc: &ScanAccumulator) -> GateDecision {
        if acc.considered < self.min_considered {
            return GateDecision::rejected(RejectionKind::ImageTooUnclear);
        }
        let Some(scores) = acc.scores() else {
            return GateDecision::rejected(RejectionKind::ImageTooUnclear);
        };

        let leaf_evidence =
            scores.leaf >= self.min_leaf_score || scores.green >= self.min_green_score;
        let ok = leaf_evidence
            && scores.blue <= self.max_blue_score
            && scores.neutral <= self.max_neutral_score;

        if ok {
            GateDecision::Accepted
        } else {
            GateDecision::rejected(RejectionKind::NotLeafLike)
        }
    }
}

/// Heuristic leaf-likeness classifier.
#[derive(Debug, Clone)]
pub struct LeafGate {
    thresholds: GateThresholds,
    canvas_size: u32,
}

impl Default for LeafGate {
    fn default() -> Self {
        Self::new(GateThresholds::default())
    }
}

impl LeafGate {
    pub fn new(thresholds: GateThresholds) -> Self {
        Self {
            thresholds,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }

    pub fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size.max(1);
        self
    }

    pub fn thresholds(&self) -> &GateThresholds {
        &self.thresholds
    }

    /// Classify raw image bytes. Decoding runs on the blocking pool.
    ///
    /// Never fails: a decode error, an unsupported format or a crashed
    /// worker all yield `Accepted`.
    pub async fn classify(&self, image_bytes: Arc<[u8]>) -> GateDecision {
        let gate = self.clone();
        match tokio::task::spawn_blocking(move || gate.classify_blocking(&image_bytes)).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "Leaf gate worker failed, allowing image");
                GateDecision::Accepted
            }
        }
    }

    /// Synchronous variant of [`classify`](Self::classify).
    pub fn classify_blocking(&self, image_bytes: &[u8]) -> GateDecision {
        let _span = tracing::debug_span!("leaf_gate", image_size = image_bytes.len()).entered();

        let Some(rgba) = self.decode_to_canvas(image_bytes) else {
            return GateDecision::Accepted;
        };
        let acc = scan_rgba(&rgba);
        let decision = self.thresholds.decide(&acc);

        tracing::debug!(
            considered = acc.considered,
            leaf_like = acc.leaf_like,
            green_dominant = acc.green_dominant,
            blue_like = acc.blue_like,
            neutral_like = acc.neutral_like,
            accepted = decision.is_accepted(),
            "Leaf gate scan complete"
        );
        decision
    }

    /// Classify an already-decoded RGBA buffer without resampling.
    pub fn classify_pixels(&self, rgba: &[u8]) -> GateDecision {
        self.thresholds.decide(&scan_rgba(rgba))
    }

    /// Decode and downscale to the sampling canvas. `None` on any decode
    /// failure; buffers are dropped on every path.
    fn decode_to_canvas(&self, image_bytes: &[u8]) -> Option<Vec<u8>> {
        let img = match image::load_from_memory(image_bytes) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(error = %e, "Leaf gate could not decode image, allowing it");
                return None;
            }
        };
        // Nearest is enough: we want a representative sample, not fidelity.
        let small = img.resize_exact(self.canvas_size, self.canvas_size, FilterType::Nearest);
        Some(small.to_rgba8().into_raw())
    }
}
