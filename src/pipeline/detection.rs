//! Demo detection flow: leaf gate first, disease picker only for photos
//! the gate accepts.

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;

use super::gate::{GateDecision, LeafGate, RejectionKind};
use super::picker::{DetectionResult, DiseaseCatalog, DiseasePicker};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectionOutcome {
    Rejected {
        kind: RejectionKind,
        reason: String,
    },
    Detected {
        result: DetectionResult,
    },
}

/// Gate + picker. Each `detect` call is independent; nothing mutable is
/// shared between calls.
pub struct DetectionService {
    gate: LeafGate,
    picker: DiseasePicker,
}

impl DetectionService {
    pub fn new(gate: LeafGate, picker: DiseasePicker) -> Self {
        Self { gate, picker }
    }

    /// Default gate thresholds and content-hash picking over `catalog`.
    pub fn with_catalog(catalog: Arc<DiseaseCatalog>) -> Self {
        Self::new(LeafGate::default(), DiseasePicker::new(catalog))
    }

    pub fn gate(&self) -> &LeafGate {
        &self.gate
    }

    pub async fn detect(&self, image_bytes: Arc<[u8]>) -> DetectionOutcome {
        let span = tracing::info_span!("detect", image_size = image_bytes.len());

        async move {
            match self.gate.classify(image_bytes.clone()).await {
                GateDecision::Rejected { kind, reason } => {
                    tracing::info!(kind = ?kind, "Photo rejected by leaf gate");
                    DetectionOutcome::Rejected { kind, reason }
                }
                GateDecision::Accepted => DetectionOutcome::Detected {
                    result: self.picker.pick(&image_bytes),
                },
            }
        }
        .instrument(span)
        .await
    }
}
