//! Leaf-likeness gate — rejects obvious non-leaf photos (sky, people,
//! objects, blank frames) before a disease result is surfaced.
//!
//! Decode failures fail open: infrastructure problems are never reported
//! as "not a leaf".

pub mod classifier;
pub mod hsv;
pub mod scan;

pub use classifier::*;
pub use hsv::{rgb_to_hsv, Hsv};
pub use scan::{scan_rgba, GateScores, PixelSample, ScanAccumulator};

use serde::Serialize;

/// Why a photo was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Too few opaque, non-black pixels to judge.
    ImageTooUnclear,
    /// Enough pixels, but the color profile is not leaf-like.
    NotLeafLike,
}

impl RejectionKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ImageTooUnclear => {
                "Image is too unclear. Please upload a sharp, close-up wheat leaf photo."
            }
            Self::NotLeafLike => {
                "This doesn't look like a close-up wheat leaf photo. Please upload a clear wheat \
                 leaf image (close-up), not a field/sky/people/object photo."
            }
        }
    }
}

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateDecision {
    Accepted,
    Rejected { kind: RejectionKind, reason: String },
}

impl GateDecision {
    pub fn rejected(kind: RejectionKind) -> Self {
        Self::Rejected {
            kind,
            reason: kind.message().to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected { reason, .. } => Some(reason),
        }
    }
}
