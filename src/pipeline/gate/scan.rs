//! Per-pixel band classification and the running counters it feeds.

use super::hsv::rgb_to_hsv;

// ──────────────────────────────────────────────
// Pixel bands
// ──────────────────────────────────────────────

/// Pixels below this opacity are background.
const MIN_ALPHA: f64 = 0.8;
/// Brightness below which a pixel is ignored entirely.
const VERY_DARK_VALUE: f64 = 0.08;
const NEAR_WHITE_VALUE: f64 = 0.92;
const NEAR_WHITE_MAX_SATURATION: f64 = 0.12;

/// Yellow → green.
const LEAF_HUE: (f64, f64) = (15.0, 165.0);
/// Orange/red, wraps around 0°.
const RUST_HUE_LOW_MAX: f64 = 40.0;
const RUST_HUE_HIGH_MIN: f64 = 340.0;
/// Sky-like blues.
const BLUE_HUE: (f64, f64) = (190.0, 260.0);

const BLUE_MIN_SATURATION: f64 = 0.18;
const BLUE_MIN_VALUE: f64 = 0.2;

const GREEN_DOMINANCE_FACTOR: f64 = 1.08;
const GREEN_MIN_SATURATION: f64 = 0.12;
const GREEN_MIN_VALUE: f64 = 0.12;

const LEAF_MIN_SATURATION: f64 = 0.14;
const RUST_MIN_SATURATION: f64 = 0.22;
const LEAF_MIN_VALUE: f64 = 0.12;

/// One decoded RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PixelSample {
    pub fn from_rgba(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}

// ──────────────────────────────────────────────
// ScanAccumulator
// ──────────────────────────────────────────────

/// Counters over every sampled pixel of one image.
///
/// Invariant: each sub-counter ≤ `considered` ≤ `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanAccumulator {
    pub total: u32,
    /// Opaque and not very dark.
    pub considered: u32,
    pub leaf_like: u32,
    pub green_dominant: u32,
    pub blue_like: u32,
    pub neutral_like: u32,
}

impl ScanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one pixel and bump the matching counters.
    pub fn observe(&mut self, px: PixelSample) {
        self.total += 1;

        let r = px.r as f64 / 255.0;
        let g = px.g as f64 / 255.0;
        let b = px.b as f64 / 255.0;
        let a = px.a as f64 / 255.0;

        if a < MIN_ALPHA {
            return;
        }

        let hsv = rgb_to_hsv(r, g, b);
        let (h, s, v) = (hsv.h, hsv.s, hsv.v);

        if v < VERY_DARK_VALUE {
            return;
        }

        self.considered += 1;

        // Near-white still counts as considered.
        if v > NEAR_WHITE_VALUE && s < NEAR_WHITE_MAX_SATURATION {
            self.neutral_like += 1;
        }

        let is_leaf_hue = h >= LEAF_HUE.0 && h <= LEAF_HUE.1;
        let is_rust_hue = h <= RUST_HUE_LOW_MAX || h >= RUST_HUE_HIGH_MIN;
        let is_blue_hue = h >= BLUE_HUE.0 && h <= BLUE_HUE.1;

        if is_blue_hue && s > BLUE_MIN_SATURATION && v > BLUE_MIN_VALUE {
            self.blue_like += 1;
        }

        let is_green_dominant = g > r * GREEN_DOMINANCE_FACTOR
            && g > b * GREEN_DOMINANCE_FACTOR
            && s > GREEN_MIN_SATURATION
            && v > GREEN_MIN_VALUE;
        if is_green_dominant {
            self.green_dominant += 1;
        }

        // Healthy tissue and rust-colored lesions are both leaf evidence.
        if (is_leaf_hue && s > LEAF_MIN_SATURATION && v > LEAF_MIN_VALUE)
            || (is_rust_hue && s > RUST_MIN_SATURATION && v > LEAF_MIN_VALUE)
        {
            self.leaf_like += 1;
        }
    }

    /// Ratios of each counter to `considered`; `None` when nothing qualified.
    pub fn scores(&self) -> Option<GateScores> {
        if self.considered == 0 {
            return None;
        }
        let n = self.considered as f64;
        Some(GateScores {
            leaf: self.leaf_like as f64 / n,
            green: self.green_dominant as f64 / n,
            blue: self.blue_like as f64 / n,
            neutral: self.neutral_like as f64 / n,
        })
    }
}

/// Counter ratios the accept/reject decision is made on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateScores {
    pub leaf: f64,
    pub green: f64,
    pub blue: f64,
    pub neutral: f64,
}

/// Run every pixel of a packed RGBA buffer through a fresh accumulator.
/// A trailing partial pixel is ignored.
pub fn scan_rgba(rgba: &[u8]) -> ScanAccumulator {
    let mut acc = ScanAccumulator::new();
    for chunk in rgba.chunks_exact(4) {
        acc.observe(PixelSample::from_rgba([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    acc
}
