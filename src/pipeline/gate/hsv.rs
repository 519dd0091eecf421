//! RGB → HSV conversion used by the leaf gate.

/// HSV color representation
/// - h (hue): 0.0-360.0 degrees
/// - s (saturation): 0.0-1.0
/// - v (value/brightness): 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Convert RGB to HSV.
///
/// Input: RGB values in range 0.0-1.0
/// Output: HSV where H is in [0, 360), S and V are 0.0-1.0
///
/// Six-way max-channel hue: the red branch keeps the sign of the
/// remainder, negative hues are wrapped by adding 360.
#[inline]
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let mut h = 0.0;
    if d != 0.0 {
        h = if max == r {
            ((g - b) / d) % 6.0
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }
    }

    let s = if max == 0.0 { 0.0 } else { d / max };
    Hsv { h, s, v: max }
}
