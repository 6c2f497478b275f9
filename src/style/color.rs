// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Color model (C3): the tagged `{Default, Indexed, Rgb}` variant, the fixed
//! 256-entry indexed palette, and WCAG 2.1 contrast math.

/// A resolved color. Generalizes the teacher's `TuiColor` (which splits
/// indexed colors into named `Basic` + numeric `Ansi` variants) down to the
/// three-way shape the spec calls for; `ansi_to_tui_color`-style basic-color
/// SGR codes are folded into `Indexed(0..=15)` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// No color set; inherits the renderer's default foreground/background.
    Default,
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

/// SGR basic/bright foreground codes (30-37, 90-97) and their background
/// counterparts (40-47, 100-107) map onto the same 16 palette indices.
/// Grounded in the teacher's `ansi_to_tui_color` table.
#[must_use]
pub fn sgr_basic_color_to_index(code: i64) -> Option<u8> {
    match code {
        30 | 40 => Some(0),
        31 | 41 => Some(1),
        32 | 42 => Some(2),
        33 | 43 => Some(3),
        34 | 44 => Some(4),
        35 | 45 => Some(5),
        36 | 46 => Some(6),
        37 | 47 => Some(7),
        90 | 100 => Some(8),
        91 | 101 => Some(9),
        92 | 102 => Some(10),
        93 | 103 => Some(11),
        94 | 104 => Some(12),
        95 | 105 => Some(13),
        96 | 106 => Some(14),
        97 | 107 => Some(15),
        _ => None,
    }
}

/// Resolve a 256-color palette index to RGB.
///
/// - `0..=15`: the standard 16 ANSI colors (xterm's default palette).
/// - `16..=231`: a 6x6x6 RGB cube with per-channel steps
///   `{0, 95, 135, 175, 215, 255}`.
/// - `232..=255`: a 24-step grayscale ramp from 8 to 238 in steps of 10.
#[must_use]
pub fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
    const BASIC_16: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (205, 0, 0),
        (0, 205, 0),
        (205, 205, 0),
        (0, 0, 238),
        (205, 0, 205),
        (0, 205, 205),
        (229, 229, 229),
        (127, 127, 127),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (92, 92, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    const CUBE_STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    match index {
        0..=15 => BASIC_16[index as usize],
        16..=231 => {
            let i = index - 16;
            let r = CUBE_STEPS[(i / 36) as usize];
            let g = CUBE_STEPS[((i / 6) % 6) as usize];
            let b = CUBE_STEPS[(i % 6) as usize];
            (r, g, b)
        }
        232..=255 => {
            let level = 8 + (index - 232) * 10;
            (level, level, level)
        }
    }
}

/// WCAG 2.1 relative luminance of an sRGB color (each channel normalized to
/// `[0, 1]`, linearized with gamma 2.4 above the 0.03928 threshold).
#[must_use]
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linearize = |c: u8| -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// WCAG 2.1 contrast ratio between two colors: `(L1 + 0.05) / (L2 + 0.05)`
/// with `L1` the lighter of the two relative luminances.
#[must_use]
pub fn contrast_ratio(a: (u8, u8, u8), b: (u8, u8, u8)) -> f64 {
    let la = relative_luminance(a.0, a.1, a.2);
    let lb = relative_luminance(b.0, b.1, b.2);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

impl Color {
    /// Resolve this color to a concrete RGB triple against a caller-supplied
    /// default (since `Color::Default` has no fixed RGB value of its own).
    #[must_use]
    pub fn to_rgb(self, default: (u8, u8, u8)) -> (u8, u8, u8) {
        match self {
            Color::Default => default,
            Color::Indexed(i) => indexed_to_rgb(i),
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_corners_match_xterm() {
        assert_eq!(indexed_to_rgb(16), (0, 0, 0));
        assert_eq!(indexed_to_rgb(231), (255, 255, 255));
    }

    #[test]
    fn grayscale_ramp_bounds() {
        assert_eq!(indexed_to_rgb(232), (8, 8, 8));
        assert_eq!(indexed_to_rgb(255), (238, 238, 238));
    }

    #[test]
    fn contrast_black_on_white_is_max() {
        let ratio = contrast_ratio((0, 0, 0), (255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn contrast_is_symmetric() {
        let a = (30, 144, 255);
        let b = (12, 12, 12);
        assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-9);
    }

    #[test]
    fn basic_sgr_codes_map_to_0_through_15() {
        assert_eq!(sgr_basic_color_to_index(30), Some(0));
        assert_eq!(sgr_basic_color_to_index(97), Some(15));
        assert_eq!(sgr_basic_color_to_index(38), None);
    }
}
