//! Surface color classification from raw photodiode frequency counts.
//!
//! The color sensor reports one frequency count per channel, where a
//! *lower* count means *more* light of that channel reached the detector.
//! A count of exactly `999` is the photodiode timeout sentinel substituted
//! by the sensor layer and reads as "this channel is absent".
//!
//! Classification is a fixed-priority decision ladder, not a nearest-match:
//!
//! 1. All channels weak: [`Color::Black`] (the surface absorbs everything).
//! 2. All channels strong: [`Color::White`].
//! 3. Red, green, blue tested in that order; the first channel that beats
//!    both others by the calibrated margin and sits under the validity
//!    ceiling wins. The test order is the tie-break the calibrated
//!    thresholds assume; do not reorder it.
//! 4. Nothing matched: [`Color::None`] (typically a boundary crossing).
//!
//! # Example
//!
//! ```
//! use talos::color::{classify, Color};
//! use talos::config::ColorCalibration;
//!
//! let cal = ColorCalibration::default();
//! assert_eq!(classify(50, 150, 150, &cal), Color::Red);
//! assert_eq!(classify(999, 999, 999, &cal), Color::Black);
//! ```

use std::fmt;

use crate::config::ColorCalibration;

/// A classified surface color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// No recognizable surface (transitional or ambiguous reading).
    #[default]
    None,
    Black,
    White,
    Red,
    Green,
    Blue,
}

impl Color {
    /// Uppercase display name, for telemetry lines.
    pub fn name(self) -> &'static str {
        match self {
            Color::None => "NONE",
            Color::Black => "BLACK",
            Color::White => "WHITE",
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
        }
    }

    /// True for anything except [`Color::None`].
    pub fn is_recognized(self) -> bool { self != Color::None }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Classifies three raw frequency counts into a [`Color`].
///
/// Inputs are the raw counts with the `999` timeout sentinel already
/// substituted. Comparisons run in signed arithmetic so a small count
/// minus the margin can never wrap.
pub fn classify(r: u16, g: u16, b: u16, cal: &ColorCalibration) -> Color {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let black = i32::from(cal.freq_black);
    let white = i32::from(cal.freq_white);
    let max = i32::from(cal.freq_max);
    let margin = i32::from(cal.margin);

    // All channels reflect poorly: black surface.
    if r > black && g > black && b > black {
        return Color::Black;
    }

    // All channels reflect strongly: white surface.
    if r < white && g < white && b < white {
        return Color::White;
    }

    if r < g - margin && r < b - margin && r < max {
        return Color::Red;
    }
    if g < r - margin && g < b - margin && g < max {
        return Color::Green;
    }
    if b < r - margin && b < g - margin && b < max {
        return Color::Blue;
    }

    Color::None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> ColorCalibration { ColorCalibration::default() }

    #[test]
    fn all_weak_is_black() {
        // Any triple above the black threshold is black, margin irrelevant.
        assert_eq!(classify(201, 201, 201, &cal()), Color::Black);
        assert_eq!(classify(999, 250, 300, &cal()), Color::Black);
        assert_eq!(classify(999, 999, 999, &cal()), Color::Black);
    }

    #[test]
    fn all_strong_is_white() {
        assert_eq!(classify(10, 20, 30, &cal()), Color::White);
        assert_eq!(classify(49, 49, 49, &cal()), Color::White);
    }

    #[test]
    fn red_wins_with_margin_and_ceiling() {
        // r = 50 beats 150/150 by >= 20 and is under the ceiling.
        assert_eq!(classify(50, 150, 150, &cal()), Color::Red);
    }

    #[test]
    fn green_and_blue_follow_the_same_rule() {
        assert_eq!(classify(150, 50, 150, &cal()), Color::Green);
        assert_eq!(classify(150, 150, 50, &cal()), Color::Blue);
    }

    #[test]
    fn margin_too_small_is_none() {
        // 60 vs 70: only 10 apart, under the 20 margin.
        assert_eq!(classify(60, 70, 70, &cal()), Color::None);
    }

    #[test]
    fn over_ceiling_is_none() {
        // Clearly the lowest channel, but above freq_max.
        assert_eq!(classify(160, 190, 190, &cal()), Color::None);
    }

    #[test]
    fn small_counts_do_not_wrap() {
        // g - margin is negative at g = 5; unsigned math would wrap it huge
        // and hand the win to red. Signed math lets green through.
        assert_eq!(classify(30, 5, 100, &cal()), Color::Green);
    }

    #[test]
    fn near_ties_fall_through_to_none() {
        // Two channels close together: neither clears the margin over the
        // other, so the ladder reaches the bottom.
        assert_eq!(classify(60, 60, 100, &cal()), Color::None);
    }

    #[test]
    fn names_match_telemetry_vocabulary() {
        assert_eq!(Color::Red.name(), "RED");
        assert_eq!(Color::None.to_string(), "NONE");
        assert!(Color::Blue.is_recognized());
        assert!(!Color::None.is_recognized());
    }
}
