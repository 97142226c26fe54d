//! Sensor snapshot production.
//!
//! One [`SensorArray::read_snapshot`] call per tick fuses the three sensor
//! subsystems into a single value: ultrasonic range, color classification
//! with the previous tick's color carried along (the ring-boundary
//! detector needs the pair), and the two reflectance line flags.
//!
//! # Timeout sentinels
//!
//! A ranging read that gets no echo within its timeout yields exactly
//! [`NO_ECHO_CM`] (999.0), not an error. A photodiode read that times out
//! yields a raw count of 999. Downstream logic treats both as "far/absent"
//! and must never fault on them.

use crate::color::Color;

/// Distance reported when the ultrasonic echo never arrives.
///
/// This is a sentinel, not a measurement; [`SensorSnapshot::obstacle_detected`]
/// is always false for it.
pub const NO_ECHO_CM: f64 = 999.0;

/// Raw frequency count substituted when a photodiode read times out.
pub const NO_READING_FREQ: u16 = 999;

/// One tick's worth of fused sensor readings.
///
/// A snapshot is a plain value recreated every tick; it has no identity
/// and is never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSnapshot {
    /// Raw red channel frequency count (999 = read timeout).
    pub red_freq:          u16,
    /// Raw green channel frequency count (999 = read timeout).
    pub green_freq:        u16,
    /// Raw blue channel frequency count (999 = read timeout).
    pub blue_freq:         u16,
    /// Classified surface color for this tick.
    pub color:             Color,
    /// The classification from the previous tick, for boundary detection.
    pub previous_color:    Color,
    /// Ultrasonic range in centimeters; [`NO_ECHO_CM`] on timeout.
    pub distance:          f64,
    /// Derived: true iff `0 < distance < obstacle threshold`.
    pub obstacle_detected: bool,
    /// Left reflectance sensor sees the dark line.
    pub left_on_line:      bool,
    /// Right reflectance sensor sees the dark line.
    pub right_on_line:     bool,
}

impl SensorSnapshot {
    /// Builds a snapshot, deriving `obstacle_detected` from the distance.
    ///
    /// This is the only place the obstacle flag is computed; implementations
    /// of [`SensorArray`] go through here so the invariant (flag is a pure
    /// function of distance) cannot drift.
    pub fn new(
        distance: f64,
        obstacle_threshold_cm: f64,
        color: Color,
        previous_color: Color,
        left_on_line: bool,
        right_on_line: bool,
    ) -> Self {
        Self {
            red_freq: 0,
            green_freq: 0,
            blue_freq: 0,
            color,
            previous_color,
            distance,
            obstacle_detected: distance > 0.0 && distance < obstacle_threshold_cm,
            left_on_line,
            right_on_line,
        }
    }

    /// Attaches the raw channel counts that produced `color`.
    pub fn with_raw_freqs(mut self, r: u16, g: u16, b: u16) -> Self {
        self.red_freq = r;
        self.green_freq = g;
        self.blue_freq = b;
        self
    }

    /// True when this tick's color differs from the previous tick's and
    /// is a recognized surface; this is the ring-boundary crossing test.
    pub fn crossed_boundary(&self) -> bool {
        self.color != self.previous_color && self.color.is_recognized()
    }
}

/// The sensor collaborator as the decision layer sees it.
///
/// `read_snapshot` is synchronous and may block up to the bounded sensor
/// timeouts (roughly 25 ms for the ultrasonic pulse and ~120 ms for the
/// three color channel reads on the real hardware). Implementations carry
/// the previous tick's color across calls so `previous_color` is filled
/// without the caller bookkeeping it.
pub trait SensorArray {
    /// Reads all sensor subsystems once and fuses them into a snapshot.
    fn read_snapshot(&mut self) -> SensorSnapshot;

    /// Reads the ultrasonic range alone, for tight maneuver loops that
    /// have no use for a color classification. Returns [`NO_ECHO_CM`] on
    /// timeout.
    fn read_distance(&mut self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_flag_derived_from_distance() {
        let snap = SensorSnapshot::new(10.0, 15.0, Color::None, Color::None, false, false);
        assert!(snap.obstacle_detected);

        let snap = SensorSnapshot::new(15.0, 15.0, Color::None, Color::None, false, false);
        assert!(!snap.obstacle_detected);
    }

    #[test]
    fn no_echo_is_not_an_obstacle() {
        let snap = SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::None, Color::None, false, false);
        assert!(!snap.obstacle_detected);

        // A zero reading is a dead sensor, not a zero-distance obstacle.
        let snap = SensorSnapshot::new(0.0, 15.0, Color::None, Color::None, false, false);
        assert!(!snap.obstacle_detected);
    }

    #[test]
    fn raw_counts_ride_along_for_telemetry() {
        let snap = SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::Red, Color::None, false, false)
            .with_raw_freqs(50, 150, NO_READING_FREQ);
        assert_eq!(snap.red_freq, 50);
        assert_eq!(snap.blue_freq, NO_READING_FREQ);
        assert_eq!(snap.color, Color::Red);
    }

    #[test]
    fn boundary_crossing_needs_a_recognized_color() {
        let snap = SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::Red, Color::Blue, false, false);
        assert!(snap.crossed_boundary());

        let snap = SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::None, Color::Blue, false, false);
        assert!(!snap.crossed_boundary());

        let snap = SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::Red, Color::Red, false, false);
        assert!(!snap.crossed_boundary());
    }
}
