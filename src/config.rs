//! Calibration constants for the competition robot.
//!
//! Every tunable parameter lives here as a plain config struct with a
//! [`Default`] implementation carrying the track-calibrated values. The
//! decision layer never hardcodes a threshold; it reads them from these
//! structs, so a recalibration session touches this file and nothing else.
//!
//! # Example
//!
//! ```
//! use talos::config::RobotConfig;
//!
//! let mut config = RobotConfig::default();
//! // Softer obstacle standoff for a crowded practice field.
//! config.distances.obstacle_cm = 20.0;
//! ```

use std::time::Duration;

/// Drive speeds as PWM duty values (0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speeds {
    /// Precision movements (approaches, lost-line crawl).
    pub slow:   u8,
    /// Standard line-following speed.
    pub normal: u8,
    /// Quick traversals (ramp climb).
    pub fast:   u8,
    /// Pivot turn speed.
    pub turn:   u8,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            slow:   100,
            normal: 150,
            fast:   200,
            turn:   120,
        }
    }
}

/// Ultrasonic distance thresholds in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distances {
    /// Anything closer than this is an obstacle.
    pub obstacle_cm:    f64,
    /// Target standoff while wall-hugging along an obstacle.
    pub wall_hug_cm:    f64,
    /// Close enough to grab the box.
    pub box_pickup_cm:  f64,
    /// Ball detection range.
    pub ball_detect_cm: f64,
    /// Readings above this are not trusted as real surfaces.
    pub max_valid_cm:   f64,
}

impl Default for Distances {
    fn default() -> Self {
        Self {
            obstacle_cm:    15.0,
            wall_hug_cm:    10.0,
            box_pickup_cm:  5.0,
            ball_detect_cm: 20.0,
            max_valid_cm:   400.0,
        }
    }
}

/// Color sensor frequency thresholds.
///
/// The TCS3200-style sensor reports a *lower* frequency count for a
/// *stronger* channel reflectance, so all comparisons here are inverted
/// relative to intuition: small numbers mean bright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCalibration {
    /// Maximum count for a channel to still count as a valid color.
    pub freq_max:   u16,
    /// All channels above this: the surface absorbs everything (black).
    pub freq_black: u16,
    /// All channels below this: the surface reflects everything (white).
    pub freq_white: u16,
    /// Minimum count separation between the winning channel and the rest.
    pub margin:     u16,
}

impl Default for ColorCalibration {
    fn default() -> Self {
        Self {
            freq_max:   150,
            freq_black: 200,
            freq_white: 50,
            margin:     20,
        }
    }
}

/// Open-loop maneuver timing.
///
/// `turn_90` is the single calibrated constant every dead-reckoned turn
/// scales from. There is no heading feedback; drift is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Duration of a 90 degree pivot at turn speed.
    pub turn_90:      Duration,
    /// Settle pause after each timed turn.
    pub settle:       Duration,
    /// Pause before a compound maneuver and between gripper steps.
    pub pause:        Duration,
    /// Forward burst while rounding an obstacle.
    pub avoid_leg:    Duration,
    /// Forward step duration inside the ring-center search.
    pub ring_step:    Duration,
    /// Pivot duration for one fan-search swing.
    pub search_swing: Duration,
    /// Wall-hug iteration period.
    pub hug_step:     Duration,
    /// Main control loop period (~20 Hz).
    pub loop_delay:   Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            turn_90:      Duration::from_millis(500),
            settle:       Duration::from_millis(50),
            pause:        Duration::from_millis(100),
            avoid_leg:    Duration::from_millis(800),
            ring_step:    Duration::from_millis(100),
            search_swing: Duration::from_millis(200),
            hug_step:     Duration::from_millis(50),
            loop_delay:   Duration::from_millis(50),
        }
    }
}

/// Per-state deadline budgets for the mission state machine.
///
/// Every state that waits on an external condition carries one of these;
/// exceeding it forces the fallback transition so a missed detection can
/// never stall the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionBudgets {
    /// Maximum time climbing the ramp.
    pub ramp:    Duration,
    /// Maximum time searching for the ball or a lost line.
    pub search:  Duration,
    /// Maximum time returning to the start zone.
    pub ret:     Duration,
    /// Generic budget for line-following legs.
    pub transit: Duration,
}

impl Default for MissionBudgets {
    fn default() -> Self {
        Self {
            ramp:    Duration::from_secs(5),
            search:  Duration::from_secs(3),
            ret:     Duration::from_secs(5),
            transit: Duration::from_secs(20),
        }
    }
}

/// The complete calibration set consumed by the decision layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RobotConfig {
    pub speeds:    Speeds,
    pub distances: Distances,
    pub colors:    ColorCalibration,
    pub timing:    Timing,
    pub budgets:   MissionBudgets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_track_calibration() {
        let config = RobotConfig::default();
        assert_eq!(config.speeds.normal, 150);
        assert_eq!(config.distances.obstacle_cm, 15.0);
        assert_eq!(config.colors.freq_black, 200);
        assert_eq!(config.timing.turn_90, Duration::from_millis(500));
        assert_eq!(config.budgets.ramp, Duration::from_secs(5));
    }

    #[test]
    fn thresholds_are_ordered() {
        let colors = ColorCalibration::default();
        assert!(colors.freq_white < colors.freq_max);
        assert!(colors.freq_max < colors.freq_black);

        let dist = Distances::default();
        assert!(dist.box_pickup_cm < dist.wall_hug_cm);
        assert!(dist.wall_hug_cm < dist.obstacle_cm);
    }
}
