//! Bench-test doubles for every peripheral seam.
//!
//! Nothing in this module touches hardware; it exists so the decision
//! layer can be exercised on a desk (or in CI) exactly the way it runs
//! on the robot. Missions execute against a scripted sensor feed and
//! recording actuators, and a fake clock makes every blocking maneuver
//! instantaneous and every timestamp deterministic.
//!
//! # Example
//!
//! ```
//! use talos::sim::{FakeClock, RecordingDrive, ScriptedSensors, SimFrame};
//! use talos::peripherals::{Drive, SensorArray};
//! use talos::color::Color;
//!
//! let mut sensors = ScriptedSensors::new(vec![
//!     SimFrame { distance: 40.0, ..SimFrame::default() },
//!     SimFrame { color: Color::Red, ..SimFrame::default() },
//! ]);
//! let first = sensors.read_snapshot();
//! assert_eq!(first.distance, 40.0);
//! ```

use std::time::Duration;

use crate::color::Color;
use crate::peripherals::{
    Drive, DriveCommand, Gripper, GripperCommand, SensorArray, SensorSnapshot, NO_ECHO_CM,
};
use crate::time::Clock;

/// One scripted tick of sensor readings.
///
/// Defaults to "nothing detected": no echo, no color, both reflectance
/// sensors off the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimFrame {
    pub distance:      f64,
    pub color:         Color,
    pub left_on_line:  bool,
    pub right_on_line: bool,
}

impl Default for SimFrame {
    fn default() -> Self {
        Self {
            distance:      NO_ECHO_CM,
            color:         Color::None,
            left_on_line:  false,
            right_on_line: false,
        }
    }
}

/// A sensor array that replays a fixed script.
///
/// Each read consumes one frame; the final frame repeats forever once the
/// script is exhausted, so a short script describes a stable world.
/// `previous_color` is carried across reads the way the real producer
/// carries it, and the obstacle flag is derived through
/// [`SensorSnapshot::new`] like every other implementation.
pub struct ScriptedSensors {
    frames:       Vec<SimFrame>,
    cursor:       usize,
    last_color:   Color,
    obstacle_at:  f64,
}

impl ScriptedSensors {
    /// Replays `frames` in order, repeating the last one forever.
    pub fn new(frames: Vec<SimFrame>) -> Self {
        Self {
            frames,
            cursor: 0,
            last_color: Color::None,
            obstacle_at: 15.0,
        }
    }

    /// Overrides the obstacle threshold used to derive the obstacle flag.
    pub fn with_obstacle_threshold(mut self, cm: f64) -> Self {
        self.obstacle_at = cm;
        self
    }

    /// An endless clear track: both reflectance sensors on the line.
    pub fn on_line() -> Self {
        Self::new(vec![SimFrame {
            left_on_line: true,
            right_on_line: true,
            ..SimFrame::default()
        }])
    }

    /// An endless empty world: no echo, no color, no line.
    pub fn blank() -> Self { Self::new(vec![SimFrame::default()]) }

    /// A ranging-only script; colors and line flags stay blank.
    pub fn ranging(distances: &[f64]) -> Self {
        Self::new(
            distances
                .iter()
                .map(|&distance| SimFrame { distance, ..SimFrame::default() })
                .collect(),
        )
    }

    /// A color-only script; range and line flags stay blank.
    pub fn colors(colors: &[Color]) -> Self {
        Self::new(
            colors
                .iter()
                .map(|&color| SimFrame { color, ..SimFrame::default() })
                .collect(),
        )
    }

    fn next_frame(&mut self) -> SimFrame {
        if self.frames.is_empty() {
            return SimFrame::default();
        }
        let frame = self.frames[self.cursor.min(self.frames.len() - 1)];
        self.cursor += 1;
        frame
    }
}

impl SensorArray for ScriptedSensors {
    fn read_snapshot(&mut self) -> SensorSnapshot {
        let frame = self.next_frame();
        let previous = self.last_color;
        self.last_color = frame.color;
        SensorSnapshot::new(
            frame.distance,
            self.obstacle_at,
            frame.color,
            previous,
            frame.left_on_line,
            frame.right_on_line,
        )
    }

    fn read_distance(&mut self) -> f64 { self.next_frame().distance }
}

/// A drive that records every command it is issued.
#[derive(Debug, Default)]
pub struct RecordingDrive {
    /// Every command, in issue order.
    pub log: Vec<DriveCommand>,
}

impl RecordingDrive {
    pub fn new() -> Self { Self::default() }

    /// The most recent command, if any.
    pub fn last(&self) -> Option<DriveCommand> { self.log.last().copied() }
}

impl Drive for RecordingDrive {
    fn stop(&mut self) { self.log.push(DriveCommand::Stop) }

    fn forward(&mut self, speed: u8) { self.log.push(DriveCommand::Forward(speed)) }

    fn backward(&mut self, speed: u8) { self.log.push(DriveCommand::Backward(speed)) }

    fn pivot_left(&mut self, speed: u8) { self.log.push(DriveCommand::PivotLeft(speed)) }

    fn pivot_right(&mut self, speed: u8) { self.log.push(DriveCommand::PivotRight(speed)) }

    fn curve_left(&mut self, speed: u8) { self.log.push(DriveCommand::CurveLeft(speed)) }

    fn curve_right(&mut self, speed: u8) { self.log.push(DriveCommand::CurveRight(speed)) }
}

/// A gripper that records commands and tracks the logical payload state.
///
/// The compound sequences mirror the real servo sequencing: `pickup` is
/// arm down, clamp closed, carry pose; `drop_payload` is arm down, clamp
/// open, carry pose; `launch` is arm down then the upward flick.
#[derive(Debug, Default)]
pub struct RecordingGripper {
    /// Every command, in issue order. Compound sequences log their
    /// compound marker plus each step.
    pub log: Vec<GripperCommand>,
    holding: bool,
}

impl RecordingGripper {
    pub fn new() -> Self { Self::default() }
}

impl Gripper for RecordingGripper {
    fn open_clamp(&mut self) { self.log.push(GripperCommand::OpenClamp) }

    fn close_clamp(&mut self) { self.log.push(GripperCommand::CloseClamp) }

    fn arm_up(&mut self) { self.log.push(GripperCommand::ArmUp) }

    fn arm_down(&mut self) { self.log.push(GripperCommand::ArmDown) }

    fn arm_carry(&mut self) { self.log.push(GripperCommand::ArmCarry) }

    fn pickup(&mut self) {
        self.log.push(GripperCommand::Pickup);
        self.arm_down();
        self.close_clamp();
        self.arm_carry();
        self.holding = true;
    }

    fn drop_payload(&mut self) {
        self.log.push(GripperCommand::Drop);
        self.arm_down();
        self.open_clamp();
        self.arm_carry();
        self.holding = false;
    }

    fn launch(&mut self) {
        self.log.push(GripperCommand::Launch);
        self.arm_down();
        self.arm_up();
    }

    fn is_holding(&self) -> bool { self.holding }
}

/// A manually advanced clock.
///
/// `delay` advances simulated time instead of sleeping, so blocking
/// maneuvers complete instantly while their timing is still observable
/// through [`now`](Clock::now).
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Duration,
}

impl FakeClock {
    pub fn new() -> Self { Self::default() }

    /// Advances time without a delay call, e.g. to trip a state budget.
    pub fn advance(&mut self, dur: Duration) { self.now += dur }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration { self.now }

    fn delay(&mut self, dur: Duration) { self.now += dur }
}
