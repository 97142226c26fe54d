//! Hardware-facing seams for the decision layer.
//!
//! Everything below this module boundary is a peripheral concern: pin IO,
//! pulse timing, PWM duty cycles, servo angles. The decision layer never
//! touches any of that; it sees exactly three traits:
//!
//! - [`SensorArray`](sensors::SensorArray): one synchronous read producing
//!   a [`SensorSnapshot`](sensors::SensorSnapshot) per tick.
//! - [`Drive`](drive::Drive): directional drive commands with a speed.
//! - [`Gripper`](gripper::Gripper): clamp/arm positioning plus the
//!   compound pickup, drop, and launch sequences.
//!
//! Hardware implementations absorb and log their own device errors rather
//! than surfacing them; a flaky echo pin degrades to the no-echo sentinel,
//! never to a fault the mission has to reason about. The [`sim`](crate::sim)
//! module provides bench-test implementations of all three traits.
//!
//! # Example
//!
//! ```
//! use talos::peripherals::{Drive, SensorArray};
//! use talos::sim::{RecordingDrive, ScriptedSensors};
//!
//! let mut drive = RecordingDrive::new();
//! drive.forward(150);
//!
//! let mut sensors = ScriptedSensors::on_line();
//! let snapshot = sensors.read_snapshot();
//! assert!(snapshot.left_on_line && snapshot.right_on_line);
//! ```

/// Sensor snapshot production.
///
/// Defines [`SensorSnapshot`](sensors::SensorSnapshot) and the
/// [`SensorArray`](sensors::SensorArray) trait, plus the no-echo sentinel.
pub mod sensors;

/// Differential drive commands.
///
/// Defines the [`Drive`](drive::Drive) trait and the
/// [`DriveCommand`](drive::DriveCommand) vocabulary used for recording
/// and telemetry.
pub mod drive;

/// Gripper arm and clamp commands.
///
/// Defines the [`Gripper`](gripper::Gripper) trait and the
/// [`GripperCommand`](gripper::GripperCommand) vocabulary.
pub mod gripper;

pub use drive::{Drive, DriveCommand};
pub use gripper::{Gripper, GripperCommand};
pub use sensors::{SensorArray, SensorSnapshot, NO_ECHO_CM};
