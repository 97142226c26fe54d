//! # Talos
//!
//! Talos is the control framework for a small autonomous competition
//! robot: a differential drive base, a two-servo gripper arm, a
//! reflectance sensor pair, a color sensor, and an ultrasonic
//! rangefinder, driven through a three-section course. It provides:
//!
//! - **Navigation Primitives**: Line following on reflectance or color,
//!   concentric-ring center seeking, obstacle avoidance with wall
//!   hugging, and dead-reckoned timed turns.
//! - **Mission Sequencing**: A table-driven finite-state runner with
//!   per-state deadline fallbacks, so a missed detection can never
//!   strand the robot mid-course.
//! - **Course Tables**: The three competition sections expressed as
//!   data, all executed by the same runner.
//! - **Peripheral Seams**: Trait interfaces for the drive, gripper, and
//!   sensor array, with scripted/recording doubles for bench testing.
//! - **Logging**: A file-based mission log for post-run diagnosis.
//!
//! ## Quick Start
//!
//! ```
//! use talos::config::RobotConfig;
//! use talos::course;
//! use talos::mission::MissionRunner;
//! use talos::sim::{FakeClock, RecordingDrive, RecordingGripper, ScriptedSensors};
//!
//! let config = RobotConfig::default();
//! let mut runner = MissionRunner::new(course::ball_run(&config), &config);
//!
//! // On the robot these are the hardware peripherals; on the bench,
//! // the sim doubles.
//! let mut sensors = ScriptedSensors::blank();
//! let mut drive = RecordingDrive::new();
//! let mut gripper = RecordingGripper::new();
//! let mut clock = FakeClock::new();
//!
//! runner.run(&mut sensors, &mut drive, &mut gripper, &mut clock);
//! assert!(runner.is_complete());
//! ```
//!
//! ## Control model
//!
//! Single-threaded and cooperative: each tick reads the sensors once,
//! dispatches the current mission state once, then sleeps the loop
//! period (~20 Hz). Compound maneuvers (obstacle avoidance, line
//! search, the gripper sequences) block the loop for their duration by
//! design; there is no other activity to starve, and the actuators
//! have exactly one writer per tick.
//!
//! ## Modules
//!
//! - [`navigation`]: The decision engine mapping snapshots to drive
//!   commands.
//! - [`mission`]: The generic table-driven state machine runner.
//! - [`course`]: The three section tables.
//! - [`peripherals`]: Hardware-facing traits and the sensor snapshot.
//! - [`color`]: Surface classification from raw frequency counts.
//! - [`config`]: Every calibrated constant, in one place.
//! - [`sim`]: Bench-test doubles for all peripheral seams.
//! - [`fs`]: Mission logging.

/// Calibration constants for speeds, distances, colors, and timing.
///
/// Everything tunable lives in [`RobotConfig`](config::RobotConfig);
/// the decision layer reads these and hardcodes nothing.
pub mod config;

/// Surface color classification.
///
/// Converts three raw photodiode frequency counts into one of six
/// discrete [`Color`](color::Color) values using a fixed-priority
/// threshold ladder.
pub mod color;

/// Hardware-facing seams.
///
/// The [`Drive`](peripherals::Drive), [`Gripper`](peripherals::Gripper)
/// and [`SensorArray`](peripherals::SensorArray) traits, plus the
/// per-tick [`SensorSnapshot`](peripherals::SensorSnapshot).
pub mod peripherals;

/// The time seam: monotonic now plus blocking delay.
///
/// [`MonotonicClock`](time::MonotonicClock) on the robot,
/// [`FakeClock`](sim::FakeClock) on the bench.
pub mod time;

/// Navigation decision engine.
///
/// The [`Navigator`](navigation::Navigator) maps one sensor snapshot to
/// one drive command per tick, and owns the compound avoidance and
/// search maneuvers.
pub mod navigation;

/// Table-driven mission state machine.
///
/// A [`Mission`](mission::Mission) is data; the
/// [`MissionRunner`](mission::MissionRunner) executes any section table
/// with deadline fallbacks on every waiting state.
pub mod mission;

/// The three competition course sections as mission tables.
pub mod course;

/// Bench-test doubles for every peripheral seam.
///
/// Scripted sensors, recording actuators, and a manually advanced
/// clock; missions run on a desk exactly as they run on the field.
pub mod sim;

/// Filesystem utilities, including the mission logger.
pub mod fs;
