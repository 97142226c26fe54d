//! The three competition course sections, described as mission tables.
//!
//! Each section is a function from the calibration set to a
//! [`Mission`](crate::mission::Mission) the generic runner can execute.
//! Nothing here contains control flow; the sections are pure data, which
//! is what keeps one [`MissionRunner`](crate::mission::MissionRunner)
//! sufficient for all three.
//!
//! # Sections
//!
//! 1. [`box_run`](box_run::box_run): black line with obstacles, pick up
//!    the box, carry it to the red zone.
//! 2. [`ring_run`](ring_run::ring_run): blue line into the concentric
//!    ring field, drop the box at the center.
//! 3. [`ball_run`](ball_run::ball_run): climb the ramp, find the ball,
//!    launch it, return to the start zone.
//!
//! # Example
//!
//! ```
//! use talos::config::RobotConfig;
//! use talos::course;
//! use talos::mission::MissionRunner;
//!
//! let config = RobotConfig::default();
//! let mission = course::box_run(&config);
//! assert!(mission.validate().is_ok());
//! let runner = MissionRunner::new(mission, &config);
//! ```

/// Section 1: line maze, obstacle detours, box pickup.
pub mod box_run;

/// Section 2: colored line into the ring field, payload drop.
pub mod ring_run;

/// Section 3: ramp, ball search, launch, return home.
pub mod ball_run;

pub use ball_run::ball_run;
pub use box_run::box_run;
pub use ring_run::ring_run;
