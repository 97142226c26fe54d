//! Filesystem utilities for the robot controller.
//!
//! The one filesystem concern this robot has is telemetry: the `logger`
//! submodule records every decision, transition, and timeout to a file on
//! the controller's storage so a failed run can be reconstructed after
//! the fact. On a competition field there is no debugger; the log file is
//! the debugger.
//!
//! # Example
//!
//! ```ignore
//! use talos::fs::logger;
//! use log::{info, LevelFilter};
//!
//! logger::init(LevelFilter::Debug).expect("Failed to initialize logger");
//! info!("controller up, starting section 1");
//! ```

/// Dual console/file logging for mission runs.
pub mod logger;
