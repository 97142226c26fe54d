//! The single time seam for the control loop.
//!
//! All scheduling in this crate is cooperative: one tick reads sensors,
//! dispatches the mission state, then sleeps the loop period. The only
//! suspension points are explicit delays (actuator settle pauses and the
//! fixed-duration legs of compound maneuvers), and all of them go through
//! the [`Clock`] trait so tests can substitute
//! [`FakeClock`](crate::sim::FakeClock) and run a whole mission in
//! microseconds with deterministic timestamps.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use talos::time::{Clock, MonotonicClock};
//!
//! let mut clock = MonotonicClock::new();
//! let before = clock.now();
//! clock.delay(Duration::from_millis(1));
//! assert!(clock.now() > before);
//! ```

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time plus blocking delay.
///
/// `now` is time since the clock was created (program boot, in practice);
/// it never goes backwards. `delay` blocks the entire control loop by
/// design; there is no other concurrent activity to starve.
pub trait Clock {
    /// Monotonic time since boot.
    fn now(&self) -> Duration;

    /// Blocks for `dur`.
    fn delay(&mut self, dur: Duration);
}

/// The real wall clock, backed by [`Instant`] and [`thread::sleep`].
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    boot: Instant,
}

impl MonotonicClock {
    /// Starts the clock; `now` is measured from this moment.
    pub fn new() -> Self { Self { boot: Instant::now() } }
}

impl Default for MonotonicClock {
    fn default() -> Self { Self::new() }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration { self.boot.elapsed() }

    fn delay(&mut self, dur: Duration) { thread::sleep(dur) }
}
