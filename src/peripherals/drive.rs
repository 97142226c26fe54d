//! Differential drive commands.
//!
//! The drive base is a left/right motor pair behind an H-bridge; the
//! decision layer steers it through the [`Drive`] trait using seven
//! directional commands, each with a PWM duty speed (0-255).
//!
//! Commands at this seam are infallible: a hardware implementation that
//! hits a driver fault logs it and keeps the last safe state, the same
//! way a motor voltage error is logged and swallowed rather than bubbled
//! into steering decisions.
//!
//! # Curves versus pivots
//!
//! A *pivot* spins the wheels in opposite directions and turns the robot
//! in place; a *curve* keeps both wheels forward with the inner wheel at
//! half speed, bending the path while still making progress. Line
//! following corrects with curves; timed turns and search fans pivot.

/// A single drive command, as issued through [`Drive`].
///
/// This is the recording/telemetry vocabulary; the
/// [`RecordingDrive`](crate::sim::RecordingDrive) test double logs these
/// so tests can assert on exact command sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    Stop,
    Forward(u8),
    Backward(u8),
    PivotLeft(u8),
    PivotRight(u8),
    CurveLeft(u8),
    CurveRight(u8),
}

/// The drive collaborator as the decision layer sees it.
///
/// Exactly one logical owner issues commands per tick (the currently
/// dispatched mission state); implementations need no locking.
pub trait Drive {
    /// Stops both motors immediately.
    fn stop(&mut self);

    /// Drives straight ahead at `speed`.
    fn forward(&mut self, speed: u8);

    /// Drives straight backward at `speed`.
    fn backward(&mut self, speed: u8);

    /// Pivots in place, counter-clockwise.
    fn pivot_left(&mut self, speed: u8);

    /// Pivots in place, clockwise.
    fn pivot_right(&mut self, speed: u8);

    /// Curves left while moving forward (left wheel at half speed).
    fn curve_left(&mut self, speed: u8);

    /// Curves right while moving forward (right wheel at half speed).
    fn curve_right(&mut self, speed: u8);

    /// Issues `command` through the matching method.
    fn issue(&mut self, command: DriveCommand) {
        match command {
            DriveCommand::Stop => self.stop(),
            DriveCommand::Forward(s) => self.forward(s),
            DriveCommand::Backward(s) => self.backward(s),
            DriveCommand::PivotLeft(s) => self.pivot_left(s),
            DriveCommand::PivotRight(s) => self.pivot_right(s),
            DriveCommand::CurveLeft(s) => self.curve_left(s),
            DriveCommand::CurveRight(s) => self.curve_right(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RecordingDrive;

    #[test]
    fn issue_dispatches_to_the_matching_method() {
        let mut drive = RecordingDrive::new();
        drive.issue(DriveCommand::Forward(150));
        drive.issue(DriveCommand::CurveLeft(150));
        drive.issue(DriveCommand::Stop);
        assert_eq!(
            drive.log,
            vec![
                DriveCommand::Forward(150),
                DriveCommand::CurveLeft(150),
                DriveCommand::Stop,
            ]
        );
    }
}
