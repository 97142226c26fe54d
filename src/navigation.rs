//! Navigation decision engine.
//!
//! Maps one [`SensorSnapshot`] (plus a small amount of internal search
//! state) to one drive command and a coarse [`NavOutcome`] per tick. The
//! mission layer dispatches exactly one of these primitives per tick and
//! routes on the outcome; the primitives themselves hold no mission
//! knowledge.
//!
//! # Single-tick primitives versus compound maneuvers
//!
//! [`follow_line`](Navigator::follow_line),
//! [`follow_color_line`](Navigator::follow_color_line),
//! [`ring_center`](Navigator::ring_center) and
//! [`approach`](Navigator::approach) issue exactly one steady drive call
//! and return immediately; the drive command stays active between ticks
//! on purpose, because the caller re-invokes every loop period.
//!
//! [`avoid_obstacle_right`](Navigator::avoid_obstacle_right) and
//! [`search_for_line`](Navigator::search_for_line) are blocking compound
//! maneuvers: they own the actuator until they complete, stop between
//! sub-steps, and always end with the drive stopped. All of their turns
//! are dead-reckoned from the single calibrated 90-degree duration; no
//! feedback confirms the heading actually reached, and the resulting
//! drift is tolerated by design.
//!
//! # Example
//!
//! ```
//! use talos::navigation::{NavOutcome, Navigator};
//! use talos::config::RobotConfig;
//! use talos::sim::{RecordingDrive, ScriptedSensors};
//! use talos::peripherals::SensorArray;
//!
//! let mut nav = Navigator::new(&RobotConfig::default());
//! let mut drive = RecordingDrive::new();
//! let mut sensors = ScriptedSensors::on_line();
//!
//! let snapshot = sensors.read_snapshot();
//! assert_eq!(nav.follow_line(&snapshot, &mut drive), NavOutcome::Continue);
//! ```

use std::time::Duration;

use log::{debug, info};

use crate::color::Color;
use crate::config::{Distances, RobotConfig, Speeds, Timing};
use crate::peripherals::{Drive, SensorArray, SensorSnapshot, NO_ECHO_CM};
use crate::time::Clock;

/// Coarse result of one primitive invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Keep invoking this primitive.
    Continue,
    /// Reached the target color/position; drive is stopped.
    TargetFound,
    /// Obstacle inside the standoff range; drive is stopped.
    Obstacle,
    /// Lost the line; crawling slowly as a safe default.
    Lost,
    /// A bounded search ran out its deadline.
    Timeout,
}

/// Internal search state, reset by the mission layer on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    /// Fan-search swing direction: 1 = right, -1 = left.
    pub direction:  i8,
    /// Consecutive unproductive iterations of the current primitive.
    pub count:      u8,
    /// Timestamp of the last reset.
    pub last_reset: Duration,
}

impl SearchState {
    fn new() -> Self {
        Self {
            direction:  1,
            count:      0,
            last_reset: Duration::ZERO,
        }
    }
}

/// The navigation decision engine.
///
/// Owns a copy of the calibration set and the [`SearchState`]. One
/// instance serves an entire mission run; the mission layer calls
/// [`reset`](Navigator::reset) on every state transition so search
/// progress never leaks across states.
pub struct Navigator {
    speeds:    Speeds,
    distances: Distances,
    timing:    Timing,
    search:    SearchState,
}

impl Navigator {
    /// Creates an engine from the calibration set.
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            speeds:    config.speeds,
            distances: config.distances,
            timing:    config.timing,
            search:    SearchState::new(),
        }
    }

    /// Current search state, for telemetry and tests.
    pub fn search_state(&self) -> &SearchState { &self.search }

    /// Clears search progress and stamps the reset time.
    ///
    /// Called by the mission layer on every state transition.
    pub fn reset(&mut self, clock: &impl Clock) {
        self.search.direction = 1;
        self.search.count = 0;
        self.search.last_reset = clock.now();
    }

    /// Follows the black line using the reflectance sensor pair.
    ///
    /// Obstacle check first: anything inside the standoff range stops the
    /// drive and returns [`NavOutcome::Obstacle`] regardless of line
    /// state. Otherwise the correction curves *toward the engaged sensor*
    /// (left sensor on line, right off, curves left), which steers the
    /// robot's center back under the line. Both sensors dark drives
    /// straight; both blank crawls forward and reports
    /// [`NavOutcome::Lost`].
    pub fn follow_line(&mut self, snapshot: &SensorSnapshot, drive: &mut impl Drive) -> NavOutcome {
        if snapshot.obstacle_detected {
            drive.stop();
            return NavOutcome::Obstacle;
        }

        match (snapshot.left_on_line, snapshot.right_on_line) {
            (true, true) => drive.forward(self.speeds.normal),
            (true, false) => drive.curve_left(self.speeds.normal),
            (false, true) => drive.curve_right(self.speeds.normal),
            (false, false) => {
                drive.forward(self.speeds.slow);
                return NavOutcome::Lost;
            }
        }

        NavOutcome::Continue
    }

    /// Follows a line of `target` color using the color sensor.
    ///
    /// A *different* recognized color stops the drive and returns
    /// [`NavOutcome::TargetFound`]; that is how arrival at a
    /// differently-colored zone is detected. No color at all crawls
    /// forward and reports [`NavOutcome::Lost`] once the lost counter
    /// passes 10 consecutive ticks.
    pub fn follow_color_line(
        &mut self,
        snapshot: &SensorSnapshot,
        target: Color,
        drive: &mut impl Drive,
    ) -> NavOutcome {
        if snapshot.obstacle_detected {
            drive.stop();
            return NavOutcome::Obstacle;
        }

        if snapshot.color == target {
            drive.forward(self.speeds.normal);
            self.search.count = 0;
            return NavOutcome::Continue;
        }

        if snapshot.color.is_recognized() {
            drive.stop();
            return NavOutcome::TargetFound;
        }

        drive.forward(self.speeds.slow);
        self.search.count = self.search.count.saturating_add(1);

        if self.search.count > 10 {
            return NavOutcome::Lost;
        }

        NavOutcome::Continue
    }

    /// Works toward the center of a set of concentric colored rings.
    ///
    /// Creeps forward one fixed step; a color change against the previous
    /// tick means a ring boundary was just crossed and returns
    /// [`NavOutcome::TargetFound`]. Going straight without crossing
    /// anything for six ticks triggers one fan-search swing: a single
    /// pivot in the current search direction, after which the direction
    /// flips so consecutive swings alternate sides.
    pub fn ring_center(
        &mut self,
        snapshot: &SensorSnapshot,
        drive: &mut impl Drive,
        clock: &mut impl Clock,
    ) -> NavOutcome {
        drive.forward(self.speeds.slow);
        clock.delay(self.timing.ring_step);

        if snapshot.crossed_boundary() {
            debug!(
                "ring boundary: {} -> {}",
                snapshot.previous_color, snapshot.color
            );
            self.search.count = 0;
            return NavOutcome::TargetFound;
        }

        self.search.count += 1;

        if self.search.count > 5 {
            if self.search.direction > 0 {
                drive.pivot_right(self.speeds.turn);
            } else {
                drive.pivot_left(self.speeds.turn);
            }
            clock.delay(self.timing.search_swing);
            drive.stop();

            self.search.direction = -self.search.direction;
            self.search.count = 0;
        }

        NavOutcome::Continue
    }

    /// Crawls toward a target while the range exceeds `threshold_cm`.
    ///
    /// Stops and returns [`NavOutcome::TargetFound`] on the first tick the
    /// reading is inside the threshold. The no-echo sentinel keeps
    /// crawling; absence of echo is absence of target, not arrival.
    pub fn approach(
        &mut self,
        snapshot: &SensorSnapshot,
        threshold_cm: f64,
        drive: &mut impl Drive,
    ) -> NavOutcome {
        if snapshot.distance > 0.0 && snapshot.distance <= threshold_cm {
            drive.stop();
            return NavOutcome::TargetFound;
        }

        drive.forward(self.speeds.slow);
        NavOutcome::Continue
    }

    /// Rounds an obstacle on its right side. Blocking compound maneuver.
    ///
    /// Fixed sequence: stop, pivot right 90, forward past the near edge,
    /// pivot left 90, wall-hug along the obstacle until it falls away,
    /// pivot left 90, forward across the far side, pivot right 90 to
    /// resume the original heading, stop. Every turn is dead-reckoned.
    pub fn avoid_obstacle_right(
        &mut self,
        sensors: &mut impl SensorArray,
        drive: &mut impl Drive,
        clock: &mut impl Clock,
    ) -> NavOutcome {
        debug!("rounding obstacle on the right");
        drive.stop();
        clock.delay(self.timing.pause);

        self.turn(90, self.speeds.turn, drive, clock);

        drive.forward(self.speeds.normal);
        clock.delay(self.timing.avoid_leg);

        self.turn(-90, self.speeds.turn, drive, clock);

        self.wall_hug_until_clear(30, sensors, drive, clock);

        self.turn(-90, self.speeds.turn, drive, clock);

        drive.forward(self.speeds.normal);
        clock.delay(self.timing.avoid_leg);

        self.turn(90, self.speeds.turn, drive, clock);

        drive.stop();
        NavOutcome::Continue
    }

    /// Runs beside a wall, holding the hug distance, until it falls away.
    ///
    /// Three zones around the target standoff: too close curves away from
    /// the wall, in tolerance drives straight, and a reading well past the
    /// standoff (or no echo) means the obstacle has been passed and the
    /// loop ends early. Always ends with the drive stopped.
    pub fn wall_hug_until_clear(
        &mut self,
        max_steps: u8,
        sensors: &mut impl SensorArray,
        drive: &mut impl Drive,
        clock: &mut impl Clock,
    ) {
        let hug = self.distances.wall_hug_cm;

        for _ in 0..max_steps {
            let dist = sensors.read_distance();

            if dist < hug - 3.0 {
                drive.curve_right(self.speeds.normal);
            } else if dist < hug + 5.0 && dist > 0.0 {
                drive.forward(self.speeds.normal);
            } else if dist > hug + 10.0 || dist >= NO_ECHO_CM {
                break;
            }

            clock.delay(self.timing.hug_step);
        }

        drive.stop();
    }

    /// Pivots alternately left and right until `target` is sighted or the
    /// wall-clock budget runs out. Blocking; returns whether the line was
    /// reacquired. Ends stopped either way.
    pub fn search_for_line(
        &mut self,
        target: Color,
        budget: Duration,
        sensors: &mut impl SensorArray,
        drive: &mut impl Drive,
        clock: &mut impl Clock,
    ) -> bool {
        let start = clock.now();

        while clock.now() - start < budget {
            let snapshot = sensors.read_snapshot();

            if snapshot.color == target {
                info!("reacquired {} line", target);
                drive.stop();
                return true;
            }

            if self.search.direction > 0 {
                drive.pivot_right(self.speeds.turn);
            } else {
                drive.pivot_left(self.speeds.turn);
            }
            clock.delay(self.timing.search_swing);
            drive.stop();

            self.search.direction = -self.search.direction;
        }

        false
    }

    /// Executes a dead-reckoned timed turn.
    ///
    /// Duration scales linearly from the calibrated 90-degree constant;
    /// positive degrees pivot right, negative pivot left. Ends with a stop
    /// and a short settle pause.
    pub fn turn(
        &mut self,
        degrees: i16,
        speed: u8,
        drive: &mut impl Drive,
        clock: &mut impl Clock,
    ) {
        let ms = u64::from(degrees.unsigned_abs()) * self.timing.turn_90.as_millis() as u64 / 90;

        if degrees > 0 {
            drive.pivot_right(speed);
        } else {
            drive.pivot_left(speed);
        }

        clock.delay(Duration::from_millis(ms));
        drive.stop();
        clock.delay(self.timing.settle);
    }

    /// Short left-right victory wiggle for a finished course section.
    pub fn flourish(&mut self, drive: &mut impl Drive, clock: &mut impl Clock) {
        self.turn(45, self.speeds.turn, drive, clock);
        self.turn(-90, self.speeds.turn, drive, clock);
        self.turn(45, self.speeds.turn, drive, clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripherals::DriveCommand;
    use crate::sim::{FakeClock, RecordingDrive, ScriptedSensors};

    fn nav() -> Navigator { Navigator::new(&RobotConfig::default()) }

    fn snap(left: bool, right: bool) -> SensorSnapshot {
        SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::None, Color::None, left, right)
    }

    fn color_snap(color: Color, previous: Color) -> SensorSnapshot {
        SensorSnapshot::new(NO_ECHO_CM, 15.0, color, previous, false, false)
    }

    #[test]
    fn both_sensors_on_line_drives_straight() {
        let mut drive = RecordingDrive::new();
        let outcome = nav().follow_line(&snap(true, true), &mut drive);
        assert_eq!(outcome, NavOutcome::Continue);
        assert_eq!(drive.log, vec![DriveCommand::Forward(150)]);
    }

    #[test]
    fn left_only_curves_left_never_right() {
        // The correction steers toward the engaged sensor.
        let mut drive = RecordingDrive::new();
        let outcome = nav().follow_line(&snap(true, false), &mut drive);
        assert_eq!(outcome, NavOutcome::Continue);
        assert_eq!(drive.log, vec![DriveCommand::CurveLeft(150)]);
    }

    #[test]
    fn right_only_curves_right() {
        let mut drive = RecordingDrive::new();
        nav().follow_line(&snap(false, true), &mut drive);
        assert_eq!(drive.log, vec![DriveCommand::CurveRight(150)]);
    }

    #[test]
    fn both_blank_crawls_and_reports_lost() {
        let mut drive = RecordingDrive::new();
        let outcome = nav().follow_line(&snap(false, false), &mut drive);
        assert_eq!(outcome, NavOutcome::Lost);
        assert_eq!(drive.log, vec![DriveCommand::Forward(100)]);
    }

    #[test]
    fn obstacle_takes_priority_over_line_state() {
        let mut drive = RecordingDrive::new();
        let snapshot = SensorSnapshot::new(8.0, 15.0, Color::None, Color::None, true, false);
        let outcome = nav().follow_line(&snapshot, &mut drive);
        assert_eq!(outcome, NavOutcome::Obstacle);
        assert_eq!(drive.log, vec![DriveCommand::Stop]);
    }

    #[test]
    fn color_line_on_target_resets_lost_counter() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();

        // Drift off the line for a few ticks, then find it again.
        for _ in 0..5 {
            nav.follow_color_line(&color_snap(Color::None, Color::None), Color::Blue, &mut drive);
        }
        assert_eq!(nav.search_state().count, 5);

        let outcome =
            nav.follow_color_line(&color_snap(Color::Blue, Color::None), Color::Blue, &mut drive);
        assert_eq!(outcome, NavOutcome::Continue);
        assert_eq!(nav.search_state().count, 0);
    }

    #[test]
    fn color_line_different_color_is_arrival() {
        let mut drive = RecordingDrive::new();
        let outcome = nav().follow_color_line(
            &color_snap(Color::Red, Color::Blue),
            Color::Blue,
            &mut drive,
        );
        assert_eq!(outcome, NavOutcome::TargetFound);
        assert_eq!(drive.log, vec![DriveCommand::Stop]);
    }

    #[test]
    fn color_line_reports_lost_after_eleven_blank_ticks() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();

        for _ in 0..10 {
            let outcome = nav.follow_color_line(
                &color_snap(Color::None, Color::None),
                Color::Blue,
                &mut drive,
            );
            assert_eq!(outcome, NavOutcome::Continue);
        }

        let outcome =
            nav.follow_color_line(&color_snap(Color::None, Color::None), Color::Blue, &mut drive);
        assert_eq!(outcome, NavOutcome::Lost);
    }

    #[test]
    fn ring_center_detects_boundary_crossing() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();

        let outcome = nav.ring_center(&color_snap(Color::Green, Color::Red), &mut drive, &mut clock);
        assert_eq!(outcome, NavOutcome::TargetFound);
    }

    #[test]
    fn ring_center_pivots_once_after_six_unchanged_ticks() {
        let mut nav = nav();
        let mut clock = FakeClock::new();
        let unchanged = color_snap(Color::Red, Color::Red);

        // Five unproductive ticks: forward only, no pivot yet.
        for _ in 0..5 {
            let mut drive = RecordingDrive::new();
            nav.ring_center(&unchanged, &mut drive, &mut clock);
            assert_eq!(drive.log, vec![DriveCommand::Forward(100)]);
        }

        // Sixth tick: exactly one pivot, right first, then the direction flips.
        let mut drive = RecordingDrive::new();
        nav.ring_center(&unchanged, &mut drive, &mut clock);
        assert_eq!(
            drive.log,
            vec![
                DriveCommand::Forward(100),
                DriveCommand::PivotRight(120),
                DriveCommand::Stop,
            ]
        );
        assert_eq!(nav.search_state().direction, -1);

        // The next trigger swings the other way.
        for _ in 0..5 {
            let mut drive = RecordingDrive::new();
            nav.ring_center(&unchanged, &mut drive, &mut clock);
        }
        let mut drive = RecordingDrive::new();
        nav.ring_center(&unchanged, &mut drive, &mut clock);
        assert!(drive.log.contains(&DriveCommand::PivotLeft(120)));
        assert_eq!(nav.search_state().direction, 1);
    }

    #[test]
    fn approach_stops_inside_threshold() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();

        let far = SensorSnapshot::new(40.0, 15.0, Color::None, Color::None, false, false);
        assert_eq!(nav.approach(&far, 5.0, &mut drive), NavOutcome::Continue);

        let near = SensorSnapshot::new(4.0, 15.0, Color::None, Color::None, false, false);
        assert_eq!(nav.approach(&near, 5.0, &mut drive), NavOutcome::TargetFound);
        assert_eq!(drive.log.last(), Some(&DriveCommand::Stop));
    }

    #[test]
    fn approach_keeps_crawling_on_no_echo() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let silent = SensorSnapshot::new(NO_ECHO_CM, 15.0, Color::None, Color::None, false, false);
        assert_eq!(nav.approach(&silent, 5.0, &mut drive), NavOutcome::Continue);
        assert_eq!(drive.log, vec![DriveCommand::Forward(100)]);
    }

    #[test]
    fn avoidance_issues_the_fixed_sequence_and_ends_stopped() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();
        // Wall falls away immediately: the hug loop exits on its first read.
        let mut sensors = ScriptedSensors::ranging(&[NO_ECHO_CM]);

        let outcome = nav.avoid_obstacle_right(&mut sensors, &mut drive, &mut clock);
        assert_eq!(outcome, NavOutcome::Continue);

        assert_eq!(
            drive.log,
            vec![
                DriveCommand::Stop,
                DriveCommand::PivotRight(120),
                DriveCommand::Stop,
                DriveCommand::Forward(150),
                DriveCommand::PivotLeft(120),
                DriveCommand::Stop,
                // wall-hug found no wall: just its closing stop
                DriveCommand::Stop,
                DriveCommand::PivotLeft(120),
                DriveCommand::Stop,
                DriveCommand::Forward(150),
                DriveCommand::PivotRight(120),
                DriveCommand::Stop,
                DriveCommand::Stop,
            ]
        );
        assert_eq!(drive.log.last(), Some(&DriveCommand::Stop));
    }

    #[test]
    fn wall_hug_zones_and_early_exit() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();
        // Too close, in tolerance, then the wall falls away.
        let mut sensors = ScriptedSensors::ranging(&[6.0, 11.0, 25.0]);

        nav.wall_hug_until_clear(30, &mut sensors, &mut drive, &mut clock);

        assert_eq!(
            drive.log,
            vec![
                DriveCommand::CurveRight(150),
                DriveCommand::Forward(150),
                DriveCommand::Stop,
            ]
        );
    }

    #[test]
    fn wall_hug_respects_the_step_budget() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();
        // Forever in tolerance: only the budget ends the loop.
        let mut sensors = ScriptedSensors::ranging(&[11.0]);

        nav.wall_hug_until_clear(4, &mut sensors, &mut drive, &mut clock);

        assert_eq!(drive.log.len(), 5);
        assert_eq!(drive.log.last(), Some(&DriveCommand::Stop));
    }

    #[test]
    fn line_search_alternates_and_gives_up_on_deadline() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();
        let mut sensors = ScriptedSensors::blank();

        let found = nav.search_for_line(
            Color::Blue,
            Duration::from_millis(900),
            &mut sensors,
            &mut drive,
            &mut clock,
        );
        assert!(!found);

        let pivots: Vec<_> = drive
            .log
            .iter()
            .filter(|c| matches!(c, DriveCommand::PivotLeft(_) | DriveCommand::PivotRight(_)))
            .collect();
        assert_eq!(
            pivots,
            vec![
                &DriveCommand::PivotRight(120),
                &DriveCommand::PivotLeft(120),
                &DriveCommand::PivotRight(120),
                &DriveCommand::PivotLeft(120),
                &DriveCommand::PivotRight(120),
            ]
        );
    }

    #[test]
    fn line_search_stops_on_sighting() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();
        let mut sensors = ScriptedSensors::colors(&[Color::None, Color::None, Color::Blue]);

        let found = nav.search_for_line(
            Color::Blue,
            Duration::from_secs(3),
            &mut sensors,
            &mut drive,
            &mut clock,
        );
        assert!(found);
        assert_eq!(drive.log.last(), Some(&DriveCommand::Stop));
    }

    #[test]
    fn timed_turn_scales_from_the_ninety_degree_constant() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();

        let before = clock.now();
        nav.turn(180, 120, &mut drive, &mut clock);
        let elapsed = clock.now() - before;

        // 180 degrees at 500 ms per 90, plus the 50 ms settle.
        assert_eq!(elapsed, Duration::from_millis(1050));
        assert_eq!(
            drive.log,
            vec![DriveCommand::PivotRight(120), DriveCommand::Stop]
        );

        let mut drive = RecordingDrive::new();
        nav.turn(-45, 120, &mut drive, &mut clock);
        assert_eq!(
            drive.log,
            vec![DriveCommand::PivotLeft(120), DriveCommand::Stop]
        );
    }

    #[test]
    fn reset_restores_direction_and_count() {
        let mut nav = nav();
        let mut drive = RecordingDrive::new();
        let mut clock = FakeClock::new();
        let unchanged = color_snap(Color::Red, Color::Red);

        for _ in 0..6 {
            nav.ring_center(&unchanged, &mut drive, &mut clock);
        }
        assert_eq!(nav.search_state().direction, -1);

        clock.advance(Duration::from_secs(1));
        nav.reset(&clock);
        assert_eq!(nav.search_state().direction, 1);
        assert_eq!(nav.search_state().count, 0);
        assert_eq!(nav.search_state().last_reset, clock.now());
    }
}
