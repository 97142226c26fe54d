//! Table-driven mission state machine.
//!
//! Each course section is a small finite-state program. Rather than three
//! hand-written switch blocks, a section is described as *data*, a
//! [`Mission`] table of [`StateSpec`] rows, and one generic
//! [`MissionRunner`] executes any table: per tick it reads one sensor
//! snapshot, runs the current state's [`StateAction`], and walks the
//! state's [`Rule`] list in order, taking the first transition whose
//! [`Guard`] matches.
//!
//! # Deadline fallbacks
//!
//! Any state that waits on an external condition carries a
//! [`TimeoutRule`]. The budget is checked *before* the state acts, and
//! exceeding it forces the fallback transition regardless of what the
//! sensors say: a missed detection can delay the mission but never
//! stall it. There is no state without an exit path;
//! [`Mission::validate`] rejects tables that have one.
//!
//! # Ownership
//!
//! The runner owns the [`Navigator`] and the mission counters
//! (`obstacles_cleared`, `holding_payload`). Exactly one state handler is
//! dispatched per tick, so the actuators have a single writer by
//! construction. A transition resets the navigator's search state, stamps
//! the entry time, and appends to a bounded transition trace.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use talos::config::RobotConfig;
//! use talos::mission::{Mission, MissionRunner, StateAction, StateSpec, TimeoutRule};
//!
//! let mission = Mission {
//!     name:   "demo",
//!     states: vec![
//!         StateSpec {
//!             name:    "WAIT",
//!             action:  StateAction::FollowLine,
//!             rules:   vec![],
//!             timeout: Some(TimeoutRule { budget: Duration::from_secs(3), next: 1 }),
//!         },
//!         StateSpec {
//!             name:    "FINISH",
//!             action:  StateAction::Finish { flourish: false },
//!             rules:   vec![],
//!             timeout: None,
//!         },
//!     ],
//! };
//! assert!(mission.validate().is_ok());
//! let _runner = MissionRunner::new(mission, &RobotConfig::default());
//! ```

use std::time::Duration;

use log::{info, warn};

use crate::color::Color;
use crate::config::RobotConfig;
use crate::navigation::Navigator;
pub use crate::navigation::NavOutcome;
use crate::peripherals::{Drive, Gripper, SensorArray, SensorSnapshot};
use crate::time::Clock;

/// What a state does each tick it is dispatched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateAction {
    /// Follow the black line on the reflectance pair.
    FollowLine,
    /// Follow a line of the given color.
    FollowColorLine(Color),
    /// Work toward the center of the concentric rings.
    RingCenter,
    /// Crawl forward until the range drops inside the threshold.
    Approach { threshold_cm: f64 },
    /// Round the obstacle ahead on its right side (blocking compound).
    /// Completing it increments the mission's obstacle counter.
    Avoid,
    /// Grab the payload (blocking gripper compound).
    Pickup,
    /// Release the payload (blocking gripper compound).
    Drop,
    /// Launch the ball (blocking gripper compound).
    Launch,
    /// Pivot-search for a colored line (blocking, deadline-bounded).
    SearchLine { target: Color, budget: Duration },
    /// Terminal: stop all actuation, optionally play the victory wiggle.
    Finish { flourish: bool },
}

/// A transition guard, evaluated against one tick's context.
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    /// The state's action returned this outcome.
    Outcome(NavOutcome),
    /// `0 < distance <= threshold` this tick.
    DistanceBelow(f64),
    /// This tick's color equals the given one.
    ColorIs(Color),
    /// This tick's color is recognized and differs from the given one.
    ColorOtherThan(Color),
    /// At least this many obstacles cleared so far in the run.
    ObstaclesAtLeast(u8),
    /// The gripper's logical payload state matches.
    Holding(bool),
    /// Matches unconditionally.
    Always,
    /// Every inner guard matches.
    AllOf(Vec<Guard>),
}

struct GuardContext<'a> {
    snapshot:          &'a SensorSnapshot,
    outcome:           NavOutcome,
    obstacles_cleared: u8,
    holding:           bool,
}

impl Guard {
    fn matches(&self, ctx: &GuardContext<'_>) -> bool {
        match self {
            Guard::Outcome(expected) => ctx.outcome == *expected,
            Guard::DistanceBelow(cm) => {
                ctx.snapshot.distance > 0.0 && ctx.snapshot.distance <= *cm
            }
            Guard::ColorIs(color) => ctx.snapshot.color == *color,
            Guard::ColorOtherThan(color) => {
                ctx.snapshot.color.is_recognized() && ctx.snapshot.color != *color
            }
            Guard::ObstaclesAtLeast(n) => ctx.obstacles_cleared >= *n,
            Guard::Holding(state) => ctx.holding == *state,
            Guard::Always => true,
            Guard::AllOf(inner) => inner.iter().all(|g| g.matches(ctx)),
        }
    }
}

/// One transition rule; rules are evaluated in declared order and the
/// first match wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub when: Guard,
    pub next: usize,
}

/// The forced fallback for a state that waits on an external condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutRule {
    pub budget: Duration,
    pub next:   usize,
}

/// One row of a mission table.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpec {
    pub name:    &'static str,
    pub action:  StateAction,
    pub rules:   Vec<Rule>,
    pub timeout: Option<TimeoutRule>,
}

impl StateSpec {
    fn is_terminal(&self) -> bool { matches!(self.action, StateAction::Finish { .. }) }
}

/// A complete course section as data. Execution starts at state 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub name:   &'static str,
    pub states: Vec<StateSpec>,
}

impl Mission {
    /// Checks the table is runnable: non-empty, every transition target in
    /// range, and every non-terminal state has an exit path (an `Always`
    /// rule or a timeout).
    pub fn validate(&self) -> Result<(), String> {
        if self.states.is_empty() {
            return Err(format!("mission {}: no states", self.name));
        }

        for (idx, state) in self.states.iter().enumerate() {
            for rule in &state.rules {
                if rule.next >= self.states.len() {
                    return Err(format!(
                        "mission {}: state {} routes to missing state {}",
                        self.name, state.name, rule.next
                    ));
                }
            }
            if let Some(timeout) = &state.timeout {
                if timeout.next >= self.states.len() {
                    return Err(format!(
                        "mission {}: state {} timeout routes to missing state {}",
                        self.name, state.name, timeout.next
                    ));
                }
            }

            let has_always = state.rules.iter().any(|r| r.when == Guard::Always);
            if !state.is_terminal() && !has_always && state.timeout.is_none() {
                return Err(format!(
                    "mission {}: state {} ({}) has no exit path",
                    self.name, idx, state.name
                ));
            }
        }

        Ok(())
    }
}

/// Whether the mission is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionStatus {
    Running,
    Complete,
}

/// One recorded state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to:   usize,
    pub at:   Duration,
}

/// Capacity of the transition trace; later transitions are dropped.
const TRACE_CAP: usize = 32;

/// Executes one [`Mission`] table from boot to its terminal state.
///
/// Create one per run; it is never reset or reused. Once the terminal
/// state is entered, every further [`tick`](MissionRunner::tick) is a
/// no-op and no actuator is touched again.
pub struct MissionRunner {
    mission:           Mission,
    nav:               Navigator,
    loop_delay:        Duration,
    current:           usize,
    entered_at:        Duration,
    obstacles_cleared: u8,
    holding_payload:   bool,
    complete:          bool,
    trace:             heapless::Vec<Transition, TRACE_CAP>,
}

impl MissionRunner {
    /// Builds a runner for `mission`. A malformed table is logged and then
    /// run as far as it can go; use [`Mission::validate`] in tests to keep
    /// tables honest.
    pub fn new(mission: Mission, config: &RobotConfig) -> Self {
        if let Err(problem) = mission.validate() {
            warn!("{}", problem);
        }

        Self {
            nav: Navigator::new(config),
            loop_delay: config.timing.loop_delay,
            current: 0,
            entered_at: Duration::ZERO,
            obstacles_cleared: 0,
            holding_payload: false,
            complete: false,
            trace: heapless::Vec::new(),
            mission,
        }
    }

    /// Name of the state currently dispatched.
    pub fn current_state(&self) -> &'static str { self.mission.states[self.current].name }

    /// Obstacles cleared so far this run. Never resets mid-mission.
    pub fn obstacles_cleared(&self) -> u8 { self.obstacles_cleared }

    /// The gripper's logical payload state as the mission last saw it.
    pub fn holding_payload(&self) -> bool { self.holding_payload }

    /// Whether the terminal state has been entered.
    pub fn is_complete(&self) -> bool { self.complete }

    /// The recorded transitions, oldest first.
    pub fn trace(&self) -> &[Transition] { &self.trace }

    /// Runs one scheduling tick: deadline check, one snapshot, one state
    /// action, one transition at most.
    pub fn tick(
        &mut self,
        sensors: &mut impl SensorArray,
        drive: &mut impl Drive,
        gripper: &mut impl Gripper,
        clock: &mut impl Clock,
    ) -> MissionStatus {
        if self.complete {
            return MissionStatus::Complete;
        }

        // Forced fallback first: a blown budget transitions regardless of
        // what the sensors would have said this tick.
        if let Some(timeout) = self.mission.states[self.current].timeout {
            if clock.now().saturating_sub(self.entered_at) >= timeout.budget {
                warn!(
                    "{}: {} exceeded its {:?} budget",
                    self.mission.name,
                    self.current_state(),
                    timeout.budget
                );
                self.transition(timeout.next, drive, clock);
                return self.status();
            }
        }

        let snapshot = sensors.read_snapshot();
        let action = self.mission.states[self.current].action;
        let outcome = self.execute(action, &snapshot, sensors, drive, gripper, clock);

        let ctx = GuardContext {
            snapshot:          &snapshot,
            outcome,
            obstacles_cleared: self.obstacles_cleared,
            holding:           self.holding_payload,
        };
        let next = self.mission.states[self.current]
            .rules
            .iter()
            .find(|rule| rule.when.matches(&ctx))
            .map(|rule| rule.next);

        if let Some(next) = next {
            self.transition(next, drive, clock);
        }

        self.status()
    }

    /// Runs the fixed-rate control loop to completion: tick, sleep the
    /// loop period, repeat.
    pub fn run(
        &mut self,
        sensors: &mut impl SensorArray,
        drive: &mut impl Drive,
        gripper: &mut impl Gripper,
        clock: &mut impl Clock,
    ) {
        info!("mission {} started", self.mission.name);

        while self.tick(sensors, drive, gripper, clock) == MissionStatus::Running {
            clock.delay(self.loop_delay);
        }
    }

    fn status(&self) -> MissionStatus {
        if self.complete {
            MissionStatus::Complete
        } else {
            MissionStatus::Running
        }
    }

    fn execute(
        &mut self,
        action: StateAction,
        snapshot: &SensorSnapshot,
        sensors: &mut impl SensorArray,
        drive: &mut impl Drive,
        gripper: &mut impl Gripper,
        clock: &mut impl Clock,
    ) -> NavOutcome {
        match action {
            StateAction::FollowLine => self.nav.follow_line(snapshot, drive),
            StateAction::FollowColorLine(target) => {
                self.nav.follow_color_line(snapshot, target, drive)
            }
            StateAction::RingCenter => self.nav.ring_center(snapshot, drive, clock),
            StateAction::Approach { threshold_cm } => {
                self.nav.approach(snapshot, threshold_cm, drive)
            }
            StateAction::Avoid => {
                let outcome = self.nav.avoid_obstacle_right(sensors, drive, clock);
                self.obstacles_cleared += 1;
                info!("obstacle cleared ({} so far)", self.obstacles_cleared);
                outcome
            }
            StateAction::Pickup => {
                gripper.pickup();
                self.holding_payload = gripper.is_holding();
                NavOutcome::Continue
            }
            StateAction::Drop => {
                gripper.drop_payload();
                self.holding_payload = gripper.is_holding();
                NavOutcome::Continue
            }
            StateAction::Launch => {
                gripper.launch();
                self.holding_payload = gripper.is_holding();
                NavOutcome::Continue
            }
            StateAction::SearchLine { target, budget } => {
                if self.nav.search_for_line(target, budget, sensors, drive, clock) {
                    NavOutcome::TargetFound
                } else {
                    NavOutcome::Timeout
                }
            }
            // Terminal states are entered through transition() and never
            // dispatched; reaching here means the table starts terminal.
            StateAction::Finish { .. } => NavOutcome::Continue,
        }
    }

    fn transition(&mut self, to: usize, drive: &mut impl Drive, clock: &mut impl Clock) {
        let from = self.current;
        info!(
            "{}: {} -> {}",
            self.mission.name, self.mission.states[from].name, self.mission.states[to].name
        );

        let _ = self.trace.push(Transition { from, to, at: clock.now() });
        self.current = to;
        self.entered_at = clock.now();
        self.nav.reset(clock);

        if let StateAction::Finish { flourish } = self.mission.states[to].action {
            drive.stop();
            if flourish {
                self.nav.flourish(drive, clock);
            }
            info!("mission {} complete", self.mission.name);
            self.complete = true;
        }
    }
}
