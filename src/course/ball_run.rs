//! Section 3: ramp climb, ball search, launch, return to start.
//!
//! The ramp has no usable landmark at its crest, so the climb leg is
//! budget-bounded: follow the line upward and assume the top once the
//! ramp budget elapses. The ball announces itself on the rangefinder
//! inside the detect radius; the robot closes to launch range, flicks it
//! with the arm, and follows the line back until the white start zone
//! appears under the color sensor. Every leg falls forward on its
//! budget: a missed ball costs points, a stalled robot costs the run.

use crate::color::Color;
use crate::config::RobotConfig;
use crate::mission::{Guard, Mission, NavOutcome, Rule, StateAction, StateSpec, TimeoutRule};

/// Builds the section 3 table.
pub fn ball_run(config: &RobotConfig) -> Mission {
    let distances = config.distances;
    let budgets = config.budgets;

    Mission {
        name:   "ball-run",
        states: vec![
            // 0
            StateSpec {
                name:    "CLIMB_RAMP",
                action:  StateAction::FollowLine,
                rules:   vec![],
                timeout: Some(TimeoutRule { budget: budgets.ramp, next: 1 }),
            },
            // 1
            StateSpec {
                name:    "SEARCH_BALL",
                action:  StateAction::Approach { threshold_cm: distances.ball_detect_cm },
                rules:   vec![Rule {
                    when: Guard::Outcome(NavOutcome::TargetFound),
                    next: 2,
                }],
                // No ball found in time: skip it and bring the run home.
                timeout: Some(TimeoutRule { budget: budgets.search, next: 4 }),
            },
            // 2
            StateSpec {
                name:    "APPROACH_BALL",
                action:  StateAction::Approach { threshold_cm: distances.box_pickup_cm },
                rules:   vec![Rule {
                    when: Guard::Outcome(NavOutcome::TargetFound),
                    next: 3,
                }],
                timeout: Some(TimeoutRule { budget: budgets.search, next: 3 }),
            },
            // 3
            StateSpec {
                name:    "LAUNCH",
                action:  StateAction::Launch,
                rules:   vec![Rule { when: Guard::Always, next: 4 }],
                timeout: None,
            },
            // 4
            StateSpec {
                name:    "RETURN_HOME",
                action:  StateAction::FollowLine,
                rules:   vec![Rule { when: Guard::ColorIs(Color::White), next: 5 }],
                timeout: Some(TimeoutRule { budget: budgets.ret, next: 5 }),
            },
            // 5
            StateSpec {
                name:    "FINISH",
                action:  StateAction::Finish { flourish: false },
                rules:   vec![],
                timeout: None,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_climb_is_budget_bounded_only() {
        let mission = ball_run(&RobotConfig::default());
        let climb = &mission.states[0];
        assert!(climb.rules.is_empty());
        assert_eq!(climb.timeout.unwrap().next, 1);
    }

    #[test]
    fn a_missed_ball_still_goes_home() {
        let mission = ball_run(&RobotConfig::default());
        let search = &mission.states[1];
        assert_eq!(search.timeout.unwrap().next, 4);
        assert_eq!(mission.states[4].name, "RETURN_HOME");
    }
}
