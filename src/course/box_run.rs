//! Section 1: black line maze with obstacles and the box pickup.
//!
//! The robot follows the black line through the maze, detouring right
//! around each obstacle it meets. Two obstacles stand between the start
//! and the box zone, so the green zone only routes to the box approach
//! once both have been cleared; a green patch seen earlier on the course
//! is a decoy. After the grab the robot carries the box along the line to
//! the red delivery zone.

use crate::color::Color;
use crate::config::RobotConfig;
use crate::mission::{Guard, Mission, NavOutcome, Rule, StateAction, StateSpec, TimeoutRule};

/// Obstacles between the start and the box zone.
const OBSTACLES_BEFORE_BOX: u8 = 2;

/// Builds the section 1 table.
pub fn box_run(config: &RobotConfig) -> Mission {
    let pickup = config.distances.box_pickup_cm;
    let budgets = config.budgets;

    Mission {
        name:   "box-run",
        states: vec![
            // 0
            StateSpec {
                name:    "FOLLOW_LINE",
                action:  StateAction::FollowLine,
                rules:   vec![
                    Rule {
                        when: Guard::AllOf(vec![
                            Guard::ColorIs(Color::Green),
                            Guard::ObstaclesAtLeast(OBSTACLES_BEFORE_BOX),
                        ]),
                        next: 2,
                    },
                    Rule { when: Guard::DistanceBelow(pickup), next: 3 },
                    Rule { when: Guard::Outcome(NavOutcome::Obstacle), next: 1 },
                ],
                timeout: Some(TimeoutRule { budget: budgets.transit, next: 2 }),
            },
            // 1
            StateSpec {
                name:    "AVOID_OBSTACLE",
                action:  StateAction::Avoid,
                rules:   vec![Rule { when: Guard::Always, next: 0 }],
                timeout: None,
            },
            // 2
            StateSpec {
                name:    "APPROACH_BOX",
                action:  StateAction::Approach { threshold_cm: pickup },
                rules:   vec![Rule {
                    when: Guard::Outcome(NavOutcome::TargetFound),
                    next: 3,
                }],
                timeout: Some(TimeoutRule { budget: budgets.search, next: 3 }),
            },
            // 3
            StateSpec {
                name:    "PICKUP",
                action:  StateAction::Pickup,
                rules:   vec![
                    Rule { when: Guard::Holding(true), next: 4 },
                    // Grab came up empty: line up on the box again.
                    Rule { when: Guard::Always, next: 2 },
                ],
                timeout: None,
            },
            // 4
            StateSpec {
                name:    "CARRY_TO_ZONE",
                action:  StateAction::FollowLine,
                rules:   vec![
                    Rule { when: Guard::ColorIs(Color::Red), next: 6 },
                    Rule { when: Guard::Outcome(NavOutcome::Obstacle), next: 5 },
                ],
                timeout: Some(TimeoutRule { budget: budgets.ret, next: 6 }),
            },
            // 5
            StateSpec {
                name:    "AVOID_LOADED",
                action:  StateAction::Avoid,
                rules:   vec![Rule { when: Guard::Always, next: 4 }],
                timeout: None,
            },
            // 6
            StateSpec {
                name:    "FINISH",
                action:  StateAction::Finish { flourish: true },
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
    fn green_routes_to_the_box_only_after_both_obstacles() {
        let mission = box_run(&RobotConfig::default());
        let follow = &mission.states[0];

        // The count-gated rule sits first so it wins over the plain
        // obstacle rule once the gate opens.
        assert!(matches!(
            follow.rules[0].when,
            Guard::AllOf(ref inner) if inner.contains(&Guard::ObstaclesAtLeast(2))
        ));
    }

    #[test]
    fn pickup_retries_through_the_approach_state() {
        let mission = box_run(&RobotConfig::default());
        let pickup = &mission.states[3];
        assert_eq!(pickup.rules[0].when, Guard::Holding(true));
        assert_eq!(pickup.rules[1].next, 2);
    }
}
