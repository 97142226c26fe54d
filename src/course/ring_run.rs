//! Section 2: blue line into the ring field, payload drop at the center.
//!
//! The robot carries the box from section 1 along the blue line. Arrival
//! at the ring field announces itself as a different recognized color
//! under the sensor; from there the robot works inward across the outer,
//! middle, and inner ring boundaries and drops the box once the inner
//! boundary is behind it. Losing the blue line hands over to a bounded
//! pivot search before pressing on.

use crate::color::Color;
use crate::config::RobotConfig;
use crate::mission::{Guard, Mission, NavOutcome, Rule, StateAction, StateSpec, TimeoutRule};

/// Builds the section 2 table.
pub fn ring_run(config: &RobotConfig) -> Mission {
    let budgets = config.budgets;

    let ring_state = |name: &'static str, next: usize| StateSpec {
        name,
        action: StateAction::RingCenter,
        rules: vec![Rule {
            when: Guard::Outcome(NavOutcome::TargetFound),
            next,
        }],
        timeout: Some(TimeoutRule { budget: budgets.search, next }),
    };

    Mission {
        name:   "ring-run",
        states: vec![
            // 0
            StateSpec {
                name:    "FOLLOW_BLUE",
                action:  StateAction::FollowColorLine(Color::Blue),
                rules:   vec![
                    Rule { when: Guard::Outcome(NavOutcome::TargetFound), next: 2 },
                    Rule { when: Guard::Outcome(NavOutcome::Lost), next: 1 },
                ],
                timeout: Some(TimeoutRule { budget: budgets.transit, next: 2 }),
            },
            // 1
            StateSpec {
                name:    "SEARCH_BLUE",
                action:  StateAction::SearchLine {
                    target: Color::Blue,
                    budget: budgets.search,
                },
                rules:   vec![
                    Rule { when: Guard::Outcome(NavOutcome::TargetFound), next: 0 },
                    // Deadline blown: assume we are already at the rings.
                    Rule { when: Guard::Always, next: 2 },
                ],
                timeout: None,
            },
            // 2, 3, 4
            ring_state("RING_OUTER", 3),
            ring_state("RING_MIDDLE", 4),
            ring_state("RING_INNER", 5),
            // 5
            StateSpec {
                name:    "DROP",
                action:  StateAction::Drop,
                rules:   vec![Rule { when: Guard::Holding(false), next: 6 }],
                timeout: Some(TimeoutRule { budget: budgets.search, next: 6 }),
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
