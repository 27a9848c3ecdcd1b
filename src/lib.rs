//! # goap-planner
//!
//! A Goal-Oriented Action Planner. Given a catalog of actions (preconditions,
//! effects and cost) and a set of valued goals, it finds the cheapest action
//! sequence to each goal from the current world state and ranks the results
//! by net value.
//!
//! The default search chains backwards from each goal, so actions that cannot
//! help are never looked at; [`PlanningSystem::prune`] drops them from the
//! catalog up front.
//!
//! ```
//! use std::sync::Arc;
//! use goap_planner::{
//!     Action, Conditions, GoapPlanner, Goal, Planner, PlanningSystem, StaticDeterminer,
//! };
//!
//! let system = PlanningSystem::new(
//!     vec![
//!         Action::new("A", 1.0).unwrap().with_effect("hasKey", true),
//!         Action::new("B", 2.0)
//!             .unwrap()
//!             .with_precondition("hasKey", true)
//!             .with_effect("doorOpen", true),
//!     ],
//!     vec![Goal::new("open_door", 10.0).with_precondition("doorOpen", true)],
//! )
//! .unwrap();
//!
//! let planner = GoapPlanner::new(Arc::new(StaticDeterminer::new(Conditions::new())));
//! let best = planner.best_value_plan_to_any_goal(&system).unwrap().unwrap();
//!
//! assert_eq!(best.action_names(), vec!["A", "B"]);
//! assert_eq!(best.net_value(&planner.world_state().unwrap()), 7.0);
//! ```

mod action;
mod condition;
mod config;
mod error;
mod goal;
mod observer;
mod plan;
mod planner;
mod search;
mod system;
mod utility;
mod world_state;

pub use action::{Action, Cost, StateFn};
pub use condition::{Condition, ConditionValue, Conditions};
pub use config::{HeuristicKind, PlannerConfig, ScoringStrategy, SearchStrategy};
pub use error::{PlannerError, Result};
pub use goal::{Goal, Value};
pub use observer::{LogObserver, NoopObserver, PlanObserver};
pub use plan::{Plan, PlanScorer, ValueMinusCost, WeightedCost};
pub use planner::{GoapPlanner, Planner};
pub use search::{
    ForwardSearch, Heuristic, RegressionSearch, SearchAlgorithm, UnsatisfiedCountHeuristic,
    ZeroHeuristic,
};
pub use system::PlanningSystem;
pub use tokio_util::sync::CancellationToken;
pub use world_state::{
    FnDeterminer, StaticDeterminer, WorldState, WorldStateCache, WorldStateDeterminer,
};
