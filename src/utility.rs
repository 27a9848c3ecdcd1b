//! Utility selection.
//!
//! Instead of searching toward goals, utility selection looks only at the
//! actions that can run right now and ranks them by what running each one is
//! worth. Every candidate becomes a one-step [`Plan`] whose goal is the
//! action's own effects, so the usual [`PlanScorer`] values it: with the
//! default scorer that is the action's value minus its cost.
//!
//! ```
//! use std::sync::Arc;
//! use goap_planner::{
//!     Action, Conditions, GoapPlanner, Planner, PlanningSystem, StaticDeterminer,
//! };
//!
//! let system = PlanningSystem::new(
//!     vec![
//!         Action::new("nap", 1.0).unwrap().with_effect("rested", true).with_value(2.0),
//!         Action::new("eat", 1.0).unwrap().with_effect("fed", true).with_value(5.0),
//!     ],
//!     vec![],
//! )
//! .unwrap();
//!
//! let planner = GoapPlanner::new(Arc::new(StaticDeterminer::new(Conditions::new())))
//!     .with_utility_selection(true);
//! let best = planner.best_value_plan_to_any_goal(&system).unwrap().unwrap();
//! assert_eq!(best.action_names(), vec!["eat"]);
//! ```

use std::sync::Arc;

use crate::{Action, Goal, Plan, PlanScorer, WorldState};

/// One-step plans for every action worth running in `state`, best first.
///
/// An action is a candidate when its preconditions hold and at least one of
/// its effects does not hold yet. Equal scores keep catalog order.
pub(crate) fn rank_performable(
    actions: &[Action],
    state: &WorldState,
    scorer: &Arc<dyn PlanScorer>,
) -> Vec<Plan> {
    let mut ranked: Vec<(f64, Plan)> = actions
        .iter()
        .filter(|action| action.can_perform(state) && !state.satisfies(&action.effects))
        .map(|action| {
            let plan = Plan::new(Goal::for_action(action), vec![action.clone()], state)
                .with_scorer(Arc::clone(scorer));
            (plan.net_value(state), plan)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    log::debug!(
        "{} of {} actions are performable candidates",
        ranked.len(),
        actions.len()
    );
    ranked.into_iter().map(|(_, plan)| plan).collect()
}
