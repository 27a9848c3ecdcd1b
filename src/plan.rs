//! Plans and how they are scored.
//!
//! A [`Plan`] is the immutable result of a successful search: the goal it
//! reaches and the actions to run, first action first. Its net value is
//! computed by a [`PlanScorer`]; the default is goal value minus total cost.

use std::fmt;
use std::sync::Arc;

use crate::{Action, Goal, WorldState};

/// Scores a plan against a world state. Higher is better.
pub trait PlanScorer: Send + Sync {
    /// # Arguments
    ///
    /// * `plan` - The plan to value
    /// * `state` - The world state goal values and costs are evaluated in
    ///
    /// # Returns
    ///
    /// The plan's net value. Rankings sort on it, highest first.
    fn score(&self, plan: &Plan, state: &WorldState) -> f64;
}

/// `goal value - total cost`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueMinusCost;

impl PlanScorer for ValueMinusCost {
    fn score(&self, plan: &Plan, state: &WorldState) -> f64 {
        plan.goal().value_in(state) - plan.cost_in(state)
    }
}

/// `goal value - cost_weight * total cost`.
#[derive(Debug, Clone, Copy)]
pub struct WeightedCost {
    pub cost_weight: f64,
}

impl PlanScorer for WeightedCost {
    fn score(&self, plan: &Plan, state: &WorldState) -> f64 {
        plan.goal().value_in(state) - self.cost_weight * plan.cost_in(state)
    }
}

/// An ordered sequence of actions reaching a goal.
#[derive(Clone)]
pub struct Plan {
    goal: Goal,
    actions: Vec<Action>,
    cost: f64,
    scorer: Arc<dyn PlanScorer>,
}

impl Plan {
    /// Builds a plan, pricing each action in `state`.
    ///
    /// ```
    /// use goap_planner::{Action, Goal, Plan, WorldState};
    ///
    /// let goal = Goal::new("open", 10.0).with_precondition("door_open", true);
    /// let actions = vec![
    ///     Action::new("get_key", 1.0).unwrap(),
    ///     Action::new("unlock", 2.0).unwrap(),
    /// ];
    /// let state = WorldState::empty();
    /// let plan = Plan::new(goal, actions, &state);
    ///
    /// assert_eq!(plan.cost(), 3.0);
    /// assert_eq!(plan.net_value(&state), 7.0);
    /// ```
    pub fn new(goal: Goal, actions: Vec<Action>, state: &WorldState) -> Self {
        let cost = actions.iter().map(|a| a.cost_in(state)).sum();
        Self::with_cost(goal, actions, cost)
    }

    pub(crate) fn with_cost(goal: Goal, actions: Vec<Action>, cost: f64) -> Self {
        Self {
            goal,
            actions,
            cost,
            scorer: Arc::new(ValueMinusCost),
        }
    }

    /// Replaces the scoring strategy used by [`net_value`](Self::net_value).
    pub fn with_scorer(mut self, scorer: Arc<dyn PlanScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Actions in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    /// Total cost in the state the plan was found in.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Total cost re-evaluated in `state`.
    pub fn cost_in(&self, state: &WorldState) -> f64 {
        self.actions.iter().map(|a| a.cost_in(state)).sum()
    }

    pub fn net_value(&self, state: &WorldState) -> f64 {
        self.scorer.score(self, state)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl PartialEq for Plan {
    fn eq(&self, other: &Self) -> bool {
        self.goal.name == other.goal.name
            && self.cost.to_bits() == other.cost.to_bits()
            && self.actions == other.actions
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("goal", &self.goal.name)
            .field("actions", &self.action_names())
            .field("cost", &self.cost)
            .finish()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.is_empty() {
            write!(f, "[] (cost {})", self.cost)
        } else {
            write!(f, "{} (cost {})", self.action_names().join(" -> "), self.cost)
        }
    }
}
