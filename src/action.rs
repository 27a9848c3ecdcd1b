//! # Actions
//!
//! An action is something an agent can do: it has a unique name, the
//! preconditions that must hold before it runs, the effects guaranteed to hold
//! after it runs, and a non-negative cost.
//!
//! Costs are usually fixed, but may also be computed from the world state the
//! planner reasons over, for actions whose price depends on circumstances.
//!
//! ```
//! use goap_planner::{Action, Conditions, WorldState};
//!
//! let chop_wood = Action::new("chop_wood", 2.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("has_wood", true);
//!
//! let state = WorldState::new(Conditions::new().with("has_axe", true));
//! assert!(chop_wood.can_perform(&state));
//!
//! let after = chop_wood.apply_to(&state);
//! assert!(after.satisfies(&Conditions::new().with("has_wood", true)));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{ConditionValue, Conditions, PlannerError, Result, Value, WorldState};

/// Signature of a state-dependent cost or value.
pub type StateFn = Arc<dyn Fn(&WorldState) -> f64 + Send + Sync>;

/// The cost of performing an action.
#[derive(Clone)]
pub enum Cost {
    Fixed(f64),
    /// Evaluated against the episode's world state.
    Dynamic(StateFn),
}

impl Cost {
    /// Raw cost in `state`, without clamping.
    pub fn evaluate(&self, state: &WorldState) -> f64 {
        match self {
            Cost::Fixed(cost) => *cost,
            Cost::Dynamic(func) => func(state),
        }
    }
}

impl fmt::Debug for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Fixed(cost) => write!(f, "Fixed({})", cost),
            Cost::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cost::Fixed(a), Cost::Fixed(b)) => a == b,
            (Cost::Dynamic(a), Cost::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// An operation the planner may schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Unique within a planning system
    pub name: String,
    /// Must hold before the action runs
    pub preconditions: Conditions,
    /// Guaranteed to hold after the action runs
    pub effects: Conditions,
    cost: Cost,
    /// Worth of running the action on its own, used by utility selection
    value: Value,
}

impl Action {
    /// Creates an action with a fixed cost and no conditions.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidActionCost`] if `cost` is negative, NaN or
    /// infinite. A zero cost is allowed.
    ///
    /// ```
    /// use goap_planner::{Action, PlannerError};
    ///
    /// assert!(Action::new("rest", 0.0).is_ok());
    /// assert!(matches!(
    ///     Action::new("teleport", -1.0),
    ///     Err(PlannerError::InvalidActionCost { .. })
    /// ));
    /// ```
    pub fn new(name: impl Into<String>, cost: f64) -> Result<Self> {
        let name = name.into();
        if !cost.is_finite() || cost < 0.0 {
            return Err(PlannerError::InvalidActionCost { action: name, cost });
        }

        Ok(Self {
            name,
            preconditions: Conditions::new(),
            effects: Conditions::new(),
            cost: Cost::Fixed(cost),
            value: Value::Fixed(0.0),
        })
    }

    /// Creates an action whose cost is computed from the world state.
    pub fn with_dynamic_cost<F>(name: impl Into<String>, cost: F) -> Self
    where
        F: Fn(&WorldState) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            preconditions: Conditions::new(),
            effects: Conditions::new(),
            cost: Cost::Dynamic(Arc::new(cost)),
            value: Value::Fixed(0.0),
        }
    }

    pub fn with_precondition(
        mut self,
        key: impl Into<String>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        self.preconditions.set(key, value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Sets what running this action is worth when actions are ranked by
    /// utility. Defaults to zero; ignored by goal search.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Value::Fixed(value);
        self
    }

    pub fn with_dynamic_value<F>(mut self, value: F) -> Self
    where
        F: Fn(&WorldState) -> f64 + Send + Sync + 'static,
    {
        self.value = Value::Dynamic(Arc::new(value));
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_in(&self, state: &WorldState) -> f64 {
        self.value.evaluate(state)
    }

    pub fn cost(&self) -> &Cost {
        &self.cost
    }

    /// The cost used for planning in `state`.
    ///
    /// Dynamic costs that come out negative or NaN are clamped to zero so
    /// that cost-ordered search stays well defined. Positive infinity is
    /// passed through: a plan through such an action costs infinity, so it
    /// ranks below every finite plan but can still be found when nothing
    /// cheaper reaches the goal.
    pub fn cost_in(&self, state: &WorldState) -> f64 {
        let cost = self.cost.evaluate(state);
        if cost.is_nan() || cost < 0.0 {
            log::warn!(
                "action {} evaluated to invalid cost {}, using 0",
                self.name,
                cost
            );
            return 0.0;
        }
        cost
    }

    /// Checks if this action's preconditions hold in `state`.
    pub fn can_perform(&self, state: &Conditions) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Returns the successor of `state` after this action's effects.
    pub fn apply_to(&self, state: &WorldState) -> WorldState {
        state.successor(&self.effects)
    }

    /// True if performing this action makes at least one of `targets` hold.
    pub fn achieves_any(&self, targets: &Conditions) -> bool {
        self.effects.overlaps(targets)
    }

    /// Finds a key whose effect contradicts the action's own precondition.
    pub fn contradiction(&self) -> Option<&str> {
        self.effects
            .iter()
            .find(|(key, value)| {
                matches!(self.preconditions.get(key.as_str()), Some(pre) if pre != *value)
            })
            .map(|(key, _)| key.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
