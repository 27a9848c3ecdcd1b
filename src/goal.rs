//! Goals: target conditions with a desirability value.

use std::fmt;
use std::sync::Arc;

use crate::action::StateFn;
use crate::{Action, ConditionValue, Conditions, WorldState};

/// How desirable reaching a goal is. Higher is better.
#[derive(Clone)]
pub enum Value {
    Fixed(f64),
    /// Evaluated against the world state a plan is scored in.
    Dynamic(StateFn),
}

impl Value {
    pub fn evaluate(&self, state: &WorldState) -> f64 {
        match self {
            Value::Fixed(value) => *value,
            Value::Dynamic(func) => func(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Fixed(value) => write!(f, "Fixed({})", value),
            Value::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Fixed(a), Value::Fixed(b)) => a == b,
            (Value::Dynamic(a), Value::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A desired set of conditions.
///
/// ```
/// use goap_planner::{Conditions, Goal, WorldState};
///
/// let escape = Goal::new("escape", 10.0).with_precondition("door_open", true);
///
/// let closed = WorldState::new(Conditions::new().with("door_open", false));
/// assert!(!escape.is_satisfied(&closed));
/// assert_eq!(escape.value_in(&closed), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub name: String,
    pub preconditions: Conditions,
    value: Value,
}

impl Goal {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            preconditions: Conditions::new(),
            value: Value::Fixed(value),
        }
    }

    pub fn with_dynamic_value<F>(name: impl Into<String>, value: F) -> Self
    where
        F: Fn(&WorldState) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            preconditions: Conditions::new(),
            value: Value::Dynamic(Arc::new(value)),
        }
    }

    /// A goal standing for one action's effects, worth what the action is.
    pub(crate) fn for_action(action: &Action) -> Self {
        Self {
            name: action.name.clone(),
            preconditions: action.effects.clone(),
            value: action.value().clone(),
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

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_in(&self, state: &WorldState) -> f64 {
        self.value.evaluate(state)
    }

    pub fn is_satisfied(&self, state: &Conditions) -> bool {
        state.satisfies(&self.preconditions)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
