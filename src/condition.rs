//! # Condition Model
//!
//! A condition is an atomic fact about the world: a key paired with a value.
//! Actions use condition sets as preconditions and effects, goals use them as
//! targets, and world-state snapshots are condition sets with a timestamp.
//!
//! [`Conditions`] keeps at most one value per key and iterates in key order,
//! so two sets with the same facts compare, hash and print identically no
//! matter how they were built.
//!
//! ```
//! use goap_planner::{ConditionValue, Conditions};
//!
//! let state = Conditions::new()
//!     .with("has_key", true)
//!     .with("door_open", false)
//!     .with("gold", 12);
//!
//! let wants_open = Conditions::new().with("door_open", true);
//! assert!(!state.satisfies(&wants_open));
//!
//! let opened = state.apply(&Conditions::new().with("door_open", true));
//! assert!(opened.satisfies(&wants_open));
//! // The original snapshot is untouched.
//! assert_eq!(state.get("door_open"), Some(&ConditionValue::Bool(false)));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The value side of a condition.
///
/// Values compare by variant and content, so `true` never equals `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Int(value)
    }
}

impl From<i32> for ConditionValue {
    fn from(value: i32) -> Self {
        ConditionValue::Int(i64::from(value))
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Bool(b) => write!(f, "{}", b),
            ConditionValue::Int(i) => write!(f, "{}", i),
            ConditionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single keyed fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Condition {
    pub key: String,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// A set of conditions with at most one value per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions {
    values: BTreeMap<String, ConditionValue>,
}

impl Conditions {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConditionValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConditionValue> {
        self.values.get(key)
    }

    /// Unsets `key`, returning the value it had.
    pub fn remove(&mut self, key: &str) -> Option<ConditionValue> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns true if `key` is set to a value equal to `value`.
    pub fn holds(&self, key: &str, value: &ConditionValue) -> bool {
        self.values.get(key) == Some(value)
    }

    /// Checks whether every condition in `targets` holds in `self`.
    ///
    /// Unset keys never satisfy a target. An empty target set is satisfied by
    /// any state.
    ///
    /// ```
    /// use goap_planner::Conditions;
    ///
    /// let state = Conditions::new().with("a", true).with("b", 3);
    /// assert!(state.satisfies(&Conditions::new().with("a", true)));
    /// assert!(!state.satisfies(&Conditions::new().with("b", 4)));
    /// assert!(!state.satisfies(&Conditions::new().with("c", true)));
    /// assert!(state.satisfies(&Conditions::new()));
    /// ```
    pub fn satisfies(&self, targets: &Conditions) -> bool {
        targets
            .values
            .iter()
            .all(|(key, value)| self.holds(key, value))
    }

    /// Returns a new set with `effects` overlaid on `self`.
    pub fn apply(&self, effects: &Conditions) -> Conditions {
        let mut next = self.clone();
        for (key, value) in effects.values.iter() {
            next.values.insert(key.clone(), value.clone());
        }
        next
    }

    /// The subset of `self` (taken as targets) that does not hold in `state`.
    pub fn unsatisfied_by(&self, state: &Conditions) -> Conditions {
        self.values
            .iter()
            .filter(|(key, value)| !state.holds(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// True if some key is present in both sets with different values.
    pub fn conflicts_with(&self, other: &Conditions) -> bool {
        self.values
            .iter()
            .any(|(key, value)| matches!(other.values.get(key), Some(v) if v != value))
    }

    /// True if at least one condition of `self` also holds in `other`.
    pub fn overlaps(&self, other: &Conditions) -> bool {
        self.values.iter().any(|(key, value)| other.holds(key, value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConditionValue)> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Conditions
where
    K: Into<String>,
    V: Into<ConditionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (key, value) in iter {
            conditions.set(key, value);
        }
        conditions
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        iter.into_iter().map(|c| (c.key, c.value)).collect()
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
            first = false;
        }
        write!(f, "}}")
    }
}
