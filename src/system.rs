//! # Planning System
//!
//! The catalog of actions and goals visible for one planning episode, plus
//! the set of condition keys they are allowed to reference.
//!
//! A [`PlanningSystem`] is validated when it is built, so a system that
//! exists is always well formed:
//!
//! * every condition key used by an action or goal is a known condition,
//! * no action's effects contradict its own preconditions,
//! * action names and goal names are unique.
//!
//! Systems can be assembled in code or loaded from a TOML or JSON catalog:
//!
//! ```
//! use goap_planner::PlanningSystem;
//!
//! let system = PlanningSystem::from_toml_str(r#"
//!     [[actions]]
//!     name = "get_key"
//!     cost = 1.0
//!     effects = { has_key = true }
//!
//!     [[actions]]
//!     name = "open_door"
//!     cost = 2.0
//!     preconditions = { has_key = true }
//!     effects = { door_open = true }
//!
//!     [[goals]]
//!     name = "escape"
//!     value = 10.0
//!     preconditions = { door_open = true }
//! "#).unwrap();
//!
//! assert_eq!(system.actions().len(), 2);
//! assert!(system.known_conditions().contains("door_open"));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::{Action, Condition, Conditions, Goal, PlannerError, Result};

/// Actions and goals for one planning episode.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningSystem {
    actions: Vec<Action>,
    goals: Vec<Goal>,
    known_conditions: BTreeSet<String>,
}

impl PlanningSystem {
    /// Builds a system whose known conditions are every key it references.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidCatalog`] for duplicate names or an
    /// action that contradicts itself.
    pub fn new(actions: Vec<Action>, goals: Vec<Goal>) -> Result<Self> {
        let known_conditions = referenced_keys(&actions, &goals);
        Self::with_known_conditions(actions, goals, known_conditions)
    }

    /// Builds a system against an explicitly declared set of condition keys.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidCatalog`] if any action or goal
    /// references a key outside `known`, in addition to the checks done by
    /// [`new`](Self::new).
    pub fn with_known_conditions<I, S>(
        actions: Vec<Action>,
        goals: Vec<Goal>,
        known: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let system = Self {
            actions,
            goals,
            known_conditions: known.into_iter().map(Into::into).collect(),
        };
        system.validate()?;
        Ok(system)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn known_conditions(&self) -> &BTreeSet<String> {
        &self.known_conditions
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn goal(&self, name: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.name == name)
    }

    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for action in &self.actions {
            if !names.insert(action.name.as_str()) {
                return Err(PlannerError::InvalidCatalog(format!(
                    "duplicate action '{}'",
                    action.name
                )));
            }
            if let Some(key) = action.contradiction() {
                return Err(PlannerError::InvalidCatalog(format!(
                    "action '{}' effects contradict its precondition on '{}'",
                    action.name, key
                )));
            }
            self.check_known(&action.preconditions, "action", &action.name)?;
            self.check_known(&action.effects, "action", &action.name)?;
        }

        let mut names = HashSet::new();
        for goal in &self.goals {
            if !names.insert(goal.name.as_str()) {
                return Err(PlannerError::InvalidCatalog(format!(
                    "duplicate goal '{}'",
                    goal.name
                )));
            }
            self.check_known(&goal.preconditions, "goal", &goal.name)?;
        }
        Ok(())
    }

    fn check_known(&self, conditions: &Conditions, kind: &str, name: &str) -> Result<()> {
        match conditions.keys().find(|k| !self.known_conditions.contains(*k)) {
            Some(key) => Err(PlannerError::InvalidCatalog(format!(
                "{} '{}' references unknown condition '{}'",
                kind, name, key
            ))),
            None => Ok(()),
        }
    }

    /// Returns a system holding only the actions that can contribute to some
    /// goal.
    ///
    /// Starting from every goal precondition, an action is kept if one of its
    /// effects matches a tracked condition; its own preconditions then become
    /// tracked. This repeats until nothing changes. Goals and known
    /// conditions are carried over unchanged, and action order is preserved.
    pub fn prune(&self) -> PlanningSystem {
        let mut tracked: BTreeSet<Condition> = self
            .goals
            .iter()
            .flat_map(|g| g.preconditions.iter())
            .map(|(k, v)| Condition::new(k.clone(), v.clone()))
            .collect();
        let mut relevant = vec![false; self.actions.len()];

        let mut changed = true;
        while changed {
            changed = false;
            for (idx, action) in self.actions.iter().enumerate() {
                if relevant[idx] {
                    continue;
                }
                let contributes = action
                    .effects
                    .iter()
                    .any(|(k, v)| tracked.contains(&Condition::new(k.clone(), v.clone())));
                if contributes {
                    relevant[idx] = true;
                    changed = true;
                    tracked.extend(
                        action
                            .preconditions
                            .iter()
                            .map(|(k, v)| Condition::new(k.clone(), v.clone())),
                    );
                }
            }
        }

        let actions: Vec<Action> = self
            .actions
            .iter()
            .zip(relevant)
            .filter(|(_, keep)| *keep)
            .map(|(action, _)| action.clone())
            .collect();
        log::debug!(
            "pruned planning system from {} to {} actions",
            self.actions.len(),
            actions.len()
        );

        PlanningSystem {
            actions,
            goals: self.goals.clone(),
            known_conditions: self.known_conditions.clone(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: CatalogFile = toml::from_str(content)?;
        catalog.into_system()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog: CatalogFile = serde_json::from_str(content)?;
        catalog.into_system()
    }

    /// Loads a catalog file, choosing the format from its extension
    /// (`.json`, anything else is read as TOML).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}

fn referenced_keys(actions: &[Action], goals: &[Goal]) -> BTreeSet<String> {
    actions
        .iter()
        .flat_map(|a| a.preconditions.keys().chain(a.effects.keys()))
        .chain(goals.iter().flat_map(|g| g.preconditions.keys()))
        .cloned()
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    known_conditions: Option<Vec<String>>,
    #[serde(default)]
    actions: Vec<ActionDef>,
    #[serde(default)]
    goals: Vec<GoalDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ActionDef {
    name: String,
    #[serde(default = "default_cost")]
    cost: f64,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    preconditions: Conditions,
    #[serde(default)]
    effects: Conditions,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GoalDef {
    name: String,
    value: f64,
    #[serde(default)]
    preconditions: Conditions,
}

fn default_cost() -> f64 {
    1.0
}

impl CatalogFile {
    fn into_system(self) -> Result<PlanningSystem> {
        let actions = self
            .actions
            .into_iter()
            .map(|def| -> Result<Action> {
                let mut action = Action::new(def.name, def.cost)?.with_value(def.value);
                action.preconditions = def.preconditions;
                action.effects = def.effects;
                Ok(action)
            })
            .collect::<Result<Vec<_>>>()?;
        let goals = self
            .goals
            .into_iter()
            .map(|def| {
                let mut goal = Goal::new(def.name, def.value);
                goal.preconditions = def.preconditions;
                goal
            })
            .collect();

        match self.known_conditions {
            Some(known) => PlanningSystem::with_known_conditions(actions, goals, known),
            None => PlanningSystem::new(actions, goals),
        }
    }
}
