//! Planner configuration.
//!
//! Settings are plain serde structs, normally read from a TOML file:
//!
//! ```toml
//! strategy = "regression"
//! heuristic = "zero"
//! parallel = true
//! state_timeout_ms = 250
//! max_expansions = 10000
//!
//! [scoring]
//! kind = "weighted_cost"
//! cost_weight = 0.5
//! ```
//!
//! Every field is optional; missing fields take the defaults of
//! [`PlannerConfig::default`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::search::{
    ForwardSearch, Heuristic, RegressionSearch, SearchAlgorithm, UnsatisfiedCountHeuristic,
    ZeroHeuristic,
};
use crate::{PlanScorer, PlannerError, Result, ValueMinusCost, WeightedCost};

/// How the planner chooses what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Backward from the goal over residual goals.
    #[default]
    Regression,
    /// Forward from the world state over simulated states.
    Forward,
    /// Rank the actions performable now by value minus cost. Single-goal
    /// requests still use regression search.
    Utility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Optimal plans, Dijkstra order.
    #[default]
    Zero,
    /// Faster on long chains, may miss the cheapest plan.
    UnsatisfiedCount,
}

/// How plans are valued when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringStrategy {
    #[default]
    ValueMinusCost,
    WeightedCost { cost_weight: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub strategy: SearchStrategy,
    pub heuristic: HeuristicKind,
    /// Search goals on the rayon thread pool
    pub parallel: bool,
    /// Upper bound on a world-state fetch, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_timeout_ms: Option<u64>,
    /// Per-goal search budget, in expanded nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<usize>,
    pub scoring: ScoringStrategy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            heuristic: HeuristicKind::default(),
            parallel: true,
            state_timeout_ms: None,
            max_expansions: None,
            scoring: ScoringStrategy::default(),
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a TOML document.
    ///
    /// ```
    /// use goap_planner::{PlannerConfig, SearchStrategy};
    ///
    /// let config = PlannerConfig::from_toml_str("strategy = \"forward\"").unwrap();
    /// assert_eq!(config.strategy, SearchStrategy::Forward);
    /// assert!(config.parallel);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let ScoringStrategy::WeightedCost { cost_weight } = self.scoring {
            if !cost_weight.is_finite() || cost_weight < 0.0 {
                return Err(PlannerError::Config(format!(
                    "cost_weight must be non-negative and finite, got {}",
                    cost_weight
                )));
            }
        }
        if self.max_expansions == Some(0) {
            return Err(PlannerError::Config(
                "max_expansions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn state_timeout(&self) -> Option<Duration> {
        self.state_timeout_ms.map(Duration::from_millis)
    }

    pub fn build_heuristic(&self) -> Box<dyn Heuristic> {
        match self.heuristic {
            HeuristicKind::Zero => Box::new(ZeroHeuristic),
            HeuristicKind::UnsatisfiedCount => Box::new(UnsatisfiedCountHeuristic::default()),
        }
    }

    pub fn build_search(&self) -> Box<dyn SearchAlgorithm> {
        let heuristic = self.build_heuristic();
        match self.strategy {
            SearchStrategy::Regression | SearchStrategy::Utility => {
                let search = RegressionSearch::new(heuristic);
                match self.max_expansions {
                    Some(max) => Box::new(search.with_max_expansions(max)),
                    None => Box::new(search),
                }
            }
            SearchStrategy::Forward => {
                let search = ForwardSearch::new(heuristic);
                match self.max_expansions {
                    Some(max) => Box::new(search.with_max_expansions(max)),
                    None => Box::new(search),
                }
            }
        }
    }

    pub fn build_scorer(&self) -> Arc<dyn PlanScorer> {
        match self.scoring {
            ScoringStrategy::ValueMinusCost => Arc::new(ValueMinusCost),
            ScoringStrategy::WeightedCost { cost_weight } => Arc::new(WeightedCost { cost_weight }),
        }
    }
}
