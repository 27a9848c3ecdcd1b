//! Hooks for watching ranking episodes.

use crate::{Goal, Plan};

/// Told about the outcome of each per-goal search during ranking.
///
/// Calls arrive one at a time, in the order goals appear in the planning
/// system, even when the searches themselves ran in parallel. Under utility
/// selection there is one call per candidate action, best first.
pub trait PlanObserver: Send + Sync {
    /// # Arguments
    ///
    /// * `goal` - The goal that was searched
    /// * `plan` - The plan found, or `None` if the goal was unreachable
    fn on_goal_searched(&self, goal: &Goal, plan: Option<&Plan>);
}

/// Logs each outcome at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PlanObserver for LogObserver {
    fn on_goal_searched(&self, goal: &Goal, plan: Option<&Plan>) {
        match plan {
            Some(plan) if plan.is_empty() => {
                log::info!("goal {} is already satisfied", goal.name)
            }
            Some(plan) => log::info!(
                "found plan to goal {}: {}",
                goal.name,
                plan.action_names().join(" -> ")
            ),
            None => log::info!("no plan found to goal {}", goal.name),
        }
    }
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PlanObserver for NoopObserver {
    fn on_goal_searched(&self, _goal: &Goal, _plan: Option<&Plan>) {}
}
