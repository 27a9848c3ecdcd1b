//! Search algorithms that find the cheapest plan to a single goal.
//!
//! Two strategies implement [`SearchAlgorithm`]:
//!
//! * [`RegressionSearch`] chains backwards from the goal. Its search space is
//!   the set of conditions a partial plan still needs before its first
//!   action, so only actions that produce something still needed are ever
//!   considered.
//! * [`ForwardSearch`] simulates actions forward from the world state until
//!   the goal holds.
//!
//! Both are A* over non-negative action costs with a pluggable
//! [`Heuristic`]. With the default [`ZeroHeuristic`] they reduce to Dijkstra
//! and always return a cheapest plan. Both are deterministic: actions are
//! tried in name order and frontier ties are broken by insertion order.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use crate::{Action, Conditions, Goal, Plan, WorldState};

/// Finds the best plan to one goal.
///
/// # Examples
///
/// ```
/// use goap_planner::{Action, Goal, Plan, SearchAlgorithm, WorldState};
///
/// /// Only ever tries single-action plans.
/// struct OneStep;
///
/// impl SearchAlgorithm for OneStep {
///     fn search(&self, actions: &[Action], goal: &Goal, state: &WorldState) -> Option<Plan> {
///         actions
///             .iter()
///             .find(|a| a.can_perform(state) && goal.is_satisfied(&a.apply_to(state)))
///             .map(|a| Plan::new(goal.clone(), vec![a.clone()], state))
///     }
/// }
/// ```
pub trait SearchAlgorithm: Send + Sync {
    /// Searches for the best plan to one goal.
    ///
    /// # Arguments
    ///
    /// * `actions` - The catalog to build the plan from, in any order
    /// * `goal` - The conditions the plan must establish
    /// * `state` - The episode snapshot; dynamic costs are priced against it
    ///
    /// # Returns
    ///
    /// The cheapest plan found, first action first, or `None` if the goal is
    /// unreachable with `actions`. A goal that already holds yields an empty
    /// plan.
    fn search(&self, actions: &[Action], goal: &Goal, state: &WorldState) -> Option<Plan>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Estimates the remaining cost to satisfy `unsatisfied`.
pub trait Heuristic: Send + Sync {
    /// # Arguments
    ///
    /// * `unsatisfied` - Conditions a node still needs that the world does
    ///   not provide
    ///
    /// # Returns
    ///
    /// A non-negative cost estimate. Zero when `unsatisfied` is empty.
    fn estimate(&self, unsatisfied: &Conditions) -> f64;
}

/// Always zero. Admissible for any non-negative action costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _unsatisfied: &Conditions) -> f64 {
        0.0
    }
}

/// Counts unsatisfied conditions, scaled by `weight`.
///
/// Greedier than [`ZeroHeuristic`]. It is only admissible if every action
/// costs at least `weight` and achieves one condition at a time, so the plans
/// it finds may cost more than the cheapest.
#[derive(Debug, Clone, Copy)]
pub struct UnsatisfiedCountHeuristic {
    pub weight: f64,
}

impl Default for UnsatisfiedCountHeuristic {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

impl Heuristic for UnsatisfiedCountHeuristic {
    fn estimate(&self, unsatisfied: &Conditions) -> f64 {
        unsatisfied.len() as f64 * self.weight
    }
}

/// A frontier slot: node index plus its priority.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f_cost: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    // BinaryHeap is a max-heap: lower f_cost, then earlier insertion, wins.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    fn push(&mut self, node: usize, f_cost: f64) {
        self.heap.push(FrontierEntry {
            f_cost,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|entry| entry.node)
    }
}

/// Actions paired with their cost in the episode state, in name order.
fn priced_actions<'a>(actions: &'a [Action], state: &WorldState) -> Vec<(&'a Action, f64)> {
    let mut priced: Vec<_> = actions.iter().map(|a| (a, a.cost_in(state))).collect();
    priced.sort_by(|a, b| a.0.name.cmp(&b.0.name));
    priced
}

#[derive(Debug)]
struct SearchNode<K> {
    key: K,
    parent: Option<usize>,
    action: Option<usize>,
    g_cost: f64,
}

/// Node arena, frontier and best-cost record shared by both strategies.
///
/// `best` maps each search key to the node currently holding its cheapest
/// cost. Frontier entries for nodes that lost that slot are stale and are
/// skipped when popped.
struct SearchContext<K> {
    nodes: Vec<SearchNode<K>>,
    frontier: Frontier,
    best: HashMap<K, usize>,
    expansions: usize,
}

impl<K> SearchContext<K>
where
    K: Clone + Eq + std::hash::Hash,
{
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            frontier: Frontier::default(),
            best: HashMap::new(),
            expansions: 0,
        }
    }

    /// Records a node and queues it, unless its key was already reached at a
    /// cost no higher than `g_cost`.
    fn offer(
        &mut self,
        key: K,
        parent: Option<usize>,
        action: Option<usize>,
        g_cost: f64,
        h_cost: f64,
    ) -> bool {
        let idx = self.nodes.len();
        match self.best.entry(key.clone()) {
            Entry::Occupied(mut slot) => {
                if self.nodes[*slot.get()].g_cost <= g_cost {
                    return false;
                }
                slot.insert(idx);
            }
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }
        self.nodes.push(SearchNode {
            key,
            parent,
            action,
            g_cost,
        });
        self.frontier.push(idx, g_cost + h_cost);
        true
    }

    fn next_node(&mut self) -> Option<usize> {
        while let Some(idx) = self.frontier.pop() {
            if self.best.get(&self.nodes[idx].key) == Some(&idx) {
                return Some(idx);
            }
        }
        None
    }

    /// Action indices from `idx` back to the root.
    fn path_to_root(&self, idx: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = Some(idx);
        while let Some(node) = current.map(|i| &self.nodes[i]) {
            if let Some(action) = node.action {
                path.push(action);
            }
            current = node.parent;
        }
        path
    }
}

fn over_budget(
    expansions: usize,
    max_expansions: Option<usize>,
    strategy: &str,
    goal: &Goal,
) -> bool {
    match max_expansions {
        Some(max) if expansions > max => {
            log::warn!(
                "{} search for goal {} gave up after {} expansions",
                strategy,
                goal.name,
                max
            );
            true
        }
        _ => false,
    }
}

/// Backward-chaining A* over residual goals.
///
/// A search node is the set of conditions that must hold before the partial
/// plan's first action. Its unsatisfied part is whatever of that set the
/// world state does not already provide; the search succeeds when it is
/// empty. Conditions the world already provides stay in the node so that no
/// earlier action is allowed to undo them.
///
/// Expanding a node considers every action whose effects satisfy at least
/// one unsatisfied condition. The action is skipped if its effects contradict
/// a condition the plan still needs, or if its preconditions contradict what
/// must hold alongside them.
///
/// ```
/// use goap_planner::{Action, Conditions, Goal, RegressionSearch, SearchAlgorithm, WorldState};
///
/// let actions = vec![
///     Action::new("A", 1.0).unwrap().with_effect("hasKey", true),
///     Action::new("B", 2.0)
///         .unwrap()
///         .with_precondition("hasKey", true)
///         .with_effect("doorOpen", true),
/// ];
/// let goal = Goal::new("open", 10.0).with_precondition("doorOpen", true);
/// let state = WorldState::new(Conditions::new());
///
/// let plan = RegressionSearch::default().search(&actions, &goal, &state).unwrap();
/// assert_eq!(plan.action_names(), vec!["A", "B"]);
/// assert_eq!(plan.cost(), 3.0);
/// assert_eq!(plan.net_value(&state), 7.0);
/// ```
pub struct RegressionSearch {
    heuristic: Box<dyn Heuristic>,
    max_expansions: Option<usize>,
}

impl RegressionSearch {
    pub fn new(heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            heuristic,
            max_expansions: None,
        }
    }

    /// Gives up (returning no plan) after expanding `max` nodes.
    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    /// The conditions that must hold before `action` so that `required`
    /// holds after it, or `None` if the action cannot be placed there.
    fn regress(action: &Action, required: &Conditions) -> Option<Conditions> {
        if action.effects.conflicts_with(required) {
            return None;
        }
        let mut before = required.clone();
        for (key, value) in action.effects.iter() {
            if required.holds(key, value) {
                before.remove(key);
            }
        }
        if action.preconditions.conflicts_with(&before) {
            return None;
        }
        for (key, value) in action.preconditions.iter() {
            before.set(key.clone(), value.clone());
        }
        Some(before)
    }
}

impl Default for RegressionSearch {
    fn default() -> Self {
        Self::new(Box::new(ZeroHeuristic))
    }
}

impl SearchAlgorithm for RegressionSearch {
    fn search(&self, actions: &[Action], goal: &Goal, state: &WorldState) -> Option<Plan> {
        let required = goal.preconditions.clone();
        let unsatisfied = required.unsatisfied_by(state);
        if unsatisfied.is_empty() {
            return Some(Plan::with_cost(goal.clone(), Vec::new(), 0.0));
        }

        let priced = priced_actions(actions, state);
        let mut context = SearchContext::new();
        let h_cost = self.heuristic.estimate(&unsatisfied);
        context.offer(required, None, None, 0.0, h_cost);

        while let Some(idx) = context.next_node() {
            let required = context.nodes[idx].key.clone();
            let g_cost = context.nodes[idx].g_cost;
            let unsatisfied = required.unsatisfied_by(state);

            if unsatisfied.is_empty() {
                // Nodes hang off the goal, so walking up from here already
                // yields execution order.
                let plan: Vec<Action> = context
                    .path_to_root(idx)
                    .into_iter()
                    .map(|i| priced[i].0.clone())
                    .collect();
                log::debug!(
                    "regression search for goal {} finished after {} expansions",
                    goal.name,
                    context.expansions
                );
                return Some(Plan::with_cost(goal.clone(), plan, g_cost));
            }

            context.expansions += 1;
            if over_budget(context.expansions, self.max_expansions, "regression", goal) {
                return None;
            }

            for (action_idx, (action, cost)) in priced.iter().enumerate() {
                if !action.achieves_any(&unsatisfied) {
                    continue;
                }
                let Some(before) = Self::regress(action, &required) else {
                    continue;
                };
                let h_cost = self.heuristic.estimate(&before.unsatisfied_by(state));
                context.offer(before, Some(idx), Some(action_idx), g_cost + cost, h_cost);
            }
        }

        log::debug!(
            "regression search for goal {} exhausted after {} expansions",
            goal.name,
            context.expansions
        );
        None
    }

    fn name(&self) -> &'static str {
        "regression"
    }
}

/// Forward A* over simulated world states.
///
/// Starting from the world state, every action whose preconditions hold is
/// applied to produce a successor state, until a state satisfying the goal
/// is popped from the frontier.
pub struct ForwardSearch {
    heuristic: Box<dyn Heuristic>,
    max_expansions: Option<usize>,
}

impl ForwardSearch {
    pub fn new(heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            heuristic,
            max_expansions: None,
        }
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }
}

impl Default for ForwardSearch {
    fn default() -> Self {
        Self::new(Box::new(ZeroHeuristic))
    }
}

impl SearchAlgorithm for ForwardSearch {
    fn search(&self, actions: &[Action], goal: &Goal, state: &WorldState) -> Option<Plan> {
        if goal.is_satisfied(state) {
            return Some(Plan::with_cost(goal.clone(), Vec::new(), 0.0));
        }

        let priced = priced_actions(actions, state);
        let mut context = SearchContext::new();
        let start = state.facts().clone();
        let h_cost = self
            .heuristic
            .estimate(&goal.preconditions.unsatisfied_by(&start));
        context.offer(start, None, None, 0.0, h_cost);

        while let Some(idx) = context.next_node() {
            let current = context.nodes[idx].key.clone();
            let g_cost = context.nodes[idx].g_cost;

            if goal.is_satisfied(&current) {
                let mut plan: Vec<Action> = context
                    .path_to_root(idx)
                    .into_iter()
                    .map(|i| priced[i].0.clone())
                    .collect();
                plan.reverse();
                log::debug!(
                    "forward search for goal {} finished after {} expansions",
                    goal.name,
                    context.expansions
                );
                return Some(Plan::with_cost(goal.clone(), plan, g_cost));
            }

            context.expansions += 1;
            if over_budget(context.expansions, self.max_expansions, "forward", goal) {
                return None;
            }

            for (action_idx, (action, cost)) in priced.iter().enumerate() {
                if !action.can_perform(&current) {
                    continue;
                }
                let next = current.apply(&action.effects);
                let h_cost = self
                    .heuristic
                    .estimate(&goal.preconditions.unsatisfied_by(&next));
                context.offer(next, Some(idx), Some(action_idx), g_cost + cost, h_cost);
            }
        }

        log::debug!(
            "forward search for goal {} exhausted after {} expansions",
            goal.name,
            context.expansions
        );
        None
    }

    fn name(&self) -> &'static str {
        "forward"
    }
}
