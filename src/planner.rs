//! # Planner
//!
//! The planner ties the pieces of a GOAP system together. For one planning
//! episode it:
//!
//! 1. fetches the world state once and reuses that snapshot everywhere,
//! 2. searches every goal of a [`PlanningSystem`] independently,
//! 3. values each plan found against the snapshot and ranks them.
//!
//! ## Basic Usage
//!
//! ```
//! use std::sync::Arc;
//! use goap_planner::{
//!     Action, Conditions, GoapPlanner, Goal, Planner, PlanningSystem, StaticDeterminer,
//! };
//!
//! // What the agent can do
//! let chop_tree = Action::new("chop_tree", 2.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("has_wood", true);
//! let craft_pickaxe = Action::new("craft_pickaxe", 1.0)
//!     .unwrap()
//!     .with_precondition("has_wood", true)
//!     .with_effect("has_pickaxe", true);
//! let mine_ore = Action::new("mine_ore", 3.0)
//!     .unwrap()
//!     .with_precondition("has_pickaxe", true)
//!     .with_effect("has_metal", true);
//!
//! // What the agent wants
//! let get_metal = Goal::new("get_metal", 10.0).with_precondition("has_metal", true);
//! let get_wood = Goal::new("get_wood", 3.0).with_precondition("has_wood", true);
//!
//! let system = PlanningSystem::new(
//!     vec![chop_tree, craft_pickaxe, mine_ore],
//!     vec![get_wood, get_metal],
//! )
//! .unwrap();
//!
//! // Where the world stands
//! let world = StaticDeterminer::new(Conditions::new().with("has_axe", true));
//! let planner = GoapPlanner::new(Arc::new(world));
//!
//! let plans = planner.plans_to_goals(&system).unwrap();
//! assert_eq!(plans.len(), 2);
//! // get_metal nets 10 - 6, get_wood nets 3 - 2
//! assert_eq!(plans[0].goal().name, "get_metal");
//! assert_eq!(plans[0].action_names(), vec!["chop_tree", "craft_pickaxe", "mine_ore"]);
//! assert_eq!(plans[1].goal().name, "get_wood");
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::config::{PlannerConfig, SearchStrategy};
use crate::observer::{LogObserver, PlanObserver};
use crate::search::{RegressionSearch, SearchAlgorithm};
use crate::utility;
use crate::world_state::{WorldStateCache, WorldStateDeterminer};
use crate::{Action, Goal, Plan, PlanScorer, PlanningSystem, Result, ValueMinusCost, WorldState};

/// The operations a GOAP planner offers.
pub trait Planner {
    /// The world state for the current episode, fetched on first use.
    ///
    /// # Errors
    ///
    /// [`PlannerError::StateUnavailable`](crate::PlannerError::StateUnavailable)
    /// if the world state cannot be determined.
    fn world_state(&self) -> Result<Arc<WorldState>>;

    /// Plans for a single goal against the episode snapshot.
    ///
    /// # Arguments
    ///
    /// * `actions` - The actions the plan may use
    /// * `goal` - The goal to reach
    ///
    /// # Returns
    ///
    /// The cheapest plan to `goal`, or `None` if the goal is unreachable. A
    /// goal that already holds yields the empty plan.
    ///
    /// # Errors
    ///
    /// Fails if the world state cannot be fetched or the episode was
    /// cancelled.
    fn plan_to_goal(&self, actions: &[Action], goal: &Goal) -> Result<Option<Plan>>;

    /// Plans for every goal of a system and ranks the results.
    ///
    /// # Arguments
    ///
    /// * `system` - The actions and goals of this episode
    ///
    /// # Returns
    ///
    /// One plan per reachable goal, best net value first. Plans with equal
    /// net value keep the order their goals were declared in. Unreachable
    /// goals are left out.
    ///
    /// # Errors
    ///
    /// Fails if the world state cannot be fetched or the episode was
    /// cancelled. No partial ranking is returned.
    fn plans_to_goals(&self, system: &PlanningSystem) -> Result<Vec<Plan>>;

    /// The head of [`plans_to_goals`](Self::plans_to_goals).
    ///
    /// # Returns
    ///
    /// The plan with the highest net value, or `None` if no goal is
    /// reachable.
    fn best_value_plan_to_any_goal(&self, system: &PlanningSystem) -> Result<Option<Plan>> {
        Ok(self.plans_to_goals(system)?.into_iter().next())
    }

    /// `system` restricted to the actions that could contribute to a goal.
    fn prune(&self, system: &PlanningSystem) -> PlanningSystem {
        system.prune()
    }
}

/// The standard [`Planner`].
///
/// A `GoapPlanner` owns the world-state snapshot for the current episode and
/// a [`SearchAlgorithm`] (regression A* by default). Goals are searched on
/// the rayon thread pool unless parallelism is switched off; results are
/// identical either way.
///
/// Episodes are explicit: the first call that needs the world state fetches
/// it, and every later call reuses that snapshot until
/// [`new_episode`](Self::new_episode) is called.
///
/// # Examples
///
/// Swapping the search algorithm:
///
/// ```
/// use std::sync::Arc;
/// use goap_planner::{
///     Action, Conditions, ForwardSearch, GoapPlanner, Goal, Planner, StaticDeterminer,
/// };
///
/// let goto_store = Action::new("go_to_store", 1.0)
///     .unwrap()
///     .with_precondition("at_home", true)
///     .with_effect("at_store", true)
///     .with_effect("at_home", false);
/// let buy_food = Action::new("buy_food", 2.0)
///     .unwrap()
///     .with_precondition("at_store", true)
///     .with_precondition("has_money", true)
///     .with_effect("has_food", true);
///
/// let world = StaticDeterminer::new(
///     Conditions::new().with("at_home", true).with("has_money", true),
/// );
/// let planner = GoapPlanner::new(Arc::new(world))
///     .with_search_algorithm(Box::new(ForwardSearch::default()));
///
/// let eat = Goal::new("eat", 5.0).with_precondition("has_food", true);
/// let plan = planner
///     .plan_to_goal(&[goto_store, buy_food], &eat)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(plan.action_names(), vec!["go_to_store", "buy_food"]);
/// assert_eq!(plan.cost(), 3.0);
/// ```
pub struct GoapPlanner {
    world_state: WorldStateCache,
    search_algorithm: Box<dyn SearchAlgorithm>,
    scorer: Arc<dyn PlanScorer>,
    observer: Arc<dyn PlanObserver>,
    parallel: bool,
    utility: bool,
}

impl GoapPlanner {
    /// Creates a planner with regression search, value-minus-cost scoring and
    /// a logging observer.
    pub fn new(determiner: Arc<dyn WorldStateDeterminer>) -> Self {
        Self {
            world_state: WorldStateCache::new(determiner),
            search_algorithm: Box::new(RegressionSearch::default()),
            scorer: Arc::new(ValueMinusCost),
            observer: Arc::new(LogObserver),
            parallel: true,
            utility: false,
        }
    }

    /// Assembles a planner from configuration.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use goap_planner::{Conditions, GoapPlanner, PlannerConfig, StaticDeterminer};
    ///
    /// let config = PlannerConfig::from_toml_str(r#"
    ///     strategy = "forward"
    ///     parallel = false
    /// "#).unwrap();
    /// let world = StaticDeterminer::new(Conditions::new());
    /// let planner = GoapPlanner::from_config(&config, Arc::new(world));
    /// assert_eq!(planner.search_algorithm().name(), "forward");
    /// ```
    pub fn from_config(config: &PlannerConfig, determiner: Arc<dyn WorldStateDeterminer>) -> Self {
        let mut planner = Self::new(determiner)
            .with_search_algorithm(config.build_search())
            .with_scorer(config.build_scorer())
            .with_parallelism(config.parallel)
            .with_utility_selection(config.strategy == SearchStrategy::Utility);
        if let Some(timeout) = config.state_timeout() {
            planner = planner.with_state_timeout(timeout);
        }
        planner
    }

    pub fn with_search_algorithm(mut self, search_algorithm: Box<dyn SearchAlgorithm>) -> Self {
        self.search_algorithm = search_algorithm;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn PlanScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PlanObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Switches [`plans_to_goals`](Planner::plans_to_goals) to utility
    /// selection: goals are ignored and the actions performable in the
    /// current state are ranked as one-step plans. `plan_to_goal` keeps
    /// using the search algorithm.
    pub fn with_utility_selection(mut self, utility: bool) -> Self {
        self.utility = utility;
        self
    }

    /// Bounds how long a world-state fetch may take.
    pub fn with_state_timeout(mut self, timeout: Duration) -> Self {
        self.world_state = self.world_state.with_timeout(timeout);
        self
    }

    pub fn search_algorithm(&self) -> &dyn SearchAlgorithm {
        self.search_algorithm.as_ref()
    }

    /// Ties the planner to `token`. Cancelling it abandons the current
    /// episode and every later one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.world_state = self.world_state.with_cancellation(token);
        self
    }

    /// The current episode's token. Cancelling it abandons an in-flight
    /// world-state fetch and fails the episode with
    /// [`PlannerError::Cancelled`](crate::PlannerError::Cancelled).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.world_state.cancellation_token()
    }

    /// Starts a new planning episode; the next call re-fetches the world
    /// state under a fresh cancellation token.
    pub fn new_episode(&self) {
        self.world_state.new_episode();
    }

    fn search(&self, actions: &[Action], goal: &Goal, state: &WorldState) -> Option<Plan> {
        self.search_algorithm
            .search(actions, goal, state)
            .map(|plan| plan.with_scorer(Arc::clone(&self.scorer)))
    }
}

impl Planner for GoapPlanner {
    fn world_state(&self) -> Result<Arc<WorldState>> {
        self.world_state.current()
    }

    fn plan_to_goal(&self, actions: &[Action], goal: &Goal) -> Result<Option<Plan>> {
        let state = self.world_state()?;
        Ok(self.search(actions, goal, &state))
    }

    fn plans_to_goals(&self, system: &PlanningSystem) -> Result<Vec<Plan>> {
        let state = self.world_state()?;
        let actions = system.actions();

        if self.utility {
            let plans = utility::rank_performable(actions, &state, &self.scorer);
            for plan in &plans {
                self.observer.on_goal_searched(plan.goal(), Some(plan));
            }
            return Ok(plans);
        }

        let outcomes: Vec<Option<Plan>> = if self.parallel {
            system
                .goals()
                .par_iter()
                .map(|goal| self.search(actions, goal, &state))
                .collect()
        } else {
            system
                .goals()
                .iter()
                .map(|goal| self.search(actions, goal, &state))
                .collect()
        };

        let mut ranked: Vec<(f64, Plan)> = Vec::with_capacity(outcomes.len());
        for (goal, outcome) in system.goals().iter().zip(outcomes) {
            self.observer.on_goal_searched(goal, outcome.as_ref());
            if let Some(plan) = outcome {
                ranked.push((plan.net_value(&state), plan));
            }
        }

        // Stable, so equal values keep goal declaration order.
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        log::debug!(
            "ranked {} plans for {} goals",
            ranked.len(),
            system.goals().len()
        );

        Ok(ranked.into_iter().map(|(_, plan)| plan).collect())
    }
}

impl fmt::Debug for GoapPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoapPlanner")
            .field("world_state", &self.world_state)
            .field("search_algorithm", &self.search_algorithm.name())
            .field("parallel", &self.parallel)
            .field("utility", &self.utility)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ForwardSearch;
    use crate::world_state::{FnDeterminer, StaticDeterminer};
    use crate::{Conditions, PlannerError, WeightedCost};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn make_action(
        name: &str,
        cost: f64,
        pre: Vec<(&str, bool)>,
        eff: Vec<(&str, bool)>,
    ) -> Action {
        let mut action = Action::new(name, cost).unwrap();
        for (k, v) in pre {
            action.preconditions.set(k, v);
        }
        for (k, v) in eff {
            action.effects.set(k, v);
        }
        action
    }

    fn make_goal(name: &str, value: f64, pre: Vec<(&str, bool)>) -> Goal {
        let mut goal = Goal::new(name, value);
        for (k, v) in pre {
            goal.preconditions.set(k, v);
        }
        goal
    }

    fn planner_at(facts: Vec<(&str, bool)>) -> GoapPlanner {
        let facts: Conditions = facts.into_iter().collect();
        GoapPlanner::new(Arc::new(StaticDeterminer::new(facts)))
    }

    #[test]
    fn test_simple_plan() {
        let action1 = make_action(
            "action1",
            1.0,
            vec![("condition1", true)],
            vec![("condition2", true)],
        );
        let action2 = make_action(
            "action2",
            1.0,
            vec![("condition2", true)],
            vec![("goal", true)],
        );
        let planner = planner_at(vec![("condition1", true)]);

        let plan = planner
            .plan_to_goal(&[action1, action2], &make_goal("g", 5.0, vec![("goal", true)]))
            .unwrap()
            .unwrap();

        assert_eq!(plan.action_names(), vec!["action1", "action2"]);
        assert_eq!(plan.cost(), 2.0);
    }

    #[test]
    fn test_multiple_paths() {
        let expensive = make_action(
            "expensive",
            5.0,
            vec![("start", true)],
            vec![("goal", true)],
        );
        let cheap1 = make_action(
            "cheap1",
            1.0,
            vec![("start", true)],
            vec![("intermediate", true)],
        );
        let cheap2 = make_action(
            "cheap2",
            1.0,
            vec![("intermediate", true)],
            vec![("goal", true)],
        );
        let planner = planner_at(vec![("start", true)]);

        let plan = planner
            .plan_to_goal(
                &[expensive, cheap1, cheap2],
                &make_goal("g", 5.0, vec![("goal", true)]),
            )
            .unwrap()
            .unwrap();

        assert_eq!(plan.action_names(), vec!["cheap1", "cheap2"]);
    }

    #[test]
    fn test_complex_scenario() {
        let actions = vec![
            make_action("get_wood", 2.0, vec![], vec![("has_wood", true)]),
            make_action("get_tools", 3.0, vec![], vec![("has_tools", true)]),
            make_action(
                "build_foundation",
                4.0,
                vec![("has_wood", true), ("has_tools", true)],
                vec![("has_foundation", true)],
            ),
            make_action(
                "build_walls",
                5.0,
                vec![("has_foundation", true), ("has_wood", true)],
                vec![("has_walls", true)],
            ),
            make_action(
                "build_roof",
                3.0,
                vec![("has_walls", true), ("has_wood", true)],
                vec![("has_roof", true)],
            ),
        ];
        let goal = make_goal("house", 30.0, vec![("has_roof", true)]);

        for planner in [
            planner_at(vec![]),
            planner_at(vec![]).with_search_algorithm(Box::new(ForwardSearch::default())),
        ] {
            let plan = planner.plan_to_goal(&actions, &goal).unwrap().unwrap();
            assert_eq!(plan.len(), 5);
            assert_eq!(plan.cost(), 17.0);
            assert_eq!(plan.actions().last().unwrap().name, "build_roof");
            assert_eq!(plan.net_value(&WorldState::empty()), 13.0);
        }
    }

    #[test]
    fn test_ranking_sorts_by_net_value() {
        let actions = vec![
            make_action("a", 1.0, vec![], vec![("x", true)]),
            make_action("b", 4.0, vec![], vec![("y", true)]),
            make_action("c", 1.0, vec![("x", false)], vec![("z", true)]),
        ];
        let goals = vec![
            make_goal("low", 5.0, vec![("y", true)]),
            make_goal("high", 5.0, vec![("x", true)]),
            make_goal("never", 100.0, vec![("z", true)]),
        ];
        let system = PlanningSystem::new(actions, goals).unwrap();

        let plans = planner_at(vec![("x", true), ("y", false)])
            .plans_to_goals(&system)
            .unwrap();
        let names: Vec<_> = plans.iter().map(|p| p.goal().name.as_str()).collect();
        assert_eq!(names, vec!["high", "low"]);
        assert!(plans[0].is_empty());
    }

    #[test]
    fn test_ties_keep_goal_order() {
        let actions = vec![make_action("a", 1.0, vec![], vec![("x", true), ("y", true)])];
        let goals = vec![
            make_goal("second", 5.0, vec![("y", true)]),
            make_goal("first", 5.0, vec![("x", true)]),
        ];
        let system = PlanningSystem::new(actions, goals).unwrap();

        for parallel in [true, false] {
            let plans = planner_at(vec![])
                .with_parallelism(parallel)
                .plans_to_goals(&system)
                .unwrap();
            let names: Vec<_> = plans.iter().map(|p| p.goal().name.as_str()).collect();
            assert_eq!(names, vec!["second", "first"]);
        }
    }

    #[test]
    fn test_best_value_plan() {
        let system = PlanningSystem::new(
            vec![make_action("a", 1.0, vec![], vec![("x", true)])],
            vec![
                make_goal("cheap", 2.0, vec![("x", true)]),
                make_goal("rich", 9.0, vec![("x", true)]),
            ],
        )
        .unwrap();
        let planner = planner_at(vec![]);

        let best = planner.best_value_plan_to_any_goal(&system).unwrap().unwrap();
        assert_eq!(best.goal().name, "rich");
        assert_eq!(best.net_value(&planner.world_state().unwrap()), 8.0);

        let unreachable = PlanningSystem::new(
            vec![],
            vec![make_goal("fly", 1.0, vec![("flying", true)])],
        )
        .unwrap();
        assert!(planner.best_value_plan_to_any_goal(&unreachable).unwrap().is_none());
    }

    #[test]
    fn test_world_state_fetched_once_per_episode() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let determiner = FnDeterminer::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Conditions::new())
        });
        let planner = GoapPlanner::new(Arc::new(determiner));
        let system = PlanningSystem::new(
            vec![make_action("a", 1.0, vec![], vec![("x", true)])],
            vec![
                make_goal("g1", 2.0, vec![("x", true)]),
                make_goal("g2", 3.0, vec![("x", true)]),
                make_goal("g3", 4.0, vec![("x", true)]),
            ],
        )
        .unwrap();

        planner.plans_to_goals(&system).unwrap();
        planner.plans_to_goals(&system).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        planner.new_episode();
        planner.plans_to_goals(&system).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancelled_episode_does_not_poison_the_next() {
        let planner = planner_at(vec![("x", true)]);
        let goal = make_goal("g", 1.0, vec![("x", true)]);

        planner.cancellation_token().cancel();
        assert!(matches!(
            planner.plan_to_goal(&[], &goal),
            Err(PlannerError::Cancelled)
        ));

        planner.new_episode();
        let plan = planner.plan_to_goal(&[], &goal).unwrap().unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_planner_wide_cancellation() {
        let token = CancellationToken::new();
        let planner = planner_at(vec![]).with_cancellation(token.clone());
        let goal = make_goal("g", 1.0, vec![]);

        token.cancel();
        planner.new_episode();
        assert!(matches!(
            planner.plan_to_goal(&[], &goal),
            Err(PlannerError::Cancelled)
        ));
    }

    #[test]
    fn test_state_failure_aborts_episode() {
        let determiner = FnDeterminer::new(|| {
            Err(PlannerError::StateUnavailable("sensor offline".to_string()))
        });
        let planner = GoapPlanner::new(Arc::new(determiner));
        let system = PlanningSystem::new(vec![], vec![make_goal("g", 1.0, vec![])]).unwrap();

        assert!(matches!(
            planner.plans_to_goals(&system),
            Err(PlannerError::StateUnavailable(_))
        ));
        assert!(matches!(
            planner.plan_to_goal(&[], &make_goal("g", 1.0, vec![])),
            Err(PlannerError::StateUnavailable(_))
        ));
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, bool)>>,
    }

    impl PlanObserver for Recorder {
        fn on_goal_searched(&self, goal: &Goal, plan: Option<&Plan>) {
            self.seen.lock().unwrap().push((goal.name.clone(), plan.is_some()));
        }
    }

    #[test]
    fn test_observer_sees_goals_in_order() {
        let recorder = Arc::new(Recorder::default());
        let planner = planner_at(vec![]).with_observer(recorder.clone());
        let system = PlanningSystem::new(
            vec![make_action("a", 1.0, vec![], vec![("x", true)])],
            vec![
                make_goal("g1", 1.0, vec![("x", true)]),
                make_goal("g2", 1.0, vec![("y", true)]),
                make_goal("g3", 9.0, vec![("x", true)]),
            ],
        )
        .unwrap();

        planner.plans_to_goals(&system).unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("g1".to_string(), true),
                ("g2".to_string(), false),
                ("g3".to_string(), true)
            ]
        );
    }

    #[test]
    fn test_scorer_is_attached_to_plans() {
        let planner =
            planner_at(vec![]).with_scorer(Arc::new(WeightedCost { cost_weight: 3.0 }));
        let plan = planner
            .plan_to_goal(
                &[make_action("a", 2.0, vec![], vec![("x", true)])],
                &make_goal("g", 10.0, vec![("x", true)]),
            )
            .unwrap()
            .unwrap();

        assert_eq!(plan.net_value(&WorldState::empty()), 4.0);
    }

    #[test]
    fn test_prune_delegates_to_system() {
        let system = PlanningSystem::new(
            vec![
                make_action("useful", 1.0, vec![], vec![("x", true)]),
                make_action("useless", 1.0, vec![], vec![("w", true)]),
            ],
            vec![make_goal("g", 1.0, vec![("x", true)])],
        )
        .unwrap();

        let pruned = planner_at(vec![]).prune(&system);
        assert_eq!(pruned.actions().len(), 1);
        assert_eq!(pruned.actions()[0].name, "useful");
    }

    #[test]
    fn test_utility_selection_ranks_performable_actions() {
        let system = PlanningSystem::new(
            vec![
                make_action("wander", 1.0, vec![], vec![("moved", true)])
                    .with_value(2.0),
                make_action("eat", 2.0, vec![("has_food", true)], vec![("fed", true)])
                    .with_value(9.0),
                make_action("forage", 3.0, vec![], vec![("has_food", true)])
                    .with_value(3.0),
                make_action("fly", 0.0, vec![("wings", true)], vec![("airborne", true)])
                    .with_value(50.0),
            ],
            vec![make_goal("airborne", 100.0, vec![("airborne", true)])],
        )
        .unwrap();
        let planner =
            planner_at(vec![("has_food", true), ("wings", false)]).with_utility_selection(true);

        let plans = planner.plans_to_goals(&system).unwrap();
        let names: Vec<_> = plans.iter().map(|p| p.action_names()[0]).collect();
        assert_eq!(names, vec!["eat", "wander"]);
        assert_eq!(plans[0].net_value(&planner.world_state().unwrap()), 7.0);

        let best = planner.best_value_plan_to_any_goal(&system).unwrap().unwrap();
        assert_eq!(best.goal().name, "eat");
    }

    #[test]
    fn test_utility_selection_keeps_goal_search_for_single_goal() {
        let planner = planner_at(vec![]).with_utility_selection(true);
        let plan = planner
            .plan_to_goal(
                &[
                    make_action("a", 1.0, vec![], vec![("x", true)]),
                    make_action("b", 1.0, vec![("x", true)], vec![("y", true)]),
                ],
                &make_goal("g", 5.0, vec![("y", true)]),
            )
            .unwrap()
            .unwrap();
        assert_eq!(plan.action_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_utility_from_config() {
        let config = PlannerConfig::from_toml_str("strategy = \"utility\"").unwrap();
        let planner =
            GoapPlanner::from_config(&config, Arc::new(StaticDeterminer::new(Conditions::new())));
        let system = PlanningSystem::new(
            vec![
                make_action("low", 1.0, vec![], vec![("x", true)])
                    .with_value(2.0),
                make_action("high", 1.0, vec![], vec![("y", true)])
                    .with_value(4.0),
            ],
            vec![],
        )
        .unwrap();

        assert!(planner.utility);
        let plans = planner.plans_to_goals(&system).unwrap();
        assert_eq!(plans[0].action_names(), vec!["high"]);
        assert_eq!(plans[1].action_names(), vec!["low"]);
    }

    #[test]
    fn test_from_config() {
        let config = PlannerConfig::from_toml_str(
            "strategy = \"forward\"\nparallel = false\nstate_timeout_ms = 500\n",
        )
        .unwrap();
        let planner = GoapPlanner::from_config(
            &config,
            Arc::new(StaticDeterminer::new(Conditions::new())),
        );

        assert_eq!(planner.search_algorithm().name(), "forward");
        assert!(!planner.parallel);
    }
}
