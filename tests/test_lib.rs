use goap_planner::{
    Action, Conditions, FnDeterminer, ForwardSearch, GoapPlanner, Goal, NoopObserver, Planner,
    PlannerConfig, PlannerError, PlanningSystem, StaticDeterminer, WorldState,
};
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    fn key_and_door() -> Vec<Action> {
        vec![
            Action::new("A", 1.0).unwrap().with_effect("hasKey", true),
            Action::new("B", 2.0)
                .unwrap()
                .with_precondition("hasKey", true)
                .with_effect("doorOpen", true),
        ]
    }

    fn open_door() -> Goal {
        Goal::new("open_door", 10.0).with_precondition("doorOpen", true)
    }

    fn planner_at(facts: Conditions) -> GoapPlanner {
        GoapPlanner::new(Arc::new(StaticDeterminer::new(facts)))
            .with_observer(Arc::new(NoopObserver))
    }

    #[test]
    fn test_key_and_door() {
        let planner = planner_at(Conditions::new());
        let state = planner.world_state().unwrap();

        let plan = planner
            .plan_to_goal(&key_and_door(), &open_door())
            .unwrap()
            .unwrap();

        assert_eq!(plan.action_names(), vec!["A", "B"]);
        assert_eq!(plan.cost(), 3.0);
        assert_eq!(plan.net_value(&state), 7.0);
    }

    #[test]
    fn test_door_already_open() {
        let planner = planner_at(Conditions::new().with("doorOpen", true));
        let state = planner.world_state().unwrap();

        let plan = planner
            .plan_to_goal(&key_and_door(), &open_door())
            .unwrap()
            .unwrap();

        assert!(plan.is_empty());
        assert_eq!(plan.cost(), 0.0);
        assert_eq!(plan.net_value(&state), 10.0);
    }

    #[test]
    fn test_unreachable_goal_does_not_block_others() {
        let goals = vec![
            Goal::new("fly", 100.0).with_precondition("flying", true),
            open_door(),
        ];
        let system = PlanningSystem::with_known_conditions(
            key_and_door(),
            goals,
            ["hasKey", "doorOpen", "flying"],
        )
        .unwrap();
        let planner = planner_at(Conditions::new());

        let fly = planner.plan_to_goal(system.actions(), &system.goals()[0]).unwrap();
        assert!(fly.is_none());

        let plans = planner.plans_to_goals(&system).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].goal().name, "open_door");
        assert_eq!(plans[0].action_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_catalog_from_toml() {
        let system = PlanningSystem::from_toml_str(
            r#"
            known_conditions = ["has_axe", "has_wood", "has_house"]

            [[actions]]
            name = "gather_wood"
            cost = 1.0
            preconditions = { has_axe = true }
            effects = { has_wood = true }

            [[actions]]
            name = "build_house"
            cost = 2.0
            preconditions = { has_wood = true }
            effects = { has_house = true }

            [[goals]]
            name = "shelter"
            value = 20.0
            preconditions = { has_house = true }
            "#,
        )
        .unwrap();
        let planner = planner_at(Conditions::new().with("has_axe", true));

        let best = planner.best_value_plan_to_any_goal(&system).unwrap().unwrap();
        assert_eq!(best.action_names(), vec!["gather_wood", "build_house"]);
        assert_eq!(best.net_value(&planner.world_state().unwrap()), 17.0);
    }

    #[test]
    fn test_invalid_catalog_rejected_before_search() {
        let toggle = Action::new("toggle", 1.0)
            .unwrap()
            .with_precondition("lit", true)
            .with_effect("lit", false);
        let result = PlanningSystem::new(vec![toggle], vec![]);
        assert!(matches!(result, Err(PlannerError::InvalidCatalog(_))));

        let result =
            PlanningSystem::with_known_conditions(key_and_door(), vec![open_door()], ["hasKey"]);
        assert!(matches!(result, Err(PlannerError::InvalidCatalog(_))));
    }

    #[test]
    fn test_pruned_system_plans_the_same() {
        let mut actions = key_and_door();
        actions.push(Action::new("dance", 1.0).unwrap().with_effect("happy", true));
        actions.push(
            Action::new("sing", 1.0)
                .unwrap()
                .with_precondition("happy", true)
                .with_effect("loud", true),
        );
        let system = PlanningSystem::new(actions, vec![open_door()]).unwrap();
        let planner = planner_at(Conditions::new());

        let pruned = planner.prune(&system);
        let names: Vec<_> = pruned.actions().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(
            planner.plans_to_goals(&pruned).unwrap(),
            planner.plans_to_goals(&system).unwrap()
        );
    }

    #[test]
    fn test_forward_and_regression_agree() {
        let regression = planner_at(Conditions::new());
        let forward = planner_at(Conditions::new())
            .with_search_algorithm(Box::new(ForwardSearch::default()));

        let a = regression.plan_to_goal(&key_and_door(), &open_door()).unwrap();
        let b = forward.plan_to_goal(&key_and_door(), &open_door()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dynamic_cost_and_value_use_episode_state() {
        let haul = Action::with_dynamic_cost("haul", |state: &WorldState| {
            if state.contains_key("cart") {
                1.0
            } else {
                8.0
            }
        })
        .with_effect("delivered", true);
        let deliver = Goal::with_dynamic_value("deliver", |state: &WorldState| {
            if state.contains_key("urgent") {
                20.0
            } else {
                5.0
            }
        })
        .with_precondition("delivered", true);
        let planner = planner_at(Conditions::new().with("cart", true).with("urgent", true));
        let state = planner.world_state().unwrap();

        let plan = planner.plan_to_goal(&[haul], &deliver).unwrap().unwrap();
        assert_eq!(plan.cost(), 1.0);
        assert_eq!(plan.net_value(&state), 19.0);
        assert_eq!(plan.net_value(&WorldState::empty()), -3.0);
    }

    #[test]
    fn test_state_timeout_aborts_episode() {
        let slow = FnDeterminer::new(|| {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Conditions::new())
        });
        let config = PlannerConfig::from_toml_str("state_timeout_ms = 20").unwrap();
        let planner = GoapPlanner::from_config(&config, Arc::new(slow));
        let system = PlanningSystem::new(key_and_door(), vec![open_door()]).unwrap();

        assert!(matches!(
            planner.plans_to_goals(&system),
            Err(PlannerError::StateUnavailable(_))
        ));
    }
}
