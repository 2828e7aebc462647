use ham_snake::ai::{DecisionKind, HamiltonianAgent};
use ham_snake::game::{GameConfig, GameEngine, Snake};
use ham_snake::modes::{AppController, AppState, GameOutcome, PlayMode, SimulateConfig, SimulateMode};

#[test]
fn test_autopilot_fills_the_board() {
    let config = SimulateConfig {
        games: 40,
        max_ticks: 5_000,
        seed: Some(2024),
        report_path: None,
    };
    let report = SimulateMode::new(GameConfig::default(), config).run().unwrap();

    assert_eq!(report.games, 40);
    assert_eq!(report.timeouts, 0);
    assert!(report.wins >= 35, "only {} of 40 games won", report.wins);
    assert_eq!(report.best_length, 64);
    assert!(report.shortcuts > 0);
    assert!(report.follows > 0);

    for record in &report.records {
        if record.outcome == GameOutcome::Won {
            assert_eq!(record.length, 64);
            // 63 pellets can not be eaten in fewer moves
            assert!(record.ticks >= 63);
        }
    }
}

#[test]
fn test_autopilot_on_rectangular_board() {
    let config = SimulateConfig {
        games: 10,
        max_ticks: 5_000,
        seed: Some(7),
        report_path: None,
    };
    let report = SimulateMode::new(GameConfig::new(10, 6), config).run().unwrap();

    assert_eq!(report.timeouts, 0);
    assert!(report.wins >= 8, "only {} of 10 games won", report.wins);
}

#[test]
fn test_long_snake_following_the_cycle_never_collides() {
    let config = GameConfig::default();
    let agent = HamiltonianAgent::with_seed(&config, 99).unwrap();
    let mut engine = GameEngine::with_seed(config.clone(), 99);
    let mut state = engine.new_game();

    // 40 segments laid along the cycle, head at index 45
    let cycle = agent.cycle();
    let head_index = 45;
    let body: Vec<_> = (0..40).map(|i| cycle.get(head_index - i)).collect();
    let direction = body[1].direction_to(body[0]);
    state.snake = Snake::from_body(body, direction);
    state.food.position = cycle.get(head_index + 5);

    for _ in 0..200 {
        let decision = agent.plan(&state);
        assert_eq!(decision.kind, DecisionKind::Follow);

        let result = engine.step(&mut state, decision.direction.into());
        assert!(!result.terminated, "collided at length {}", state.snake.len());
        if result.won {
            break;
        }
    }
}

#[test]
fn test_every_move_is_a_legal_step() {
    let mut controller =
        AppController::with_seed(GameConfig::default(), PlayMode::Ai, 5).unwrap();

    for _ in 0..3_000 {
        let before = controller.state().snake.clone();
        let result = controller.update().unwrap();

        if result.won || result.terminated {
            if controller.app_state() == AppState::GameOver {
                controller.restart();
            }
            continue;
        }

        let head = controller.state().snake.head();
        assert_eq!(head.distance(before.head()), 1);
        assert!(controller.state().is_in_bounds(head));
        if let (Some(old), Some(new)) = (before.direction, controller.state().snake.direction) {
            assert!(!old.is_opposite(new));
        }
    }
}

#[test]
fn test_session_counters() {
    let mut controller =
        AppController::with_seed(GameConfig::new(4, 4), PlayMode::Ai, 12).unwrap();
    controller.set_auto_restart(true);

    let mut finished = 0;
    for _ in 0..5_000 {
        let result = controller.update().unwrap();
        if result.won || result.terminated {
            finished += 1;
        }
    }

    let state = controller.state();
    assert!(finished > 0);
    assert_eq!(state.games_played, finished + 1);
    assert_eq!(controller.metrics().games_finished, finished);
    assert_eq!(controller.metrics().games_won, state.games_won);
    assert!(state.games_won <= finished);
}
