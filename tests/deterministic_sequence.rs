use std::time::Duration;

use grid_snake::config::GameConfig;
use grid_snake::events::RecordingSink;
use grid_snake::game::{BoardSetup, EndReason, Engine, GameStatus, TickOutcome};
use grid_snake::input::{Direction, GameInput};
use grid_snake::scheduler::ManualScheduler;
use grid_snake::snake::{Position, Snake};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let mut engine = Engine::with_setup(
        GameConfig {
            board_size_px: 180,
            ..GameConfig::default()
        },
        ManualScheduler::new(),
        RecordingSink::new(),
        StdRng::seed_from_u64(42),
        BoardSetup {
            snake: Snake::new(Position::new(1, 1)),
            direction: Direction::Right,
            food: Position::new(2, 1),
            score: 0,
        },
    );

    assert_eq!(engine.tick(), TickOutcome::Ate);
    assert_eq!(engine.status(), GameStatus::Running);
    assert_eq!(engine.score(), 10);
    assert_eq!(engine.snake().len(), 2);
    assert_eq!(engine.snake().head(), Position::new(2, 1));
    assert_eq!(
        engine.scheduler().pending(),
        Some(Duration::from_millis(290))
    );

    // The respawned food may sit on the next cell, so only the move is fixed.
    engine.apply_input(GameInput::Direction(Direction::Up));
    engine.tick();
    assert_eq!(engine.status(), GameStatus::Running);
    assert_eq!(engine.snake().head(), Position::new(2, 0));

    assert_eq!(engine.tick(), TickOutcome::Ended(EndReason::WallCollision));
    assert_eq!(engine.status(), GameStatus::Over(EndReason::WallCollision));
    assert_eq!(engine.scheduler().pending(), None);

    let last = engine.sink().last_frame().expect("final frame emitted");
    assert!(last.over);
    assert_eq!(last.score, engine.score());
    assert_eq!(last.snake[0], Position::new(2, -1));
}

#[test]
fn canonical_game_from_start_to_restart() {
    let mut engine = Engine::with_seed(
        GameConfig::default(),
        ManualScheduler::new(),
        RecordingSink::new(),
        2024,
    );

    assert_eq!(engine.tick(), TickOutcome::Ate);
    assert_eq!(engine.score(), 10);
    assert_eq!(engine.sink().food_eaten_count(), 1);

    engine.apply_input(GameInput::TogglePause);
    engine.apply_input(GameInput::Direction(Direction::Down));
    assert_eq!(engine.direction(), Direction::Right);
    engine.apply_input(GameInput::TogglePause);

    let mut ticks = 0;
    while !engine.is_over() {
        let before = engine.snapshot();
        let outcome = engine.tick();
        ticks += 1;

        if outcome == TickOutcome::Moved {
            assert_eq!(engine.snake().len(), before.snake.len());
        }
        assert!(engine.score() >= before.score);
        assert_eq!(engine.score() % 10, 0);
        assert!(ticks <= 20, "snake should reach the right wall");
    }
    assert!(engine.snake().head().x >= 20 || engine.snake().head_overlaps_body());

    engine.apply_input(GameInput::RestartIfOver);
    assert_eq!(engine.status(), GameStatus::Running);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.snake().head(), Position::new(10, 10));
    assert_eq!(
        engine.scheduler().pending(),
        Some(Duration::from_millis(300))
    );
}

#[test]
fn engines_with_same_score_history_share_period() {
    let setup = || BoardSetup {
        snake: Snake::new(Position::new(0, 0)),
        direction: Direction::Down,
        food: Position::new(0, 1),
        score: 120,
    };
    let mut first = Engine::with_setup(
        GameConfig::default(),
        ManualScheduler::new(),
        RecordingSink::new(),
        StdRng::seed_from_u64(1),
        setup(),
    );
    let mut second = Engine::with_setup(
        GameConfig::default(),
        ManualScheduler::new(),
        RecordingSink::new(),
        StdRng::seed_from_u64(2),
        setup(),
    );

    first.tick();
    second.tick();

    assert_eq!(first.score(), 130);
    assert_eq!(first.tick_period(), second.tick_period());
    assert_eq!(first.tick_period(), Duration::from_millis(170));
}
