use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{GameConfig, GridSize};
use crate::events::{EventSink, Snapshot};
use crate::food;
use crate::input::{direction_change_is_valid, Direction, GameInput};
use crate::scheduler::TickScheduler;
use crate::snake::{Position, Snake};

/// Direction of a freshly initialized snake.
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// Food could not be placed because the snake covers every cell.
    BoardFilled,
}

/// Current high-level gameplay state. `Over` is terminal until a restart.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Paused,
    Over(EndReason),
}

/// What a call to [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// Paused or over; nothing changed.
    Idle,
    Moved,
    Ate,
    Ended(EndReason),
}

/// Explicit position to start a game from instead of the canonical start.
#[derive(Debug, Clone)]
pub struct BoardSetup {
    pub snake: Snake,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
}

/// Authoritative game state plus its injected collaborators.
///
/// The engine never touches a clock or a drawing surface: it rearms `S`
/// after each tick and reports frames and food events to `E`.
#[derive(Debug)]
pub struct Engine<S, E, R = StdRng> {
    config: GameConfig,
    grid: GridSize,
    snake: Snake,
    direction: Direction,
    food: Position,
    score: u32,
    status: GameStatus,
    scheduler: S,
    sink: E,
    rng: R,
}

impl<S: TickScheduler, E: EventSink> Engine<S, E, StdRng> {
    /// Creates an engine whose food placement is reproducible from `seed`.
    #[must_use]
    pub fn with_seed(config: GameConfig, scheduler: S, sink: E, seed: u64) -> Self {
        Self::new(config, scheduler, sink, StdRng::seed_from_u64(seed))
    }
}

impl<S: TickScheduler, E: EventSink, R: Rng> Engine<S, E, R> {
    /// Creates an engine in the canonical start state and arms the first tick.
    ///
    /// `config` is expected to have passed [`GameConfig::validate`].
    #[must_use]
    pub fn new(config: GameConfig, scheduler: S, sink: E, rng: R) -> Self {
        let grid = config.grid();
        let start = start_position(grid);
        let mut engine = Self {
            config,
            grid,
            snake: Snake::new(start),
            direction: INITIAL_DIRECTION,
            food: start,
            score: 0,
            status: GameStatus::Running,
            scheduler,
            sink,
            rng,
        };
        engine.initialize();
        engine
    }

    /// Creates a running engine from an explicit board position.
    #[must_use]
    pub fn with_setup(
        config: GameConfig,
        scheduler: S,
        sink: E,
        rng: R,
        setup: BoardSetup,
    ) -> Self {
        let mut engine = Self {
            config,
            grid: config.grid(),
            snake: setup.snake,
            direction: setup.direction,
            food: setup.food,
            score: setup.score,
            status: GameStatus::Running,
            scheduler,
            sink,
            rng,
        };
        engine.rearm();
        engine.emit_frame();
        engine
    }

    /// Resets to the canonical start state and restarts the tick schedule at
    /// the base period.
    pub fn initialize(&mut self) {
        let start = start_position(self.grid);
        self.snake = Snake::new(start);
        self.direction = INITIAL_DIRECTION;
        self.food = self.initial_food(start);
        self.score = 0;
        self.status = GameStatus::Running;

        self.rearm();
        debug!(head = ?start, food = ?self.food, "game initialized");
        self.emit_frame();
    }

    /// Discards the current game and starts a fresh one. Legal at any time.
    pub fn restart(&mut self) {
        self.initialize();
    }

    /// Requests a new heading for the next tick.
    ///
    /// Ignored unless running, and ignored for a reversal of the current
    /// heading. Returns whether the request was accepted.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        if !direction_change_is_valid(self.direction, requested) {
            return false;
        }

        self.direction = requested;
        true
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        let vacated = self.snake.advance(self.direction);
        let head = self.snake.head();

        if !head.is_within_bounds(self.grid) {
            self.end(EndReason::WallCollision);
            return TickOutcome::Ended(EndReason::WallCollision);
        }
        if self.snake.head_overlaps_body() {
            self.end(EndReason::SelfCollision);
            return TickOutcome::Ended(EndReason::SelfCollision);
        }

        let mut outcome = TickOutcome::Moved;
        if head == self.food {
            self.score = self.score.saturating_add(self.config.score_increment);
            self.snake.regrow_tail(vacated);
            self.sink.food_eaten();
            debug!(score = self.score, length = self.snake.len(), "food eaten");

            let Some(next_food) = food::spawn_position(&mut self.rng, self.grid, &self.snake)
            else {
                self.end(EndReason::BoardFilled);
                return TickOutcome::Ended(EndReason::BoardFilled);
            };
            self.food = next_food;
            outcome = TickOutcome::Ate;
        }

        self.rearm();
        self.emit_frame();
        outcome
    }

    /// Pauses a running game or resumes a paused one. No effect once over.
    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                self.scheduler.cancel();
                debug!("game paused");
            }
            GameStatus::Paused => {
                self.status = GameStatus::Running;
                self.rearm();
                debug!(period = ?self.tick_period(), "game resumed");
            }
            GameStatus::Over(_) => return,
        }

        self.emit_frame();
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                let _ = self.set_direction(direction);
            }
            GameInput::TogglePause => self.toggle_pause(),
            GameInput::RestartIfOver => {
                if self.is_over() {
                    self.restart();
                }
            }
            GameInput::Restart => self.restart(),
            GameInput::Quit => {}
        }
    }

    /// Returns the tick period implied by the current score.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.config.tick_period(self.score)
    }

    /// Returns a read-only copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let end_reason = match self.status {
            GameStatus::Over(reason) => Some(reason),
            GameStatus::Running | GameStatus::Paused => None,
        };

        Snapshot {
            board_cells: self.grid.width,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            score: self.score,
            direction: self.direction,
            paused: self.status == GameStatus::Paused,
            over: end_reason.is_some(),
            end_reason,
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[must_use]
    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    fn end(&mut self, reason: EndReason) {
        self.status = GameStatus::Over(reason);
        self.scheduler.cancel();
        info!(?reason, score = self.score, length = self.snake.len(), "game over");
        self.emit_frame();
    }

    fn rearm(&mut self) {
        let period = self.tick_period();
        self.scheduler.cancel();
        self.scheduler.schedule(period);
    }

    fn emit_frame(&mut self) {
        let snapshot = self.snapshot();
        self.sink.frame_ready(&snapshot);
    }

    // Food starts one cell ahead of the head so the first tick eats it.
    fn initial_food(&mut self, start: Position) -> Position {
        let ahead = start.offset(INITIAL_DIRECTION);
        if ahead.is_within_bounds(self.grid) {
            return ahead;
        }

        // Only a one-cell board has no free cell here.
        food::spawn_position(&mut self.rng, self.grid, &self.snake).unwrap_or(start)
    }
}

fn start_position(grid: GridSize) -> Position {
    Position::new(i32::from(grid.width / 2), i32::from(grid.height / 2))
}
