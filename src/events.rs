use serde::Serialize;

use crate::game::EndReason;
use crate::input::Direction;
use crate::snake::Position;

/// Read-only copy of the game state handed to the rendering side.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub board_cells: u16,
    /// Head first. After a game-ending tick the head may lie off the board.
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub direction: Direction,
    pub paused: bool,
    pub over: bool,
    pub end_reason: Option<EndReason>,
}

/// Receiver of the engine's fire-and-forget notifications.
///
/// Implementations must not fail back into the engine: any rendering or
/// audio error stays on the sink's side.
pub trait EventSink {
    /// A new frame is ready to draw.
    fn frame_ready(&mut self, snapshot: &Snapshot);

    /// The snake ate food this tick.
    fn food_eaten(&mut self);
}

/// One notification captured by [`RecordingSink`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GameEvent {
    Frame(Snapshot),
    FoodEaten,
}

/// Sink that keeps every event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<GameEvent>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Returns the most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Snapshot> {
        self.events.iter().rev().find_map(|event| match event {
            GameEvent::Frame(snapshot) => Some(snapshot),
            GameEvent::FoodEaten => None,
        })
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, GameEvent::Frame(_)))
            .count()
    }

    #[must_use]
    pub fn food_eaten_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, GameEvent::FoodEaten))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn frame_ready(&mut self, snapshot: &Snapshot) {
        self.events.push(GameEvent::Frame(snapshot.clone()));
    }

    fn food_eaten(&mut self) {
        self.events.push(GameEvent::FoodEaten);
    }
}
