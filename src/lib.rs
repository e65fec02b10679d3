//! Grid Snake: a discrete-time snake engine paced by its own score, plus the
//! terminal pieces that host it.
//!
//! The engine ([`game::Engine`]) owns all game state. Timing and output are
//! injected through [`scheduler::TickScheduler`] and [`events::EventSink`], so
//! the same engine runs under a wall clock or a manual test driver.

pub mod config;
pub mod events;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
