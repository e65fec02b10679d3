use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::events::{EventSink, Snapshot};
use crate::renderer;

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// The drawing surface: raw mode plus alternate screen for one session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = restore_terminal();
                Err(error)
            }
        }
    }

    /// Draws one snapshot.
    pub fn draw(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.terminal
            .draw(|frame| renderer::render(frame, snapshot))
            .map(|_| ())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Engine sink for the terminal host.
///
/// Keeps only the latest frame for the next redraw and turns food events into
/// a terminal bell.
#[derive(Debug, Default)]
pub struct TerminalSink {
    latest: Option<Snapshot>,
    bell_pending: bool,
}

impl TerminalSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the frame emitted since the last call, if any.
    pub fn take_frame(&mut self) -> Option<Snapshot> {
        self.latest.take()
    }

    /// Rings the bell if food was eaten since the last call. Failures are
    /// ignored: sound never affects the game.
    pub fn flush_sound(&mut self) {
        if std::mem::take(&mut self.bell_pending) {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    }
}

impl EventSink for TerminalSink {
    fn frame_ready(&mut self, snapshot: &Snapshot) {
        self.latest = Some(snapshot.clone());
    }

    fn food_eaten(&mut self) {
        self.bell_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::game::Engine;
    use crate::scheduler::ManualScheduler;

    use super::TerminalSink;

    #[test]
    fn sink_keeps_only_the_latest_frame() {
        let mut engine = Engine::with_seed(
            GameConfig::default(),
            ManualScheduler::new(),
            TerminalSink::new(),
            9,
        );
        engine.tick();
        engine.toggle_pause();

        let frame = engine.sink_mut().take_frame().expect("frame pending");
        assert!(frame.paused);
        assert_eq!(frame.score, 10);
        assert!(engine.sink_mut().take_frame().is_none());
    }
}
