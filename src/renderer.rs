use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::GridSize;
use crate::events::Snapshot;
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu};

/// Terminal columns drawn per board cell, so cells look roughly square.
pub const COLUMNS_PER_CELL: u16 = 2;

const GLYPH_SNAKE_HEAD: &str = "██";
const GLYPH_SNAKE_BODY: &str = "▓▓";
const GLYPH_FOOD: &str = "()";

/// Renders the full game frame from one snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot);
    let board_area = board_rect(play_area, snapshot.board_cells);

    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    let bounds = GridSize::square(snapshot.board_cells);
    render_food(frame, inner, bounds, snapshot.food);
    render_snake(frame, inner, bounds, &snapshot.snake);

    if snapshot.over {
        render_game_over_menu(frame, play_area, snapshot.score, snapshot.end_reason);
    } else if snapshot.paused {
        render_pause_menu(frame, play_area);
    }
}

fn board_rect(area: Rect, board_cells: u16) -> Rect {
    let width = board_cells.saturating_mul(COLUMNS_PER_CELL).saturating_add(2);
    let height = board_cells.saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    board
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, food: Position) {
    let Some((x, y)) = logical_to_terminal(inner, bounds, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(Color::Red));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, snake: &[Position]) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins when segments share a cell.
    for (index, segment) in snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(Color::Green));
        }
    }
}

/// Maps a board cell to its terminal position; `None` when off the board or
/// outside the visible area.
fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x)
        .ok()?
        .checked_mul(COLUMNS_PER_CELL)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(COLUMNS_PER_CELL) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use crate::config::GridSize;
    use crate::events::Snapshot;
    use crate::game::EndReason;
    use crate::input::Direction;
    use crate::snake::Position;

    use super::{logical_to_terminal, render};

    fn snapshot(over: bool, paused: bool) -> Snapshot {
        Snapshot {
            board_cells: 10,
            snake: vec![Position::new(10, 4), Position::new(9, 4)],
            food: Position::new(2, 2),
            score: 30,
            direction: Direction::Right,
            paused,
            over,
            end_reason: over.then_some(EndReason::WallCollision),
        }
    }

    fn rendered_text(snapshot: &Snapshot) -> String {
        let mut terminal =
            Terminal::new(TestBackend::new(60, 20)).expect("test backend should initialize");
        terminal
            .draw(|frame| render(frame, snapshot))
            .expect("draw should succeed");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn game_over_overlay_is_drawn_when_over() {
        let text = rendered_text(&snapshot(true, false));

        assert!(text.contains("GAME OVER"));
        assert!(text.contains("hit wall"));
    }

    #[test]
    fn pause_popup_is_drawn_when_paused() {
        let text = rendered_text(&snapshot(false, true));

        assert!(text.contains("PAUSED"));
        assert!(!text.contains("GAME OVER"));
    }

    #[test]
    fn hud_shows_score() {
        let text = rendered_text(&snapshot(false, false));

        assert!(text.contains("Score: 30"));
    }

    #[test]
    fn off_board_cells_are_not_mapped() {
        let inner = Rect::new(1, 1, 20, 10);
        let bounds = GridSize::square(10);

        assert_eq!(
            logical_to_terminal(inner, bounds, Position::new(0, 0)),
            Some((1, 1))
        );
        assert_eq!(
            logical_to_terminal(inner, bounds, Position::new(9, 9)),
            Some((19, 10))
        );
        assert_eq!(logical_to_terminal(inner, bounds, Position::new(10, 4)), None);
        assert_eq!(logical_to_terminal(inner, bounds, Position::new(-1, 0)), None);
    }
}
