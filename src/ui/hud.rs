use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::events::Snapshot;

const HUD_MARGIN_X: u16 = 1;
const TABLE_SEPARATOR: &str = " │ ";

/// Renders the one-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) -> Rect {
    let [play_area, info_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(info_line(snapshot))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        inset_horizontal(info_area, HUD_MARGIN_X),
    );

    play_area
}

fn info_line(snapshot: &Snapshot) -> Line<'static> {
    let value = Style::default().fg(Color::White);
    let state = if snapshot.over {
        Span::styled("over", Style::default().fg(Color::Red))
    } else if snapshot.paused {
        Span::styled("paused", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("running", Style::default().fg(Color::Green))
    };

    Line::from(vec![
        Span::raw("Length: "),
        Span::styled(snapshot.snake.len().to_string(), value),
        Span::raw(TABLE_SEPARATOR),
        Span::raw("Score: "),
        Span::styled(
            snapshot.score.to_string(),
            value.add_modifier(Modifier::BOLD),
        ),
        Span::raw(TABLE_SEPARATOR),
        Span::raw(format!("{0}x{0}", snapshot.board_cells)),
        Span::raw(TABLE_SEPARATOR),
        state,
    ])
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}
