use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, WhichUse};

/// Renders the progress indicator while a catalog fetch is in flight
pub fn render_loading(frame: &mut Frame, app: &mut App, area: Rect) {
    let loading_block = Block::default()
        .title("Loading Movies")
        .borders(Borders::ALL)
        .style(Style::default());

    let inner = loading_block.inner(area);
    frame.render_widget(loading_block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let throbber = Throbber::default()
        .label("Fetching movies...")
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    frame.render_stateful_widget(throbber, rows[1], &mut app.throbber_state);
}
