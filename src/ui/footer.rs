use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    match app.current_screen {
        CurrentScreen::MovieDetail => "(Esc/b) back, (q) quit",
        CurrentScreen::Main => {
            if app.api_key_missing() {
                "(q) to quit"
            } else if app.progress_visible() {
                "Loading movies... (q) to quit"
            } else if app.grid_visible() && !app.grid.is_empty() {
                "(←↓↑→/hjkl) move, (Enter) details, (p) popular, (r) top rated, (q) quit"
            } else {
                "(p) sort by popularity, (r) sort by rating, (q) quit"
            }
        }
    }
}

/// Renders the footer; a pending notice replaces the instructions until it expires
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bottom_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let line = match app.active_notice() {
        Some(notice) => Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(get_instruction_text(app)),
    };

    let bottom = Paragraph::new(line).block(bottom_block);

    frame.render_widget(bottom, area);
}
