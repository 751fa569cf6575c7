use crate::app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the title bar: app name, active ranking, time of last load and an
/// offline marker
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let mut spans = vec![
        Span::styled("Popular Movies", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(app.sort_mode.label(), Style::default().fg(Color::Cyan)),
    ];

    if let Some(updated) = app.last_updated {
        spans.push(Span::styled(
            format!("  updated {}", updated.format("%H:%M")),
            Style::default().fg(Color::Gray),
        ));
    }

    if !app.online() {
        spans.push(Span::styled("  offline", Style::default().fg(Color::Red)));
    }

    let title = Paragraph::new(Line::from(spans)).block(title_block);

    frame.render_widget(title, area);
}
