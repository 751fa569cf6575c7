use crate::app::movie::Movie;
use crate::app::{App, ScreenState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_big_text::{BigText, PixelSize};

const CELL_HEIGHT: u16 = 6;

/// Renders the catalog area: the grid, an error message, or the idle placeholder
pub fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = app.error_message() {
        render_error_state(frame, area, message, app.state);
        return;
    }

    if app.state == ScreenState::Idle {
        let idle_block = Block::default()
            .title("No movies loaded - press (p) or (r)")
            .borders(Borders::ALL)
            .style(Style::default());
        frame.render_widget(idle_block, area);
        return;
    }

    render_grid(frame, app, area);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let grid = &app.grid;
    let title = format!("{} ({} movies)", app.sort_mode.label(), grid.len());
    let outer_block = Block::default().title(title).borders(Borders::ALL);
    let inner = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    if grid.is_empty() {
        let empty = Paragraph::new("The catalog is empty")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let visible_rows = usize::from((inner.height / CELL_HEIGHT).max(1));
    let first_row = (grid.selected_row() + 1).saturating_sub(visible_rows);
    let last_row = (first_row + visible_rows).min(grid.row_count());

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CELL_HEIGHT); visible_rows])
        .split(inner);

    for (slot, row) in (first_row..last_row).enumerate() {
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, grid.columns() as u32); grid.columns()])
            .split(row_areas[slot]);

        for column in 0..grid.columns() {
            let index = row * grid.columns() + column;
            if let Some(movie) = grid.movies().get(index) {
                render_cell(frame, cell_areas[column], movie, index == grid.selected_index());
            }
        }
    }
}

fn render_cell(frame: &mut Frame, area: Rect, movie: &Movie, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines = vec![Line::from(Span::styled(
        movie.title().to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];

    if let Some(original) = movie.original_title().filter(|o| *o != movie.title()) {
        lines.push(Line::from(Span::styled(
            original.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }

    lines.push(Line::from(vec![
        Span::styled(
            format!("★ {:.1}", movie.vote_average()),
            Style::default().fg(rating_color(movie.vote_average())),
        ),
        Span::raw("  "),
        Span::styled(movie.release_date().to_string(), Style::default().fg(Color::Gray)),
    ]));

    let cell = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(cell, area);
}

/// Color for a 0-10 vote average
pub fn rating_color(score: f64) -> Color {
    if score >= 7.0 {
        Color::Green
    } else if score >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_error_state(frame: &mut Frame, area: Rect, message: &str, state: ScreenState) {
    let error_block = Block::default()
        .title("Error")
        .borders(Borders::ALL)
        .style(Style::default());

    let mut error_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if state == ScreenState::ErrorConnectivity {
        error_text.push(Line::from(Span::styled(
            "Reconnect, then pick a sort order to try again",
            Style::default().fg(Color::White),
        )));
    } else {
        error_text.push(Line::from(Span::styled(
            "Pick a sort order to try again",
            Style::default().fg(Color::White),
        )));
    }

    let error_paragraph = Paragraph::new(error_text)
        .block(error_block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

/// Renders missing API key error with big text
pub fn render_missing_api_key(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Big text
            Constraint::Min(5),    // Instructions
        ])
        .split(area);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .lines(vec!["API KEY".into(), "REQUIRED!".into()])
        .alignment(Alignment::Center)
        .build();

    frame.render_widget(big_text, chunks[0]);

    let instructions = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Please set your TMDB API key to browse movies",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "1. Get a key at: https://www.themoviedb.org/settings/api",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "2. export TMDB_API_KEY=your_key_here, or pass --api-key",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "3. Restart the application",
            Style::default().fg(Color::White),
        )),
    ];

    let instructions_paragraph = Paragraph::new(instructions)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(instructions_paragraph, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_colors_follow_thresholds() {
        assert_eq!(rating_color(8.2), Color::Green);
        assert_eq!(rating_color(5.0), Color::Yellow);
        assert_eq!(rating_color(0.0), Color::Red);
    }
}
