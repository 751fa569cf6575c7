use crate::app::movie::DetailPayload;
use crate::app::{App, PosterState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};

use super::main_content::rating_color;

/// Renders the detail screen for the movie picked on the grid
pub fn render_movie_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(detail) = app.detail.as_mut() else {
        render_empty_state(frame, area);
        return;
    };

    let outer_block = Block::default()
        .title(format!("Movie Details - {}", detail.payload.title))
        .borders(Borders::ALL)
        .style(Style::default());

    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Poster
            Constraint::Min(20),        // Text
        ])
        .split(inner_area);

    render_poster_section(frame, columns[0], &mut detail.poster);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title info
            Constraint::Min(3),    // Synopsis
        ])
        .split(columns[1]);

    render_title_section(frame, rows[0], &detail.payload);
    render_synopsis(frame, rows[1], &detail.payload);
}

fn render_poster_section(frame: &mut Frame, area: Rect, poster: &mut PosterState) {
    let poster_block = Block::default().borders(Borders::ALL).title("Poster");

    let placeholder = match poster {
        PosterState::Ready(protocol) => {
            let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));
            let inner_area = poster_block.inner(area);
            frame.render_widget(poster_block, area);
            frame.render_stateful_widget(image, inner_area, protocol);
            return;
        }
        PosterState::Loading => Span::styled(
            "Downloading poster...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        PosterState::Missing => Span::styled("No poster available", Style::default().fg(Color::Gray)),
        PosterState::Unsupported => Span::styled(
            "This terminal cannot display images",
            Style::default().fg(Color::Gray),
        ),
        PosterState::Failed(reason) => {
            Span::styled(format!("Poster failed: {reason}"), Style::default().fg(Color::Red))
        }
    };

    let placeholder_paragraph = Paragraph::new(vec![Line::from(""), Line::from(""), Line::from(placeholder)])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(poster_block);

    frame.render_widget(placeholder_paragraph, area);
}

/// Renders the title section with basic info
fn render_title_section(frame: &mut Frame, area: Rect, movie: &DetailPayload) {
    let mut title_info = vec![Line::from(Span::styled(
        movie.title.as_str(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];

    if !movie.original_title.is_empty() && movie.original_title != movie.title {
        title_info.push(Line::from(vec![
            Span::styled("Original title: ", Style::default().fg(Color::Gray)),
            Span::styled(movie.original_title.as_str(), Style::default().fg(Color::White)),
        ]));
    }

    title_info.push(Line::from(vec![
        Span::styled("Rating: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{:.1}/10", movie.vote_average),
            Style::default()
                .fg(rating_color(movie.vote_average))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled("Released: ", Style::default().fg(Color::Gray)),
        Span::styled(movie.release_date.as_str(), Style::default().fg(Color::White)),
    ]));

    frame.render_widget(Paragraph::new(title_info), area);
}

fn render_synopsis(frame: &mut Frame, area: Rect, movie: &DetailPayload) {
    let synopsis = if movie.plot_synopsis.is_empty() {
        "No synopsis available."
    } else {
        movie.plot_synopsis.as_str()
    };

    let content = vec![
        Line::from(Span::styled(
            "Plot:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(synopsis, Style::default().fg(Color::White))),
    ];

    let content_paragraph = Paragraph::new(content).wrap(Wrap { trim: true });

    frame.render_widget(content_paragraph, area);
}

/// Renders empty state
fn render_empty_state(frame: &mut Frame, area: Rect) {
    let empty_block = Block::default()
        .title("Movie Details")
        .borders(Borders::ALL)
        .style(Style::default());

    let empty_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No movie details available",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press (Esc) or (b) to go back",
            Style::default().fg(Color::Gray),
        )),
    ];

    let empty_paragraph = Paragraph::new(empty_text)
        .block(empty_block)
        .alignment(Alignment::Center);

    frame.render_widget(empty_paragraph, area);
}
