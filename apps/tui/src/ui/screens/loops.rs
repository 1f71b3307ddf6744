use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};
use throbber_widgets_tui::Throbber;

use crate::app::App;
use crate::player::PlayerState;
use crate::ui::screens::{render_status, render_tabs};

pub fn render_loops(app: &mut App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(f.area());

    render_tabs(app, f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(24)])
        .split(chunks[1]);

    render_loop_list(app, f, body[0]);
    render_loop_detail(app, f, body[1]);
    render_status(app, f, chunks[2]);
}

const fn state_color(state: PlayerState) -> Color {
    match state {
        PlayerState::Playing => Color::Green,
        PlayerState::Loading => Color::Yellow,
        PlayerState::Ready => Color::Cyan,
        PlayerState::Stopped => Color::Gray,
    }
}

fn render_loop_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let marker = if i == app.selected_loop { "> " } else { "  " };
            let label = format!(
                "{marker}{} {}/{}",
                player.config.fig_id,
                player.config.sector.to_lowercase(),
                player.config.band
            );
            let mut style = Style::default().fg(state_color(player.state));
            if i == app.selected_loop {
                style = style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(TextLine::from(Span::styled(label, style)))
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title("Satellite loops"));
    f.render_widget(list, area);
}

fn render_loop_detail(app: &mut App, f: &mut Frame<'_>, area: Rect) {
    // Pull everything out of the selected player before touching the
    // throbber state mutably below.
    let Some(player) = app.selected_player() else {
        let empty = Paragraph::new("No satellite loops configured")
            .block(Block::default().borders(Borders::ALL).title("Loop"));
        f.render_widget(empty, area);
        return;
    };

    let title = player.config.fig_id.clone();
    let description = player.description.clone();
    let resolution = player.resolution.clone();
    let state = player.state;
    let frame_count = player.frames.len();
    let skipped = player.skipped;
    let last_error = player.last_error.clone();
    let current_index = player.current;
    let frame = player.current_frame().map(|frame| {
        (
            frame.timestamp.clone(),
            frame.filename.clone(),
            frame.payload.len(),
        )
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![
        TextLine::from(Span::styled(
            description,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(format!("resolution: {resolution}")),
        TextLine::from(Span::styled(
            format!("state: {state}"),
            Style::default().fg(state_color(state)),
        )),
    ];

    if let Some((timestamp, filename, bytes)) = frame {
        lines.push(TextLine::from(Span::styled(
            timestamp,
            Style::default().fg(Color::Yellow),
        )));
        lines.push(TextLine::from(filename));
        lines.push(TextLine::from(format!("{} KB", bytes / 1024)));
    }
    if skipped > 0 {
        lines.push(TextLine::from(Span::styled(
            format!("{skipped} frame(s) failed to load"),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(error) = last_error {
        lines.push(TextLine::from(Span::styled(
            error,
            Style::default().fg(Color::Red),
        )));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(detail, chunks[0]);

    if state == PlayerState::Loading {
        let throbber = Throbber::default()
            .label("loading in new images...")
            .style(Style::default().fg(Color::Yellow));
        f.render_stateful_widget(throbber, chunks[1], &mut app.throbber);
    } else if frame_count > 0 {
        // Frames run newest (0) to oldest (len-1); show where the loop is
        #[allow(clippy::cast_precision_loss)]
        let ratio = (frame_count - current_index) as f64 / frame_count as f64;
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .label(format!("frame {}/{frame_count}", frame_count - current_index))
            .ratio(ratio);
        f.render_widget(gauge, chunks[1]);
    }
}
