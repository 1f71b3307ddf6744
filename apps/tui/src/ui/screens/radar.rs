use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::screens::{render_status, render_tabs};

pub fn render_radar(app: &mut App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(f.area());

    render_tabs(app, f, chunks[0]);

    if app.radars.is_empty() {
        let empty = Paragraph::new("No radar sites configured")
            .block(Block::default().borders(Borders::ALL).title("Radar"));
        f.render_widget(empty, chunks[1]);
    } else {
        let rows: Vec<Row<'_>> = app
            .radars
            .iter()
            .map(|display| {
                let caption = display
                    .caption
                    .as_ref()
                    .and_then(|caption| caption.product)
                    .unwrap_or("");
                let refreshed = display
                    .last_refresh
                    .map(|at| at.format("%H:%M:%SZ").to_string())
                    .unwrap_or_default();
                let payload = display
                    .payload_bytes
                    .map(|bytes| format!("{} KB", bytes / 1024))
                    .unwrap_or_default();
                let status = display.last_error.clone().unwrap_or_default();

                Row::new(vec![
                    Cell::from(display.site.name.clone()),
                    Cell::from(caption),
                    Cell::from(payload),
                    Cell::from(refreshed),
                    Cell::from(status).style(Style::default().fg(Color::Red)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(20),
                Constraint::Length(28),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Min(12),
            ],
        )
        .header(
            Row::new(vec!["Site", "Product", "Payload", "Refreshed", "Status"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("Radar"));
        f.render_widget(table, chunks[1]);
    }

    render_status(app, f, chunks[2]);
}
