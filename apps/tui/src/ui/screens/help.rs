use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const HELP_TEXT: &str = "\
q / Esc      quit
1 / 2        loops / radar screen
arrows, Tab  select loop
space        pause or resume all loops
r            refresh catalogs and radar now
h / ?        toggle this help

Catalogs re-fetch automatically on the configured
interval (200 seconds by default).";

pub fn render_help(f: &mut Frame<'_>) {
    let area = centered_rect(f.area(), 54, 13);
    f.render_widget(Clear, area);

    let help = Paragraph::new(HELP_TEXT)
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(help, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
