pub mod help;
pub mod loops;
pub mod radar;

use crate::app::{App, AppScreen};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let index = match app.screen {
        AppScreen::Loops => 0,
        AppScreen::Radar => 1,
    };
    let tabs = Tabs::new(vec!["[1] Loops", "[2] Radar"])
        .select(index)
        .highlight_style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("satloop"));
    f.render_widget(tabs, area);
}

pub fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut status = app.status_message.clone();
    if app.paused {
        status = format!("PAUSED — {status}");
    }
    let hints = "q quit | space pause | r refresh | arrows select | h help";
    let paragraph = Paragraph::new(format!("{status}\n{hints}"))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
