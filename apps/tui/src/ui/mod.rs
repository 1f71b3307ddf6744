// UI module for satloop-tui
// Handles all UI rendering functions

pub mod screens;

use crate::app::{App, AppScreen};
use ratatui::Frame;

pub fn ui(app: &mut App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Loops => screens::loops::render_loops(app, f),
        AppScreen::Radar => screens::radar::render_radar(app, f),
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}
