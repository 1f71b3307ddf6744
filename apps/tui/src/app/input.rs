use crossterm::event::KeyCode;

use crate::app::state::{App, AppScreen};

pub fn handle_input(app: &mut App, key: KeyCode) {
    if app.show_help {
        // Any key dismisses the help overlay
        app.show_help = false;
        return;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('1') => app.screen = AppScreen::Loops,
        KeyCode::Char('2') => app.screen = AppScreen::Radar,
        KeyCode::Tab | KeyCode::Right | KeyCode::Down => app.next_loop(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up => app.prev_loop(),
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('r') => app.refresh_requested = true,
        KeyCode::Char('h' | '?') => app.show_help = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn q_quits() {
        let mut app = App::new(ViewerConfig::default());
        handle_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn r_requests_a_refresh() {
        let mut app = App::new(ViewerConfig::default());
        handle_input(&mut app, KeyCode::Char('r'));
        assert!(app.refresh_requested);
    }

    #[test]
    fn any_key_dismisses_help() {
        let mut app = App::new(ViewerConfig::default());
        handle_input(&mut app, KeyCode::Char('h'));
        assert!(app.show_help);
        handle_input(&mut app, KeyCode::Char('x'));
        assert!(!app.show_help);
        assert!(app.running);
    }
}
