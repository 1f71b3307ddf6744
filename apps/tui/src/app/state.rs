use throbber_widgets_tui::ThrobberState;
use tokio::time::Instant;

use crate::config::ViewerConfig;
use crate::player::{LoopPlayer, PlayerState};
use crate::radar::RadarDisplay;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Loops,
    Radar,
}

pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub players: Vec<LoopPlayer>,
    pub radars: Vec<RadarDisplay>,
    pub selected_loop: usize,
    pub status_message: String,
    pub paused: bool,
    pub refresh_requested: bool,
    pub last_preload: Option<Instant>,
    pub show_help: bool,
    pub throbber: ThrobberState,
    pub config: ViewerConfig,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        let players = config
            .loops
            .iter()
            .cloned()
            .map(|entry| LoopPlayer::new(entry, config.viewport, &config.base_url))
            .collect();

        Self {
            running: true,
            screen: AppScreen::Loops,
            players,
            radars: Vec::new(),
            selected_loop: 0,
            status_message: String::new(),
            paused: false,
            refresh_requested: false,
            last_preload: None,
            show_help: false,
            throbber: ThrobberState::default(),
            config,
        }
    }

    /// Advance any loop whose frame deadline has passed and keep the
    /// loading spinner moving.
    pub fn tick(&mut self, now: Instant) {
        for player in &mut self.players {
            player.tick(now);
        }
        if self.any_loading() {
            self.throbber.calc_next();
        }
    }

    pub fn any_loading(&self) -> bool {
        self.players
            .iter()
            .any(|player| player.state == PlayerState::Loading)
    }

    pub fn selected_player(&self) -> Option<&LoopPlayer> {
        self.players.get(self.selected_loop)
    }

    pub fn next_loop(&mut self) {
        if !self.players.is_empty() {
            self.selected_loop = (self.selected_loop + 1) % self.players.len();
        }
    }

    pub fn prev_loop(&mut self) {
        if !self.players.is_empty() {
            self.selected_loop =
                (self.selected_loop + self.players.len() - 1) % self.players.len();
        }
    }

    /// Freeze or resume every loop. Resuming only restarts loops that
    /// actually have frames.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            for player in &mut self.players {
                player.stop();
            }
            self.status_message = "paused".to_string();
        } else {
            for player in &mut self.players {
                player.play();
            }
            self.status_message.clear();
        }
    }

    pub fn refresh_due(&self, now: Instant) -> bool {
        self.last_preload
            .is_some_and(|last| now.duration_since(last) >= self.config.refresh_interval())
    }
}
