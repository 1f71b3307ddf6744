// App module for satloop-tui
// Holds viewer state and keyboard handling

pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen};
