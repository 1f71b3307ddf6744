// Export our modules for use in binaries and tests
pub mod catalog;
pub mod config;
pub mod domain;
pub mod player;
pub mod radar;
pub mod timefmt;

pub use domain::{select_resolution, Resolution, Viewport};
pub use timefmt::format_timestamp;
