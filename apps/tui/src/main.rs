mod app;
mod catalog;
mod cli;
mod config;
mod domain;
mod event;
mod player;
mod radar;
mod terminal;
mod timefmt;
mod ui;

use app::App;
use catalog::CatalogClient;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    // Read loop and radar configuration up front; missing collections
    // are logged inside and are not fatal
    let viewer_config = config::init_viewer_config(args.config.as_deref())?;

    let mut app = App::new(viewer_config);
    let client = CatalogClient::new();

    // Without a terminal (or when asked), do one preload pass and print stats
    if args.headless || !is_terminal() {
        return event::run_headless(&mut app, &client, args.json).await;
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, &client).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
