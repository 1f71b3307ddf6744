use color_eyre::Result;
use chrono::Utc;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::app::{handle_input, App};
use crate::catalog::{CatalogClient, FetchError};
use crate::player::{fetch_frames, LoadOutcome};
use crate::radar::RadarDisplay;
use crate::ui;

/// A settled background fetch, routed back to its owner by index.
enum FetchEvent {
    Loop {
        index: usize,
        outcome: Result<LoadOutcome, FetchError>,
    },
    Radar {
        index: usize,
        result: Result<usize, String>,
    },
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: &CatalogClient,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Initial preload, then the periodic cadence takes over. Fetches run
    // on spawned tasks so the loop below keeps drawing and taking input
    // while players sit in Loading.
    app.radars = app
        .config
        .radar_sites
        .iter()
        .cloned()
        .map(RadarDisplay::new)
        .collect();
    start_refresh(app, client, &tx, true);
    app.last_preload = Some(Instant::now());

    loop {
        let now = Instant::now();
        app.tick(now);

        // Land any fetches that settled since the last pass
        while let Ok(settled) = rx.try_recv() {
            apply_fetch_event(app, settled);
        }

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events
                }
            }
        }

        // Periodic full re-fetch of catalogs and radar gifs
        if app.refresh_requested || app.refresh_due(now) {
            app.refresh_requested = false;
            start_refresh(app, client, &tx, false);
            app.last_preload = Some(Instant::now());
        }
    }

    Ok(())
}

/// Kick off one refresh pass: stop every loop, mark it Loading, and spawn
/// the catalog and radar fetches all at once. Results come back through
/// the channel as they settle.
///
/// The first pass loads radar gifs as-is; later passes cache-bust first.
fn start_refresh(
    app: &mut App,
    client: &CatalogClient,
    tx: &mpsc::UnboundedSender<FetchEvent>,
    initial: bool,
) {
    if !app.players.is_empty() {
        app.status_message = "loading in new images".to_string();
    }

    for (index, player) in app.players.iter_mut().enumerate() {
        player.begin_refresh();
        let request = player.load_request();
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_frames(&client, &request).await;
            // Receiver gone means the event loop already exited
            let _ = tx.send(FetchEvent::Loop { index, outcome });
        });
    }

    for (index, display) in app.radars.iter_mut().enumerate() {
        if !initial {
            display.bust_cache(Utc::now().timestamp_millis());
        }
        let url = display.current_url.clone();
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client
                .fetch_image(&url)
                .await
                .map(|payload| payload.len())
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchEvent::Radar { index, result });
        });
    }
}

/// Route a settled fetch to its player or radar display. Loops paused by
/// the user get their frames replaced but stay frozen. Once the last loop
/// settles the status line flips from the loading notice to a summary.
fn apply_fetch_event(app: &mut App, settled: FetchEvent) {
    match settled {
        FetchEvent::Loop { index, outcome } => {
            let resume = !app.paused;
            if let Some(player) = app.players.get_mut(index) {
                player.apply_outcome(outcome, resume);
            }
            if !app.any_loading() {
                let loaded = app
                    .players
                    .iter()
                    .filter(|player| !player.frames.is_empty())
                    .count();
                app.status_message = format!("{loaded}/{} loops loaded", app.players.len());
            }
        }
        FetchEvent::Radar { index, result } => {
            if let Some(display) = app.radars.get_mut(index) {
                display.apply_fetch(result);
            }
        }
    }
}

/// Run one preload pass and print per-loop stats (no UI)
pub async fn run_headless(app: &mut App, client: &CatalogClient, json: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    app.radars = app
        .config
        .radar_sites
        .iter()
        .cloned()
        .map(RadarDisplay::new)
        .collect();
    start_refresh(app, client, &tx, true);

    // Dropping our sender closes the channel once every spawned fetch
    // has reported in.
    drop(tx);
    while let Some(settled) = rx.recv().await {
        apply_fetch_event(app, settled);
    }

    let stats = build_headless_stats(app);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nSatellite Loops");
    println!("================");
    for entry in &stats.loops {
        println!(
            "- {} | {} | {} | {}/{} frames ({} skipped)",
            entry.fig_id,
            entry.description,
            entry.resolution,
            entry.frames_loaded,
            entry.frames_requested,
            entry.skipped
        );
        if let Some(latest) = &entry.latest {
            println!("  latest: {latest}");
        }
        if let Some(error) = &entry.error {
            println!("  error: {error}");
        }
    }

    println!("\nRadar Displays");
    println!("===============");
    for entry in &stats.radars {
        println!("- {} | {} | {}", entry.fig_id, entry.name, entry.url);
        if let Some(caption) = &entry.product {
            println!("  product: {caption}");
        }
        if let Some(bytes) = entry.payload_bytes {
            println!("  payload: {bytes} bytes");
        }
        if let Some(error) = &entry.error {
            println!("  error: {error}");
        }
    }
}

fn build_headless_stats(app: &App) -> HeadlessStats {
    let loops = app
        .players
        .iter()
        .map(|player| LoopStats {
            fig_id: player.config.fig_id.clone(),
            description: player.description.clone(),
            resolution: player.resolution.clone(),
            frames_requested: player.config.frames,
            frames_loaded: player.frames.len(),
            skipped: player.skipped,
            state: player.state.to_string(),
            latest: player.frames.first().map(|frame| frame.timestamp.clone()),
            error: player.last_error.clone(),
        })
        .collect();

    let radars = app
        .radars
        .iter()
        .map(|display| RadarStats {
            fig_id: display.site.fig_id.clone(),
            name: display.site.name.clone(),
            product: display
                .caption
                .as_ref()
                .and_then(|caption| caption.product)
                .map(ToString::to_string),
            url: display.url.clone(),
            payload_bytes: display.payload_bytes,
            error: display.last_error.clone(),
        })
        .collect();

    HeadlessStats { loops, radars }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    loops: Vec<LoopStats>,
    radars: Vec<RadarStats>,
}

#[derive(serde::Serialize)]
struct LoopStats {
    fig_id: String,
    description: String,
    resolution: String,
    frames_requested: usize,
    frames_loaded: usize,
    skipped: usize,
    state: String,
    latest: Option<String>,
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct RadarStats {
    fig_id: String,
    name: String,
    product: Option<String>,
    url: String,
    payload_bytes: Option<usize>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoopConfig, RadarSiteConfig, ViewerConfig};
    use crate::domain::AutoShrink;
    use crate::player::{Frame, PlayerState};

    fn loop_config(fig_id: &str) -> LoopConfig {
        LoopConfig {
            fig_id: fig_id.to_string(),
            goes_sat: "GOES17".to_string(),
            band: "GEOCOLOR".to_string(),
            sector: "pnw".to_string(),
            size: "600x600".to_string(),
            frames: 5,
            auto_shrink: AutoShrink::Flag(false),
        }
    }

    fn two_loop_app() -> App {
        let config = ViewerConfig {
            loops: vec![loop_config("sat1"), loop_config("sat2")],
            radar_sites: vec![RadarSiteConfig {
                fig_id: "radar1".to_string(),
                radar_id: "mfr".to_string(),
                product: "NCR".to_string(),
                name: "Medford".to_string(),
                show_caption: true,
                show_product: true,
            }],
            ..ViewerConfig::default()
        };
        let mut app = App::new(config);
        app.radars = app
            .config
            .radar_sites
            .iter()
            .cloned()
            .map(RadarDisplay::new)
            .collect();
        app
    }

    fn outcome(frame_count: usize) -> Result<LoadOutcome, FetchError> {
        Ok(LoadOutcome {
            description: "GeoColor - Pacific Northwest".to_string(),
            frames: (0..frame_count)
                .map(|i| Frame {
                    filename: format!("2019057{i:04}_img.jpg"),
                    timestamp: format!("02/26/2019 {i:04}Z"),
                    payload: vec![0_u8],
                })
                .collect(),
            skipped: 0,
        })
    }

    #[test]
    fn status_stays_on_loading_until_every_loop_settles() {
        let mut app = two_loop_app();
        for player in &mut app.players {
            player.begin_refresh();
        }
        app.status_message = "loading in new images".to_string();

        apply_fetch_event(
            &mut app,
            FetchEvent::Loop {
                index: 1,
                outcome: outcome(3),
            },
        );
        // One loop still in flight, so the notice stays up
        assert_eq!(app.players[1].state, PlayerState::Playing);
        assert!(app.any_loading());
        assert_eq!(app.status_message, "loading in new images");

        apply_fetch_event(
            &mut app,
            FetchEvent::Loop {
                index: 0,
                outcome: outcome(3),
            },
        );
        assert!(!app.any_loading());
        assert_eq!(app.status_message, "2/2 loops loaded");
    }

    #[test]
    fn paused_loops_take_new_frames_but_stay_frozen() {
        let mut app = two_loop_app();
        app.paused = true;
        for player in &mut app.players {
            player.begin_refresh();
        }

        apply_fetch_event(
            &mut app,
            FetchEvent::Loop {
                index: 0,
                outcome: outcome(3),
            },
        );
        assert_eq!(app.players[0].state, PlayerState::Ready);
        assert_eq!(app.players[0].frames.len(), 3);
        assert!(app.players[0].next_frame_at.is_none());
    }

    #[test]
    fn radar_fetches_land_on_the_right_display() {
        let mut app = two_loop_app();
        apply_fetch_event(
            &mut app,
            FetchEvent::Radar {
                index: 0,
                result: Ok(2_048),
            },
        );
        assert_eq!(app.radars[0].payload_bytes, Some(2_048));

        // Unknown index (display removed mid-flight) is ignored
        apply_fetch_event(
            &mut app,
            FetchEvent::Radar {
                index: 9,
                result: Ok(1),
            },
        );
    }

    #[test]
    fn failed_loops_do_not_count_toward_the_summary() {
        let mut app = two_loop_app();
        for player in &mut app.players {
            player.begin_refresh();
        }

        apply_fetch_event(
            &mut app,
            FetchEvent::Loop {
                index: 0,
                outcome: outcome(3),
            },
        );
        apply_fetch_event(
            &mut app,
            FetchEvent::Loop {
                index: 1,
                outcome: Err(FetchError::MissingResolution("600x600".to_string())),
            },
        );
        assert_eq!(app.status_message, "1/2 loops loaded");
    }
}
