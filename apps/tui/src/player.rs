use std::fmt;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::catalog::{ordinal_code, select_frames, CatalogClient, FetchError, LoopUrls};
use crate::config::LoopConfig;
use crate::domain::{select_resolution, Viewport};
use crate::timefmt::format_timestamp;

/// Delay between frames while cycling.
pub const FRAME_DELAY_MS: u64 = 500;
/// Longer hold on the frame at index 0 before the loop wraps, the
/// deliberate end-of-cycle pause.
pub const WRAP_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Loading,
    Ready,
    Playing,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

/// A preloaded frame: fetched payload plus its formatted capture time.
#[derive(Debug, Clone)]
pub struct Frame {
    pub filename: String,
    pub timestamp: String,
    pub payload: Vec<u8>,
}

/// Everything a load pass needs, detached from the player so the fetch
/// can run on a spawned task while the player keeps rendering as
/// `Loading`.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub catalog_url: String,
    pub image_base: String,
    pub resolution: String,
    pub frame_count: usize,
}

/// Result of one load pass, applied back to the player when it settles.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub description: String,
    pub frames: Vec<Frame>,
    pub skipped: usize,
}

/// One animated satellite loop. Frames are held most-recent-first, so the
/// animation walks indices downward through time and wraps at 0.
///
/// The pending frame deadline lives in the player itself; `stop` clears
/// it, which is the whole cancellation story. In-flight image requests
/// are never cancelled, matching the refresh-stops-first convention.
pub struct LoopPlayer {
    pub config: LoopConfig,
    pub resolution: String,
    pub urls: LoopUrls,
    pub description: String,
    pub frames: Vec<Frame>,
    pub current: usize,
    pub state: PlayerState,
    pub next_frame_at: Option<Instant>,
    /// Frames dropped in the last load because their fetch failed.
    pub skipped: usize,
    pub last_error: Option<String>,
}

impl LoopPlayer {
    pub fn new(config: LoopConfig, viewport: Viewport, base_url: &str) -> Self {
        let resolution = select_resolution(
            &config.size,
            viewport,
            &config.sector,
            config.auto_shrink.enabled(),
        );
        let urls = LoopUrls::build(base_url, &config.goes_sat, &config.sector, &config.band);

        Self {
            config,
            resolution,
            urls,
            description: String::new(),
            frames: Vec::new(),
            current: 0,
            state: PlayerState::Stopped,
            next_frame_at: None,
            skipped: 0,
            last_error: None,
        }
    }

    /// Cancel the pending frame deadline. Idempotent, valid in any state.
    pub fn stop(&mut self) {
        self.next_frame_at = None;
        self.state = PlayerState::Stopped;
    }

    /// Start cycling if any frames are loaded.
    pub fn play(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.state = PlayerState::Playing;
        self.next_frame_at = Some(Instant::now());
    }

    /// Step backward through the frame ring (toward older indices,
    /// wrapping 0 to the end) and return the delay before the next step.
    pub fn advance(&mut self) -> Duration {
        if !self.frames.is_empty() {
            self.current = if self.current == 0 {
                self.frames.len() - 1
            } else {
                self.current - 1
            };
        }
        let millis = if self.current == 0 {
            WRAP_DELAY_MS
        } else {
            FRAME_DELAY_MS
        };
        Duration::from_millis(millis)
    }

    /// Fire the frame deadline if it is due.
    pub fn tick(&mut self, now: Instant) {
        if self.state != PlayerState::Playing {
            return;
        }
        if self.next_frame_at.is_some_and(|deadline| now >= deadline) {
            let delay = self.advance();
            self.next_frame_at = Some(now + delay);
        }
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }

    /// Stop cycling and mark the player as loading. The player stays in
    /// `Loading` (prior frames still visible) until `apply_outcome`.
    pub fn begin_refresh(&mut self) {
        self.stop();
        self.state = PlayerState::Loading;
        self.last_error = None;
    }

    /// Snapshot of what the fetch task needs for this loop.
    pub fn load_request(&self) -> LoadRequest {
        LoadRequest {
            catalog_url: self.urls.catalog.clone(),
            image_base: self.urls.image_base.clone(),
            resolution: self.resolution.clone(),
            frame_count: self.config.frames,
        }
    }

    /// Apply a settled load pass.
    ///
    /// A catalog transport error or non-200 leaves the previous frames in
    /// place and the loop frozen. A successful pass replaces the frames
    /// and resumes cycling unless `resume` is off (user paused).
    pub fn apply_outcome(&mut self, outcome: Result<LoadOutcome, FetchError>, resume: bool) {
        match outcome {
            Ok(loaded) => {
                self.description = loaded.description;
                self.frames = loaded.frames;
                self.skipped = loaded.skipped;
                self.current = 0;
                self.state = PlayerState::Ready;
                if self.frames.is_empty() {
                    // Every frame failed; the loop never starts playing.
                    self.last_error = Some("no frames loaded".to_string());
                } else if resume {
                    self.play();
                }
            }
            Err(e) => {
                // Prior frames are kept; the loop just stops cycling.
                self.last_error = Some(e.to_string());
                self.state = PlayerState::Stopped;
            }
        }
    }
}

/// Fetch the catalog and preload the newest frames for one loop.
///
/// All frame requests go out at once; completion is reached when every
/// one has settled, loaded or failed.
pub async fn fetch_frames(
    client: &CatalogClient,
    request: &LoadRequest,
) -> Result<LoadOutcome, FetchError> {
    let catalog = client.fetch_catalog(&request.catalog_url).await?;
    let filenames = select_frames(&catalog, &request.resolution, request.frame_count)?;

    let mut tasks: JoinSet<Result<(usize, String, Vec<u8>), FetchError>> = JoinSet::new();
    for (index, filename) in filenames.into_iter().enumerate() {
        let url = format!("{}{filename}", request.image_base);
        let client = client.clone();
        tasks.spawn(async move {
            let payload = client.fetch_image(&url).await?;
            Ok((index, filename, payload))
        });
    }

    let mut settled = Vec::new();
    let mut join_failures = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => settled.push(result),
            // A panicked fetch task counts the same as a failed load
            Err(_) => join_failures += 1,
        }
    }

    let (frames, skipped) = assemble_frames(settled);
    Ok(LoadOutcome {
        description: catalog.meta.description,
        frames,
        skipped: skipped + join_failures,
    })
}

/// Turn settled fetch results into the frame ring. Failed fetches are
/// skipped and counted, so the effective frame count shrinks instead of
/// blocking completion. Settled results arrive in completion order;
/// catalog order is restored by index.
fn assemble_frames(
    settled: Vec<Result<(usize, String, Vec<u8>), FetchError>>,
) -> (Vec<Frame>, usize) {
    let mut loaded: Vec<(usize, Frame)> = Vec::new();
    let mut skipped = 0;
    for result in settled {
        match result {
            Ok((index, filename, payload)) => {
                let timestamp = format_timestamp(ordinal_code(&filename));
                loaded.push((
                    index,
                    Frame {
                        filename,
                        timestamp,
                        payload,
                    },
                ));
            }
            Err(_) => skipped += 1,
        }
    }

    loaded.sort_by_key(|(index, _)| *index);
    let frames = loaded.into_iter().map(|(_, frame)| frame).collect();
    (frames, skipped)
}
