use crate::catalog::DEFAULT_BASE_URL;
use crate::domain::{AutoShrink, Viewport};
use color_eyre::eyre::eyre;
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REFRESH_SECS: u64 = 200;

/// One satellite loop entry. Field names follow the page-era config keys
/// (`figId`, `goesSat`, ...) so existing configs carry over.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopConfig {
    /// Display panel identifier.
    pub fig_id: String,
    /// Satellite identifier, e.g. "GOES16".
    pub goes_sat: String,
    /// Spectral channel, e.g. "GEOCOLOR" or "13".
    pub band: String,
    /// Sector identifier: CONUS, FD, or a regional sub-sector code.
    pub sector: String,
    /// Requested resolution, e.g. "1200x1200".
    pub size: String,
    /// Number of frames to keep in the loop.
    pub frames: usize,
    #[serde(default)]
    pub auto_shrink: AutoShrink,
}

/// One radar display entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSiteConfig {
    pub fig_id: String,
    /// Three-letter site code, or a mosaic name such as "alaska".
    pub radar_id: String,
    #[serde(default = "default_product")]
    pub product: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub show_caption: bool,
    #[serde(default = "default_true")]
    pub show_product: bool,
}

fn default_product() -> String {
    "NCR".to_string()
}

const fn default_true() -> bool {
    true
}

/// Top-level viewer configuration, read from a JSON file at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub base_url: String,
    pub refresh_secs: u64,
    pub viewport: Viewport,
    pub loops: Vec<LoopConfig>,
    pub radar_sites: Vec<RadarSiteConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_secs: DEFAULT_REFRESH_SECS,
            viewport: Viewport::default(),
            loops: Vec::new(),
            radar_sites: Vec::new(),
        }
    }
}

impl ViewerConfig {
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

/// Initializes the viewer configuration.
///
/// Resolution order: explicit path argument, then `SATLOOP_CONFIG`, then
/// `./satloop.json`. A missing file is not an error; the viewer starts
/// with empty loop and radar lists and says so.
pub fn init_viewer_config(path_override: Option<&str>) -> color_eyre::eyre::Result<ViewerConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let path = path_override
        .map(PathBuf::from)
        .or_else(|| env::var("SATLOOP_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./satloop.json"));

    let mut config = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| eyre!("failed to read config {}: {e}", path.display()))?;
        serde_json::from_str::<ViewerConfig>(&raw)
            .map_err(|e| eyre!("failed to parse config {}: {e}", path.display()))?
    } else {
        eprintln!(
            "No config file at {}; starting with empty loop and radar lists",
            path.display()
        );
        ViewerConfig::default()
    };

    apply_env_overrides(&mut config);

    // Absent collections are informational, not errors
    if config.loops.is_empty() {
        eprintln!("No satellite loops configured; define `loops` to get satellite loops");
    }
    if config.radar_sites.is_empty() {
        eprintln!("No radar sites configured; define `radarSites` to get radar");
    }

    Ok(config)
}

fn apply_env_overrides(config: &mut ViewerConfig) {
    if let Ok(base) = env::var("SATLOOP_BASE_URL") {
        config.base_url = base;
    }
    if let Ok(secs) = env::var("SATLOOP_REFRESH_SECS") {
        match secs.parse() {
            Ok(secs) => config.refresh_secs = secs,
            Err(e) => eprintln!("Ignoring SATLOOP_REFRESH_SECS={secs}: {e}"),
        }
    }
    if env::var("SATLOOP_NO_SHRINK").is_ok() {
        for entry in &mut config.loops {
            entry.auto_shrink = AutoShrink::Flag(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_era_keys_parse() {
        let raw = r#"{
            "loops": [{
                "figId": "sat1",
                "goesSat": "GOES17",
                "band": "GEOCOLOR",
                "sector": "pnw",
                "size": "1200X1200",
                "frames": 10,
                "autoShrink": "false"
            }],
            "radarSites": [{
                "figId": "radar1",
                "radarId": "mfr",
                "product": "N0R",
                "name": "Medford"
            }]
        }"#;

        let config: ViewerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(config.loops.len(), 1);
        assert!(!config.loops[0].auto_shrink.enabled());
        // caption flags default on when omitted
        assert!(config.radar_sites[0].show_caption);
        assert!(config.radar_sites[0].show_product);
    }

    #[test]
    fn empty_document_is_a_valid_config() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert!(config.loops.is_empty());
        assert!(config.radar_sites.is_empty());
        assert_eq!(config.viewport, Viewport::default());
    }
}
