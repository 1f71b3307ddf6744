use chrono::Utc;

use crate::config::RadarSiteConfig;
use crate::domain::RadarProduct;

const RIDGE_LOOP_BASE: &str = "https://radar.weather.gov/ridge/Conus/Loop";
const LITE_BASE: &str = "https://radar.weather.gov/lite";

/// Caption rendered next to a radar display.
#[derive(Debug, Clone)]
pub struct RadarCaption {
    pub city: String,
    pub product: Option<&'static str>,
}

/// One radar display: a resolved gif URL refreshed on a fixed cadence by
/// cache-busting the same base URL.
#[derive(Debug, Clone)]
pub struct RadarDisplay {
    pub site: RadarSiteConfig,
    pub url: String,
    pub current_url: String,
    pub caption: Option<RadarCaption>,
    pub payload_bytes: Option<usize>,
    pub last_refresh: Option<chrono::DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Resolve the gif URL for a site. Mosaics (non-3-letter ids) come from
/// the ridge CONUS loop endpoint, with alaska/hawaii spelled without the
/// underscore; single sites come from the lite endpoint per product.
pub fn radar_url(site: &RadarSiteConfig) -> String {
    if site.radar_id.len() == 3 {
        format!(
            "{LITE_BASE}/{}/{}_loop.gif",
            site.product,
            site.radar_id.to_uppercase()
        )
    } else if site.radar_id == "alaska" || site.radar_id == "hawaii" {
        format!("{RIDGE_LOOP_BASE}/{}Loop.gif", site.radar_id)
    } else {
        format!("{RIDGE_LOOP_BASE}/{}_loop.gif", site.radar_id)
    }
}

impl RadarDisplay {
    pub fn new(site: RadarSiteConfig) -> Self {
        let url = radar_url(&site);
        let caption = site.show_caption.then(|| RadarCaption {
            city: site.name.clone(),
            product: site
                .show_product
                .then(|| RadarProduct::caption(&site.product)),
        });

        Self {
            current_url: url.clone(),
            url,
            caption,
            site,
            payload_bytes: None,
            last_refresh: None,
            last_error: None,
        }
    }

    /// Point the display at the base URL with a fresh cache-busting query
    /// parameter. Pure; the fetch itself runs on a spawned task and lands
    /// back through `apply_fetch`.
    pub fn bust_cache(&mut self, now_millis: i64) {
        self.current_url = format!("{}?t={now_millis}", self.url);
    }

    /// Apply a settled gif fetch. Failures are recorded and the previous
    /// payload stays on screen.
    pub fn apply_fetch(&mut self, result: Result<usize, String>) {
        match result {
            Ok(bytes) => {
                self.payload_bytes = Some(bytes);
                self.last_refresh = Some(Utc::now());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(radar_id: &str, product: &str) -> RadarSiteConfig {
        RadarSiteConfig {
            fig_id: "radar1".to_string(),
            radar_id: radar_id.to_string(),
            product: product.to_string(),
            name: "Somewhere".to_string(),
            show_caption: true,
            show_product: true,
        }
    }

    #[test]
    fn alaska_and_hawaii_mosaics_skip_the_underscore() {
        assert_eq!(
            radar_url(&site("alaska", "NCR")),
            "https://radar.weather.gov/ridge/Conus/Loop/alaskaLoop.gif"
        );
        assert_eq!(
            radar_url(&site("hawaii", "NCR")),
            "https://radar.weather.gov/ridge/Conus/Loop/hawaiiLoop.gif"
        );
    }

    #[test]
    fn other_mosaics_use_the_underscored_name() {
        assert_eq!(
            radar_url(&site("pacnorthwest", "NCR")),
            "https://radar.weather.gov/ridge/Conus/Loop/pacnorthwest_loop.gif"
        );
    }

    #[test]
    fn three_letter_codes_hit_the_lite_endpoint_uppercased() {
        assert_eq!(
            radar_url(&site("mfr", "N0R")),
            "https://radar.weather.gov/lite/N0R/MFR_loop.gif"
        );
    }

    #[test]
    fn cache_buster_changes_only_the_query() {
        let mut display = RadarDisplay::new(site("mfr", "NCR"));
        let base = display.url.clone();

        display.bust_cache(1_000);
        let first = display.current_url.clone();
        display.bust_cache(2_000);
        let second = display.current_url.clone();

        assert_ne!(first, second);
        assert_eq!(first.split('?').next(), Some(base.as_str()));
        assert_eq!(second.split('?').next(), Some(base.as_str()));
        assert_eq!(first, format!("{base}?t=1000"));
        assert_eq!(second, format!("{base}?t=2000"));
    }

    #[test]
    fn failed_fetch_keeps_the_previous_payload() {
        let mut display = RadarDisplay::new(site("mfr", "NCR"));
        display.apply_fetch(Ok(4_096));
        assert_eq!(display.payload_bytes, Some(4_096));
        assert!(display.last_refresh.is_some());

        display.apply_fetch(Err("connection reset".to_string()));
        assert_eq!(display.payload_bytes, Some(4_096));
        assert_eq!(display.last_error.as_deref(), Some("connection reset"));
    }

    #[test]
    fn caption_respects_show_flags() {
        let mut hidden = site("mfr", "NCR");
        hidden.show_caption = false;
        assert!(RadarDisplay::new(hidden).caption.is_none());

        let mut no_product = site("mfr", "NCR");
        no_product.show_product = false;
        let caption = RadarDisplay::new(no_product).caption.unwrap();
        assert_eq!(caption.city, "Somewhere");
        assert!(caption.product.is_none());
    }
}
