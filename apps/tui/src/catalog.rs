use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// NESDIS STAR imagery CDN.
pub const DEFAULT_BASE_URL: &str = "https://cdn.star.nesdis.noaa.gov";

/// Catalog document published per satellite/sector/channel. The `images`
/// map is keyed by resolution; each list is ordered oldest to newest.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub meta: CatalogMeta,
    pub images: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMeta {
    pub description: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("catalog has no entries for resolution {0}")]
    MissingResolution(String),
}

/// Catalog and image URLs for one loop. Full named sectors (CONUS, FD)
/// and regional sub-sectors use different URL templates.
#[derive(Debug, Clone)]
pub struct LoopUrls {
    pub catalog: String,
    pub image_base: String,
}

impl LoopUrls {
    pub fn build(base: &str, satellite: &str, sector: &str, channel: &str) -> Self {
        let sector = canonical_sector(sector);
        if is_named_sector(&sector) {
            Self {
                catalog: format!("{base}/{satellite}/catalogs/{satellite}/{sector}_{channel}_catalog.json"),
                image_base: format!("{base}/{satellite}/ABI/{sector}/{channel}/"),
            }
        } else {
            Self {
                catalog: format!(
                    "{base}/{satellite}/catalogs/{satellite}/SECTOR_{channel}_{sector}_catalog.json"
                ),
                image_base: format!("{base}/{satellite}/ABI/SECTOR/{sector}/{channel}/"),
            }
        }
    }
}

fn is_named_sector(sector: &str) -> bool {
    sector == "CONUS" || sector == "FD"
}

/// Sector identifiers are uppercase for the full named sectors and
/// lowercase for sub-sectors.
pub fn canonical_sector(sector: &str) -> String {
    let upper = sector.to_uppercase();
    if upper == "CONUS" || upper == "FD" {
        upper
    } else {
        sector.to_lowercase()
    }
}

/// The ordinal date code embedded before the first underscore of a
/// catalog filename.
pub fn ordinal_code(filename: &str) -> &str {
    filename.split('_').next().unwrap_or(filename)
}

/// Take the newest `frame_count` filenames for `resolution`, most recent
/// first. The catalog lists frames in ascending order, so the tail is
/// taken and reversed.
pub fn select_frames(
    catalog: &Catalog,
    resolution: &str,
    frame_count: usize,
) -> Result<Vec<String>, FetchError> {
    let entries = catalog
        .images
        .get(resolution)
        .ok_or_else(|| FetchError::MissingResolution(resolution.to_string()))?;

    let start = entries.len().saturating_sub(frame_count);
    let mut frames: Vec<String> = entries[start..].to_vec();
    frames.reverse();
    Ok(frames)
}

/// Thin wrapper around the shared HTTP client used for catalog JSON and
/// image payload fetches.
#[derive(Debug, Clone, Default)]
pub struct CatalogClient {
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch_catalog(&self, url: &str) -> Result<Catalog, FetchError> {
        let response = self.http.get(url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(resolution: &str, names: &[&str]) -> Catalog {
        let mut images = HashMap::new();
        images.insert(
            resolution.to_string(),
            names.iter().map(ToString::to_string).collect(),
        );
        Catalog {
            meta: CatalogMeta {
                description: "GeoColor - Pacific Northwest".to_string(),
            },
            images,
        }
    }

    #[test]
    fn named_sector_urls() {
        let urls = LoopUrls::build(DEFAULT_BASE_URL, "GOES16", "conus", "GEOCOLOR");
        assert_eq!(
            urls.catalog,
            "https://cdn.star.nesdis.noaa.gov/GOES16/catalogs/GOES16/CONUS_GEOCOLOR_catalog.json"
        );
        assert_eq!(
            urls.image_base,
            "https://cdn.star.nesdis.noaa.gov/GOES16/ABI/CONUS/GEOCOLOR/"
        );
    }

    #[test]
    fn sub_sector_urls() {
        let urls = LoopUrls::build(DEFAULT_BASE_URL, "GOES17", "PNW", "GEOCOLOR");
        assert_eq!(
            urls.catalog,
            "https://cdn.star.nesdis.noaa.gov/GOES17/catalogs/GOES17/SECTOR_GEOCOLOR_pnw_catalog.json"
        );
        assert_eq!(
            urls.image_base,
            "https://cdn.star.nesdis.noaa.gov/GOES17/ABI/SECTOR/pnw/GEOCOLOR/"
        );
    }

    #[test]
    fn newest_frames_selected_most_recent_first() {
        let names: Vec<String> = (0..10).map(|i| format!("201905{i:02}0000_img.jpg")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let catalog = catalog_with("600x600", &refs);

        let frames = select_frames(&catalog, "600x600", 5).unwrap();
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0], "201905090000_img.jpg");
        assert_eq!(frames[4], "201905050000_img.jpg");
    }

    #[test]
    fn short_catalog_yields_everything() {
        let catalog = catalog_with("600x600", &["a_1.jpg", "b_2.jpg"]);
        let frames = select_frames(&catalog, "600x600", 5).unwrap();
        assert_eq!(frames, vec!["b_2.jpg".to_string(), "a_1.jpg".to_string()]);
    }

    #[test]
    fn missing_resolution_is_an_error() {
        let catalog = catalog_with("600x600", &["a_1.jpg"]);
        let err = select_frames(&catalog, "300x300", 5).unwrap_err();
        assert!(matches!(err, FetchError::MissingResolution(_)));
    }

    #[test]
    fn ordinal_code_is_prefix_before_underscore() {
        assert_eq!(
            ordinal_code("20190571230_GOES17-ABI-pnw-GEOCOLOR-600x600.jpg"),
            "20190571230"
        );
        assert_eq!(ordinal_code("nounderscore"), "nounderscore");
    }
}
