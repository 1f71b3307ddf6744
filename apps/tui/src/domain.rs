use serde::Deserialize;
use std::fmt;

/// Pixel dimensions parsed from a catalog resolution string such as "1200x1200".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Parse a "WIDTHxHEIGHT" string. The separator is accepted in either case.
    pub fn parse(value: &str) -> Option<Self> {
        let (width, height) = value.split_once(['x', 'X'])?;
        Some(Self {
            width: width.parse().ok()?,
            height: height.parse().ok()?,
        })
    }

    /// Whether the image fits inside the viewport on both axes.
    pub const fn fits(self, viewport: Viewport) -> bool {
        self.width <= viewport.width && self.height <= viewport.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Target display area in pixels used by the resolution downgrade walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Per-loop auto-shrink flag. Page configs historically carried this as
/// either a boolean or the string "false", so both forms deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AutoShrink {
    Flag(bool),
    Text(String),
}

impl AutoShrink {
    pub fn enabled(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => !text.eq_ignore_ascii_case("false"),
        }
    }
}

impl Default for AutoShrink {
    fn default() -> Self {
        Self::Flag(true)
    }
}

/// One step down a sector's downgrade ladder. A `Floor` step always ends
/// the walk, so selection terminates even for sizes not on the ladder.
enum LadderStep {
    Shrunk(&'static str),
    Floor(&'static str),
}

/// Sector groups sharing a downgrade ladder. Each ladder runs from the
/// largest published size down to a sector-specific floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorClass {
    Regional,
    EastGulf,
    Continental,
    Tropical,
    Conus,
    FullDisk,
    Other,
}

impl SectorClass {
    pub fn classify(sector: &str) -> Self {
        match sector.to_lowercase().as_str() {
            "pnw" | "nr" | "umv" | "cgl" | "ne" | "psw" | "sr" | "sp" | "smv" | "se" | "pr"
            | "hi" => Self::Regional,
            "eus" | "gm" => Self::EastGulf,
            "car" | "ak" | "wus" => Self::Continental,
            "taw" | "tpw" => Self::Tropical,
            "conus" => Self::Conus,
            "fd" => Self::FullDisk,
            _ => Self::Other,
        }
    }

    /// The next smaller published size for `current`, or the ladder floor
    /// when no smaller step exists.
    fn step_down(self, current: &str) -> LadderStep {
        match self {
            Self::Regional => match current {
                "2400x2400" => LadderStep::Shrunk("1200x1200"),
                "1200x1200" => LadderStep::Shrunk("600x600"),
                _ => LadderStep::Floor("300x300"),
            },
            Self::EastGulf => match current {
                "2001x2000" => LadderStep::Shrunk("1000x1000"),
                "1000x1000" => LadderStep::Shrunk("500x500"),
                _ => LadderStep::Floor("250x250"),
            },
            Self::Continental => match current {
                "4000x4000" => LadderStep::Shrunk("2000x2000"),
                "2000x2000" => LadderStep::Shrunk("1000x1000"),
                "1000x1000" => LadderStep::Shrunk("500x500"),
                _ => LadderStep::Floor("250x250"),
            },
            Self::Tropical => match current {
                "7200x4320" => LadderStep::Shrunk("3600x2160"),
                "3600x2160" => LadderStep::Shrunk("1800x1080"),
                "1800x1080" => LadderStep::Shrunk("900x540"),
                _ => LadderStep::Floor("450x270"),
            },
            Self::Conus => match current {
                "5000x3000" => LadderStep::Shrunk("2500x1500"),
                "2500x1500" => LadderStep::Shrunk("1250x750"),
                "1250x750" => LadderStep::Shrunk("625x375"),
                _ => LadderStep::Floor("416x250"),
            },
            Self::FullDisk => match current {
                "10848x10848" => LadderStep::Shrunk("5424x5424"),
                "5424x5424" => LadderStep::Shrunk("1808x1808"),
                "1808x1808" => LadderStep::Shrunk("678x678"),
                _ => LadderStep::Floor("339x339"),
            },
            // Sectors without a ladder get a single small fallback step.
            Self::Other => LadderStep::Floor("300x300"),
        }
    }
}

/// Pick the largest published size that fits the viewport.
///
/// The requested size is normalized to a lowercase separator. With
/// auto-shrink disabled the normalized input is returned unchanged.
/// Otherwise the sector's ladder is walked downward until the candidate
/// fits; the floor size is returned as-is even if it still overflows a
/// very small viewport.
pub fn select_resolution(
    requested: &str,
    viewport: Viewport,
    sector: &str,
    auto_shrink: bool,
) -> String {
    let normalized = requested.replace('X', "x");
    if !auto_shrink {
        return normalized;
    }

    let class = SectorClass::classify(sector);
    let mut current = normalized;
    loop {
        let Some(parsed) = Resolution::parse(&current) else {
            // Unparseable sizes cannot be compared to the viewport.
            return current;
        };
        if parsed.fits(viewport) {
            return current;
        }
        match class.step_down(&current) {
            LadderStep::Shrunk(next) => current = next.to_string(),
            LadderStep::Floor(floor) => return floor.to_string(),
        }
    }
}

/// NWS radar product codes served by the lite endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarProduct {
    CompositeReflectivity,
    BaseReflectivity,
    StormRelativeVelocity,
    BaseVelocity,
    OneHourRainfall,
    StormTotalRainfall,
}

impl RadarProduct {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "NCR" => Some(Self::CompositeReflectivity),
            "N0R" => Some(Self::BaseReflectivity),
            "N0S" => Some(Self::StormRelativeVelocity),
            "N0V" => Some(Self::BaseVelocity),
            "N1P" => Some(Self::OneHourRainfall),
            "NTP" => Some(Self::StormTotalRainfall),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CompositeReflectivity => "Composite Reflectivity",
            Self::BaseReflectivity => "Base Reflectivity",
            Self::StormRelativeVelocity => "Storm Relative Velocity",
            Self::BaseVelocity => "Base Velocity",
            Self::OneHourRainfall => "1 Hour Rainfall Total",
            Self::StormTotalRainfall => "Storm Total Rainfall",
        }
    }

    /// Caption text for a product code, falling back to the mosaic label
    /// for codes outside the table.
    pub fn caption(code: &str) -> &'static str {
        Self::parse(code).map_or("Composite Reflectivity Mosaic", Self::label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: Viewport = Viewport {
        width: 200,
        height: 200,
    };

    #[test]
    fn normalization_lowercases_the_separator() {
        let picked = select_resolution("1200X1200", TINY, "pnw", false);
        assert_eq!(picked, "1200x1200");
    }

    #[test]
    fn auto_shrink_string_false_disables_downgrade() {
        let flag = AutoShrink::Text("FALSE".to_string());
        assert!(!flag.enabled());
        let picked = select_resolution("2400X2400", TINY, "pnw", flag.enabled());
        assert_eq!(picked, "2400x2400");
    }

    #[test]
    fn regional_sectors_floor_at_300() {
        for sector in [
            "pnw", "nr", "umv", "cgl", "ne", "psw", "sr", "sp", "smv", "se", "pr", "hi",
        ] {
            let picked = select_resolution("2400x2400", TINY, sector, true);
            assert_eq!(picked, "300x300", "sector {sector}");
        }
    }

    #[test]
    fn conus_stops_at_first_fitting_step() {
        let viewport = Viewport {
            width: 1280,
            height: 800,
        };
        let picked = select_resolution("5000x3000", viewport, "CONUS", true);
        assert_eq!(picked, "1250x750");
    }

    #[test]
    fn full_disk_floor_returned_even_when_it_overflows() {
        let picked = select_resolution("10848x10848", TINY, "FD", true);
        assert_eq!(picked, "339x339");
    }

    #[test]
    fn unknown_sector_falls_to_fixed_floor() {
        let picked = select_resolution("9999x9999", TINY, "mystery", true);
        assert_eq!(picked, "300x300");
    }

    #[test]
    fn fitting_size_is_kept() {
        let viewport = Viewport {
            width: 1920,
            height: 1080,
        };
        let picked = select_resolution("600x600", viewport, "pnw", true);
        assert_eq!(picked, "600x600");
    }

    #[test]
    fn product_captions_default_to_mosaic() {
        assert_eq!(RadarProduct::caption("N0S"), "Storm Relative Velocity");
        assert_eq!(
            RadarProduct::caption("XYZ"),
            "Composite Reflectivity Mosaic"
        );
    }
}
