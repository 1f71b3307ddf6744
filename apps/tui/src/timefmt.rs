use chrono::NaiveDate;

/// Format a compact ordinal date code (`YYYYDDDHHMM`) embedded in image
/// filenames into a display timestamp like `02/26/2019 1230Z`.
///
/// Malformed codes fall back to the raw code with a `Z` suffix rather
/// than failing the whole frame.
pub fn format_timestamp(ordinal: &str) -> String {
    parse_ordinal(ordinal).map_or_else(
        || format!("{ordinal}Z"),
        |(date, clock)| format!("{} {clock}Z", date.format("%m/%d/%Y")),
    )
}

fn parse_ordinal(ordinal: &str) -> Option<(NaiveDate, &str)> {
    let year: i32 = ordinal.get(0..4)?.parse().ok()?;
    let day: u32 = ordinal.get(4..7)?.parse().ok()?;
    let clock = ordinal.get(7..11)?;
    if !clock.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::from_yo_opt(year, day)?;
    Some((date, clock))
}

#[cfg(test)]
mod tests {
    use super::format_timestamp;

    #[test]
    fn day_of_year_becomes_calendar_date() {
        // Day 57 of 2019 is February 26th
        assert_eq!(format_timestamp("20190571230"), "02/26/2019 1230Z");
    }

    #[test]
    fn output_ends_with_zulu_clock() {
        assert!(format_timestamp("20190571230").ends_with("1230Z"));
    }

    #[test]
    fn leap_day_resolves() {
        assert_eq!(format_timestamp("20200600000"), "02/29/2020 0000Z");
    }

    #[test]
    fn malformed_code_falls_back_to_raw() {
        assert_eq!(format_timestamp("garbage"), "garbageZ");
        assert_eq!(format_timestamp("2019999"), "2019999Z");
    }
}
