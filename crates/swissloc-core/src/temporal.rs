//! # Temporal Types: Julian Day Dates and Validity Windows
//!
//! The binary snapshot stores every date as a Julian day number in a `u32`
//! column. This module owns the conversion in both directions and the
//! `YYYYMMDD` text form used by the agency's source extracts.
//!
//! ## Invariant
//!
//! Julian day `0` is the "no date" sentinel of the snapshot format. It is
//! never produced by [`julian_day`] for a calendar date inside chrono's
//! supported range, so the sentinel cannot collide with a real date.
//!
//! ## Validity
//!
//! [`Validity`] models the `[valid_from, valid_until]` window of a zip
//! code. Either bound may be absent, in which case that side is open-ended.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Julian day number of 0000-12-31 (proleptic Gregorian), the day before
/// chrono's day 1 of the common era.
const JULIAN_DAY_OFFSET: i64 = 1_721_425;

/// Convert a calendar date to its Julian day number.
///
/// Dates before the Julian epoch saturate to `0`, which the snapshot format
/// reads back as "no date".
pub fn julian_day(date: NaiveDate) -> u32 {
    let jd = i64::from(date.num_days_from_ce()) + JULIAN_DAY_OFFSET;
    u32::try_from(jd).unwrap_or(0)
}

/// Convert a Julian day number to a calendar date.
///
/// Returns `None` for the `0` sentinel and for day numbers outside chrono's
/// representable range.
pub fn date_from_julian_day(jd: u32) -> Option<NaiveDate> {
    if jd == 0 {
        return None;
    }
    let days = i64::from(jd) - JULIAN_DAY_OFFSET;
    let days = i32::try_from(days).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}

/// Parse the agency's compact `YYYYMMDD` date form.
pub fn parse_compact_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y%m%d")
}

/// Render a date in the compact `YYYYMMDD` form.
pub fn format_compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The window in which a record is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Validity {
    /// First day of use, inclusive. `None` means "since forever".
    pub from: Option<NaiveDate>,
    /// Last day of use, inclusive. `None` means "until further notice".
    pub until: Option<NaiveDate>,
}

impl Validity {
    /// A window with both bounds open.
    pub const ALWAYS: Self = Self {
        from: None,
        until: None,
    };

    /// Create a window from optional bounds.
    pub fn new(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { from, until }
    }

    /// Whether `at` falls inside the window.
    pub fn contains(&self, at: NaiveDate) -> bool {
        self.from.map_or(true, |from| at >= from) && self.until.map_or(true, |until| at <= until)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn julian_day_roundtrip(days in 0i64..200_000) {
            let d = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap() + chrono::Duration::days(days);
            prop_assert_eq!(date_from_julian_day(julian_day(d)), Some(d));
        }

        #[test]
        fn compact_format_roundtrip(days in 0i64..200_000) {
            let d = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap() + chrono::Duration::days(days);
            prop_assert_eq!(parse_compact_date(&format_compact_date(d)).unwrap(), d);
        }
    }
}
