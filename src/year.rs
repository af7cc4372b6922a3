//! Code for working with the fixed horizon of years covered by every series.
use std::ops::RangeInclusive;

/// The number of years in every series
pub const HORIZON_YEARS: u32 = 11;

/// [`HORIZON_YEARS`] as a length
pub const HORIZON_LEN: usize = HORIZON_YEARS as usize;

/// The first year of the horizon, used when a dataset doesn't specify one
pub const DEFAULT_FIRST_YEAR: u32 = 2014;

/// The latest first year for which the whole horizon fits in a `u32`
pub const MAX_FIRST_YEAR: u32 = u32::MAX - (HORIZON_YEARS - 1);

/// The years covered by a horizon starting at `first_year`
pub fn horizon(first_year: u32) -> RangeInclusive<u32> {
    first_year..=last_year(first_year)
}

/// The final year of a horizon starting at `first_year`.
///
/// `first_year` must be at most [`MAX_FIRST_YEAR`].
pub fn last_year(first_year: u32) -> u32 {
    first_year + (HORIZON_YEARS - 1)
}

/// Position of `year` within the horizon starting at `first_year`, if it falls inside it
pub fn horizon_index(first_year: u32, year: u32) -> Option<usize> {
    horizon(first_year)
        .contains(&year)
        .then(|| (year - first_year) as usize)
}

/// Parse a year key as used in the input files (e.g. `"2019"`).
///
/// Keys which aren't plain years (e.g. `"municipality"`) return `None`.
pub fn parse_year_key(key: &str) -> Option<u32> {
    let key = key.trim();
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    key.parse().ok()
}
