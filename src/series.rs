//! Yearly series of per-capita amounts over the fixed horizon.
use crate::year::{HORIZON_LEN, horizon, horizon_index};
use serde::{Deserialize, Serialize};

/// A value for every year of the horizon, where `None` marks a missing value.
///
/// Missing values are never treated as zero; chart collaborators draw them as gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySeries {
    /// The first year covered by the series
    pub first_year: u32,
    /// One value per year, starting at `first_year`
    pub values: [Option<f64>; HORIZON_LEN],
}

impl YearlySeries {
    /// Create a series in which every year is missing
    pub fn missing(first_year: u32) -> Self {
        Self {
            first_year,
            values: [None; HORIZON_LEN],
        }
    }

    /// Build a series by looking up the value for each year of the horizon
    pub fn from_fn<F>(first_year: u32, mut f: F) -> Self
    where
        F: FnMut(u32) -> Option<f64>,
    {
        let mut series = Self::missing(first_year);
        for (value, year) in series.values.iter_mut().zip(horizon(first_year)) {
            *value = f(year);
        }

        series
    }

    /// The value for `year`, or `None` if missing or outside the horizon
    pub fn get(&self, year: u32) -> Option<f64> {
        horizon_index(self.first_year, year).and_then(|idx| self.values[idx])
    }

    /// Iterate over `(year, value)` pairs in year order
    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<f64>)> + '_ {
        horizon(self.first_year).zip(self.values.iter().copied())
    }

    /// Apply `f` to every present value, keeping missing values missing
    pub fn map_present<F>(&self, mut f: F) -> Self
    where
        F: FnMut(u32, f64) -> Option<f64>,
    {
        Self::from_fn(self.first_year, |year| self.get(year).and_then(|v| f(year, v)))
    }

    /// Whether every year is missing
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_and_get() {
        let series = YearlySeries::from_fn(2014, |year| (year != 2019).then_some(f64::from(year)));
        assert_eq!(series.get(2014), Some(2014.0));
        assert_eq!(series.get(2019), None);
        assert_eq!(series.get(2024), Some(2024.0));
        assert_eq!(series.get(2025), None);
    }

    #[test]
    fn test_map_present_keeps_missing() {
        let series = YearlySeries::from_fn(2014, |year| (year != 2019).then_some(1.0));
        let doubled = series.map_present(|_, v| Some(v * 2.0));
        assert_eq!(doubled.get(2014), Some(2.0));
        assert_eq!(doubled.get(2019), None);
    }

    #[test]
    fn test_iter() {
        let series = YearlySeries::missing(2014);
        let years: Vec<_> = series.iter().map(|(year, _)| year).collect();
        assert_eq!(years.len(), HORIZON_LEN);
        assert!(series.is_all_missing());
    }
}
