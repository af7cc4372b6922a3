//! Price indices and conversion of nominal series into constant reference-year prices.
use crate::error::LookupError;
use crate::series::YearlySeries;
use log::{debug, warn};
use std::collections::HashMap;

/// A price index per year, normalised against a reference year.
///
/// The reference year and its index are fixed when the table is created.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceIndexTable {
    indices: HashMap<u32, f64>,
    reference_year: u32,
    reference_index: f64,
}

/// Whether an index value can be used as a divisor
fn is_valid_index(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl PriceIndexTable {
    /// Create a new [`PriceIndexTable`].
    ///
    /// If the reference year has no valid entry in `indices`, `fallback_reference_index` is used
    /// as the normalisation base instead.
    pub fn new(
        indices: HashMap<u32, f64>,
        reference_year: u32,
        fallback_reference_index: f64,
    ) -> Self {
        let reference_index = match indices.get(&reference_year).copied() {
            Some(value) if is_valid_index(value) => value,
            _ => {
                warn!(
                    "No valid price index for reference year {reference_year}; \
                    using fallback value {fallback_reference_index}"
                );
                fallback_reference_index
            }
        };

        Self {
            indices,
            reference_year,
            reference_index,
        }
    }

    /// The year whose prices adjusted values are expressed in
    pub fn reference_year(&self) -> u32 {
        self.reference_year
    }

    /// The index value used as the normalisation base
    pub fn reference_index(&self) -> f64 {
        self.reference_index
    }

    /// The index for `year`, if it is present and positive
    pub fn index_for(&self, year: u32) -> Result<f64, LookupError> {
        self.indices
            .get(&year)
            .copied()
            .filter(|value| is_valid_index(*value))
            .ok_or(LookupError::InvalidIndex(year))
    }

    /// The multiplier which converts a value from `year` prices into reference-year prices
    pub fn factor_for(&self, year: u32) -> Result<f64, LookupError> {
        Ok(self.reference_index / self.index_for(year)?)
    }

    /// Express a nominal series in constant reference-year prices.
    ///
    /// Years with a missing value or no valid index come out missing.
    pub fn adjust(&self, series: &YearlySeries) -> YearlySeries {
        series.map_present(|year, value| match self.factor_for(year) {
            Ok(factor) => Some(value * factor),
            Err(err) => {
                debug!("{err}; adjusted value for {year} is missing");
                None
            }
        })
    }
}
