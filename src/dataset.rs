//! The loaded investment data and lookup of a region's yearly series.
use crate::error::LookupError;
use crate::region::{MunicipalityID, ProvinceID, RegionKey};
use crate::series::YearlySeries;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Raw values for a region, keyed by year.
///
/// A year which is absent or holds a non-finite number is treated as missing.
pub type YearValues = HashMap<u32, f64>;

/// A municipality feature from the geography collection
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityFeature {
    /// The municipality's name
    pub name: MunicipalityID,
    /// Per-year values from the feature's properties
    pub values: YearValues,
}

/// All investment data for a session. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The first year of the horizon
    pub first_year: u32,
    /// Averages for the aggregate region
    pub aggregate: YearValues,
    /// Averages per province, sorted by name
    pub provinces: IndexMap<ProvinceID, YearValues>,
    /// The municipality features, in file order
    pub municipalities: Vec<MunicipalityFeature>,
}

impl Dataset {
    /// Look up the nominal series for the given region.
    ///
    /// Years with no usable value resolve to missing rather than zero.
    pub fn resolve(&self, key: &RegionKey) -> Result<YearlySeries, LookupError> {
        let values = match key {
            RegionKey::Aggregate => &self.aggregate,
            RegionKey::Province(name) => self
                .provinces
                .get(name)
                .ok_or_else(|| LookupError::NotFound(key.clone()))?,
            RegionKey::Municipality(name) => {
                &self
                    .find_municipality(name)
                    .ok_or_else(|| LookupError::NotFound(key.clone()))?
                    .values
            }
        };

        Ok(self.series_from_values(values))
    }

    /// Find the municipality feature with the given name
    pub fn find_municipality(&self, name: &MunicipalityID) -> Option<&MunicipalityFeature> {
        self.municipalities.iter().find(|feature| &feature.name == name)
    }

    /// Every selectable key: the aggregate, then provinces and municipalities sorted by name
    pub fn available_keys(&self) -> Vec<RegionKey> {
        let mut provinces: Vec<_> = self.provinces.keys().cloned().collect();
        provinces.sort();
        let mut municipalities: Vec<_> = self
            .municipalities
            .iter()
            .map(|feature| feature.name.clone())
            .collect();
        municipalities.sort();

        std::iter::once(RegionKey::Aggregate)
            .chain(provinces.into_iter().map(RegionKey::Province))
            .chain(municipalities.into_iter().map(RegionKey::Municipality))
            .collect()
    }

    fn series_from_values(&self, values: &YearValues) -> YearlySeries {
        YearlySeries::from_fn(self.first_year, |year| {
            values.get(&year).copied().filter(|v| v.is_finite())
        })
    }
}
