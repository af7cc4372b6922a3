//! Fixtures for tests

use crate::dataset::{Dataset, MunicipalityFeature, YearValues};
use crate::input::DatasetConfig;
use crate::price_index::PriceIndexTable;
use crate::year::{HORIZON_LEN, horizon};
use indexmap::indexmap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Values `start`, `start + 1`, ... for every year of the horizon
pub fn series_values(start: f64) -> [Option<f64>; HORIZON_LEN] {
    let mut values = [None; HORIZON_LEN];
    let mut value = start;
    for v in &mut values {
        *v = Some(value);
        value += 1.0;
    }

    values
}

/// Year values `start`, `start + 1`, ... from 2014, leaving out the years in `missing`
pub fn year_values(start: f64, missing: &[u32]) -> YearValues {
    horizon(2014)
        .zip(series_values(start))
        .filter(|(year, _)| !missing.contains(year))
        .filter_map(|(year, value)| Some((year, value?)))
        .collect()
}

#[fixture]
pub fn dataset() -> Dataset {
    Dataset {
        first_year: 2014,
        aggregate: year_values(10.0, &[]),
        provinces: indexmap! {
            "Antwerpen".into() => year_values(20.0, &[]),
            "Limburg".into() => year_values(30.0, &[]),
            "Oost-Vlaanderen".into() => year_values(40.0, &[]),
        },
        municipalities: vec![
            MunicipalityFeature {
                name: "Gent".into(),
                values: year_values(100.0, &[2019]),
            },
            MunicipalityFeature {
                name: "Antwerpen".into(),
                values: year_values(200.0, &[]),
            },
            MunicipalityFeature {
                name: "Aalst".into(),
                values: year_values(50.0, &[]),
            },
            MunicipalityFeature {
                name: "Hasselt".into(),
                values: year_values(80.0, &[2024]),
            },
        ],
    }
}

/// An index of 100 for every year, with 2014 as reference year
#[fixture]
pub fn constant_price_index() -> PriceIndexTable {
    PriceIndexTable::new(horizon(2014).map(|year| (year, 100.0)).collect(), 2014, 100.0)
}

/// An index rising from 50 in 2014 to 100 in the reference year 2024
#[fixture]
pub fn price_index() -> PriceIndexTable {
    PriceIndexTable::new(
        horizon(2014)
            .map(|year| (year, 50.0 + 5.0 * f64::from(year - 2014)))
            .collect(),
        2024,
        100.0,
    )
}

#[fixture]
pub fn dataset_config() -> DatasetConfig {
    DatasetConfig::default()
}
