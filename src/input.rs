//! Common routines for loading a dataset from disk.
use crate::dataset::{Dataset, MunicipalityFeature, YearValues};
use crate::price_index::PriceIndexTable;
use crate::region::ProvinceID;
use crate::year::{DEFAULT_FIRST_YEAR, MAX_FIRST_YEAR, horizon, last_year, parse_year_key};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

const DATASET_CONFIG_FILE_NAME: &str = "dataset.toml";
const MUNICIPALITIES_FILE_NAME: &str = "municipalities.geojson";
const AVERAGES_FILE_NAME: &str = "averages.json";
const PRICE_INDEX_FILE_NAME: &str = "price_index.json";

/// The label used for the aggregate region when the dataset doesn't give one
const DEFAULT_AGGREGATE_LABEL: &str = "Vlaanderen (gemiddelde)";

/// The reference index used if the price index table lacks the reference year
const DEFAULT_REFERENCE_INDEX_FALLBACK: f64 = 100.0;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Parse a JSON file at the specified path.
pub fn read_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let json_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let json_data = serde_json::from_str(&json_str).with_context(|| input_err_msg(file_path))?;
    Ok(json_data)
}

fn default_first_year() -> u32 {
    DEFAULT_FIRST_YEAR
}

fn default_aggregate_label() -> String {
    DEFAULT_AGGREGATE_LABEL.to_string()
}

fn default_reference_index_fallback() -> f64 {
    DEFAULT_REFERENCE_INDEX_FALLBACK
}

/// Settings for a dataset, read from `dataset.toml`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// The first year of the horizon
    #[serde(default = "default_first_year")]
    pub first_year: u32,
    /// The year shown on the map. Defaults to the final year of the horizon.
    #[serde(default)]
    map_year: Option<u32>,
    /// The name shown for the aggregate region
    #[serde(default = "default_aggregate_label")]
    pub aggregate_label: String,
    /// The reference index to use if the reference year is absent from the price index table
    #[serde(default = "default_reference_index_fallback")]
    pub reference_index_fallback: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            first_year: default_first_year(),
            map_year: None,
            aggregate_label: default_aggregate_label(),
            reference_index_fallback: default_reference_index_fallback(),
        }
    }
}

impl DatasetConfig {
    /// Read the dataset config from `data_dir`, using defaults if the file is absent
    pub fn from_path(data_dir: &Path) -> Result<Self> {
        let file_path = data_dir.join(DATASET_CONFIG_FILE_NAME);
        let config = if file_path.is_file() {
            read_toml(&file_path)?
        } else {
            info!(
                "No {DATASET_CONFIG_FILE_NAME} found in {}; using defaults",
                data_dir.display()
            );
            Self::default()
        };

        config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(config)
    }

    /// The year shown on the map
    pub fn map_year(&self) -> u32 {
        self.map_year.unwrap_or_else(|| last_year(self.first_year))
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.first_year <= MAX_FIRST_YEAR,
            "first_year must be at most {MAX_FIRST_YEAR}"
        );
        ensure!(
            horizon(self.first_year).contains(&self.map_year()),
            "map_year {} is outside the years {}-{}",
            self.map_year(),
            self.first_year,
            last_year(self.first_year)
        );
        ensure!(
            self.reference_index_fallback.is_finite() && self.reference_index_fallback > 0.0,
            "reference_index_fallback must be a positive number"
        );

        Ok(())
    }
}

/// Values keyed by year as they appear in the input files
type RawYearValues = BTreeMap<String, Value>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    municipality: String,
    #[serde(flatten)]
    values: RawYearValues,
}

#[derive(Debug, Deserialize)]
struct AveragesFile {
    #[serde(rename = "Vlaanderen", alias = "aggregate")]
    aggregate: RawYearValues,
    #[serde(rename = "Provincies", alias = "provinces", default)]
    provinces: BTreeMap<String, RawYearValues>,
}

#[derive(Debug, Deserialize)]
struct PriceIndexFile {
    reference_year: u32,
    indices: BTreeMap<String, Option<f64>>,
}

/// Extract the usable per-year values within the horizon.
///
/// Nulls, non-numbers and negative amounts are left out, so they resolve to missing.
fn parse_year_values(raw: &RawYearValues, first_year: u32, owner: &str) -> YearValues {
    let years = horizon(first_year);
    let mut values = YearValues::new();
    for (key, value) in raw {
        let Some(year) = parse_year_key(key) else {
            continue;
        };
        if !years.contains(&year) {
            debug!("Ignoring value for {owner} in {year}, which is outside the horizon");
            continue;
        }

        match value.as_f64().filter(|v| v.is_finite()) {
            Some(v) if v < 0.0 => {
                warn!("Negative value {v} for {owner} in {year}; treating it as missing");
            }
            Some(v) => {
                values.insert(year, v);
            }
            None => {}
        }
    }

    values
}

fn read_municipalities(file_path: &Path, first_year: u32) -> Result<Vec<MunicipalityFeature>> {
    let collection: FeatureCollection = read_json(file_path)?;

    let mut seen = HashSet::new();
    let mut municipalities = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let FeatureProperties {
            municipality,
            values,
        } = feature.properties;
        ensure!(
            seen.insert(municipality.clone()),
            "Duplicate municipality '{municipality}' in {}",
            file_path.display()
        );

        municipalities.push(MunicipalityFeature {
            values: parse_year_values(&values, first_year, &municipality),
            name: municipality.into(),
        });
    }

    Ok(municipalities)
}

fn read_averages(file_path: &Path, first_year: u32, aggregate_label: &str) -> Result<Dataset> {
    let averages: AveragesFile = read_json(file_path)?;

    // BTreeMap iteration keeps the provinces sorted by name
    let provinces: IndexMap<ProvinceID, YearValues> = averages
        .provinces
        .iter()
        .map(|(name, raw)| {
            (
                ProvinceID::new(name),
                parse_year_values(raw, first_year, name),
            )
        })
        .collect();

    Ok(Dataset {
        first_year,
        aggregate: parse_year_values(&averages.aggregate, first_year, aggregate_label),
        provinces,
        municipalities: Vec::new(),
    })
}

fn read_price_index(file_path: &Path, reference_index_fallback: f64) -> Result<PriceIndexTable> {
    let raw: PriceIndexFile = read_json(file_path)?;

    // A null index leaves that year without one, so only its adjusted values go missing
    let mut indices = HashMap::new();
    for (key, value) in &raw.indices {
        let year = parse_year_key(key)
            .with_context(|| format!("Invalid year '{key}' in {}", file_path.display()))?;
        match value {
            Some(value) => {
                indices.insert(year, *value);
            }
            None => debug!("No price index for {year} in {}", file_path.display()),
        }
    }

    Ok(PriceIndexTable::new(
        indices,
        raw.reference_year,
        reference_index_fallback,
    ))
}

/// A dataset which has been fully loaded and validated
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    /// The investment data
    pub dataset: Dataset,
    /// Price indices for inflation adjustment
    pub price_index: PriceIndexTable,
    /// The dataset's settings
    pub config: DatasetConfig,
}

/// Load every input file in `data_dir`.
///
/// Either every file loads or an error is returned; nothing is partially loaded.
pub fn load_dataset(data_dir: &Path) -> Result<LoadedData> {
    let config = DatasetConfig::from_path(data_dir)?;

    let mut dataset = read_averages(
        &data_dir.join(AVERAGES_FILE_NAME),
        config.first_year,
        &config.aggregate_label,
    )?;
    dataset.municipalities =
        read_municipalities(&data_dir.join(MUNICIPALITIES_FILE_NAME), config.first_year)?;
    let price_index = read_price_index(
        &data_dir.join(PRICE_INDEX_FILE_NAME),
        config.reference_index_fallback,
    )?;

    info!(
        "Loaded {} provinces and {} municipalities from {}",
        dataset.provinces.len(),
        dataset.municipalities.len(),
        data_dir.display()
    );

    Ok(LoadedData {
        dataset,
        price_index,
        config,
    })
}
