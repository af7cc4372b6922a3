//! Colour classes for the choropleth map.
use crate::dataset::Dataset;
use crate::region::{MunicipalityID, RegionKey};
use crate::style::Color;
use crate::output::format_currency;
use derive_more::Display;
use float_cmp::approx_eq;
use log::{debug, warn};
use serde::Serialize;

/// Fill for features with no value
const NO_DATA_COLOR: Color = Color("#bdbdbd");

/// Lower bounds of the classes above [`ChoroplethClass::Lowest`], as fractions of the maximum.
/// Ordered from the highest class down.
const CLASS_THRESHOLDS: [(f64, ChoroplethClass); 5] = [
    (0.9, ChoroplethClass::Highest),
    (0.7, ChoroplethClass::High),
    (0.5, ChoroplethClass::Middle),
    (0.3, ChoroplethClass::Low),
    (0.1, ChoroplethClass::VeryLow),
];

/// A colour class on the map, ordered from lowest to highest.
///
/// [`ChoroplethClass::NoData`] sorts below every data class but is drawn in its own colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoroplethClass {
    /// The feature has no value
    #[display("no data")]
    NoData,
    /// Below 10% of the maximum
    #[display("< 10%")]
    Lowest,
    /// From 10% to 30% of the maximum
    #[display("10-30%")]
    VeryLow,
    /// From 30% to 50% of the maximum
    #[display("30-50%")]
    Low,
    /// From 50% to 70% of the maximum
    #[display("50-70%")]
    Middle,
    /// From 70% to 90% of the maximum
    #[display("70-90%")]
    High,
    /// At least 90% of the maximum
    #[display("> 90%")]
    Highest,
}

impl ChoroplethClass {
    /// The six data classes, from highest to lowest, as listed in the map legend
    pub const LEGEND: [ChoroplethClass; 6] = [
        Self::Highest,
        Self::High,
        Self::Middle,
        Self::Low,
        Self::VeryLow,
        Self::Lowest,
    ];

    /// The fill colour for this class
    pub fn fill_color(self) -> Color {
        match self {
            Self::NoData => NO_DATA_COLOR,
            Self::Lowest => Color("#deebf7"),
            Self::VeryLow => Color("#9ecae1"),
            Self::Low => Color("#4292c6"),
            Self::Middle => Color("#2171b5"),
            Self::High => Color("#08519c"),
            Self::Highest => Color("#08306b"),
        }
    }
}

/// The smallest and largest values observed across the map's features
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueExtent {
    /// The smallest observed value
    pub min: f64,
    /// The largest observed value
    pub max: f64,
}

impl ValueExtent {
    /// The extent of the finite values in `values`, or `None` if there are none
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |extent, v| match extent {
                None => Some(Self { min: v, max: v }),
                Some(Self { min, max }) => Some(Self {
                    min: min.min(v),
                    max: max.max(v),
                }),
            })
    }
}

/// Put `value` into a class by comparing it with fractions of `observed_max`.
///
/// The class boundaries are inclusive at the bottom, so a value of exactly 90% of the maximum
/// lands in the top class. A value within a few ulps of a boundary counts as on it. The minimum
/// only matters for the legend. With a non-positive maximum every value goes into the lowest class.
pub fn classify(value: Option<f64>, _observed_min: f64, observed_max: f64) -> ChoroplethClass {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return ChoroplethClass::NoData;
    };
    if observed_max <= 0.0 {
        return ChoroplethClass::Lowest;
    }

    CLASS_THRESHOLDS
        .iter()
        .find(|(fraction, _)| at_least(value, observed_max * fraction))
        .map_or(ChoroplethClass::Lowest, |(_, class)| *class)
}

/// Whether `value` reaches `threshold`, ignoring rounding error in either
fn at_least(value: f64, threshold: f64) -> bool {
    value >= threshold || approx_eq!(f64, value, threshold, ulps = 4)
}

/// The outline and fill settings shared by every map feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureOutline {
    /// Stroke width in pixels
    pub weight: u32,
    /// Stroke colour
    pub color: Color,
    /// Stroke opacity
    pub opacity: f64,
    /// Stroke dash pattern, in the charting library's string form
    pub dash_array: &'static str,
    /// Fill opacity
    pub fill_opacity: f64,
}

/// The outline used for every map feature
pub const FEATURE_OUTLINE: FeatureOutline = FeatureOutline {
    weight: 1,
    color: Color("white"),
    opacity: 1.0,
    dash_array: "3",
    fill_opacity: 0.7,
};

/// The outline for a feature under the pointer
pub const HIGHLIGHT_OUTLINE: FeatureOutline = FeatureOutline {
    weight: 3,
    color: Color("#666"),
    opacity: 1.0,
    dash_array: "",
    fill_opacity: 0.9,
};

/// One row of the map legend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    /// The class the row describes
    pub class: ChoroplethClass,
    /// Range of values covered, as a share of the maximum
    pub label: String,
    /// Fill colour for the class
    pub fill_color: Color,
}

/// The map legend, from the highest class down
pub fn legend() -> Vec<LegendEntry> {
    ChoroplethClass::LEGEND
        .into_iter()
        .map(|class| LegendEntry {
            class,
            label: class.to_string(),
            fill_color: class.fill_color(),
        })
        .collect()
}

/// How a single municipality is drawn on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    /// The municipality's name
    pub name: MunicipalityID,
    /// The value shown on the map, if any
    pub value: Option<f64>,
    /// The class the value falls into
    pub class: ChoroplethClass,
    /// Fill colour for the class
    pub fill_color: Color,
    /// Text shown when hovering over the feature (e.g. `Gent / 2024: € 110.00`)
    pub tooltip: String,
}

impl FeatureStyle {
    /// The selection key to toggle when the feature is clicked
    pub fn click_key(&self) -> RegionKey {
        RegionKey::Municipality(self.name.clone())
    }
}

/// Classify every municipality in `dataset` by its value in `year`.
///
/// The extremes are taken over all municipalities, so the result doesn't depend on the selection.
pub fn map_styles(dataset: &Dataset, year: u32) -> Vec<FeatureStyle> {
    let values: Vec<_> = dataset
        .municipalities
        .iter()
        .map(|feature| feature.values.get(&year).copied().filter(|v| v.is_finite()))
        .collect();

    let extent = ValueExtent::from_values(values.iter().copied());
    match extent {
        Some(ValueExtent { min, max }) => debug!("Map values for {year} range from {min} to {max}"),
        None => warn!("No municipality has a value for {year}"),
    }
    let ValueExtent { min, max } = extent.unwrap_or(ValueExtent { min: 0.0, max: 0.0 });

    dataset
        .municipalities
        .iter()
        .zip(values)
        .map(|(feature, value)| {
            let class = classify(value, min, max);
            FeatureStyle {
                name: feature.name.clone(),
                value,
                class,
                fill_color: class.fill_color(),
                tooltip: format!("{} / {year}: {}", feature.name, format_currency(value)),
            }
        })
        .collect()
}
