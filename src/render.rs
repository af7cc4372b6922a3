//! Composition of render-ready chart series from the current selection.
//!
//! The output of this module is everything the charting collaborator needs: which presentation to
//! use, and an ordered list of labelled, styled series. Nothing here is cached; every call starts
//! from the selection as it is now.
use crate::dataset::Dataset;
use crate::price_index::PriceIndexTable;
use crate::region::{RegionCategory, RegionKey};
use crate::selection::SelectionStore;
use crate::series::YearlySeries;
use crate::style::StyleAssignment;
use crate::view_mode::{ViewMode, ViewModeState};
use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Which values to chart for each selected region
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize, ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InflationMode {
    /// Values as recorded
    #[default]
    Nominal,
    /// Values in constant reference-year prices
    Adjusted,
    /// Both, side by side
    Both,
}

impl InflationMode {
    /// The variants of each region's series to emit, in order
    fn variants(self) -> &'static [SeriesVariant] {
        match self {
            Self::Nominal => &[SeriesVariant::Nominal],
            Self::Adjusted => &[SeriesVariant::Adjusted],
            Self::Both => &[SeriesVariant::Nominal, SeriesVariant::Adjusted],
        }
    }
}

/// Whether a series holds nominal or inflation-adjusted values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SeriesVariant {
    /// Values as recorded
    Nominal,
    /// Values in constant reference-year prices
    Adjusted,
}

/// A labelled, styled series ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSeries {
    /// The region the series belongs to
    pub key: RegionKey,
    /// Legend label
    pub label: String,
    /// Nominal or adjusted
    pub variant: SeriesVariant,
    /// The values to draw
    pub values: YearlySeries,
    /// Colour and stroke
    pub style: StyleAssignment,
}

/// One chart of a small-multiples layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// The region shown in the panel
    pub key: RegionKey,
    /// Panel title
    pub title: String,
    /// Indices into [`RenderModel::series`]
    pub series: Vec<usize>,
}

/// Everything needed to draw the chart for the current state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    /// The presentation to use
    pub view_mode: ViewMode,
    /// Series in legend order
    pub series: Vec<RenderSeries>,
    /// One panel per region. Only filled in for [`ViewMode::SmallMultiples`].
    pub panels: Vec<Panel>,
}

impl RenderModel {
    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A selected region along with its ordinal within its category
struct OrderedKey<'a> {
    key: &'a RegionKey,
    ordinal: usize,
}

/// Pair each key with its position in `keys`
fn ranked<'a, I>(keys: I) -> impl Iterator<Item = OrderedKey<'a>>
where
    I: IntoIterator<Item = &'a RegionKey>,
{
    keys.into_iter()
        .enumerate()
        .map(|(ordinal, key)| OrderedKey { key, ordinal })
}

/// Order the selected keys for rendering.
///
/// The aggregate comes first, then provinces sorted by name, then municipalities in the order
/// they were selected. A province's ordinal is its rank among the selected provinces, so it shifts
/// when another province is deselected.
fn ordered_keys(selection: &SelectionStore) -> Vec<OrderedKey<'_>> {
    let keys_in = move |category: RegionCategory| {
        selection
            .all()
            .iter()
            .filter(move |key| key.category() == category)
    };

    let mut provinces: Vec<_> = keys_in(RegionCategory::Province).collect();
    provinces.sort_by(|a, b| a.name().cmp(&b.name()));

    ranked(keys_in(RegionCategory::Aggregate))
        .chain(ranked(provinces))
        .chain(ranked(keys_in(RegionCategory::Municipality)))
        .collect()
}

/// Builds [`RenderModel`]s from the loaded data
pub struct DatasetBuilder<'a> {
    dataset: &'a Dataset,
    price_index: &'a PriceIndexTable,
    aggregate_label: &'a str,
}

impl<'a> DatasetBuilder<'a> {
    /// Create a new [`DatasetBuilder`]
    pub fn new(
        dataset: &'a Dataset,
        price_index: &'a PriceIndexTable,
        aggregate_label: &'a str,
    ) -> Self {
        Self {
            dataset,
            price_index,
            aggregate_label,
        }
    }

    /// Build the render model for the current selection.
    ///
    /// Selected regions without data are left out of the render. An empty selection gives an
    /// empty bar chart.
    pub fn build(
        &self,
        selection: &SelectionStore,
        view_state: ViewModeState,
        inflation_mode: InflationMode,
    ) -> RenderModel {
        let view_mode = view_state.resolve(selection.len());

        let mut series = Vec::new();
        let mut panels = Vec::new();
        for OrderedKey { key, ordinal } in ordered_keys(selection) {
            let nominal = match self.dataset.resolve(key) {
                Ok(nominal) => nominal,
                Err(err) => {
                    warn!("{err}; leaving it out of the chart");
                    continue;
                }
            };

            let name = self.display_name(key);
            let first = series.len();
            for &variant in inflation_mode.variants() {
                let style = StyleAssignment::new(key.category(), ordinal, series.len());
                let (label, values, style) =
                    self.variant_values(&name, variant, inflation_mode, &nominal, style);
                series.push(RenderSeries {
                    key: key.clone(),
                    label,
                    variant,
                    values,
                    style,
                });
            }

            if view_mode == ViewMode::SmallMultiples {
                panels.push(Panel {
                    key: key.clone(),
                    title: name,
                    series: (first..series.len()).collect(),
                });
            }
        }

        debug!(
            "Built {view_mode} chart with {} series for {} selected region(s)",
            series.len(),
            selection.len()
        );

        RenderModel {
            view_mode,
            series,
            panels,
        }
    }

    /// The name to show for a region
    fn display_name(&self, key: &RegionKey) -> String {
        key.name().unwrap_or(self.aggregate_label).to_string()
    }

    /// Label, values and style for one variant of a region's series
    fn variant_values(
        &self,
        name: &str,
        variant: SeriesVariant,
        inflation_mode: InflationMode,
        nominal: &YearlySeries,
        style: StyleAssignment,
    ) -> (String, YearlySeries, StyleAssignment) {
        let reference_year = self.price_index.reference_year();
        match (variant, inflation_mode) {
            (SeriesVariant::Nominal, InflationMode::Both) => {
                (format!("{name} (nominal)"), nominal.clone(), style)
            }
            (SeriesVariant::Nominal, _) => (name.to_string(), nominal.clone(), style),
            // Drawn fainter so it isn't mistaken for a different region
            (SeriesVariant::Adjusted, InflationMode::Both) => (
                format!("{name} ({reference_year} prices)"),
                self.price_index.adjust(nominal),
                style.faded(),
            ),
            (SeriesVariant::Adjusted, _) => (
                format!("{name} ({reference_year} prices)"),
                self.price_index.adjust(nominal),
                style,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{constant_price_index, dataset, price_index, series_values};
    use crate::style::{ADJUSTED_TWIN_OPACITY, color_for, dash_for};
    use rstest::rstest;

    const AGGREGATE_LABEL: &str = "Vlaanderen (gemiddelde)";

    fn build(
        dataset: &Dataset,
        price_index: &PriceIndexTable,
        selection: &SelectionStore,
        view_state: ViewModeState,
        inflation_mode: InflationMode,
    ) -> RenderModel {
        DatasetBuilder::new(dataset, price_index, AGGREGATE_LABEL).build(
            selection,
            view_state,
            inflation_mode,
        )
    }

    fn labels(model: &RenderModel) -> Vec<&str> {
        model.series.iter().map(|s| s.label.as_str()).collect()
    }

    #[rstest]
    fn test_build_empty_selection(dataset: Dataset, price_index: PriceIndexTable) {
        for inflation_mode in [
            InflationMode::Nominal,
            InflationMode::Adjusted,
            InflationMode::Both,
        ] {
            let model = build(
                &dataset,
                &price_index,
                &SelectionStore::empty(),
                ViewModeState::Auto,
                inflation_mode,
            );
            assert!(model.is_empty());
            assert_eq!(model.view_mode, ViewMode::Bar);
            assert!(model.panels.is_empty());
        }
    }

    #[rstest]
    fn test_build_default_selection(dataset: Dataset, price_index: PriceIndexTable) {
        let model = build(
            &dataset,
            &price_index,
            &SelectionStore::new(),
            ViewModeState::Auto,
            InflationMode::Nominal,
        );
        assert_eq!(labels(&model), [AGGREGATE_LABEL]);
        assert_eq!(model.series[0].values.values, series_values(10.0));
        assert_eq!(model.series[0].style.color, color_for(RegionCategory::Aggregate, 0));
    }

    #[rstest]
    fn test_build_order_and_ordinals(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::empty();
        selection.select_all([
            RegionKey::municipality("Gent"),
            RegionKey::province("Oost-Vlaanderen"),
            RegionKey::municipality("Aalst"),
            RegionKey::Aggregate,
            RegionKey::province("Antwerpen"),
        ]);

        let model = build(
            &dataset,
            &price_index,
            &selection,
            ViewModeState::Auto,
            InflationMode::Nominal,
        );
        assert_eq!(model.view_mode, ViewMode::Line);
        assert_eq!(
            labels(&model),
            [AGGREGATE_LABEL, "Antwerpen", "Oost-Vlaanderen", "Gent", "Aalst"]
        );

        let colors: Vec<_> = model.series.iter().map(|s| s.style.color).collect();
        assert_eq!(
            colors,
            [
                color_for(RegionCategory::Aggregate, 0),
                color_for(RegionCategory::Province, 0),
                color_for(RegionCategory::Province, 1),
                color_for(RegionCategory::Municipality, 0),
                color_for(RegionCategory::Municipality, 1),
            ]
        );
        for (i, series) in model.series.iter().enumerate() {
            assert_eq!(series.style.dash_pattern, dash_for(i));
        }
    }

    #[rstest]
    fn test_build_province_reranking(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::empty();
        selection.select_all([
            RegionKey::province("Antwerpen"),
            RegionKey::province("Limburg"),
        ]);
        let build_limburg_color = |selection: &SelectionStore| {
            build(
                &dataset,
                &price_index,
                selection,
                ViewModeState::Auto,
                InflationMode::Nominal,
            )
            .series
            .into_iter()
            .find(|s| s.key == RegionKey::province("Limburg"))
            .unwrap()
            .style
            .color
        };

        assert_eq!(
            build_limburg_color(&selection),
            color_for(RegionCategory::Province, 1)
        );
        selection.remove(&RegionKey::province("Antwerpen"));
        assert_eq!(
            build_limburg_color(&selection),
            color_for(RegionCategory::Province, 0)
        );
    }

    #[rstest]
    fn test_build_drops_not_found(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::new();
        selection.add(RegionKey::municipality("Atlantis"));
        selection.add(RegionKey::municipality("Gent"));

        let model = build(
            &dataset,
            &price_index,
            &selection,
            ViewModeState::Auto,
            InflationMode::Nominal,
        );
        assert_eq!(labels(&model), [AGGREGATE_LABEL, "Gent"]);
    }

    #[rstest]
    fn test_build_both(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::empty();
        selection.add(RegionKey::province("Limburg"));

        let model = build(
            &dataset,
            &price_index,
            &selection,
            ViewModeState::Auto,
            InflationMode::Both,
        );
        assert_eq!(
            labels(&model),
            ["Limburg (nominal)", "Limburg (2024 prices)"]
        );

        let [nominal, adjusted] = &model.series[..] else {
            panic!("Expected two series");
        };
        assert_eq!(nominal.variant, SeriesVariant::Nominal);
        assert_eq!(adjusted.variant, SeriesVariant::Adjusted);
        assert_eq!(nominal.style.color, adjusted.style.color);
        assert_ne!(nominal.style.dash_pattern, adjusted.style.dash_pattern);
        assert_eq!(adjusted.style.opacity, ADJUSTED_TWIN_OPACITY);
        assert_eq!(adjusted.values, price_index.adjust(&nominal.values));
    }

    #[rstest]
    fn test_build_adjusted_constant_index(dataset: Dataset, constant_price_index: PriceIndexTable) {
        let model = build(
            &dataset,
            &constant_price_index,
            &SelectionStore::new(),
            ViewModeState::Auto,
            InflationMode::Adjusted,
        );
        assert_eq!(labels(&model), ["Vlaanderen (gemiddelde) (2014 prices)"]);
        assert_eq!(model.series[0].values.values, series_values(10.0));
        assert_eq!(model.series[0].style.opacity, 1.0);
    }

    #[rstest]
    fn test_build_missing_year_stays_missing(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::empty();
        selection.add(RegionKey::municipality("Gent"));

        let model = build(
            &dataset,
            &price_index,
            &selection,
            ViewModeState::Auto,
            InflationMode::Both,
        );
        for series in &model.series {
            assert_eq!(series.values.get(2019), None);
            assert!(series.values.get(2018).is_some());
        }
    }

    #[rstest]
    fn test_build_small_multiples_panels(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::new();
        selection.add(RegionKey::municipality("Gent"));
        selection.add(RegionKey::municipality("Atlantis"));

        let model = build(
            &dataset,
            &price_index,
            &selection,
            ViewModeState::ForcedSmallMultiples,
            InflationMode::Both,
        );
        assert_eq!(model.view_mode, ViewMode::SmallMultiples);
        assert_eq!(model.series.len(), 4);
        assert_eq!(
            model.panels,
            [
                Panel {
                    key: RegionKey::Aggregate,
                    title: AGGREGATE_LABEL.to_string(),
                    series: vec![0, 1],
                },
                Panel {
                    key: RegionKey::municipality("Gent"),
                    title: "Gent".to_string(),
                    series: vec![2, 3],
                },
            ]
        );
    }

    #[rstest]
    fn test_build_is_repeatable(dataset: Dataset, price_index: PriceIndexTable) {
        let mut selection = SelectionStore::new();
        selection.select_all([
            RegionKey::province("Limburg"),
            RegionKey::municipality("Hasselt"),
        ]);
        let builder = DatasetBuilder::new(&dataset, &price_index, AGGREGATE_LABEL);
        let first = builder.build(&selection, ViewModeState::Auto, InflationMode::Both);
        let second = builder.build(&selection, ViewModeState::Auto, InflationMode::Both);
        assert_eq!(first, second);
    }
}
