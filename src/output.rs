//! The module responsible for writing render models and map styles for external collaborators.
use crate::choropleth::{
    ChoroplethClass, FEATURE_OUTLINE, FeatureOutline, FeatureStyle, HIGHLIGHT_OUTLINE, LegendEntry,
    legend,
};
use crate::region::RegionKey;
use crate::render::{RenderModel, SeriesVariant};
use crate::style::Color;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// The formats in which output can be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A single JSON document
    #[default]
    Json,
    /// One CSV row per value
    Csv,
}

/// Format a value for a chart tooltip (e.g. `€ 12.34`). Missing values are shown as `-`.
pub fn format_currency(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("€ {value:.2}"),
        None => "-".to_string(),
    }
}

/// Represents a row in the series CSV output
#[derive(Serialize, Debug, PartialEq)]
struct SeriesRow<'a> {
    key: &'a RegionKey,
    label: &'a str,
    variant: SeriesVariant,
    year: u32,
    value: Option<f64>,
}

/// Represents a row in the map CSV output
#[derive(Serialize, Debug, PartialEq)]
struct MapRow<'a> {
    municipality: &'a str,
    value: Option<f64>,
    class: ChoroplethClass,
    fill_color: Color,
}

/// The map output as JSON
#[derive(Serialize)]
struct MapDocument<'a> {
    outline: FeatureOutline,
    highlight: FeatureOutline,
    legend: Vec<LegendEntry>,
    features: &'a [FeatureStyle],
}

/// Write a render model as CSV, one row per series and year
pub fn write_render_csv<W: Write>(writer: W, model: &RenderModel) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for series in &model.series {
        for (year, value) in series.values.iter() {
            writer.serialize(SeriesRow {
                key: &series.key,
                label: &series.label,
                variant: series.variant,
                year,
                value,
            })?;
        }
    }
    writer.flush()?;

    Ok(())
}

/// Write a render model as a JSON document
pub fn write_render_json<W: Write>(writer: W, model: &RenderModel) -> Result<()> {
    serde_json::to_writer_pretty(writer, model)?;
    Ok(())
}

/// Write map styles as CSV, one row per municipality
pub fn write_map_csv<W: Write>(writer: W, styles: &[FeatureStyle]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for style in styles {
        writer.serialize(MapRow {
            municipality: style.name.as_str(),
            value: style.value,
            class: style.class,
            fill_color: style.fill_color,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write map styles, with the shared outlines and legend, as a JSON document
pub fn write_map_json<W: Write>(writer: W, styles: &[FeatureStyle]) -> Result<()> {
    let document = MapDocument {
        outline: FEATURE_OUTLINE,
        highlight: HIGHLIGHT_OUTLINE,
        legend: legend(),
        features: styles,
    };
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Call `write` with the file at `output_path`, or stdout if there is none
pub fn with_output<F>(output_path: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output_path {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write(&mut file)
        }
        None => {
            let mut stdout = io::stdout().lock();
            write(&mut stdout)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}
