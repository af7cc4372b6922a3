//! Integration tests for the `render` command.
use invest_explorer::cli::{RenderOpts, handle_render_command};
use invest_explorer::output::OutputFormat;
use invest_explorer::render::InflationMode;
use invest_explorer::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the demo dataset.
fn get_data_dir() -> PathBuf {
    PathBuf::from("data/demo")
}

/// Render two regions in both modes and check the JSON written
#[test]
fn test_handle_render_command() {
    unsafe { std::env::set_var("INVEST_EXPLORER_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let output = dir.path().join("render.json");
    let opts = RenderOpts {
        selected: vec![
            "agg".to_string(),
            "mun:Gent".to_string(),
            "mun:Nowhere".to_string(),
        ],
        inflation: Some(InflationMode::Both),
        format: OutputFormat::Json,
        output: Some(output.clone()),
        ..Default::default()
    };
    handle_render_command(&get_data_dir(), &opts, Some(Settings::default())).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["view_mode"], "bar");

    // The unknown municipality is left out; the others each get a nominal and adjusted series
    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series[0]["label"], "Vlaanderen (gemiddelde) (nominal)");
    assert_eq!(series[1]["label"], "Vlaanderen (gemiddelde) (2024 prices)");
    assert_eq!(series[2]["key"], "mun:Gent");
    assert_eq!(series[3]["variant"], "adjusted");

    // Values in the reference year are unchanged by the adjustment
    assert_eq!(series[2]["values"]["values"][10], 362.1);
    assert_eq!(series[3]["values"]["values"][10], 362.1);
}
