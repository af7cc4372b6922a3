//! Common functionality for exploring per-capita investment data by region.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod choropleth;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod price_index;
pub mod region;
pub mod render;
pub mod selection;
pub mod series;
pub mod session;
pub mod settings;
pub mod style;
pub mod view_mode;
pub mod year;

#[cfg(test)]
mod fixture;

/// Get the directory in which program-wide configuration files are stored
pub fn get_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No sensible place to put it; use the working directory instead
        return PathBuf::new();
    };
    config_dir.push(env!("CARGO_PKG_NAME"));
    config_dir
}
