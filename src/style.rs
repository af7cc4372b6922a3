//! Deterministic colours and stroke patterns for chart series.
//!
//! Colours are chosen per category from the series' ordinal within that category; dash patterns
//! cycle over the position of the series in the whole render, so neighbouring legend entries
//! always differ in dash even when their colours happen to line up.
use crate::region::RegionCategory;
use derive_more::Display;
use serde::Serialize;

/// A CSS-style colour token (e.g. `#e63946`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub struct Color(pub &'static str);

/// Stroke and gap lengths for a line. Empty means solid.
pub type DashPattern = &'static [u32];

/// Colour of the aggregate region's series
const AGGREGATE_PALETTE: [Color; 1] = [Color("#e63946")];

const PROVINCE_PALETTE: [Color; 6] = [
    Color("#2a9d8f"),
    Color("#e9c46a"),
    Color("#f4a261"),
    Color("#264653"),
    Color("#8ab17d"),
    Color("#b5838d"),
];

const MUNICIPALITY_PALETTE: [Color; 8] = [
    Color("#0055cc"),
    Color("#6a4c93"),
    Color("#ff595e"),
    Color("#8ac926"),
    Color("#1982c4"),
    Color("#ffca3a"),
    Color("#3a86ff"),
    Color("#fb5607"),
];

/// Shared dash patterns. Adjacent entries are always different.
const DASH_PALETTE: [DashPattern; 5] = [&[], &[6, 3], &[2, 2], &[8, 4, 2, 4], &[1, 3]];

/// Opacity for a series drawn alongside its nominal twin
pub const ADJUSTED_TWIN_OPACITY: f64 = 0.6;

/// The colour and stroke assigned to a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleAssignment {
    /// Fill and stroke colour
    pub color: Color,
    /// Stroke pattern
    pub dash_pattern: DashPattern,
    /// Opacity between 0 and 1
    pub opacity: f64,
}

impl StyleAssignment {
    /// Style for a series at position `render_index` in the render whose region is the
    /// `ordinal`th of its category
    pub fn new(category: RegionCategory, ordinal: usize, render_index: usize) -> Self {
        Self {
            color: color_for(category, ordinal),
            dash_pattern: dash_for(render_index),
            opacity: 1.0,
        }
    }

    /// The same style at a reduced opacity
    pub fn faded(self) -> Self {
        Self {
            opacity: ADJUSTED_TWIN_OPACITY,
            ..self
        }
    }
}

/// The fixed palette of the given category
pub fn palette(category: RegionCategory) -> &'static [Color] {
    match category {
        RegionCategory::Aggregate => &AGGREGATE_PALETTE,
        RegionCategory::Province => &PROVINCE_PALETTE,
        RegionCategory::Municipality => &MUNICIPALITY_PALETTE,
    }
}

/// The colour for the `ordinal`th series of `category`, cycling through its palette
pub fn color_for(category: RegionCategory, ordinal: usize) -> Color {
    let palette = palette(category);
    palette[ordinal % palette.len()]
}

/// The dash pattern for the series at `render_index` in the whole render
pub fn dash_for(render_index: usize) -> DashPattern {
    DASH_PALETTE[render_index % DASH_PALETTE.len()]
}
