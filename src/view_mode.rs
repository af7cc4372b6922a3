//! Choice of chart presentation for the current selection.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

/// The largest selection shown as grouped bars in automatic mode
const MAX_BAR_SERIES: usize = 3;

/// The largest selection shown as lines in automatic mode
const MAX_LINE_SERIES: usize = 7;

/// How the chart presents the selected regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Grouped bars, one group per year
    Bar,
    /// One line per series
    Line,
    /// One small chart per region
    SmallMultiples,
}

/// The user's view-mode preference: automatic, or a forced presentation
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize, ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ViewModeState {
    /// Pick the presentation from the number of selected regions
    #[default]
    Auto,
    /// Always use grouped bars
    #[value(name = "bar")]
    #[serde(rename = "bar")]
    #[strum(serialize = "bar")]
    ForcedBar,
    /// Always use lines
    #[value(name = "line")]
    #[serde(rename = "line")]
    #[strum(serialize = "line")]
    ForcedLine,
    /// Always use small multiples
    #[value(name = "small-multiples")]
    #[serde(rename = "small-multiples")]
    #[strum(serialize = "small-multiples")]
    ForcedSmallMultiples,
}

impl ViewModeState {
    /// The next state of the view-mode cycle button
    pub fn next(self) -> Self {
        match self {
            Self::Auto => Self::ForcedBar,
            Self::ForcedBar => Self::ForcedLine,
            Self::ForcedLine => Self::ForcedSmallMultiples,
            Self::ForcedSmallMultiples => Self::Auto,
        }
    }

    /// Decide the presentation for a selection of `selection_count` regions
    pub fn resolve(self, selection_count: usize) -> ViewMode {
        match self {
            Self::ForcedBar => ViewMode::Bar,
            Self::ForcedLine => ViewMode::Line,
            Self::ForcedSmallMultiples => ViewMode::SmallMultiples,
            Self::Auto => match selection_count {
                0..=MAX_BAR_SERIES => ViewMode::Bar,
                n if n <= MAX_LINE_SERIES => ViewMode::Line,
                _ => ViewMode::SmallMultiples,
            },
        }
    }
}
