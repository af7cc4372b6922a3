//! The state of one exploration session.
//!
//! A [`Session`] only exists once every input file has loaded, so a failed load leaves nothing
//! half-initialised. After that the dataset is read-only and the selection, view mode and
//! inflation mode are the only things that change. Every change is followed by a fresh call to
//! [`Session::render`].
use crate::choropleth::{FeatureStyle, map_styles};
use crate::dataset::Dataset;
use crate::input::{DatasetConfig, LoadedData, load_dataset};
use crate::price_index::PriceIndexTable;
use crate::region::{RegionCategory, RegionKey};
use crate::render::{DatasetBuilder, InflationMode, RenderModel};
use crate::selection::SelectionStore;
use crate::view_mode::ViewModeState;
use anyhow::Result;
use log::debug;
use std::path::Path;

/// Loaded data plus the user's current choices
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    price_index: PriceIndexTable,
    config: DatasetConfig,
    selection: SelectionStore,
    view_mode: ViewModeState,
    inflation_mode: InflationMode,
}

impl Session {
    /// Create a session with the default selection, automatic view mode and nominal values
    pub fn new(data: LoadedData) -> Self {
        let LoadedData {
            dataset,
            price_index,
            config,
        } = data;

        Self {
            dataset,
            price_index,
            config,
            selection: SelectionStore::new(),
            view_mode: ViewModeState::default(),
            inflation_mode: InflationMode::default(),
        }
    }

    /// Load the dataset in `data_dir` and start a session on it
    pub fn load(data_dir: &Path) -> Result<Self> {
        Ok(Self::new(load_dataset(data_dir)?))
    }

    /// The loaded data
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The dataset's settings
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// The current selection
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Select `key`
    pub fn add(&mut self, key: RegionKey) {
        self.selection.add(key);
    }

    /// Deselect `key`
    pub fn remove(&mut self, key: &RegionKey) {
        self.selection.remove(key);
    }

    /// Flip the selection state of `key`, returning whether it is now selected
    pub fn toggle(&mut self, key: RegionKey) -> bool {
        self.selection.toggle(key)
    }

    /// Deselect everything in `category`, or everything if `None`
    pub fn clear(&mut self, category: Option<RegionCategory>) {
        self.selection.clear(category);
    }

    /// Replace the selection with `keys`
    pub fn select_only<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = RegionKey>,
    {
        self.selection.clear(None);
        self.selection.select_all(keys);
    }

    /// Toggle the municipality whose map feature was clicked, returning whether it is now selected
    pub fn handle_feature_click(&mut self, name: &str) -> bool {
        let selected = self.toggle(RegionKey::municipality(name));
        debug!(
            "Map click on {name}: {}",
            if selected { "selected" } else { "deselected" }
        );
        selected
    }

    /// The current view-mode preference
    pub fn view_mode(&self) -> ViewModeState {
        self.view_mode
    }

    /// Set the view-mode preference
    pub fn set_view_mode(&mut self, view_mode: ViewModeState) {
        self.view_mode = view_mode;
    }

    /// Advance the view-mode preference to the next in the cycle and return it
    pub fn cycle_view_mode(&mut self) -> ViewModeState {
        self.view_mode = self.view_mode.next();
        self.view_mode
    }

    /// The current inflation mode
    pub fn inflation_mode(&self) -> InflationMode {
        self.inflation_mode
    }

    /// Set the inflation mode
    pub fn set_inflation_mode(&mut self, inflation_mode: InflationMode) {
        self.inflation_mode = inflation_mode;
    }

    /// Build the chart for the current state
    pub fn render(&self) -> RenderModel {
        DatasetBuilder::new(
            &self.dataset,
            &self.price_index,
            &self.config.aggregate_label,
        )
        .build(&self.selection, self.view_mode, self.inflation_mode)
    }

    /// Colour classes for every municipality on the map
    pub fn map_styles(&self) -> Vec<FeatureStyle> {
        map_styles(&self.dataset, self.config.map_year())
    }

    /// Every key that can be selected
    pub fn available_keys(&self) -> Vec<RegionKey> {
        self.dataset.available_keys()
    }

    /// A short description of the selection for the chart header
    pub fn selection_summary(&self) -> String {
        match self.selection.len() {
            0 => "Select a region".to_string(),
            1 => "1 region selected".to_string(),
            n => format!("{n} regions selected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{dataset, dataset_config, price_index};
    use crate::view_mode::ViewMode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn session(
        dataset: Dataset,
        price_index: PriceIndexTable,
        dataset_config: DatasetConfig,
    ) -> Session {
        Session::new(LoadedData {
            dataset,
            price_index,
            config: dataset_config,
        })
    }

    #[rstest]
    fn test_new_session(session: Session) {
        assert_eq!(session.selection(), &SelectionStore::new());
        assert_eq!(session.view_mode(), ViewModeState::Auto);
        assert_eq!(session.inflation_mode(), InflationMode::Nominal);
        assert_eq!(session.selection_summary(), "1 region selected");

        let model = session.render();
        assert_eq!(model.view_mode, ViewMode::Bar);
        assert_eq!(model.series.len(), 1);
    }

    #[rstest]
    fn test_feature_click_round_trip(mut session: Session) {
        let before = session.selection().all().clone();
        assert!(session.handle_feature_click("Gent"));
        assert_eq!(session.render().series.len(), 2);
        assert!(!session.handle_feature_click("Gent"));
        assert_eq!(session.selection().all(), &before);
    }

    #[rstest]
    fn test_mode_changes_rerender(mut session: Session) {
        session.add(RegionKey::province("Limburg"));
        session.set_inflation_mode(InflationMode::Both);
        assert_eq!(session.render().series.len(), 4);

        assert_eq!(session.cycle_view_mode(), ViewModeState::ForcedBar);
        assert_eq!(session.cycle_view_mode(), ViewModeState::ForcedLine);
        assert_eq!(session.render().view_mode, ViewMode::Line);

        session.set_view_mode(ViewModeState::ForcedSmallMultiples);
        assert_eq!(session.render().panels.len(), 2);
    }

    #[rstest]
    fn test_clear_and_select_only(mut session: Session) {
        session.clear(None);
        assert_eq!(session.selection_summary(), "Select a region");
        assert!(session.render().is_empty());

        session.select_only([
            RegionKey::municipality("Gent"),
            RegionKey::municipality("Aalst"),
        ]);
        assert_eq!(session.selection_summary(), "2 regions selected");
        session.remove(&RegionKey::municipality("Gent"));
        assert_eq!(session.selection().len(), 1);
    }

    #[rstest]
    fn test_map_styles_ignore_selection(mut session: Session) {
        let before = session.map_styles();
        session.select_only([RegionKey::municipality("Aalst")]);
        assert_eq!(session.map_styles(), before);
        assert_eq!(before.len(), session.dataset().municipalities.len());
    }
}
