use crate::filter::{self, FilterOptions, FilterSelection, FilteredView};
use crate::reports::{self, DashboardReport};
use crate::types::Dataset;
use std::sync::Arc;
use tracing::info;

/// Working state of one dashboard session: the current dataset snapshot and
/// the active filter selection.
///
/// The dataset is held behind an `Arc`. Replacing it swaps the pointer, so a
/// snapshot taken earlier stays consistent for whoever holds it.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Arc<Dataset>>,
    selection: FilterSelection,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new dataset and reset the selection to pass-through.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        info!(records = dataset.len(), "dataset replaced");
        self.dataset = Some(Arc::new(dataset));
        self.selection = FilterSelection::new();
    }

    pub fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }

    pub fn selection_mut(&mut self) -> &mut FilterSelection {
        &mut self.selection
    }

    pub fn clear_filters(&mut self) {
        self.selection = FilterSelection::new();
    }

    pub fn options(&self) -> Option<FilterOptions> {
        self.dataset.as_deref().map(FilterOptions::from_dataset)
    }

    /// Recompute the full dashboard for the current snapshot and selection.
    pub fn dashboard(&self) -> Option<DashboardReport> {
        let dataset = self.dataset.as_deref()?;
        let view = filter::apply(dataset, &self.selection);
        Some(reports::generate_dashboard(&view, &self.selection))
    }

    /// Run `f` against the filtered view of the current snapshot.
    pub fn with_view<T>(&self, f: impl FnOnce(&FilteredView<'_>) -> T) -> Option<T> {
        let dataset = self.dataset.as_deref()?;
        let view = filter::apply(dataset, &self.selection);
        Some(f(&view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Dimension;
    use crate::loader::{load_csv_reader, normalize};

    fn dataset(input: &str) -> Dataset {
        normalize(&load_csv_reader(input.as_bytes()).expect("loads")).expect("ok")
    }

    #[test]
    fn empty_session_has_nothing_to_report() {
        let session = Session::new();
        assert!(session.snapshot().is_none());
        assert!(session.dashboard().is_none());
    }

    #[test]
    fn replacing_dataset_keeps_old_snapshots_intact() {
        let mut session = Session::new();
        session.replace_dataset(dataset("orgunitlevel1,v\nLagos,1\nKano,2\n"));
        session.set_selection(FilterSelection::new().with(Dimension::Region, ["Lagos"]));
        assert_eq!(session.with_view(|v| v.len()), Some(1));

        let before = session.snapshot().expect("loaded");
        session.replace_dataset(dataset("orgunitlevel1,v\nAbuja,3\n"));

        assert_eq!(before.len(), 2);
        assert_eq!(session.snapshot().map(|d| d.len()), Some(1));
        assert_eq!(session.selection(), &FilterSelection::new());
        assert_eq!(session.with_view(|v| v.len()), Some(1));
    }

    #[test]
    fn clear_filters_restores_pass_through() {
        let mut session = Session::new();
        session.replace_dataset(dataset("orgunitlevel1,v\nLagos,1\nKano,2\n"));
        session
            .selection_mut()
            .set(Dimension::Region, ["Kano"]);
        assert_eq!(session.dashboard().map(|d| d.filter.shown), Some(1));
        session.clear_filters();
        assert_eq!(session.dashboard().map(|d| d.filter.shown), Some(2));
    }
}
