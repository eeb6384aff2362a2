//! View state for one interactive diagram
//!
//! The crate itself is stateless: every layout pass starts from raw
//! payloads. [`ViewState`] is a small helper for callers that wire the
//! diagram to asynchronous data fetches. It remembers which gene is
//! selected and which datasets are checked, and it discards a fetched gene
//! payload that arrives after the selection has already moved on
//! (last-request-wins).

use log::debug;

use crate::layout::{Dims, GeneLayout};
use crate::models::{Dataset, Gene};
use crate::utils::errors::VizError;

/// Selection state of one diagram
///
/// # Examples
///
/// ```rust
/// use isoviz::tests::genes::{standard_datasets, standard_gene};
/// use isoviz::view::ViewState;
///
/// let mut view = ViewState::new();
/// view.set_datasets(standard_datasets());
/// view.select_gene("GENE1");
///
/// // nothing fetched yet: a valid transient state, not an error
/// assert!(view.layout().unwrap().is_none());
///
/// assert!(view.deliver("GENE1", standard_gene()));
/// assert!(view.layout().unwrap().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    selected: Option<String>,
    gene: Option<Gene>,
    datasets: Vec<Dataset>,
    dims: Dims,
}

impl ViewState {
    pub fn new() -> Self {
        Self::with_dims(Dims::default())
    }

    pub fn with_dims(dims: Dims) -> Self {
        Self {
            selected: None,
            gene: None,
            datasets: Vec::new(),
            dims,
        }
    }

    pub fn selected_gene(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects a gene and drops any payload belonging to another gene
    pub fn select_gene(&mut self, gene_id: &str) {
        if self.selected.as_deref() == Some(gene_id) {
            return;
        }
        self.selected = Some(gene_id.to_string());
        self.gene = None;
    }

    /// Applies a fetched gene payload
    ///
    /// The payload is keyed by the gene id that was selected when the fetch
    /// was triggered. A response for a gene that is no longer selected is
    /// stale and gets ignored; returns whether the payload was applied.
    pub fn deliver(&mut self, gene_id: &str, gene: Gene) -> bool {
        if self.selected.as_deref() != Some(gene_id) {
            debug!("discarding stale payload for {gene_id}");
            return false;
        }
        self.gene = Some(gene);
        true
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn set_datasets(&mut self, datasets: Vec<Dataset>) {
        self.datasets = datasets;
    }

    /// Toggles the checked state of one dataset; returns whether the
    /// dataset exists
    pub fn set_checked(&mut self, dataset_id: &str, checked: bool) -> bool {
        match self
            .datasets
            .iter_mut()
            .find(|dataset| dataset.id == dataset_id)
        {
            Some(dataset) => {
                dataset.is_checked = checked;
                true
            }
            None => false,
        }
    }

    /// Runs a layout pass for the current state
    ///
    /// Returns `Ok(None)` while no gene payload is present.
    pub fn layout(&self) -> Result<Option<GeneLayout>, VizError> {
        match &self.gene {
            None => Ok(None),
            Some(gene) => GeneLayout::compute(gene, &self.datasets, &self.dims).map(Some),
        }
    }
}
