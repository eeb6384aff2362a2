#![doc = include_str!("../README.md")]

pub mod layout;
pub mod models;
pub mod render;
pub mod scale;
pub mod tests;
pub mod utils;
pub mod view;

use crate::layout::{Dims, GeneLayout};
use crate::models::{Dataset, Gene};
use crate::utils::errors::VizError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Computes the full diagram geometry for a gene with the default dimensions
///
/// # Examples
///
/// ```rust
/// use isoviz::tests::genes::{standard_datasets, standard_gene};
///
/// let layout = isoviz::layout_gene(&standard_gene(), &standard_datasets()).unwrap();
/// assert_eq!(layout.width, 1296.0);
/// ```
pub fn layout_gene(gene: &Gene, datasets: &[Dataset]) -> Result<GeneLayout, VizError> {
    GeneLayout::compute(gene, datasets, &Dims::default())
}
