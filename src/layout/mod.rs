//! The track layout engine
//!
//! [`GeneLayout::compute`] runs one full layout pass: it builds the
//! coordinate scales from the model transcript, positions every visible
//! transcript's exons on the model frame, derives the expression bubble
//! geometry and stacks everything into horizontal bands.
//!
//! The output is a plain geometry tree. It carries no drawing primitives;
//! the [`crate::render`] module is the only place that touches a drawing
//! surface. Layout is recomputed in full whenever the selected gene or the
//! checked datasets change, and it is deterministic: identical inputs yield
//! an identical tree.

mod mapper;

pub use mapper::{FrameExon, ModelFrame};

use log::debug;

use crate::models::{Dataset, ExpressionPoint, Gene, Transcript};
use crate::scale::{
    coordinate_scales, ExpressionScales, FlooredScale, MIN_EXON_WIDTH, MIN_INTRON_WIDTH,
};
use crate::utils::errors::VizError;

/// Fixed dimensions of the diagram
///
/// All values are in pixels. The defaults match the original portal layout;
/// callers that need a different canvas can pass their own `Dims` to
/// [`GeneLayout::compute`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dims {
    /// Height of one transcript band
    pub band_width: f64,
    /// Vertical padding above the first and below the last band
    pub padding_outer: f64,
    /// Vertical padding between bands
    pub padding_inner: f64,
    /// Width of the transcript label column
    pub label_width: f64,
    /// Width of the exon track
    pub rects_width: f64,
    /// Width of the expression bubble track
    pub bubbles_width: f64,
    /// Diameter of the largest expression bubble
    pub bubbles_diam: f64,
    /// Horizontal padding between the columns
    pub padding_x: f64,
    /// Vertical offset of the cell type axis labels
    pub bubbles_axis_height: f64,
}

impl Default for Dims {
    fn default() -> Self {
        Self {
            band_width: 16.0,
            padding_outer: 40.0,
            padding_inner: 5.0,
            label_width: 120.0,
            rects_width: 756.0,
            bubbles_width: 400.0,
            bubbles_diam: 20.0,
            padding_x: 10.0,
            bubbles_axis_height: 25.0,
        }
    }
}

impl Dims {
    /// Total canvas width: label column, exon track, expression track and
    /// horizontal padding
    pub fn canvas_width(&self) -> f64 {
        self.label_width + self.rects_width + self.bubbles_width + self.padding_x * 2.0
    }

    /// Total canvas height for `count` stacked bands
    pub fn canvas_height(&self, count: usize) -> f64 {
        self.padding_outer * 2.0
            + self.band_width * count as f64
            + self.padding_inner * (count as f64 - 1.0)
    }

    /// Vertical position of the band at `index`
    pub fn band_y(&self, index: usize) -> f64 {
        self.padding_outer + index as f64 * (self.band_width + self.padding_inner)
    }

    /// Left edge of the exon track
    pub fn rects_x(&self) -> f64 {
        self.label_width + self.padding_x
    }

    /// Left edge of the expression bubble track
    pub fn bubbles_x(&self) -> f64 {
        self.label_width + self.rects_width + self.padding_x * 2.0
    }
}

/// A positioned exon rectangle, relative to the exon track origin
#[derive(Clone, Debug, PartialEq)]
pub struct ExonRect {
    pub x: f64,
    pub w: f64,
    pub chrom_start: u32,
    pub chrom_end: u32,
    pub exon_number: Option<u32>,
    pub novel: bool,
}

impl ExonRect {
    pub fn length(&self) -> u32 {
        self.chrom_end.saturating_sub(self.chrom_start) + 1
    }
}

/// One expression bubble, relative to the bubble track origin
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub radius: f64,
    /// Fill color as a `#rrggbb` hex string
    pub color: String,
    pub cell_type: String,
    pub pct_exp: f64,
    pub avg_exp_scaled: f64,
}

/// A cell type label on the expression axis
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub label: String,
    pub x: f64,
}

/// The cell type axis above the bubble track
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionAxis {
    pub x: f64,
    pub y: f64,
    pub ticks: Vec<AxisTick>,
}

/// One transcript band of the diagram
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptTrack {
    pub transcript_id: String,
    /// The id shown in the label column
    pub label: String,
    pub y: f64,
    pub novel: bool,
    /// Whether the transcript's dataset is the reference dataset
    pub reference: bool,
    pub dataset_name: Option<String>,
    /// Connector line from the first positioned exon's left edge to the last
    /// positioned exon's right edge. Absent when no exon could be mapped.
    pub baseline: Option<(f64, f64)>,
    pub exons: Vec<ExonRect>,
    pub bubbles: Vec<Bubble>,
}

/// The fully resolved geometry of one gene diagram
#[derive(Clone, Debug, PartialEq)]
pub struct GeneLayout {
    pub dims: Dims,
    pub width: f64,
    pub height: f64,
    /// Absent when no visible transcript has expression data; the whole
    /// expression column is then omitted rather than drawn empty.
    pub axis: Option<ExpressionAxis>,
    pub tracks: Vec<TranscriptTrack>,
}

impl GeneLayout {
    /// Runs one full layout pass
    ///
    /// Visible are the model transcript (always) and every transcript whose
    /// dataset is currently checked. Tracks are stacked in the order their
    /// dataset appears among the checked datasets; the model transcript has
    /// no dataset and sorts first.
    ///
    /// Fails when the gene payload has no model transcript, since every
    /// scale depends on it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use isoviz::layout::{Dims, GeneLayout};
    /// use isoviz::tests::genes::{standard_datasets, standard_gene};
    ///
    /// let layout =
    ///     GeneLayout::compute(&standard_gene(), &standard_datasets(), &Dims::default())
    ///         .unwrap();
    /// assert_eq!(layout.tracks.len(), 4);
    /// assert_eq!(layout.tracks[0].transcript_id, "TX-MODEL");
    /// ```
    pub fn compute(gene: &Gene, datasets: &[Dataset], dims: &Dims) -> Result<Self, VizError> {
        let model = gene.model_transcript()?;
        let (scales, measured) = coordinate_scales(
            &model.exons,
            dims.rects_width,
            MIN_EXON_WIDTH,
            MIN_INTRON_WIDTH,
        );
        let frame = ModelFrame::new(&measured, &scales);

        let checked: Vec<&str> = datasets
            .iter()
            .filter(|dataset| dataset.is_checked)
            .map(|dataset| dataset.id.as_str())
            .collect();

        let mut visible: Vec<&Transcript> = gene
            .transcripts
            .iter()
            .filter(|tx| {
                tx.is_model
                    || tx
                        .dataset_id
                        .as_deref()
                        .is_some_and(|id| checked.contains(&id))
            })
            .collect();

        // the bubble scales are derived in payload order, before sorting:
        // the first visible transcript with expression data defines the
        // canonical cell type ordering
        let expression: Vec<&[ExpressionPoint]> = visible
            .iter()
            .filter_map(|tx| tx.attributes.expression.as_deref())
            .collect();
        let bubble_scales =
            ExpressionScales::build(&expression, dims.bubbles_width, dims.bubbles_diam);

        visible.sort_by_key(|tx| dataset_position(&checked, tx.dataset_id.as_deref()));

        let tracks: Vec<TranscriptTrack> = visible
            .iter()
            .enumerate()
            .map(|(index, tx)| {
                Self::track(tx, index, datasets, &frame, &scales.exon, &bubble_scales, dims)
            })
            .collect();

        debug!(
            "laid out {} of {} transcripts{}",
            tracks.len(),
            gene.transcripts.len(),
            gene.id
                .as_deref()
                .map(|id| format!(" for {id}"))
                .unwrap_or_default()
        );

        Ok(Self {
            dims: *dims,
            width: dims.canvas_width(),
            height: dims.canvas_height(tracks.len()),
            axis: bubble_scales.as_ref().map(|scales| ExpressionAxis {
                x: dims.bubbles_x(),
                y: dims.bubbles_axis_height,
                ticks: scales
                    .position
                    .ticks()
                    .map(|(label, x)| AxisTick {
                        label: label.to_string(),
                        x,
                    })
                    .collect(),
            }),
            tracks,
        })
    }

    fn track(
        tx: &Transcript,
        index: usize,
        datasets: &[Dataset],
        frame: &ModelFrame,
        exon_scale: &FlooredScale,
        bubble_scales: &Option<ExpressionScales>,
        dims: &Dims,
    ) -> TranscriptTrack {
        let dataset = tx
            .dataset_id
            .as_deref()
            .and_then(|id| datasets.iter().find(|dataset| dataset.id == id));

        let exons: Vec<ExonRect> = tx
            .exons
            .iter()
            .filter_map(|exon| frame.map_exon(&tx.id, exon, exon_scale))
            .collect();
        let baseline = match (exons.first(), exons.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x + last.w)),
            _ => None,
        };

        let bubbles = match (bubble_scales, &tx.attributes.expression) {
            (Some(scales), Some(points)) => points
                .iter()
                .filter_map(|point| {
                    // a cell type outside the axis domain has no position
                    // and is not drawn
                    scales.position.position(&point.cell_type).map(|x| Bubble {
                        x,
                        radius: scales.radius.scale(point.pct_exp),
                        color: scales.color.color(point.avg_exp_scaled),
                        cell_type: point.cell_type.clone(),
                        pct_exp: point.pct_exp,
                        avg_exp_scaled: point.avg_exp_scaled,
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        TranscriptTrack {
            transcript_id: tx.id.clone(),
            label: tx.label().to_string(),
            y: dims.band_y(index),
            novel: tx.is_novel(),
            reference: dataset.is_some_and(|dataset| dataset.is_reference),
            dataset_name: dataset.map(|dataset| dataset.name.clone()),
            baseline,
            exons,
            bubbles,
        }
    }
}

/// Sort key for the stacking order: the position of the transcript's dataset
/// among the checked datasets
///
/// Transcripts whose dataset is not in the list, i.e. the model transcript,
/// behave as index -1 and sort first. The sort is stable, so transcripts of
/// the same dataset keep their payload order.
fn dataset_position(checked: &[&str], dataset_id: Option<&str>) -> i64 {
    dataset_id
        .and_then(|id| checked.iter().position(|checked_id| *checked_id == id))
        .map_or(-1, |position| position as i64)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::genes::{standard_datasets, standard_gene};

    fn compute(gene: &Gene, datasets: &[Dataset]) -> GeneLayout {
        GeneLayout::compute(gene, datasets, &Dims::default()).unwrap()
    }

    #[test]
    fn test_canvas_dimensions() {
        let layout = compute(&standard_gene(), &standard_datasets());
        assert_eq!(layout.width, 1296.0);
        // 2 * 40 + 16 * 4 + 5 * 3
        assert_eq!(layout.height, 159.0);
    }

    #[test]
    fn test_track_order_and_bands() {
        let layout = compute(&standard_gene(), &standard_datasets());
        let ids: Vec<&str> = layout
            .tracks
            .iter()
            .map(|track| track.transcript_id.as_str())
            .collect();
        assert_eq!(ids, ["TX-MODEL", "TX-1", "TX-2", "TX-3"]);
        let ys: Vec<f64> = layout.tracks.iter().map(|track| track.y).collect();
        assert_eq!(ys, [40.0, 61.0, 82.0, 103.0]);
    }

    #[test]
    fn test_model_track_geometry() {
        let layout = compute(&standard_gene(), &standard_datasets());
        let model = &layout.tracks[0];
        let positions: Vec<(f64, f64)> = model.exons.iter().map(|e| (e.x, e.w)).collect();
        assert_eq!(positions, [(0.0, 190.0), (326.0, 190.0), (652.0, 96.0)]);
        assert_eq!(model.baseline, Some((0.0, 748.0)));
        assert!(model.dataset_name.is_none());
        assert!(!model.reference);
    }

    #[test]
    fn test_curated_track_geometry() {
        let layout = compute(&standard_gene(), &standard_datasets());
        let tx1 = &layout.tracks[1];
        let positions: Vec<(f64, f64)> = tx1.exons.iter().map(|e| (e.x, e.w)).collect();
        assert_eq!(positions, [(40.0, 153.0), (326.0, 190.0)]);
        assert_eq!(tx1.baseline, Some((40.0, 516.0)));
        assert!(tx1.reference);
        assert_eq!(tx1.dataset_name.as_deref(), Some("Dataset One"));
    }

    #[test]
    fn test_unmappable_transcript_keeps_its_band() {
        let layout = compute(&standard_gene(), &standard_datasets());
        let tx3 = &layout.tracks[3];
        assert_eq!(tx3.transcript_id, "TX-3");
        assert!(tx3.exons.is_empty());
        assert_eq!(tx3.baseline, None);
        assert_eq!(tx3.y, 103.0);
    }

    #[test]
    fn test_expression_axis_and_bubbles() {
        let layout = compute(&standard_gene(), &standard_datasets());
        let axis = layout.axis.as_ref().unwrap();
        assert_eq!(axis.x, 1296.0 - 400.0);
        let ticks: Vec<(&str, f64)> = axis
            .ticks
            .iter()
            .map(|tick| (tick.label.as_str(), tick.x))
            .collect();
        assert_eq!(ticks, [("Astro", 0.0), ("Micro", 190.0), ("Oligo", 380.0)]);

        let tx1 = &layout.tracks[1];
        assert_eq!(tx1.bubbles.len(), 3);
        // pct_exp 40 of a 80 maximum: 1 + 40/80 * 9, rounded
        assert_eq!(tx1.bubbles[0].radius, 6.0);
        assert_eq!(tx1.bubbles[0].x, 0.0);
        let tx2 = &layout.tracks[2];
        assert_eq!(tx2.bubbles[2].radius, 8.0);

        // the model transcript has no expression data
        assert!(layout.tracks[0].bubbles.is_empty());
    }

    #[test]
    fn test_no_expression_omits_axis_and_bubbles() {
        let mut gene = standard_gene();
        for tx in &mut gene.transcripts {
            tx.attributes.expression = None;
        }
        let layout = compute(&gene, &standard_datasets());
        assert!(layout.axis.is_none());
        assert!(layout.tracks.iter().all(|track| track.bubbles.is_empty()));
    }

    #[test]
    fn test_unchecking_a_dataset_hides_only_its_transcripts() {
        let gene = standard_gene();
        let mut datasets = standard_datasets();
        let before = compute(&gene, &datasets);

        datasets[1].is_checked = false;
        let after = compute(&gene, &datasets);

        let ids: Vec<&str> = after
            .tracks
            .iter()
            .map(|track| track.transcript_id.as_str())
            .collect();
        assert_eq!(ids, ["TX-MODEL", "TX-1"]);
        // the surviving transcripts' exon geometry is untouched
        assert_eq!(after.tracks[0].exons, before.tracks[0].exons);
        assert_eq!(after.tracks[1].exons, before.tracks[1].exons);
    }

    #[test]
    fn test_reordering_checked_datasets_reorders_tracks() {
        let gene = standard_gene();
        let mut datasets = standard_datasets();
        datasets.swap(0, 1);
        let layout = compute(&gene, &datasets);
        let ids: Vec<&str> = layout
            .tracks
            .iter()
            .map(|track| track.transcript_id.as_str())
            .collect();
        // the model always sorts first; ds2 transcripts keep payload order
        assert_eq!(ids, ["TX-MODEL", "TX-2", "TX-3", "TX-1"]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let gene = standard_gene();
        let datasets = standard_datasets();
        assert_eq!(compute(&gene, &datasets), compute(&gene, &datasets));
    }

    #[test]
    fn test_missing_model_transcript_fails() {
        let mut gene = standard_gene();
        gene.transcripts.retain(|tx| !tx.is_model);
        assert!(GeneLayout::compute(&gene, &standard_datasets(), &Dims::default()).is_err());
    }
}
