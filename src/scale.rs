//! Pixel scales for the isoform diagram
//!
//! Two families of scales are built fresh for every layout pass:
//!
//! - [`coordinate_scales`] compresses the gene's genomic extent into the
//!   exon-track pixel budget. Exon lengths and intron lengths get separate
//!   linear scales so that a handful of huge introns cannot squash all exons
//!   into invisibility. Both scales carry a minimum-width floor.
//! - [`ExpressionScales`] derives the bubble scales (percent expressed →
//!   radius, scaled average expression → color, cell type → x position) from
//!   the expression arrays of the currently visible transcripts.
//!
//! Scales have no identity of their own. They are plain values, rebuilt from
//! the current data on every pass and dropped afterwards.

use palette::{FromColor, Lab, Mix, Srgb};

use crate::models::{Exon, ExpressionPoint};

/// Default total pixel width for the bare coordinate scale builder
pub const DEFAULT_SCALE_WIDTH: f64 = 1000.0;
/// Minimum pixel width of any exon, however short
pub const MIN_EXON_WIDTH: f64 = 2.0;
/// Minimum pixel width of any intron, however short
pub const MIN_INTRON_WIDTH: f64 = 7.0;

/// Share of the pixel budget allocated to exon space
const EXON_SHARE: f64 = 0.65;
/// Share of the pixel budget allocated to intron space
const INTRON_SHARE: f64 = 0.35;

/// A linear scale with integer-rounded output
///
/// A zero-width domain maps every input to the start of the range instead of
/// dividing by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0.round();
        }
        let t = (value - self.domain.0) / span;
        (self.range.0 + t * (self.range.1 - self.range.0)).round()
    }
}

/// A linear scale that adds a fixed floor to every output
///
/// Used for the exon and intron coordinate scales: the floor guarantees that
/// even a zero-length input stays visible at its minimum pixel width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlooredScale {
    floor: f64,
    inner: LinearScale,
}

impl FlooredScale {
    pub fn new(floor: f64, domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            floor,
            inner: LinearScale::new(domain, range),
        }
    }

    pub fn scale(&self, value: f64) -> f64 {
        self.floor + self.inner.scale(value)
    }

    /// The minimum-width floor baked into every output
    pub fn floor(&self) -> f64 {
        self.floor
    }
}

/// One model exon with its derived genomic lengths
///
/// `intron_length` is the gap to the upstream neighbor exon within the model
/// exon set; the first exon's intron length is 0 by definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasuredExon {
    pub chrom_start: u32,
    pub chrom_end: u32,
    pub length: u32,
    pub intron_length: u32,
}

/// The pair of coordinate scales derived from the model exon set
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateScales {
    pub exon: FlooredScale,
    pub intron: FlooredScale,
}

/// Builds the exon and intron pixel scales from the model exon set
///
/// The exons are sorted by genomic start (stable for equal starts) and their
/// lengths and intron gaps accumulated. 65% of `width` is allocated to exon
/// space and 35% to intron space; the exon range reserves
/// `count * min_intron_width` pixels and the intron range reserves
/// `count * min_exon_width` pixels. The asymmetric reservation is intentional
/// and matches the original budget split.
///
/// The input exons are left untouched; the measured (sorted) exon set is
/// returned alongside the scales.
///
/// # Examples
///
/// ```rust
/// use isoviz::models::Gene;
/// use isoviz::scale::{coordinate_scales, MIN_EXON_WIDTH, MIN_INTRON_WIDTH};
///
/// let gene = Gene::from_json(
///     r#"{"transcripts": [{"id": "tx", "is_model": true, "exons": [
///         {"id": "e2", "chrom_start": 300, "chrom_end": 349},
///         {"id": "e1", "chrom_start": 100, "chrom_end": 199}
///     ]}]}"#,
/// )
/// .unwrap();
///
/// let exons = &gene.transcripts[0].exons;
/// let (scales, measured) =
///     coordinate_scales(exons, 1000.0, MIN_EXON_WIDTH, MIN_INTRON_WIDTH);
///
/// assert_eq!(measured[0].length, 100);
/// assert_eq!(measured[1].length, 50);
/// assert_eq!(measured[1].intron_length, 102);
/// assert!(scales.intron.scale(102.0) >= MIN_INTRON_WIDTH);
/// ```
pub fn coordinate_scales(
    exons: &[Exon],
    width: f64,
    min_exon_width: f64,
    min_intron_width: f64,
) -> (CoordinateScales, Vec<MeasuredExon>) {
    let mut sorted: Vec<&Exon> = exons.iter().collect();
    sorted.sort_by_key(|exon| exon.chrom_start);

    let mut measured = Vec::with_capacity(sorted.len());
    let mut exon_sum: u64 = 0;
    let mut intron_sum: u64 = 0;
    let mut prev_end: Option<u32> = None;
    for exon in sorted {
        let length = exon.length();
        let intron_length = match prev_end {
            None => 0,
            Some(end) => (i64::from(exon.chrom_start) - i64::from(end) + 1).max(0) as u32,
        };
        exon_sum += u64::from(length);
        intron_sum += u64::from(intron_length);
        prev_end = Some(exon.chrom_end);
        measured.push(MeasuredExon {
            chrom_start: exon.chrom_start,
            chrom_end: exon.chrom_end,
            length,
            intron_length,
        });
    }

    let count = measured.len() as f64;
    let scales = CoordinateScales {
        exon: FlooredScale::new(
            min_exon_width,
            (0.0, exon_sum as f64),
            (0.0, width * EXON_SHARE - count * min_intron_width),
        ),
        intron: FlooredScale::new(
            min_intron_width,
            (0.0, intron_sum as f64),
            (0.0, width * INTRON_SHARE - count * min_exon_width),
        ),
    };
    (scales, measured)
}

/// A categorical point scale mapping cell types to x positions
///
/// Follows d3's `scalePoint().padding(0).round(true)` semantics: the step is
/// floored to whole pixels and the leftover space is centered.
#[derive(Clone, Debug, PartialEq)]
pub struct PointScale {
    domain: Vec<String>,
    positions: Vec<f64>,
}

impl PointScale {
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        let n = domain.len();
        let span = range.1 - range.0;
        let step = (span / 1.0_f64.max(n as f64 - 1.0)).floor();
        let start = (range.0 + (span - step * (n.saturating_sub(1)) as f64) * 0.5).round();
        let positions = (0..n).map(|i| start + step * i as f64).collect();
        Self { domain, positions }
    }

    /// The ordered categories of the scale
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// The x position of a category, or `None` for categories outside the
    /// domain. Callers drop points without a position instead of erroring.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|d| d == key)
            .map(|i| self.positions[i])
    }

    /// Category/position pairs, e.g. for drawing an axis
    pub fn ticks(&self) -> impl Iterator<Item = (&str, f64)> {
        self.domain
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
    }
}

/// A sequential color scale interpolating in Lab space
///
/// Inputs outside the domain clamp to the endpoint colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    domain: (f64, f64),
    low: Lab,
    high: Lab,
}

impl ColorScale {
    pub fn new(domain: (f64, f64), low: Srgb<u8>, high: Srgb<u8>) -> Self {
        Self {
            domain,
            low: Lab::from_color(low.into_format::<f32>()),
            high: Lab::from_color(high.into_format::<f32>()),
        }
    }

    /// The scale used for scaled average expression: lightgrey at -0.5 and
    /// below, blue at 2.5 and above
    pub fn expression_default() -> Self {
        Self::new(
            (-0.5, 2.5),
            Srgb::new(211, 211, 211),
            Srgb::new(0, 0, 255),
        )
    }

    /// The color for `value` as a `#rrggbb` hex string
    pub fn color(&self, value: f64) -> String {
        let span = self.domain.1 - self.domain.0;
        let t = if span == 0.0 {
            0.0
        } else {
            ((value - self.domain.0) / span).clamp(0.0, 1.0)
        };
        let mixed = self.low.mix(self.high, t as f32);
        let rgb: Srgb<u8> = Srgb::<f32>::from_color(mixed).into_format();
        format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    }
}

/// The three bubble scales derived from the visible expression data
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionScales {
    pub radius: LinearScale,
    pub color: ColorScale,
    pub position: PointScale,
}

impl ExpressionScales {
    /// Builds the bubble scales from the expression arrays of all visible
    /// transcripts, in payload order
    ///
    /// The first array defines the canonical cell type ordering for the
    /// expression axis. Returns `None` when no visible transcript carries
    /// expression data; the expression track is then omitted entirely.
    pub fn build(
        expression: &[&[ExpressionPoint]],
        track_width: f64,
        bubble_diameter: f64,
    ) -> Option<Self> {
        let first = expression.first()?;
        let max_pct = expression
            .iter()
            .flat_map(|points| points.iter())
            .map(|point| point.pct_exp)
            .fold(0.0, f64::max);
        Some(Self {
            radius: LinearScale::new((0.0, max_pct), (1.0, bubble_diameter / 2.0)),
            color: ColorScale::expression_default(),
            position: PointScale::new(
                first.iter().map(|point| point.cell_type.clone()).collect(),
                (0.0, track_width - bubble_diameter),
            ),
        })
    }
}
