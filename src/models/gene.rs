use serde::Deserialize;

use crate::models::de;
use crate::utils::errors::VizError;

/// A gene with all of its transcripts, as delivered by the gene detail payload
///
/// Exactly one transcript per gene is expected to carry the `is_model` flag.
/// That transcript is the reference gene model whose exons define the master
/// coordinate frame for the whole diagram.
///
/// # Examples
///
/// ```rust
/// use isoviz::models::Gene;
///
/// let gene = Gene::from_json(
///     r#"{"transcripts": [
///         {"id": "tx1", "is_model": true, "exons": [
///             {"id": "e1", "chrom_start": 100, "chrom_end": "199"}
///         ]}
///     ]}"#,
/// )
/// .unwrap();
///
/// assert_eq!(gene.transcripts.len(), 1);
/// assert_eq!(gene.model_transcript().unwrap().exons[0].length(), 100);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Gene {
    #[serde(default, deserialize_with = "de::opt_ident")]
    pub id: Option<String>,
    #[serde(default)]
    pub transcripts: Vec<Transcript>,
}

impl Gene {
    /// Deserializes a gene detail payload
    pub fn from_json(payload: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Returns the reference gene model transcript
    ///
    /// All coordinate scales are derived from this transcript, so a payload
    /// without one is a precondition violation and fails right away.
    pub fn model_transcript(&self) -> Result<&Transcript, VizError> {
        self.transcripts
            .iter()
            .find(|tx| tx.is_model)
            .ok_or_else(|| VizError::new("no transcript in the gene payload is flagged is_model"))
    }
}

/// A single transcript (isoform) of a gene
#[derive(Clone, Debug, Deserialize)]
pub struct Transcript {
    #[serde(deserialize_with = "de::ident")]
    pub id: String,
    /// Display id from the annotation, e.g. `ENST00000620552.4`.
    /// Falls back to `id` when absent, see [`Transcript::label`].
    #[serde(default, deserialize_with = "de::opt_ident")]
    pub annot_transcript_id: Option<String>,
    #[serde(default)]
    pub is_model: bool,
    /// Absent for the model transcript
    #[serde(default, deserialize_with = "de::opt_ident")]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub exons: Vec<Exon>,
    #[serde(default)]
    pub attributes: TranscriptAttributes,
}

impl Transcript {
    /// The id shown in the label column of the diagram
    pub fn label(&self) -> &str {
        self.annot_transcript_id.as_deref().unwrap_or(&self.id)
    }

    /// Whether the transcript is annotated as novel
    pub fn is_novel(&self) -> bool {
        self.attributes.transcript_status.as_deref() == Some("NOVEL")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TranscriptAttributes {
    #[serde(default)]
    pub transcript_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub transcript_status: Option<String>,
    /// Per-cell-type expression values. Absent for transcripts without
    /// expression data; their bubble track is simply not drawn.
    #[serde(default)]
    pub expression: Option<Vec<ExpressionPoint>>,
}

/// One exon with 1-based inclusive genomic coordinates
#[derive(Clone, Debug, Deserialize)]
pub struct Exon {
    #[serde(deserialize_with = "de::ident")]
    pub id: String,
    #[serde(deserialize_with = "de::coordinate")]
    pub chrom_start: u32,
    #[serde(deserialize_with = "de::coordinate")]
    pub chrom_end: u32,
    #[serde(default, deserialize_with = "de::opt_coordinate")]
    pub exon_number: Option<u32>,
    #[serde(default)]
    pub attributes: ExonAttributes,
}

impl Exon {
    /// Genomic length of the exon
    ///
    /// Coordinates are 1-based inclusive, so `length = end - start + 1`.
    pub fn length(&self) -> u32 {
        self.chrom_end.saturating_sub(self.chrom_start) + 1
    }

    /// Whether the exon is annotated as novel
    pub fn is_novel(&self) -> bool {
        self.attributes.exon_status.as_deref() == Some("NOVEL")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExonAttributes {
    #[serde(default)]
    pub exon_status: Option<String>,
}

/// Expression of one transcript in one cell type
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExpressionPoint {
    pub cell_type: String,
    /// Percentage of cells of this type expressing the transcript, `>= 0`
    pub pct_exp: f64,
    /// Scaled average expression, typically within `[-0.5, 2.5]`
    pub avg_exp_scaled: f64,
}
