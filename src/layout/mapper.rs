use log::warn;

use crate::layout::ExonRect;
use crate::models::Exon;
use crate::scale::{CoordinateScales, FlooredScale, MeasuredExon};

/// A model exon positioned in pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameExon {
    pub chrom_start: u32,
    pub chrom_end: u32,
    pub x: f64,
    pub w: f64,
}

/// The model transcript's exons in pixel space
///
/// The frame is the master coordinate system of the diagram: every curated
/// exon is positioned relative to the model exon that contains it. It is
/// computed once per layout pass and passed around explicitly; nothing is
/// cached on the input records.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFrame {
    exons: Vec<FrameExon>,
}

impl ModelFrame {
    /// Assigns pixel positions to the measured model exons
    ///
    /// The first exon starts at `x = 0`; every later exon follows its
    /// upstream neighbor at a distance given by the scaled intron length.
    pub fn new(measured: &[MeasuredExon], scales: &CoordinateScales) -> Self {
        let mut exons = Vec::with_capacity(measured.len());
        let mut x = 0.0;
        for (i, exon) in measured.iter().enumerate() {
            if i > 0 {
                x += scales.intron.scale(f64::from(exon.intron_length));
            }
            let w = scales.exon.scale(f64::from(exon.length));
            exons.push(FrameExon {
                chrom_start: exon.chrom_start,
                chrom_end: exon.chrom_end,
                x,
                w,
            });
            x += w;
        }
        Self { exons }
    }

    pub fn exons(&self) -> &[FrameExon] {
        &self.exons
    }

    /// Finds the unique model exon whose `[start - 1, end + 1]` range
    /// contains `pos`
    ///
    /// Zero or multiple hits both count as "not found"; with overlapping
    /// model exons the position would be ambiguous.
    fn find(&self, pos: u32) -> Option<&FrameExon> {
        let pos = i64::from(pos);
        let mut hits = self.exons.iter().filter(|exon| {
            i64::from(exon.chrom_start) - 1 <= pos && i64::from(exon.chrom_end) + 1 >= pos
        });
        match (hits.next(), hits.next()) {
            (Some(exon), None) => Some(exon),
            (None, _) => {
                warn!("no model exon found for position {pos}");
                None
            }
            (Some(_), Some(_)) => {
                warn!("more than one model exon found for position {pos}");
                None
            }
        }
    }

    /// Positions a curated exon on the frame
    ///
    /// The enclosing model exon is located by the curated start position,
    /// falling back to the end position. An exon without a unique enclosing
    /// model exon cannot be positioned: it is logged and dropped from the
    /// track, which must tolerate transcripts with fewer positioned exons
    /// than raw exons.
    ///
    /// When the curated exon starts inside its model exon, the offset is
    /// scaled with `exon_scale` and the scale's floor is subtracted again:
    /// an offset within an exon must not pay the minimum-width floor that is
    /// baked into every scale output.
    pub fn map_exon(
        &self,
        transcript_id: &str,
        exon: &Exon,
        exon_scale: &FlooredScale,
    ) -> Option<ExonRect> {
        let model = match self.find(exon.chrom_start).or_else(|| self.find(exon.chrom_end)) {
            Some(model) => model,
            None => {
                warn!(
                    "{}-{} does not map onto the gene model",
                    transcript_id, exon.id
                );
                return None;
            }
        };

        let x = if model.chrom_start == exon.chrom_start {
            model.x
        } else {
            let distance =
                (i64::from(exon.chrom_start) - i64::from(model.chrom_start) + 1) as f64;
            model.x + exon_scale.scale(distance) - exon_scale.floor()
        };

        Some(ExonRect {
            x,
            w: exon_scale.scale(f64::from(exon.length())),
            chrom_start: exon.chrom_start,
            chrom_end: exon.chrom_end,
            exon_number: exon.exon_number,
            novel: exon.is_novel(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::Gene;
    use crate::scale::{coordinate_scales, MIN_EXON_WIDTH, MIN_INTRON_WIDTH};

    fn model_frame(coords: &[(u32, u32)], width: f64) -> (ModelFrame, CoordinateScales) {
        let payload = format!(
            r#"{{"transcripts": [{{"id": "tx", "is_model": true, "exons": [{}]}}]}}"#,
            coords
                .iter()
                .enumerate()
                .map(|(i, (start, end))| format!(
                    r#"{{"id": "m{i}", "chrom_start": {start}, "chrom_end": {end}}}"#
                ))
                .collect::<Vec<_>>()
                .join(",")
        );
        let gene = Gene::from_json(&payload).unwrap();
        let (scales, measured) = coordinate_scales(
            &gene.transcripts[0].exons,
            width,
            MIN_EXON_WIDTH,
            MIN_INTRON_WIDTH,
        );
        (ModelFrame::new(&measured, &scales), scales)
    }

    fn curated(id: &str, start: u32, end: u32) -> Exon {
        let payload = format!(
            r#"{{"transcripts": [{{"id": "tx", "exons": [
                {{"id": "{id}", "chrom_start": {start}, "chrom_end": {end}}}
            ]}}]}}"#
        );
        Gene::from_json(&payload).unwrap().transcripts[0].exons[0].clone()
    }

    #[test]
    fn test_frame_positions() {
        let (frame, _) = model_frame(&[(101, 200), (301, 400), (501, 550)], 756.0);
        let exons = frame.exons();
        assert_eq!(exons[0].x, 0.0);
        assert_eq!(exons[0].w, 190.0);
        assert_eq!(exons[1].x, 326.0);
        assert_eq!(exons[1].w, 190.0);
        assert_eq!(exons[2].x, 652.0);
        assert_eq!(exons[2].w, 96.0);
    }

    #[test]
    fn test_exon_starting_at_model_start_reuses_x() {
        let (frame, scales) = model_frame(&[(101, 200), (301, 400), (501, 550)], 756.0);
        let rect = frame
            .map_exon("tx", &curated("c", 301, 380), &scales.exon)
            .unwrap();
        assert_eq!(rect.x, 326.0);
        assert_eq!(rect.w, 153.0);
    }

    #[test]
    fn test_exon_offset_within_model_exon() {
        let (frame, scales) = model_frame(&[(101, 200), (301, 400), (501, 550)], 756.0);
        let rect = frame
            .map_exon("tx", &curated("c", 121, 200), &scales.exon)
            .unwrap();
        // distance 21 scaled minus the floor already baked into the scale
        assert_eq!(rect.x, 40.0);
        assert_eq!(rect.w, 153.0);
    }

    #[test]
    fn test_lookup_falls_back_to_end_position() {
        let (frame, scales) = model_frame(&[(101, 200), (301, 400)], 756.0);
        // starts in the intron, ends inside the second model exon
        let rect = frame
            .map_exon("tx", &curated("c", 250, 320), &scales.exon)
            .unwrap();
        assert!(rect.x < frame.exons()[1].x);
    }

    #[test]
    fn test_unmappable_exon_is_dropped() {
        let (frame, scales) = model_frame(&[(101, 200), (301, 400)], 756.0);
        assert!(frame
            .map_exon("tx", &curated("c", 900, 950), &scales.exon)
            .is_none());
    }

    #[test]
    fn test_ambiguous_position_is_dropped() {
        // overlapping model exons make containment ambiguous
        let (frame, scales) = model_frame(&[(100, 199), (150, 249)], 756.0);
        assert!(frame
            .map_exon("tx", &curated("c", 160, 180), &scales.exon)
            .is_none());
    }

    #[test]
    fn test_containment_includes_one_position_of_slack() {
        let (frame, scales) = model_frame(&[(101, 200), (301, 400)], 756.0);
        // start is one position upstream of the model exon start
        let rect = frame
            .map_exon("tx", &curated("c", 100, 150), &scales.exon)
            .unwrap();
        // distance 0 scales to the bare floor, which cancels out
        assert_eq!(rect.x, frame.exons()[0].x);
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let (frame, scales) = model_frame(&[(101, 200), (301, 400), (501, 550)], 756.0);
        let exon = curated("c", 121, 200);
        let first = frame.map_exon("tx", &exon, &scales.exon);
        let second = frame.map_exon("tx", &exon, &scales.exon);
        assert_eq!(first, second);
    }
}
