//! SVG rendering of a computed [`GeneLayout`]
//!
//! This is the only module that touches a drawing surface. It walks the
//! geometry tree and emits SVG elements; every coordinate comes straight
//! from the layout pass. Tooltips are native SVG `<title>` elements on the
//! exon rectangles and expression bubbles.

mod writer;

pub use writer::Writer;

use svg::node::element::{Circle, Group, Line, Rectangle, Style, Text, Title};
use svg::Document;

use crate::layout::{Dims, ExonRect, GeneLayout, TranscriptTrack};

const STYLE: &str = "
    text {
        font-family: sans-serif;
        font-size: 10px;
    }

    .ExonRect {
        fill: rgb(238, 238, 238);
        stroke: black;
        stroke-width: 1px;
    }

    .TranscriptID.reference {
        fill: seagreen;
    }

    .TranscriptID.novel {
        fill: steelblue;
    }

    .ExonRect.novel {
        fill: steelblue;
    }

    .ExonRect.reference {
        fill: seagreen;
    }
";

/// Builds the SVG document for a computed layout
///
/// # Examples
///
/// ```rust
/// use isoviz::render;
/// use isoviz::tests::genes::{standard_datasets, standard_gene};
///
/// let layout = isoviz::layout_gene(&standard_gene(), &standard_datasets()).unwrap();
/// let document = render::document(&layout);
/// assert!(document.to_string().contains("ExonRect"));
/// ```
pub fn document(layout: &GeneLayout) -> Document {
    let mut doc = Document::new()
        .set("viewBox", (0.0, 0.0, layout.width, layout.height))
        .set("width", layout.width)
        .set("height", layout.height)
        .add(Style::new(STYLE));

    if let Some(axis) = &layout.axis {
        let mut group = Group::new()
            .set("class", "BubblesAxis")
            .set("transform", format!("translate({},{})", axis.x, axis.y));
        for tick in &axis.ticks {
            group = group.add(
                Text::new(tick.label.as_str())
                    .set(
                        "transform",
                        format!("translate({},0) rotate(90)", tick.x + 0.5),
                    )
                    .set("x", 9)
                    .set("y", 0)
                    .set("dy", ".35em")
                    .set("text-anchor", "end"),
            );
        }
        doc = doc.add(group);
    }

    for track in &layout.tracks {
        doc = doc.add(track_group(track, &layout.dims));
    }

    doc
}

fn track_group(track: &TranscriptTrack, dims: &Dims) -> Group {
    // the 0.5px offsets keep 1px strokes on whole pixels
    let mut group = Group::new()
        .set("class", "Transcript")
        .set("transform", format!("translate(0 {})", track.y + 0.5));

    let mut label = Text::new(track.label.as_str())
        .set(
            "class",
            format!(
                "TranscriptID {} {}",
                if track.novel { "novel" } else { "known" },
                if track.reference {
                    "reference"
                } else {
                    "non-reference"
                }
            ),
        )
        .set("text-anchor", "end")
        .set("dominant-baseline", "middle")
        .set("x", dims.label_width)
        .set("y", dims.band_width / 2.0);
    if let Some(name) = &track.dataset_name {
        label = label.add(Title::new(format!("Dataset: {name}")));
    }
    group = group.add(label);

    let mut rects = Group::new().set("class", "ExonRects").set(
        "transform",
        format!("translate({} 0)", dims.rects_x() + 0.5),
    );
    if let Some((x1, x2)) = track.baseline {
        rects = rects.add(
            Line::new()
                .set("x1", x1)
                .set("x2", x2)
                .set("y1", dims.band_width / 2.0)
                .set("y2", dims.band_width / 2.0)
                .set("stroke", "black")
                .set("stroke-width", 1),
        );
    }
    for exon in &track.exons {
        rects = rects.add(exon_rect(exon, track.reference, dims));
    }
    group = group.add(rects);

    if !track.bubbles.is_empty() {
        let mut bubbles = Group::new()
            .set("class", "ExpressionBubbles")
            .set("transform", format!("translate({}, 0)", dims.bubbles_x()));
        for bubble in &track.bubbles {
            bubbles = bubbles.add(
                Circle::new()
                    .set("class", "ExpressionBubble")
                    .set("cx", bubble.x + 0.5)
                    .set("cy", dims.band_width / 2.0)
                    .set("r", bubble.radius)
                    .set("fill", bubble.color.as_str())
                    .add(Title::new(format!(
                        "{}: {}% expressed, avg {}",
                        bubble.cell_type, bubble.pct_exp, bubble.avg_exp_scaled
                    ))),
            );
        }
        group = group.add(bubbles);
    }

    group
}

fn exon_rect(exon: &ExonRect, reference: bool, dims: &Dims) -> Rectangle {
    let mut class = String::from("ExonRect");
    if exon.novel {
        class.push_str(" novel");
    }
    if reference {
        class.push_str(" reference");
    }
    let tooltip = match exon.exon_number {
        Some(number) => format!(
            "Exon {number}: {} - {} ({} bp)",
            exon.chrom_start,
            exon.chrom_end,
            exon.length()
        ),
        None => format!(
            "Exon: {} - {} ({} bp)",
            exon.chrom_start,
            exon.chrom_end,
            exon.length()
        ),
    };
    Rectangle::new()
        .set("class", class)
        .set("x", exon.x)
        .set("y", 0)
        .set("width", exon.w)
        .set("height", dims.band_width)
        .add(Title::new(tooltip))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::{Dims, GeneLayout};
    use crate::tests::genes::{standard_datasets, standard_gene};

    fn rendered() -> String {
        let layout =
            GeneLayout::compute(&standard_gene(), &standard_datasets(), &Dims::default())
                .unwrap();
        document(&layout).to_string()
    }

    #[test]
    fn test_document_structure() {
        let output = rendered();
        assert!(output.contains("<svg"));
        assert!(output.contains(r#"viewBox="0 0 1296 159""#));
        assert!(output.contains("BubblesAxis"));
        assert!(output.contains("ExpressionBubble"));
        assert!(output.contains("ExonRect"));
        assert!(output.contains("GENE1-201"));
    }

    #[test]
    fn test_novel_exon_class() {
        let output = rendered();
        assert!(output.contains("ExonRect novel"));
    }

    #[test]
    fn test_exon_tooltip() {
        let output = rendered();
        assert!(output.contains("Exon 1: 101 - 200 (100 bp)"));
    }

    #[test]
    fn test_no_expression_omits_axis() {
        let mut gene = standard_gene();
        for tx in &mut gene.transcripts {
            tx.attributes.expression = None;
        }
        let layout = GeneLayout::compute(&gene, &standard_datasets(), &Dims::default()).unwrap();
        let output = document(&layout).to_string();
        assert!(!output.contains("BubblesAxis"));
        assert!(!output.contains("ExpressionBubble"));
    }
}
