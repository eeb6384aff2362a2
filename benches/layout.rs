use criterion::{black_box, criterion_group, criterion_main, Criterion};

use isoviz::layout::{Dims, GeneLayout};
use isoviz::scale::{coordinate_scales, MIN_EXON_WIDTH, MIN_INTRON_WIDTH};
use isoviz::tests::genes::{standard_datasets, standard_gene};

fn coordinate_scales_bench(c: &mut Criterion) {
    c.bench_function("coordinate_scales", |b| {
        let gene = standard_gene();
        let exons = &gene.transcripts[0].exons;
        b.iter(|| coordinate_scales(black_box(exons), 756.0, MIN_EXON_WIDTH, MIN_INTRON_WIDTH))
    });
}

fn gene_layout_bench(c: &mut Criterion) {
    c.bench_function("gene_layout", |b| {
        let gene = standard_gene();
        let datasets = standard_datasets();
        b.iter(|| GeneLayout::compute(black_box(&gene), &datasets, &Dims::default()).unwrap())
    });
}

criterion_group!(layout, coordinate_scales_bench, gene_layout_bench);
criterion_main!(layout);
