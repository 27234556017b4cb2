//! Performance benchmarks for FastVcf
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fast_vcf::{decode_genotypes, Variant, VcfParser};
use std::io::Write;
use tempfile::NamedTempFile;

/// Synthesize a VCF file with the given shape
fn synth_vcf(n_records: usize, n_samples: usize) -> String {
    let mut content = String::from("##fileformat=VCFv4.2\n");
    content.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
    for j in 0..n_samples {
        content.push_str(&format!("\tS{}", j));
    }
    content.push('\n');
    for i in 0..n_records {
        content.push_str(&format!("chr1\t{}\trs{}\tA\tG\t30\tPASS\tDP={}\tGT:DP", i + 1, i, i));
        for j in 0..n_samples {
            let token = match (i + j) % 4 {
                0 => "0/1",
                1 => "1|1",
                2 => "./.",
                _ => "0|0",
            };
            content.push_str(&format!("\t{}:{}", token, j));
        }
        content.push('\n');
    }
    content
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut temp = tempfile::Builder::new().suffix(".vcf").tempfile().unwrap();
    temp.write_all(content.as_bytes()).unwrap();
    temp.flush().unwrap();
    temp
}

/// Benchmark whole-file block parsing with varying worker counts
fn bench_block_parse(c: &mut Criterion) {
    let n_records = 5000;
    let n_samples = 100;
    let temp = write_temp(&synth_vcf(n_records, n_samples));

    let mut group = c.benchmark_group("block_parse");
    group.throughput(Throughput::Elements(n_records as u64));

    for threads in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let mut parser = VcfParser::open(temp.path(), threads, 1000).unwrap();
                let mut total = 0usize;
                loop {
                    let status = parser.parse_block().unwrap();
                    total += parser.variants().len();
                    if !status.is_full() {
                        break;
                    }
                }
                black_box(total)
            })
        });
    }

    group.finish();
}

/// Benchmark the genotype decoding kernel in isolation
fn bench_genotype_decode(c: &mut Criterion) {
    let n_samples = 1000;
    let mut suffix = String::from("GT:DP");
    for j in 0..n_samples {
        let token = match j % 3 {
            0 => "0/1",
            1 => "1|1",
            _ => "./.",
        };
        suffix.push_str(&format!("\t{}:{}", token, j));
    }
    let suffix = suffix.into_bytes();

    c.bench_function("genotype_decode_1000_samples", |b| {
        let mut variant = Variant::new(n_samples);
        b.iter(|| {
            decode_genotypes(black_box(&suffix), &mut variant).unwrap();
            black_box(variant.genotypes().len())
        })
    });
}

criterion_group!(benches, bench_block_parse, bench_genotype_decode);
criterion_main!(benches);
