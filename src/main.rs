//! FastVcf CLI entry point
//!
//! Parses a VCF file block by block and reports genotype statistics.

use clap::Parser;
use fast_vcf::{VcfParser, DEFAULT_BLOCK_SIZE};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fast-vcf")]
#[command(about = "High-performance block-parallel VCF parser")]
#[command(version)]
struct Cli {
    /// Input VCF file (plain, .gz or .bz2)
    input: PathBuf,
    /// Number of worker threads for genotype decoding
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
    /// Number of records per block
    #[arg(short = 'b', long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    eprintln!("Parsing VCF file: {:?}", cli.input);
    let mut parser = VcfParser::open(&cli.input, cli.threads, cli.block_size)
        .map_err(|e| anyhow::anyhow!("Failed to open VCF file: {}", e))?;
    eprintln!("Samples declared: {}", parser.sample_count());

    let mut total_variants = 0usize;
    let mut total_genotypes = 0usize;
    let mut missing_calls = 0usize;
    let mut phased_calls = 0usize;

    loop {
        let status = parser.parse_block()?;
        for variant in parser.variants() {
            total_variants += 1;
            for gt in variant.genotypes() {
                total_genotypes += 1;
                if gt.is_missing() {
                    missing_calls += 1;
                } else if gt.phased {
                    phased_calls += 1;
                }
            }
        }
        if !status.is_full() {
            break;
        }
    }

    eprintln!("\n=== Parse Statistics ===");
    eprintln!("Total variants:  {}", total_variants);
    eprintln!("Total genotypes: {}", total_genotypes);
    eprintln!("Missing calls:   {}", missing_calls);
    eprintln!("Phased calls:    {}", phased_calls);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
