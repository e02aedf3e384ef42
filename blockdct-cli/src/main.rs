#![forbid(unsafe_code)]

mod matrix;

use std::io;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use blockdct::{
    BLOCK_LEN, BLOCK_SIZE, BatchConfig, BatchTransformer, CosineBasis, forward_transform,
    forward_transform_fixed, inverse_transform, inverse_transform_fixed,
};

use matrix::{format_integer_matrix, format_matrix, parse_integer_samples, parse_samples};

const ROUNDTRIP_TOLERANCE: f64 = 1e-9;
const ORTHONORMAL_TOLERANCE: f64 = 1e-12;

#[derive(Parser, Debug)]
#[command(name = "blockdct")]
#[command(author, version, about = "Orthonormal 8x8 DCT-II / DCT-III block transforms", long_about = None)]
struct Args {
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Round-trip a block holding 3.0 at [0][0] and 69.0 at [1][0]
    Demo {
        #[arg(long, default_value_t = 3)]
        precision: usize,
    },
    /// Read 64 spatial samples from stdin and print their coefficients
    Forward(TransformArgs),
    /// Read 64 coefficients from stdin and print the reconstructed samples
    Inverse(TransformArgs),
    /// Verify basis orthonormality and round-trip error over a batch of blocks
    Check {
        #[arg(long, default_value_t = 4096)]
        blocks: usize,

        /// Worker threads, 0 for one per core
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
}

#[derive(clap::Args, Debug)]
struct TransformArgs {
    /// Use the 12-bit fixed-point integer path
    #[arg(long, default_value_t = false)]
    fixed: bool,

    #[arg(long, default_value_t = 3)]
    precision: usize,
}

fn read_stdin() -> Result<String> {
    io::read_to_string(io::stdin()).context("failed to read samples from stdin")
}

fn run_demo(precision: usize) -> Result<()> {
    let mut block = [0.0; BLOCK_LEN];
    block[0] = 3.0;
    block[BLOCK_SIZE] = 69.0;

    let coeffs = forward_transform(&block)?;
    let recovered = inverse_transform(&coeffs)?;
    let max_err = block
        .iter()
        .zip(&recovered)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);

    println!("input:\n{}", format_matrix(&block, precision));
    println!("coefficients:\n{}", format_matrix(&coeffs, precision));
    println!("reconstructed:\n{}", format_matrix(&recovered, precision));
    println!("max round-trip error: {max_err:e}");
    Ok(())
}

fn run_transform(args: &TransformArgs, forward: bool) -> Result<()> {
    let text = read_stdin()?;

    if args.fixed {
        let input = parse_integer_samples(&text)?;
        let output = if forward {
            forward_transform_fixed(&input)?
        } else {
            inverse_transform_fixed(&input)?
        };
        print!("{}", format_integer_matrix(&output));
        return Ok(());
    }

    let input = parse_samples(&text)?;
    let output = if forward {
        forward_transform(&input)?
    } else {
        inverse_transform(&input)?
    };
    print!("{}", format_matrix(&output, args.precision));
    Ok(())
}

fn run_check(blocks: usize, threads: usize) -> Result<()> {
    let gram = CosineBasis::<BLOCK_SIZE>::new().gram();
    let mut ortho_err: f64 = 0.0;
    for (a, row) in gram.iter().enumerate() {
        for (b, &dot) in row.iter().enumerate() {
            let expected = if a == b { 1.0 } else { 0.0 };
            ortho_err = ortho_err.max((dot - expected).abs());
        }
    }

    let batch = BatchTransformer::new(BatchConfig {
        threads,
        ..Default::default()
    })?;
    tracing::info!(blocks, threads = batch.threads(), "running round-trip check");

    let original: Vec<[f64; BLOCK_LEN]> = (0..blocks)
        .map(|b| {
            let mut block = [0.0; BLOCK_LEN];
            for (i, v) in block.iter_mut().enumerate() {
                *v = ((b * 131 + i * 37) % 256) as f64 - 128.0;
            }
            block
        })
        .collect();
    let mut work = original.clone();
    batch.forward_blocks(&mut work)?;
    batch.inverse_blocks(&mut work)?;

    let roundtrip_err = work
        .iter()
        .flatten()
        .zip(original.iter().flatten())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);

    println!("basis orthonormality error: {ortho_err:e}");
    println!("round-trip error over {blocks} blocks: {roundtrip_err:e}");

    if ortho_err > ORTHONORMAL_TOLERANCE {
        bail!("basis is not orthonormal (error {ortho_err:e})");
    }
    if roundtrip_err > ROUNDTRIP_TOLERANCE {
        bail!("round-trip error {roundtrip_err:e} exceeds {ROUNDTRIP_TOLERANCE:e}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match &args.command {
        Command::Demo { precision } => run_demo(*precision),
        Command::Forward(t) => run_transform(t, true),
        Command::Inverse(t) => run_transform(t, false),
        Command::Check { blocks, threads } => run_check(*blocks, *threads),
    }
}
