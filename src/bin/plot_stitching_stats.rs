use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use stitchplot::{run, RunConfig};

/// Plot the joint distribution of overlapping and mismatched bases of stitched reads
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Stitched reads (FASTQ, optionally gzip/bzip2/xz compressed)
    sequences: PathBuf,
    /// Log file of the stitching run (accepted, not read)
    log: PathBuf,
    /// Where to write the PDF
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = RunConfig::new(args.sequences, args.log, args.output);

    let samples = run(&config)
        .with_context(|| format!("Could not plot {}", config.sequences.display()))?;
    info!("Plotted {} reads", samples.len());
    Ok(())
}
