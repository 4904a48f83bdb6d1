//! The whole run: scan the sequence file, estimate the densities, render the PDF.
use log::{debug, info};
use plotters::prelude::IntoDrawingArea;

use crate::config::RunConfig;
use crate::errors::RunError;
use crate::pdf::PdfBackend;
use crate::plot::{draw_joint_plot, plot_error, JointEstimate};
use crate::samples::StitchSamples;

/// Runs the pipeline described by `config`.
/// Nothing is written to `config.output` unless every step before saving succeeded.
pub fn run(config: &RunConfig) -> Result<StitchSamples, RunError> {
    debug!(
        "Log file {} accepted but not read",
        config.log.display()
    );
    let samples = StitchSamples::from_path(&config.sequences)?;
    info!(
        "Scanned {} records from {} lines",
        samples.len(),
        samples.lines_read()
    );
    let estimate = JointEstimate::new(&samples, &config.plot).ok_or(RunError::NoRecords)?;
    if let (Some(lo), Some(hi)) = (
        samples.overlaps().iter().min(),
        samples.overlaps().iter().max(),
    ) {
        info!("Overlaps range from {} to {}", lo, hi);
    }
    if let (Some(lo), Some(hi)) = (
        samples.mismatches().iter().min(),
        samples.mismatches().iter().max(),
    ) {
        info!("Mismatches range from {} to {}", lo, hi);
    }

    let root = PdfBackend::new(&config.output, config.plot.size)?.into_drawing_area();
    println!("Plotting joint distribution");
    draw_joint_plot(&root, &estimate, &config.plot)?;
    root.present().map_err(plot_error)?;
    Ok(samples)
}
