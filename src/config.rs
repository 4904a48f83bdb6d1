//! Run and plot settings
use std::path::PathBuf;

use plotters::style::RGBColor;

/// How the joint plot looks
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Figure size in points (1/72 inch)
    pub size: (u32, u32),
    /// Size of the joint panel relative to the marginal panels
    pub ratio: u32,
    /// Gap between the joint panel and the marginals, in points
    pub space: u32,
    /// Grid points per axis for the joint density
    pub gridsize: usize,
    /// Grid points for each marginal curve
    pub marginal_gridsize: usize,
    /// Number of contour levels
    pub levels: usize,
    /// Share of the probability mass left outside the lowest contour
    pub thresh: f64,
    /// How many bandwidths the axes extend past the data
    pub cut: f64,
    pub color: RGBColor,
    pub label_font_size: u32,
    pub tick_font_size: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            size: (432, 432),
            ratio: 5,
            space: 14,
            gridsize: 100,
            marginal_gridsize: 200,
            levels: 10,
            thresh: 0.05,
            cut: 3.0,
            color: RGBColor(31, 119, 180),
            label_font_size: 12,
            tick_font_size: 10,
        }
    }
}

/// Everything a run needs
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Stitched reads, optionally gzip/bzip2/xz compressed
    pub sequences: PathBuf,
    /// Stitcher log. Accepted for compatibility with the stitching workflow, never read.
    pub log: PathBuf,
    /// Destination PDF, overwritten if present
    pub output: PathBuf,
    pub plot: PlotConfig,
}

impl RunConfig {
    pub fn new<P: Into<PathBuf>>(sequences: P, log: P, output: P) -> Self {
        RunConfig {
            sequences: sequences.into(),
            log: log.into(),
            output: output.into(),
            plot: PlotConfig::default(),
        }
    }
}
