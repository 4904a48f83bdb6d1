//! The joint plot: contour lines of the 2-D density with the two marginal densities
//! along the top and right edges.
//!
//! Drawing is generic over the plotters backend so the layout can be rendered to SVG
//! in tests and to PDF by the binary.
use std::fmt::Display;
use std::iter;

use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::PlotConfig;
use crate::contour::iso_segments;
use crate::errors::PlotError;
use crate::kde::{DensityGrid, Kde1d, Kde2d};
use crate::samples::StitchSamples;

const MARGIN: i32 = 8;
const X_LABEL_AREA: i32 = 40;
const Y_LABEL_AREA: i32 = 50;

pub(crate) fn plot_error<E: Display>(e: E) -> PlotError {
    PlotError::new(e.to_string())
}

fn union(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0.min(b.0), a.1.max(b.1))
}

/// Everything the plot needs, computed from the samples
#[derive(Debug, Clone)]
pub struct JointEstimate {
    /// Name of the x (overlap) column
    pub x_label: &'static str,
    /// Name of the y (mismatch) column
    pub y_label: &'static str,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub grid: DensityGrid,
    /// Ascending contour levels
    pub levels: Vec<f64>,
    /// `(overlap, density)` along `x_range`
    pub x_marginal: Vec<(f64, f64)>,
    /// `(mismatch, density)` along `y_range`
    pub y_marginal: Vec<(f64, f64)>,
}

impl JointEstimate {
    /// Estimates from the two-column frame of `samples`; the column names become the
    /// axis labels. Returns `None` if there are no samples
    pub fn new(samples: &StitchSamples, config: &PlotConfig) -> Option<Self> {
        let (x_col, y_col) = samples.columns();
        let pairs: Vec<_> = samples
            .weighted_pairs()
            .into_iter()
            .map(|(p, w)| ((p.overlap, p.mismatch), w))
            .collect();
        let joint = Kde2d::from_counts(&pairs)?;
        let x_kde = Kde1d::from_counts(&x_col.weighted())?;
        let y_kde = Kde1d::from_counts(&y_col.weighted())?;
        debug!(
            "Bandwidths: joint {:?}, overlap {:.4}, mismatch {:.4}",
            joint.bandwidths(),
            x_kde.bandwidth(),
            y_kde.bandwidth()
        );

        let (joint_x, joint_y) = joint.support(config.cut);
        let x_range = union(joint_x, x_kde.support(config.cut));
        let y_range = union(joint_y, y_kde.support(config.cut));
        let grid = joint.grid(x_range, y_range, config.gridsize);
        let levels = grid.iso_proportion_levels(config.levels, config.thresh);

        Some(JointEstimate {
            x_label: x_col.name,
            y_label: y_col.name,
            x_range,
            y_range,
            levels,
            x_marginal: x_kde.curve(x_range, config.marginal_gridsize),
            y_marginal: y_kde.curve(y_range, config.marginal_gridsize),
            grid,
        })
    }
}

/// Level `k` of `n` goes from a pale tint of `base` to `base` itself
fn shade(base: RGBColor, k: usize, n: usize) -> RGBColor {
    let t = if n > 1 { k as f64 / (n - 1) as f64 } else { 1.0 };
    let tint = |c: u8| {
        let pale = 255.0 - 0.8 * (255.0 - c as f64);
        (pale + t * (c as f64 - pale)).round() as u8
    };
    RGBColor(tint(base.0), tint(base.1), tint(base.2))
}

fn peak(curve: &[(f64, f64)]) -> f64 {
    let max = curve.iter().map(|&(_, d)| d).fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

/// Draws the whole figure onto `root`
pub fn draw_joint_plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    estimate: &JointEstimate,
    config: &PlotConfig,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(plot_error)?;

    let (w, h) = root.dim_in_pixel();
    let marginal = (w.min(h) / (config.ratio + 1)) as i32;
    let panels = root.split_by_breakpoints([w as i32 - marginal], [marginal]);
    let space = config.space as i32;
    let (x0, x1) = estimate.x_range;
    let (y0, y1) = estimate.y_range;

    // joint panel, bottom left
    let mut chart = ChartBuilder::on(&panels[2])
        .margin_left(MARGIN)
        .margin_bottom(MARGIN)
        .margin_top(space)
        .margin_right(space)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(6)
        .y_labels(6)
        .x_desc(estimate.x_label)
        .y_desc(estimate.y_label)
        .axis_desc_style(("sans-serif", config.label_font_size))
        .label_style(("sans-serif", config.tick_font_size))
        .draw()
        .map_err(plot_error)?;

    let n = estimate.levels.len();
    for (k, &level) in estimate.levels.iter().enumerate() {
        let style = shade(config.color, k, n).stroke_width(1);
        let segments = iso_segments(&estimate.grid, level);
        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|s| PathElement::new(vec![s.from, s.to], style)),
            )
            .map_err(plot_error)?;
    }

    // overlap marginal, top left
    let mut top = ChartBuilder::on(&panels[0])
        .margin_left(MARGIN)
        .margin_top(MARGIN)
        .margin_right(space)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(x0..x1, 0.0..peak(&estimate.x_marginal))
        .map_err(plot_error)?;
    let mut outline = vec![(x0, 0.0)];
    outline.extend(estimate.x_marginal.iter().copied());
    outline.push((x1, 0.0));
    top.draw_series(iter::once(Polygon::new(
        outline,
        config.color.mix(0.25).filled(),
    )))
    .map_err(plot_error)?;
    top.draw_series(LineSeries::new(
        estimate.x_marginal.iter().copied(),
        config.color.stroke_width(2),
    ))
    .map_err(plot_error)?;
    top.draw_series(iter::once(PathElement::new(
        vec![(x0, 0.0), (x1, 0.0)],
        BLACK.stroke_width(1),
    )))
    .map_err(plot_error)?;

    // mismatch marginal, bottom right; the density runs along x
    let mut right = ChartBuilder::on(&panels[3])
        .margin_top(space)
        .margin_bottom(MARGIN)
        .margin_right(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .build_cartesian_2d(0.0..peak(&estimate.y_marginal), y0..y1)
        .map_err(plot_error)?;
    let curve: Vec<(f64, f64)> = estimate.y_marginal.iter().map(|&(y, d)| (d, y)).collect();
    let mut outline = vec![(0.0, y0)];
    outline.extend(curve.iter().copied());
    outline.push((0.0, y1));
    right
        .draw_series(iter::once(Polygon::new(
            outline,
            config.color.mix(0.25).filled(),
        )))
        .map_err(plot_error)?;
    right
        .draw_series(LineSeries::new(curve, config.color.stroke_width(2)))
        .map_err(plot_error)?;
    right
        .draw_series(iter::once(PathElement::new(
            vec![(0.0, y0), (0.0, y1)],
            BLACK.stroke_width(1),
        )))
        .map_err(plot_error)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn samples() -> StitchSamples {
        let mut fastq = Vec::new();
        for (i, (o, m)) in [(20, 0), (22, 1), (25, 0), (30, 2), (22, 0), (40, 3)]
            .iter()
            .enumerate()
        {
            fastq.extend_from_slice(format!("@r{}_{}_{}\nACGT\n+\nIIII\n", i, o, m).as_bytes());
        }
        StitchSamples::from_reader(Cursor::new(fastq)).unwrap()
    }

    #[test]
    fn estimate_covers_the_data() {
        let config = PlotConfig::default();
        let est = JointEstimate::new(&samples(), &config).unwrap();
        assert!(est.x_range.0 < 20.0 && est.x_range.1 > 40.0);
        assert!(est.y_range.0 < 0.0 && est.y_range.1 > 3.0);
        assert_eq!(est.x_label, "Number of Overlapping Bases");
        assert_eq!(est.y_label, "Number of Mismatched Bases");
        assert_eq!(est.grid.xs.len(), config.gridsize);
        assert_eq!(est.levels.len(), config.levels);
        assert_eq!(est.x_marginal.len(), config.marginal_gridsize);
        assert_eq!(est.x_marginal[0].0, est.x_range.0);
        assert!((est.y_marginal.last().unwrap().0 - est.y_range.1).abs() < 1e-9);
    }

    #[test]
    fn no_estimate_without_samples() {
        assert!(JointEstimate::new(&StitchSamples::default(), &PlotConfig::default()).is_none());
    }

    #[test]
    fn shades_run_pale_to_base() {
        let base = RGBColor(31, 119, 180);
        assert_eq!(shade(base, 9, 10), base);
        let pale = shade(base, 0, 10);
        assert!(pale.0 > base.0 && pale.1 > base.1 && pale.2 > base.2);
        assert_eq!(shade(base, 0, 1), base);
    }

    #[test]
    fn renders_axis_labels_to_svg() {
        let config = PlotConfig::default();
        let est = JointEstimate::new(&samples(), &config).unwrap();
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, config.size).into_drawing_area();
            draw_joint_plot(&root, &est, &config).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains("Number of Overlapping Bases"));
        assert!(svg.contains("Number of Mismatched Bases"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn axis_labels_come_from_the_estimate() {
        let config = PlotConfig::default();
        let mut est = JointEstimate::new(&samples(), &config).unwrap();
        est.x_label = "overlap";
        est.y_label = "mismatch";
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, config.size).into_drawing_area();
            draw_joint_plot(&root, &est, &config).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains(">overlap<"));
        assert!(svg.contains(">mismatch<"));
        assert!(!svg.contains("Number of Overlapping Bases"));
    }
}
