//! Gaussian kernel density estimates over weighted points.
//!
//! Points are `(value, count)` pairs so that the millions of reads in a run collapse
//! into the few thousand distinct (overlap, mismatch) combinations. The estimates are
//! the same as over the expanded points: bandwidths follow Scott's rule with the
//! sample (n - 1) covariance of the expanded data.
use std::f64::consts::PI;

use log::{debug, warn};

/// Smallest bandwidth used on an axis whose values are all identical.
/// The counts are integers, so half a unit keeps neighbouring values apart.
pub const BANDWIDTH_FLOOR: f64 = 0.5;

/// `count` evenly spaced values from `lo` to `hi` inclusive
pub fn linspace(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (count - 1) as f64;
            (0..count).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Weighted mean and (n - 1) variance of one axis
fn moments(points: &[(f64, u64)]) -> (f64, f64, f64) {
    let n: f64 = points.iter().map(|&(_, w)| w as f64).sum();
    let mean = points.iter().map(|&(x, w)| x * w as f64).sum::<f64>() / n;
    let var = if n > 1.0 {
        points
            .iter()
            .map(|&(x, w)| w as f64 * (x - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0)
    } else {
        0.0
    };
    (n, mean, var)
}

fn bounds<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// One-dimensional Gaussian KDE
#[derive(Debug, Clone)]
pub struct Kde1d {
    points: Vec<(f64, u64)>,
    n: f64,
    bandwidth: f64,
    min: f64,
    max: f64,
}

impl Kde1d {
    /// Returns `None` when there are no points
    pub fn from_weighted(points: &[(f64, u64)]) -> Option<Self> {
        let points: Vec<_> = points.iter().copied().filter(|&(_, w)| w > 0).collect();
        if points.is_empty() {
            return None;
        }
        let (n, _, var) = moments(&points);
        let mut bandwidth = var.sqrt() * n.powf(-1.0 / 5.0);
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            warn!(
                "Degenerate sample for density estimate, using bandwidth {}",
                BANDWIDTH_FLOOR
            );
            bandwidth = BANDWIDTH_FLOOR;
        }
        let (min, max) = bounds(points.iter().map(|&(x, _)| x));
        Some(Kde1d {
            points,
            n,
            bandwidth,
            min,
            max,
        })
    }

    pub fn from_counts(points: &[(i64, u64)]) -> Option<Self> {
        let points: Vec<_> = points.iter().map(|&(x, w)| (x as f64, w)).collect();
        Self::from_weighted(&points)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = self.n * self.bandwidth * (2.0 * PI).sqrt();
        self.points
            .iter()
            .map(|&(p, w)| {
                let z = (x - p) / self.bandwidth;
                w as f64 * (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            / norm
    }

    /// Data range padded by `cut` bandwidths on each side
    pub fn support(&self, cut: f64) -> (f64, f64) {
        (
            self.min - cut * self.bandwidth,
            self.max + cut * self.bandwidth,
        )
    }

    /// `(x, density)` at `gridsize` evenly spaced points of `range`
    pub fn curve(&self, range: (f64, f64), gridsize: usize) -> Vec<(f64, f64)> {
        linspace(range.0, range.1, gridsize)
            .into_iter()
            .map(|x| (x, self.evaluate(x)))
            .collect()
    }
}

/// Two-dimensional Gaussian KDE with a full bandwidth matrix
#[derive(Debug, Clone)]
pub struct Kde2d {
    points: Vec<((f64, f64), u64)>,
    /// kernel covariance, row-major
    cov: [f64; 4],
    inv: [f64; 4],
    norm: f64,
    min: (f64, f64),
    max: (f64, f64),
}

impl Kde2d {
    /// Returns `None` when there are no points
    pub fn from_weighted(points: &[((f64, f64), u64)]) -> Option<Self> {
        let points: Vec<_> = points.iter().copied().filter(|&(_, w)| w > 0).collect();
        if points.is_empty() {
            return None;
        }
        let xs: Vec<_> = points.iter().map(|&((x, _), w)| (x, w)).collect();
        let ys: Vec<_> = points.iter().map(|&((_, y), w)| (y, w)).collect();
        let (n, mx, sxx) = moments(&xs);
        let (_, my, syy) = moments(&ys);
        let sxy = if n > 1.0 {
            points
                .iter()
                .map(|&((x, y), w)| w as f64 * (x - mx) * (y - my))
                .sum::<f64>()
                / (n - 1.0)
        } else {
            0.0
        };

        // Scott's factor for d = 2 is n^(-1/6), squared for the covariance
        let factor = n.powf(-1.0 / 3.0);
        let mut cxx = sxx * factor;
        let mut cyy = syy * factor;
        let mut cxy = sxy * factor;
        let floor = BANDWIDTH_FLOOR * BANDWIDTH_FLOOR;
        if !(cxx.is_finite() && cxx > 0.0) {
            warn!("Overlap counts are all identical, flooring the x bandwidth");
            cxx = floor;
            cxy = 0.0;
        }
        if !(cyy.is_finite() && cyy > 0.0) {
            warn!("Mismatch counts are all identical, flooring the y bandwidth");
            cyy = floor;
            cxy = 0.0;
        }
        let mut det = cxx * cyy - cxy * cxy;
        if det <= cxx * cyy * 1e-12 {
            warn!("Overlap and mismatch counts are collinear, ignoring their covariance");
            cxy = 0.0;
            det = cxx * cyy;
        }
        debug!(
            "Joint kernel covariance: [[{:.4}, {:.4}], [{:.4}, {:.4}]]",
            cxx, cxy, cxy, cyy
        );

        let (min_x, max_x) = bounds(points.iter().map(|&((x, _), _)| x));
        let (min_y, max_y) = bounds(points.iter().map(|&((_, y), _)| y));
        Some(Kde2d {
            points,
            cov: [cxx, cxy, cxy, cyy],
            inv: [cyy / det, -cxy / det, -cxy / det, cxx / det],
            norm: 1.0 / (2.0 * PI * det.sqrt() * n),
            min: (min_x, min_y),
            max: (max_x, max_y),
        })
    }

    pub fn from_counts(points: &[((i64, i64), u64)]) -> Option<Self> {
        let points: Vec<_> = points
            .iter()
            .map(|&((x, y), w)| ((x as f64, y as f64), w))
            .collect();
        Self::from_weighted(&points)
    }

    /// Kernel standard deviation along each axis
    pub fn bandwidths(&self) -> (f64, f64) {
        (self.cov[0].sqrt(), self.cov[3].sqrt())
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let [a, b, c, d] = self.inv;
        self.points
            .iter()
            .map(|&((px, py), w)| {
                let dx = x - px;
                let dy = y - py;
                let q = a * dx * dx + (b + c) * dx * dy + d * dy * dy;
                w as f64 * (-0.5 * q).exp()
            })
            .sum::<f64>()
            * self.norm
    }

    /// Data ranges padded by `cut` bandwidths on each side: `((x0, x1), (y0, y1))`
    pub fn support(&self, cut: f64) -> ((f64, f64), (f64, f64)) {
        let (bx, by) = self.bandwidths();
        (
            (self.min.0 - cut * bx, self.max.0 + cut * bx),
            (self.min.1 - cut * by, self.max.1 + cut * by),
        )
    }

    /// Evaluate on a `gridsize` x `gridsize` grid spanning the two ranges
    pub fn grid(&self, x_range: (f64, f64), y_range: (f64, f64), gridsize: usize) -> DensityGrid {
        let xs = linspace(x_range.0, x_range.1, gridsize);
        let ys = linspace(y_range.0, y_range.1, gridsize);
        let mut values = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                values.push(self.evaluate(x, y));
            }
        }
        DensityGrid { xs, ys, values }
    }
}

/// Density values sampled on a rectangular grid
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// row-major: `values[j * xs.len() + i]` is the density at `(xs[i], ys[j])`
    pub values: Vec<f64>,
}

impl DensityGrid {
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.xs.len() + i]
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Density levels enclosing `1 - p` of the grid's mass for `count` proportions `p`
    /// spaced evenly from `thresh` to 1. The result is ascending; the lowest level
    /// surrounds all but `thresh` of the mass and the last one is the peak.
    pub fn iso_proportion_levels(&self, count: usize, thresh: f64) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        if self.values.is_empty() || !(total > 0.0) {
            return Vec::new();
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let mut acc = 0.0;
        let cumulative: Vec<f64> = sorted
            .iter()
            .map(|v| {
                acc += v;
                acc / total
            })
            .collect();

        linspace(thresh, 1.0, count)
            .into_iter()
            .map(|p| {
                let target = 1.0 - p;
                let idx = cumulative.partition_point(|&c| c < target);
                sorted[idx.min(sorted.len() - 1)]
            })
            .collect()
    }
}
