//! Marching squares over a `DensityGrid`
use crate::kde::DensityGrid;

/// A straight piece of an iso-line, in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

// Cell edges, counter-clockwise from the bottom
const BOTTOM: usize = 0;
const RIGHT: usize = 1;
const TOP: usize = 2;
const LEFT: usize = 3;

#[inline]
fn lerp(a: (f64, f64), b: (f64, f64), va: f64, vb: f64, level: f64) -> (f64, f64) {
    let t = (level - va) / (vb - va);
    (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
}

/// All segments of the iso-line at `level`.
/// Segments are not joined into polylines; each grid cell contributes at most two.
pub fn iso_segments(grid: &DensityGrid, level: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let (nx, ny) = (grid.xs.len(), grid.ys.len());
    if nx < 2 || ny < 2 {
        return segments;
    }

    for j in 0..ny - 1 {
        for i in 0..nx - 1 {
            let p00 = (grid.xs[i], grid.ys[j]);
            let p10 = (grid.xs[i + 1], grid.ys[j]);
            let p11 = (grid.xs[i + 1], grid.ys[j + 1]);
            let p01 = (grid.xs[i], grid.ys[j + 1]);
            let v00 = grid.at(i, j);
            let v10 = grid.at(i + 1, j);
            let v11 = grid.at(i + 1, j + 1);
            let v01 = grid.at(i, j + 1);

            let above = [v00 > level, v10 > level, v11 > level, v01 > level];
            let mut crossings: [Option<(f64, f64)>; 4] = [None; 4];
            if above[0] != above[1] {
                crossings[BOTTOM] = Some(lerp(p00, p10, v00, v10, level));
            }
            if above[1] != above[2] {
                crossings[RIGHT] = Some(lerp(p10, p11, v10, v11, level));
            }
            if above[3] != above[2] {
                crossings[TOP] = Some(lerp(p01, p11, v01, v11, level));
            }
            if above[0] != above[3] {
                crossings[LEFT] = Some(lerp(p00, p01, v00, v01, level));
            }

            let found: Vec<usize> = (0..4).filter(|&e| crossings[e].is_some()).collect();
            let mut push = |a: usize, b: usize| {
                if let (Some(from), Some(to)) = (crossings[a], crossings[b]) {
                    segments.push(Segment { from, to });
                }
            };
            match found.len() {
                2 => push(found[0], found[1]),
                4 => {
                    // saddle: the centre decides which diagonal is connected
                    let centre_above = (v00 + v10 + v11 + v01) / 4.0 > level;
                    if above[0] == centre_above {
                        // cut off the (1, 0) and (0, 1) corners
                        push(BOTTOM, RIGHT);
                        push(TOP, LEFT);
                    } else {
                        // cut off the (0, 0) and (1, 1) corners
                        push(BOTTOM, LEFT);
                        push(RIGHT, TOP);
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kde::linspace;

    fn cone(n: usize) -> DensityGrid {
        let xs = linspace(-2.0, 2.0, n);
        let ys = linspace(-2.0, 2.0, n);
        let mut values = Vec::new();
        for &y in &ys {
            for &x in &xs {
                values.push(3.0 - (x * x + y * y).sqrt());
            }
        }
        DensityGrid { xs, ys, values }
    }

    #[test]
    fn circle_around_peak() {
        let grid = cone(41);
        // level 2 is the circle of radius 1
        let segments = iso_segments(&grid, 2.0);
        assert!(!segments.is_empty());
        for s in &segments {
            for p in &[s.from, s.to] {
                let r = (p.0 * p.0 + p.1 * p.1).sqrt();
                assert!((r - 1.0).abs() < 0.05, "point {:?} off the circle", p);
            }
        }
    }

    #[test]
    fn no_crossing_outside_range() {
        let grid = cone(11);
        assert!(iso_segments(&grid, 10.0).is_empty());
        assert!(iso_segments(&grid, -10.0).is_empty());
    }

    #[test]
    fn saddle_cell() {
        let grid = DensityGrid {
            xs: vec![0.0, 1.0],
            ys: vec![0.0, 1.0],
            // (0,0) and (1,1) high, centre above the level
            values: vec![1.0, 0.0, 0.0, 1.0],
        };
        let segments = iso_segments(&grid, 0.4);
        assert_eq!(segments.len(), 2);
        // the low corners get cut off
        let s = segments[0];
        assert!((s.from.0 - 0.6).abs() < 1e-12 && s.from.1 == 0.0);
        assert!(s.to.0 == 1.0 && (s.to.1 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn tiny_grid() {
        let grid = DensityGrid {
            xs: vec![0.0],
            ys: vec![0.0],
            values: vec![1.0],
        };
        assert!(iso_segments(&grid, 0.5).is_empty());
    }
}
