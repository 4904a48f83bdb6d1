//! Scanning a sequence file into the paired overlap/mismatch samples.
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::errors::{ErrorPosition, ParseError};
use crate::ids::{parse_identifier, StitchPair};
use crate::reader::open_lines;

/// Column name of the overlap counts, also used as the x axis label
pub const OVERLAP_COLUMN: &str = "Number of Overlapping Bases";
/// Column name of the mismatch counts, also used as the y axis label
pub const MISMATCH_COLUMN: &str = "Number of Mismatched Bases";

/// Lines per FASTQ record; the identifier is the first one
const RECORD_LINES: u64 = 4;

/// A named column of the two-column frame handed to the plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column<'a> {
    pub name: &'static str,
    pub values: &'a [i64],
}

impl<'a> Column<'a> {
    /// Distinct values with how often each occurs, sorted by value
    pub fn weighted(&self) -> Vec<(i64, u64)> {
        let mut counts = BTreeMap::new();
        for &v in self.values {
            *counts.entry(v).or_insert(0u64) += 1;
        }
        counts.into_iter().collect()
    }
}

/// The overlap and mismatch counts of every record, in file order.
/// Both vectors always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StitchSamples {
    overlaps: Vec<i64>,
    mismatches: Vec<i64>,
    lines_read: u64,
}

impl StitchSamples {
    /// Reads every 4th line (starting with the first) of `reader` as an identifier line.
    /// A trailing partial record still contributes its identifier line.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, ParseError> {
        let mut samples = StitchSamples::default();
        let mut line = Vec::with_capacity(256);
        let mut count: u64 = 0;
        loop {
            line.clear();
            let position = || ErrorPosition {
                line: count + 1,
                record: Some(count / RECORD_LINES),
            };
            let n = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| ParseError::from(e).at(position()))?;
            if n == 0 {
                break;
            }
            if count % RECORD_LINES == 0 {
                let pair = parse_identifier(&line, position())?;
                samples.push(pair);
            }
            count += 1;
        }
        samples.lines_read = count;
        Ok(samples)
    }

    /// Opens (and decompresses if needed) the file at `path` and scans it.
    /// The file is closed before this returns, whether scanning succeeded or not.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let reader = open_lines(&path)?;
        Self::from_reader(reader)
    }

    fn push(&mut self, pair: StitchPair) {
        self.overlaps.push(pair.overlap);
        self.mismatches.push(pair.mismatch);
    }

    pub fn overlaps(&self) -> &[i64] {
        &self.overlaps
    }

    pub fn mismatches(&self) -> &[i64] {
        &self.mismatches
    }

    /// Number of records seen
    pub fn len(&self) -> usize {
        self.overlaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty()
    }

    /// Number of lines in the (decompressed) input
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn pairs(&self) -> impl Iterator<Item = StitchPair> + '_ {
        self.overlaps
            .iter()
            .zip(self.mismatches.iter())
            .map(|(&overlap, &mismatch)| StitchPair { overlap, mismatch })
    }

    /// The two-column view: (overlap column, mismatch column)
    pub fn columns(&self) -> (Column<'_>, Column<'_>) {
        (
            Column {
                name: OVERLAP_COLUMN,
                values: &self.overlaps,
            },
            Column {
                name: MISMATCH_COLUMN,
                values: &self.mismatches,
            },
        )
    }

    /// Distinct pairs with how often each occurs, sorted by pair
    pub fn weighted_pairs(&self) -> Vec<(StitchPair, u64)> {
        let mut counts = BTreeMap::new();
        for pair in self.pairs() {
            *counts.entry(pair).or_insert(0u64) += 1;
        }
        counts.into_iter().collect()
    }
}
