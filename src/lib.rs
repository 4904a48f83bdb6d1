#![crate_name = "stitchplot"]
//! Joint density plots of the overlap and mismatch counts that a read stitcher
//! writes into the identifiers of the reads it merged.
pub mod config;
pub mod contour;
pub mod errors;
pub mod ids;
pub mod kde;
pub mod pdf;
pub mod pipeline;
pub mod plot;
pub mod reader;
pub mod samples;

pub use config::{PlotConfig, RunConfig};
pub use errors::{ErrorPosition, ParseError, ParseErrorKind, PlotError, RunError};
pub use ids::{parse_identifier, StitchPair};
pub use pipeline::run;
pub use reader::{lines_from_reader, open_lines, Compression};
pub use samples::{Column, StitchSamples, MISMATCH_COLUMN, OVERLAP_COLUMN};
