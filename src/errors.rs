//! The errors stitchplot can return: while scanning the sequence file or while
//! rendering the plot.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Represents where we were in a file when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Line number where the error occurred (starting with 1)
    pub line: u64,
    /// Index of the 4-line record if we were inside one (starting with 0)
    pub record: Option<u64>,
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(record) = self.record {
            write!(f, "record {} at ", record)?;
        }
        write!(f, "line {}", self.line)
    }
}

/// The type of error that occured while scanning a sequence file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An error happened during file/stream input/output
    Io,
    /// The file started with a compression magic number but the rest of the header was wrong
    BadCompression,
    /// An identifier line had fewer than 3 `_`-separated fields
    MissingField,
    /// Field 1 or 2 of an identifier line was not an integer
    InvalidInteger,
    /// An identifier line was not valid UTF-8
    InvalidUtf8,
}

/// The error returned when reading the sequence file fails
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// A description of what went wrong
    pub msg: String,
    /// The type of error that occurred
    pub kind: ParseErrorKind,
    /// Position within file
    pub position: ErrorPosition,
}

impl ParseError {
    pub fn new_bad_compression(format: &str) -> Self {
        Self {
            msg: format!("Bad {} header", format),
            kind: ParseErrorKind::BadCompression,
            position: ErrorPosition::default(),
        }
    }

    pub fn new_missing_field(found: usize, line: &str, position: ErrorPosition) -> Self {
        let msg = format!(
            "Expected at least 3 '_'-separated fields but found {} in '{}'",
            found,
            line.escape_default()
        );
        Self {
            kind: ParseErrorKind::MissingField,
            msg,
            position,
        }
    }

    pub fn new_invalid_integer(field: usize, value: &str, position: ErrorPosition) -> Self {
        let msg = format!(
            "Field {} should be an integer but found '{}'",
            field,
            value.escape_default()
        );
        Self {
            kind: ParseErrorKind::InvalidInteger,
            msg,
            position,
        }
    }

    pub fn new_invalid_utf8(position: ErrorPosition) -> Self {
        Self {
            msg: String::from("Identifier line is not valid UTF-8"),
            kind: ParseErrorKind::InvalidUtf8,
            position,
        }
    }

    /// Attach a position to an error raised without one (e.g. by the decoder)
    pub fn at(mut self, position: ErrorPosition) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ParseErrorKind::Io => write!(f, "I/O error: {} ({})", self.msg, self.position),
            ParseErrorKind::BadCompression => write!(f, "{}", self.msg),
            ParseErrorKind::MissingField
            | ParseErrorKind::InvalidInteger
            | ParseErrorKind::InvalidUtf8 => write!(f, "{} ({})", self.msg, self.position),
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        Self {
            msg: err.to_string(),
            kind: ParseErrorKind::Io,
            position: ErrorPosition::default(),
        }
    }
}

impl StdError for ParseError {}

/// The error returned when drawing or saving the plot fails
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotError {
    pub msg: String,
}

impl PlotError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self { msg: msg.into() }
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Failed to render plot: {}", self.msg)
    }
}

impl StdError for PlotError {}

/// Everything that can abort a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    Parse(ParseError),
    /// The sequence file had no records so there is nothing to estimate
    NoRecords,
    Plot(PlotError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::Parse(e) => write!(f, "{}", e),
            RunError::NoRecords => write!(f, "No records found in the sequence file"),
            RunError::Plot(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for RunError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            RunError::Parse(e) => Some(e),
            RunError::NoRecords => None,
            RunError::Plot(e) => Some(e),
        }
    }
}

impl From<ParseError> for RunError {
    fn from(err: ParseError) -> Self {
        RunError::Parse(err)
    }
}

impl From<PlotError> for RunError {
    fn from(err: PlotError) -> Self {
        RunError::Plot(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn position_display() {
        let pos = ErrorPosition {
            line: 9,
            record: Some(2),
        };
        assert_eq!(pos.to_string(), "record 2 at line 9");
        assert_eq!(ErrorPosition::default().to_string(), "line 0");
    }

    #[test]
    fn invalid_integer_message() {
        let pos = ErrorPosition {
            line: 1,
            record: Some(0),
        };
        let err = ParseError::new_invalid_integer(1, "abc", pos);
        assert_eq!(
            err.to_string(),
            "Field 1 should be an integer but found 'abc' (record 0 at line 1)"
        );
    }
}
