//! Parsing of the stitched-read identifier lines.
//!
//! The stitcher writes its merge statistics into the read name:
//! `<name>_<overlap>_<mismatch>[_<anything else>]`.
use std::str;

use memchr::memchr_iter;

use crate::errors::{ErrorPosition, ParseError};

/// The two annotations carried by one identifier line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StitchPair {
    /// Number of bases in the overlap of the two mates
    pub overlap: i64,
    /// Number of mismatched bases within that overlap
    pub mismatch: i64,
}

#[inline]
fn is_space(b: &u8) -> bool {
    b.is_ascii_whitespace()
}

/// Strips leading and trailing ASCII whitespace (including `\r\n`)
#[inline]
pub(crate) fn trim(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|b| !is_space(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !is_space(b)).map_or(start, |p| p + 1);
    &line[start..end]
}

fn parse_field(field: &[u8], idx: usize, position: &ErrorPosition) -> Result<i64, ParseError> {
    // the whole line was checked for UTF-8 already
    let text = str::from_utf8(field).unwrap_or_default();
    text.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::new_invalid_integer(idx, text, position.clone()))
}

/// Extracts `(overlap, mismatch)` from fields 1 and 2 of an identifier line.
/// Fields past index 2 are ignored.
pub fn parse_identifier(line: &[u8], position: ErrorPosition) -> Result<StitchPair, ParseError> {
    let line = trim(line);
    let text = str::from_utf8(line).map_err(|_| ParseError::new_invalid_utf8(position.clone()))?;

    // we only need the first three underscores to delimit fields 1 and 2
    let mut seps = memchr_iter(b'_', line);
    let (first, second) = match (seps.next(), seps.next()) {
        (Some(a), Some(b)) => (a, b),
        (Some(_), None) => return Err(ParseError::new_missing_field(2, text, position)),
        _ => return Err(ParseError::new_missing_field(1, text, position)),
    };
    let third = seps.next().unwrap_or_else(|| line.len());

    let overlap = parse_field(&line[first + 1..second], 1, &position)?;
    let mismatch = parse_field(&line[second + 1..third], 2, &position)?;
    Ok(StitchPair { overlap, mismatch })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ParseErrorKind;

    fn pos() -> ErrorPosition {
        ErrorPosition {
            line: 1,
            record: Some(0),
        }
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let pair = parse_identifier(b"readA_5_2_extra", pos()).unwrap();
        assert_eq!(
            pair,
            StitchPair {
                overlap: 5,
                mismatch: 2
            }
        );
    }

    #[test]
    fn exactly_three_fields() {
        let pair = parse_identifier(b"@x_3_7\n", pos()).unwrap();
        assert_eq!((pair.overlap, pair.mismatch), (3, 7));
    }

    #[test]
    fn line_endings_are_stripped() {
        let pair = parse_identifier(b"  @M0001:1_12_0\r\n", pos()).unwrap();
        assert_eq!((pair.overlap, pair.mismatch), (12, 0));
    }

    #[test]
    fn signs_are_accepted() {
        let pair = parse_identifier(b"x_+4_-1", pos()).unwrap();
        assert_eq!((pair.overlap, pair.mismatch), (4, -1));
    }

    #[test]
    fn too_few_fields() {
        let err = parse_identifier(b"onlyonefield", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingField);
        assert_eq!(err.position, pos());

        let err = parse_identifier(b"two_fields", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingField);

        let err = parse_identifier(b"", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingField);
    }

    #[test]
    fn non_integer_fields() {
        let err = parse_identifier(b"x_abc_1", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
        assert!(err.msg.contains("Field 1"));

        let err = parse_identifier(b"x_1_2.5", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
        assert!(err.msg.contains("Field 2"));

        // an empty field is not a number either
        let err = parse_identifier(b"x__1", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
    }

    #[test]
    fn invalid_utf8() {
        let err = parse_identifier(b"x_1_2\xff", pos()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    }

    #[test]
    fn trim_edges() {
        assert_eq!(trim(b"  \t\n"), b"");
        assert_eq!(trim(b"a b\r\n"), b"a b");
    }
}
