//! Line ranges selected for typing.
//!
//! Parsed from the `--areas` syntax: a comma-separated list of `N` or `N-M`
//! tokens, 1-based and inclusive.

use super::error::AreaError;
use crate::view_state::types::OriginalLine;
use std::fmt;
use std::str::FromStr;

/// Inclusive range of original line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    start: OriginalLine,
    end: OriginalLine,
}

impl LineSpan {
    /// Create a span; fails if `end` comes before `start`.
    pub fn new(start: OriginalLine, end: OriginalLine) -> Result<Self, AreaError> {
        if end < start {
            return Err(AreaError::Inverted {
                start: start.get(),
                end: end.get(),
            });
        }
        Ok(Self { start, end })
    }

    /// Span covering exactly one line.
    pub fn single(line: OriginalLine) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// First line of the span.
    pub fn start(&self) -> OriginalLine {
        self.start
    }

    /// Last line of the span (inclusive).
    pub fn end(&self) -> OriginalLine {
        self.end
    }

    /// Number of lines covered. Always >= 1.
    pub fn len(&self) -> usize {
        self.end.get() - self.start.get() + 1
    }

    /// Spans are never empty; provided for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this span covers a single line.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Whether `line` falls inside the span.
    pub fn contains(&self, line: OriginalLine) -> bool {
        self.start <= line && line <= self.end
    }

    /// Whether the two spans share at least one line.
    pub fn overlaps(&self, other: &LineSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_line_number(raw: &str, token: &str) -> Result<OriginalLine, AreaError> {
    let number: usize = raw.trim().parse().map_err(|_| AreaError::Malformed {
        token: token.to_string(),
    })?;
    OriginalLine::new(number).map_err(|_| AreaError::ZeroLine {
        token: token.to_string(),
    })
}

impl FromStr for LineSpan {
    type Err = AreaError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        match trimmed.split_once('-') {
            Some((start, end)) => {
                let start = parse_line_number(start, trimmed)?;
                let end = parse_line_number(end, trimmed)?;
                LineSpan::new(start, end)
            }
            None => parse_line_number(trimmed, trimmed).map(LineSpan::single),
        }
    }
}

/// Sort spans by start line and reject any pair that shares a line.
///
/// # Errors
///
/// Returns `AreaError::Overlap` naming the first offending pair.
pub fn sort_disjoint(spans: &mut [LineSpan]) -> Result<(), AreaError> {
    spans.sort_by_key(LineSpan::start);
    for pair in spans.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(AreaError::Overlap {
                first: pair[0],
                second: pair[1],
            });
        }
    }
    Ok(())
}

/// Validated `--areas` value: disjoint spans in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreaList(Vec<LineSpan>);

impl AreaList {
    /// Spans in ascending start order.
    pub fn spans(&self) -> &[LineSpan] {
        &self.0
    }

    /// Consume into the underlying spans.
    pub fn into_spans(self) -> Vec<LineSpan> {
        self.0
    }
}

impl FromStr for AreaList {
    type Err = AreaError;

    fn from_str(areas: &str) -> Result<Self, Self::Err> {
        let mut spans = areas
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<LineSpan>, _>>()?;
        sort_disjoint(&mut spans)?;
        Ok(Self(spans))
    }
}

/// clap value parser for `--areas`.
///
/// # Errors
///
/// Returns `AreaError` for malformed tokens, inverted or zero bounds, and overlaps.
pub fn parse_area_list(areas: &str) -> Result<AreaList, AreaError> {
    areas.parse()
}
