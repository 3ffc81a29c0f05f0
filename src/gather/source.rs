//! Source list reader
//!
//! Reads app references from a markdown list, one per line:
//!
//! ```text
//! * [MyApp](https://play.example.test/store/apps/details?id=com.example.myapp)
//! ```
//!
//! Lines that don't look like that are skipped.

use crate::model::AppRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, BufRead, Lines};

/// Bullet, bracketed display name, parenthesized URL
static ENTRY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\s+\[(?P<name>.*?)\]\((?P<url>.*?)\)")
        .expect("Entry regex is hardcoded and valid")
});

/// Lazy, single-pass iterator over the app records of a source list
///
/// Yields `Err` only for I/O failures reading the input; those are fatal to
/// the caller.
pub struct SourceReader<R> {
    lines: Lines<R>,
    limit: Option<usize>,
    yielded: usize,
}

/// Reads app records from a line-oriented source
///
/// # Arguments
///
/// * `reader` - The input, typically a buffered file
/// * `limit` - Stop after this many records; `None` or `Some(0)` reads everything
///
/// # Example
///
/// ```
/// use check_ratings::gather::read_sources;
///
/// let input = "# My apps\n* [MyApp](http://example.test/app)\n";
/// let records: Vec<_> = read_sources(input.as_bytes(), None)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name, "MyApp");
/// ```
pub fn read_sources<R: BufRead>(reader: R, limit: Option<usize>) -> SourceReader<R> {
    SourceReader {
        lines: reader.lines(),
        limit: limit.filter(|n| *n > 0),
        yielded: 0,
    }
}

/// Converts a signed command-line limit; zero or negative means unbounded
pub fn limit_from_arg(limit: Option<i64>) -> Option<usize> {
    limit
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n > 0)
}

/// Parses one source line into a record, if it is an entry
pub fn parse_line(line: &str) -> Option<AppRecord> {
    let captures = ENTRY_PATTERN.captures(line)?;
    AppRecord::new(&captures["name"], &captures["url"])
}

impl<R: BufRead> Iterator for SourceReader<R> {
    type Item = io::Result<AppRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }

        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            match parse_line(&line) {
                Some(record) => {
                    self.yielded += 1;
                    return Some(Ok(record));
                }
                None => {
                    tracing::trace!("Skipping line {:?}", line);
                }
            }
        }

        None
    }
}
