use std::io::{BufRead, BufReader, Lines, Read};

use tracing::info;

use crate::error::{ImportError, ImportResult};
use crate::schema::ReleaseField;

/// One data row of a release file: the ordered fields plus its line number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseRecord {
    line: u64,
    fields: Vec<String>,
}

impl ReleaseRecord {
    /// The value of one schema column.
    pub fn field(&self, field: ReleaseField) -> &str {
        &self.fields[field.ordinal()]
    }

    /// One-based line number in the source, for diagnostics.
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Lazy, single-pass reader over a header-then-data tab-delimited stream.
///
/// The header is consumed and validated at open; the column-name-to-position
/// mapping is logged and the line is otherwise discarded. Each subsequent
/// line is split on a single horizontal tab and must match the schema arity
/// exactly; there is no truncation or padding, and blank lines are fed to
/// the splitter like any other line (they fail the arity check).
///
/// Not restartable: re-parsing requires a fresh stream.
#[derive(Debug)]
pub struct ReleaseReader<R> {
    lines: Lines<BufReader<R>>,
    source_label: String,
    line: u64,
}

impl<R: Read> ReleaseReader<R> {
    /// Consume and validate the header line, then position at the first
    /// data row.
    pub fn open(reader: R, source_label: impl Into<String>) -> ImportResult<Self> {
        let source_label = source_label.into();
        let mut lines = BufReader::new(reader).lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(ImportError::SchemaViolation {
                    source_label,
                    line: 1,
                    expected: ReleaseField::COUNT,
                    found: 0,
                })
            }
        };
        let columns: Vec<&str> = header.split('\t').collect();
        if columns.len() != ReleaseField::COUNT {
            return Err(ImportError::SchemaViolation {
                source_label,
                line: 1,
                expected: ReleaseField::COUNT,
                found: columns.len(),
            });
        }
        for field in ReleaseField::ALL {
            info!("{}: {}", field.name(), columns[field.ordinal()]);
        }
        Ok(Self {
            lines,
            source_label,
            line: 1,
        })
    }
}

impl<R: Read> Iterator for ReleaseReader<R> {
    type Item = ImportResult<ReleaseRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        self.line += 1;
        let fields: Vec<String> = line.split('\t').map(str::to_owned).collect();
        if fields.len() != ReleaseField::COUNT {
            return Some(Err(ImportError::SchemaViolation {
                source_label: self.source_label.clone(),
                line: self.line,
                expected: ReleaseField::COUNT,
                found: fields.len(),
            }));
        }
        Some(Ok(ReleaseRecord {
            line: self.line,
            fields,
        }))
    }
}
