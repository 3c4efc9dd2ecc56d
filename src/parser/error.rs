//! Errors produced while parsing.
//!
//! Malformed input is represented as data: each problem becomes an
//! [`ErrorRecord`] with the line it occurred on, and the parse either
//! continues past it or halts, depending on configuration. Nothing here
//! panics or aborts.

use crate::directive;
use crate::header;
use crate::record::attributes;
use crate::record::fields;

/// How serious a recorded problem is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Tolerated and skipped; the input is unusual but not wrong enough
    /// to lose (an unrecognized directive, for example).
    Warning,

    /// The offending line was skipped; everything else stands.
    Error,

    /// The parse halted; no further input is accepted.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// What went wrong on a line.
#[derive(Clone, Debug)]
pub enum ErrorKind {
    /// A body record's columns failed to parse.
    Fields(fields::ParseError),

    /// A body record's attribute column failed to parse.
    Attributes(attributes::ParseError),

    /// A directive line failed to parse.
    Directive(directive::ParseError),

    /// A directive parsed but could not be applied to the header.
    Header(header::Error),

    /// A body record arrived before the header was minimally complete.
    BodyBeforeHeader,

    /// A header directive arrived after the header was frozen.
    DirectiveAfterHeader(String),

    /// An unexpected line arrived inside an embedded sequence block.
    UnexpectedInSequenceBlock(String),

    /// The type column failed ontology validation.
    UnknownTerm(String),

    /// An embedded DNA block was still open at end of input.
    UnclosedSequenceBlock,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Fields(err) => write!(f, "{err}"),
            ErrorKind::Attributes(err) => write!(f, "{err}"),
            ErrorKind::Directive(err) => write!(f, "{err}"),
            ErrorKind::Header(err) => write!(f, "{err}"),
            ErrorKind::BodyBeforeHeader => {
                write!(f, "body record before the header was complete")
            }
            ErrorKind::DirectiveAfterHeader(line) => {
                write!(f, "directive after the header was frozen: `{line}`")
            }
            ErrorKind::UnexpectedInSequenceBlock(line) => {
                write!(f, "unexpected line inside a sequence block: `{line}`")
            }
            ErrorKind::UnknownTerm(term) => {
                write!(f, "type `{term}` is not a known ontology term or accession")
            }
            ErrorKind::UnclosedSequenceBlock => {
                write!(f, "embedded sequence block still open at end of input")
            }
        }
    }
}

/// A problem recorded during the parse, positioned for error reporting.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
    /// The 1-based line number the problem occurred on.
    line: usize,

    /// The 1-based column number, when one can be attributed.
    column: Option<usize>,

    /// How serious the problem is.
    severity: Severity,

    /// What went wrong.
    kind: ErrorKind,
}

impl ErrorRecord {
    /// Creates a new [`ErrorRecord`].
    pub(crate) fn new(line: usize, severity: Severity, kind: ErrorKind) -> Self {
        let column = match &kind {
            ErrorKind::Fields(fields::ParseError::EmptyField { column }) => Some(*column),
            _ => None,
        };

        ErrorRecord {
            line,
            column,
            severity,
            kind,
        }
    }

    /// Returns the 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 1-based column number, when one can be attributed.
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    /// Returns the severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns what went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.column {
            Some(column) => write!(
                f,
                "line {}, column {}: {}: {}",
                self.line, column, self.severity, self.kind
            ),
            None => write!(f, "line {}: {}: {}", self.line, self.severity, self.kind),
        }
    }
}

impl std::error::Error for ErrorRecord {}

/// An error that halts or refuses an operation on the parser.
#[derive(Clone, Debug)]
pub enum Error {
    /// The parse halted on this record and accepts no further input.
    Halted(ErrorRecord),

    /// Input was offered after the parser terminated: a caller bug,
    /// reported rather than silently ignored.
    Terminated,

    /// Features were requested while the header was still being
    /// collected.
    MidHeader,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Halted(record) => write!(f, "parse halted: {record}"),
            Error::Terminated => {
                write!(f, "the parser has terminated and accepts no further input")
            }
            Error::MidHeader => {
                write!(f, "features are not available until the header is complete")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        let record = ErrorRecord::new(7, Severity::Error, ErrorKind::BodyBeforeHeader);
        assert_eq!(
            record.to_string(),
            "line 7: error: body record before the header was complete"
        );
        assert_eq!(record.column(), None);
    }

    #[test]
    fn test_record_display_with_column() {
        let record = ErrorRecord::new(
            3,
            Severity::Error,
            ErrorKind::Fields(fields::ParseError::EmptyField { column: 2 }),
        );
        assert_eq!(
            record.to_string(),
            "line 3, column 2: error: column 2 must not be empty"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Terminated.to_string(),
            "the parser has terminated and accepts no further input"
        );
        assert_eq!(
            Error::MidHeader.to_string(),
            "features are not available until the header is complete"
        );
    }
}
