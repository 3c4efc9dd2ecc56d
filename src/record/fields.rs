//! The mandatory columns of a body record.

use std::num::ParseFloatError;
use std::num::ParseIntError;

use crate::core::phase;
use crate::core::strand;
use crate::core::Phase;
use crate::core::Strand;
use crate::core::Version;
use crate::feature::Span;

/// The column delimiter of a body record.
pub const COLUMN_DELIMITER: char = '\t';

/// The literal token that marks an absent value in the score, strand and
/// phase columns.
pub const ABSENT: &str = ".";

/// The number of mandatory columns in a version 2 record (the attribute
/// column is optional in that dialect).
pub const NUM_FIELDS_V2: usize = 8;

/// The number of mandatory columns in a version 3 record.
pub const NUM_FIELDS_V3: usize = 9;

/// An error related to the parsing of a record's columns.
#[derive(Clone, Debug)]
pub enum ParseError {
    /// An incorrect number of columns for the dialect.
    IncorrectNumberOfFields {
        /// The format version being parsed.
        version: Version,

        /// The number of columns found.
        found: usize,
    },

    /// A mandatory column was empty.
    EmptyField {
        /// The 1-based column number.
        column: usize,
    },

    /// An invalid start coordinate.
    InvalidStart(ParseIntError),

    /// An invalid end coordinate.
    InvalidEnd(ParseIntError),

    /// The start coordinate exceeded the end coordinate.
    Inverted {
        /// The offending start.
        start: u64,

        /// The offending end.
        end: u64,
    },

    /// An invalid score.
    InvalidScore(ParseFloatError),

    /// The score was not a finite number.
    NonFiniteScore(f64),

    /// An invalid strand token.
    InvalidStrand(strand::ParseError),

    /// An invalid phase token.
    InvalidPhase(phase::ParseError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields { version, found } => {
                let expected = match version {
                    Version::V2 => "8 or 9",
                    Version::V3 => "9",
                };

                write!(
                    f,
                    "invalid number of columns for version {version}: expected {expected} \
                     columns, found {found} columns"
                )
            }
            ParseError::EmptyField { column } => {
                write!(f, "column {column} must not be empty")
            }
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {err}"),
            ParseError::Inverted { start, end } => {
                write!(f, "start ({start}) is greater than end ({end})")
            }
            ParseError::InvalidScore(err) => write!(f, "invalid score: {err}"),
            ParseError::NonFiniteScore(score) => {
                write!(f, "score must be finite, found `{score}`")
            }
            ParseError::InvalidStrand(err) => write!(f, "{err}"),
            ParseError::InvalidPhase(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The mandatory columns of a body record, validated but with the
/// attribute column still unparsed (its grammar is version-specific and
/// is only worth parsing for records that survive filtering).
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    /// The sequence the feature is on (column one).
    seqid: String,

    /// The source of the feature (column two).
    source: String,

    /// The feature type (column three): an ontology term or accession.
    term: String,

    /// The feature span (columns four and five).
    span: Span,

    /// The score (column six), absent when `.`.
    score: Option<f64>,

    /// The strand (column seven).
    strand: Strand,

    /// The phase (column eight), absent when `.`.
    phase: Option<Phase>,

    /// The raw attribute column (column nine), possibly empty.
    attributes: String,
}

impl Fields {
    /// Parses the columns of a body record for a dialect.
    ///
    /// Empty columns are significant: consecutive tabs yield empty
    /// fields, which are rejected for the mandatory columns rather than
    /// collapsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurefile::core::Strand;
    /// use featurefile::core::Version;
    /// use featurefile::record::Fields;
    ///
    /// let fields = Fields::parse(
    ///     "chr1\thavana\texon\t10\t20\t.\t+\t.\tID=exon1",
    ///     Version::V3,
    /// )?;
    ///
    /// assert_eq!(fields.seqid(), "chr1");
    /// assert_eq!(fields.span().start(), 10);
    /// assert_eq!(fields.span().end(), 20);
    /// assert_eq!(fields.strand(), Strand::Forward);
    /// assert_eq!(fields.score(), None);
    /// assert_eq!(fields.attributes(), "ID=exon1");
    /// # Ok::<(), featurefile::record::fields::ParseError>(())
    /// ```
    pub fn parse(s: &str, version: Version) -> Result<Self, ParseError> {
        let columns = s.split(COLUMN_DELIMITER).collect::<Vec<_>>();

        let attributes = match (version, columns.len()) {
            (Version::V2, NUM_FIELDS_V2) => "",
            (Version::V2, n) if n == NUM_FIELDS_V2 + 1 => columns[NUM_FIELDS_V2],
            (Version::V3, NUM_FIELDS_V3) => columns[NUM_FIELDS_V3 - 1],
            (version, found) => {
                return Err(ParseError::IncorrectNumberOfFields { version, found });
            }
        };

        for (index, column) in columns.iter().take(NUM_FIELDS_V2).enumerate() {
            if column.is_empty() {
                return Err(ParseError::EmptyField { column: index + 1 });
            }
        }

        let start = columns[3].parse::<u64>().map_err(ParseError::InvalidStart)?;
        let end = columns[4].parse::<u64>().map_err(ParseError::InvalidEnd)?;
        let span = Span::try_new(start, end).map_err(|_| ParseError::Inverted { start, end })?;

        let score = parse_score(columns[5])?;

        let strand = columns[6]
            .parse::<Strand>()
            .map_err(ParseError::InvalidStrand)?;

        let phase = match columns[7] {
            ABSENT => None,
            token => Some(token.parse::<Phase>().map_err(ParseError::InvalidPhase)?),
        };

        Ok(Fields {
            seqid: columns[0].to_string(),
            source: columns[1].to_string(),
            term: columns[2].to_string(),
            span,
            score,
            strand,
            phase,
            attributes: attributes.to_string(),
        })
    }

    /// Returns the sequence the feature is on.
    pub fn seqid(&self) -> &str {
        &self.seqid
    }

    /// Returns the source of the feature.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the feature type: an ontology term or accession.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns the feature span.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the score, absent when the column held `.`.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Returns the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the phase, absent when the column held `.`.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Returns the raw attribute column, possibly empty.
    pub fn attributes(&self) -> &str {
        &self.attributes
    }
}

/// Parses the score column.
fn parse_score(column: &str) -> Result<Option<f64>, ParseError> {
    if column == ABSENT {
        return Ok(None);
    }

    let score = column.parse::<f64>().map_err(ParseError::InvalidScore)?;

    if !score.is_finite() {
        return Err(ParseError::NonFiniteScore(score));
    }

    Ok(Some(score))
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_parse_v3() -> Result<(), Box<dyn std::error::Error>> {
        let fields = Fields::parse(
            "chr1\thavana\tmRNA\t100\t200\t0.9\t-\t0\tID=mRNA1;Name=alpha",
            Version::V3,
        )?;

        assert_eq!(fields.seqid(), "chr1");
        assert_eq!(fields.source(), "havana");
        assert_eq!(fields.term(), "mRNA");
        assert_eq!(fields.span(), Span::try_new(100, 200)?);
        assert_eq!(fields.score(), Some(0.9));
        assert_eq!(fields.strand(), Strand::Reverse);
        assert_eq!(fields.phase(), Some(Phase::Zero));
        assert_eq!(fields.attributes(), "ID=mRNA1;Name=alpha");

        Ok(())
    }

    #[test]
    fn test_parse_v2_without_attributes() -> Result<(), Box<dyn std::error::Error>> {
        let fields = Fields::parse("chr1\tacedb\texon\t10\t20\t.\t+\t.", Version::V2)?;

        assert_eq!(fields.attributes(), "");
        assert_eq!(fields.score(), None);

        Ok(())
    }

    #[test]
    fn test_parse_v2_with_attributes() -> Result<(), Box<dyn std::error::Error>> {
        let fields = Fields::parse(
            "chr1\tacedb\texon\t10\t20\t.\t+\t.\tSequence \"mRNA1\"",
            Version::V2,
        )?;

        assert_eq!(fields.attributes(), "Sequence \"mRNA1\"");

        Ok(())
    }

    #[test]
    fn test_incorrect_number_of_fields() {
        let err = Fields::parse("chr1\t.\texon\t10\t20\t.\t+", Version::V3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of columns for version 3: expected 9 columns, found 7 columns"
        );

        let err = Fields::parse("chr1\t.\texon", Version::V2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of columns for version 2: expected 8 or 9 columns, found 3 columns"
        );
    }

    #[test]
    fn test_empty_column_is_significant() {
        let err =
            Fields::parse("chr1\t\texon\t10\t20\t.\t+\t.\tID=x", Version::V3).unwrap_err();
        assert_eq!(err.to_string(), "column 2 must not be empty");
    }

    #[test]
    fn test_invalid_coordinates() {
        let err =
            Fields::parse("chr1\t.\texon\tten\t20\t.\t+\t.\tID=x", Version::V3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid start: invalid digit found in string"
        );

        let err =
            Fields::parse("chr1\t.\texon\t30\t20\t.\t+\t.\tID=x", Version::V3).unwrap_err();
        assert_eq!(err.to_string(), "start (30) is greater than end (20)");
    }

    #[test]
    fn test_invalid_score() {
        let err =
            Fields::parse("chr1\t.\texon\t10\t20\thigh\t+\t.\tID=x", Version::V3).unwrap_err();
        assert_eq!(err.to_string(), "invalid score: invalid float literal");

        let err =
            Fields::parse("chr1\t.\texon\t10\t20\tNaN\t+\t.\tID=x", Version::V3).unwrap_err();
        assert_eq!(err.to_string(), "score must be finite, found `NaN`");
    }

    #[test]
    fn test_invalid_strand_and_phase() {
        let err =
            Fields::parse("chr1\t.\texon\t10\t20\t.\t*\t.\tID=x", Version::V3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid strand: expected `+`, `-`, `.`, or `?`, found `*`"
        );

        let err =
            Fields::parse("chr1\t.\texon\t10\t20\t.\t+\t5\tID=x", Version::V3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid phase: expected `0`, `1`, or `2`, found `5`"
        );
    }
}
