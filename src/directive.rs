//! A `##` header directive.

use std::num::ParseIntError;
use std::str::FromStr;

/// The prefix that introduces a directive line.
pub const DIRECTIVE_PREFIX: &str = "##";

/// A kind of directive recognized by the parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// `##gff-version N`: declares the format version.
    GffVersion,

    /// `##sequence-region <name> <start> <end>`: declares the region a
    /// block of features belongs to.
    SequenceRegion,

    /// `##feature-ontology <uri>`.
    FeatureOntology,

    /// `##attribute-ontology <uri>`.
    AttributeOntology,

    /// `##source-ontology <uri>`.
    SourceOntology,

    /// `##species <name>`.
    Species,

    /// `##genome-build <source> <name>`.
    GenomeBuild,

    /// `##DNA`: opens an embedded DNA block (version 2).
    Dna,

    /// `##end-DNA`: closes an embedded DNA block (version 2).
    DnaEnd,

    /// `##FASTA`: opens an embedded FASTA block (version 3).
    Fasta,

    /// `###`: all forward references so far are resolved.
    ForwardReferencesResolved,
}

impl Kind {
    /// Every kind, ordered longest prefix first so that detection can take
    /// the first match (`##end-DNA` before `##DNA`, `###` before any
    /// shorter interpretation of the same bytes).
    pub const ALL: &'static [Kind] = &[
        Kind::AttributeOntology,
        Kind::FeatureOntology,
        Kind::SequenceRegion,
        Kind::SourceOntology,
        Kind::GenomeBuild,
        Kind::GffVersion,
        Kind::Species,
        Kind::DnaEnd,
        Kind::Fasta,
        Kind::Dna,
        Kind::ForwardReferencesResolved,
    ];

    /// The literal prefix of this directive kind.
    pub const fn prefix(&self) -> &'static str {
        match self {
            Kind::GffVersion => "##gff-version",
            Kind::SequenceRegion => "##sequence-region",
            Kind::FeatureOntology => "##feature-ontology",
            Kind::AttributeOntology => "##attribute-ontology",
            Kind::SourceOntology => "##source-ontology",
            Kind::Species => "##species",
            Kind::GenomeBuild => "##genome-build",
            Kind::Dna => "##DNA",
            Kind::DnaEnd => "##end-DNA",
            Kind::Fasta => "##FASTA",
            Kind::ForwardReferencesResolved => "###",
        }
    }

    /// The declared payload arity as `(integers, strings)`.
    pub const fn arity(&self) -> (usize, usize) {
        match self {
            Kind::GffVersion => (1, 0),
            Kind::SequenceRegion => (2, 1),
            Kind::FeatureOntology => (0, 1),
            Kind::AttributeOntology => (0, 1),
            Kind::SourceOntology => (0, 1),
            Kind::Species => (0, 1),
            Kind::GenomeBuild => (0, 2),
            Kind::Dna => (0, 0),
            Kind::DnaEnd => (0, 0),
            Kind::Fasta => (0, 0),
            Kind::ForwardReferencesResolved => (0, 0),
        }
    }

    /// Identifies the kind a directive line begins with, by longest-prefix
    /// match across the fixed table. Returns [`None`] for unrecognized
    /// directives, which callers tolerate rather than reject.
    pub fn detect(line: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|kind| {
            let prefix = kind.prefix();
            match line.strip_prefix(prefix) {
                Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
                None => false,
            }
        })
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// An error related to the parsing of a directive.
#[derive(Clone, Debug)]
pub enum ParseError {
    /// The line does not begin with a recognized directive prefix.
    Unrecognized(String),

    /// The payload token count does not match the kind's declared arity.
    IncorrectNumberOfFields {
        /// The directive kind.
        kind: Kind,

        /// The expected number of payload tokens.
        expected: usize,

        /// The number of payload tokens found.
        found: usize,
    },

    /// An integer payload failed to parse.
    InvalidInteger {
        /// The directive kind.
        kind: Kind,

        /// The underlying parse error.
        inner: ParseIntError,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unrecognized(line) => {
                write!(f, "unrecognized directive: `{line}`")
            }
            ParseError::IncorrectNumberOfFields {
                kind,
                expected,
                found,
            } => write!(
                f,
                "invalid number of fields in `{kind}` directive: expected {expected} fields, \
                 found {found} fields"
            ),
            ParseError::InvalidInteger { kind, inner } => {
                write!(f, "invalid integer in `{kind}` directive: {inner}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A parsed header directive: its kind plus the integer and string
/// payloads the kind declares.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    /// The directive kind.
    kind: Kind,

    /// Integer payload members, in declaration order.
    integers: Vec<i64>,

    /// String payload members, in declaration order.
    strings: Vec<String>,
}

impl Directive {
    /// Returns the directive kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the integer payload members.
    pub fn integers(&self) -> &[i64] {
        &self.integers
    }

    /// Returns the string payload members.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}

impl FromStr for Directive {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = Kind::detect(s).ok_or_else(|| ParseError::Unrecognized(s.into()))?;
        let rest = s[kind.prefix().len()..].trim();

        let (num_integers, num_strings) = kind.arity();
        let expected = num_integers + num_strings;

        let (integers, strings) = match kind {
            // The version payload is a single integer.
            Kind::GffVersion => {
                let tokens = split_payload(rest, kind, expected)?;
                let version = parse_integer(tokens[0], kind)?;
                (vec![version], Vec::new())
            }

            // Name, then the two region bounds.
            Kind::SequenceRegion => {
                let tokens = split_payload(rest, kind, expected)?;
                let start = parse_integer(tokens[1], kind)?;
                let end = parse_integer(tokens[2], kind)?;
                (vec![start, end], vec![tokens[0].to_string()])
            }

            // Single-string payloads take the whole remainder, which may
            // itself contain spaces (species names, URIs).
            Kind::FeatureOntology
            | Kind::AttributeOntology
            | Kind::SourceOntology
            | Kind::Species => {
                if rest.is_empty() {
                    return Err(ParseError::IncorrectNumberOfFields {
                        kind,
                        expected,
                        found: 0,
                    });
                }

                (Vec::new(), vec![rest.to_string()])
            }

            Kind::GenomeBuild => {
                let tokens = split_payload(rest, kind, expected)?;
                (
                    Vec::new(),
                    tokens.into_iter().map(String::from).collect(),
                )
            }

            Kind::Dna | Kind::DnaEnd | Kind::Fasta | Kind::ForwardReferencesResolved => {
                if !rest.is_empty() {
                    return Err(ParseError::IncorrectNumberOfFields {
                        kind,
                        expected,
                        found: rest.split_whitespace().count(),
                    });
                }

                (Vec::new(), Vec::new())
            }
        };

        Ok(Directive {
            kind,
            integers,
            strings,
        })
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.prefix())?;

        match self.kind {
            Kind::SequenceRegion => write!(
                f,
                " {} {} {}",
                self.strings[0], self.integers[0], self.integers[1]
            ),
            _ => {
                for n in &self.integers {
                    write!(f, " {n}")?;
                }
                for s in &self.strings {
                    write!(f, " {s}")?;
                }
                Ok(())
            }
        }
    }
}

/// Splits a payload into whitespace-separated tokens and validates the
/// token count against the declared arity.
fn split_payload(rest: &str, kind: Kind, expected: usize) -> Result<Vec<&str>, ParseError> {
    let tokens = rest.split_whitespace().collect::<Vec<_>>();

    if tokens.len() != expected {
        return Err(ParseError::IncorrectNumberOfFields {
            kind,
            expected,
            found: tokens.len(),
        });
    }

    Ok(tokens)
}

/// Parses one integer payload member.
fn parse_integer(token: &str, kind: Kind) -> Result<i64, ParseError> {
    token
        .parse()
        .map_err(|inner| ParseError::InvalidInteger { kind, inner })
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(Kind::detect("##gff-version 3"), Some(Kind::GffVersion));
        assert_eq!(
            Kind::detect("##sequence-region chr1 1 100"),
            Some(Kind::SequenceRegion)
        );
        assert_eq!(Kind::detect("###"), Some(Kind::ForwardReferencesResolved));
        assert_eq!(Kind::detect("##DNA"), Some(Kind::Dna));
        assert_eq!(Kind::detect("##end-DNA"), Some(Kind::DnaEnd));
        assert_eq!(Kind::detect("##FASTA"), Some(Kind::Fasta));
        assert_eq!(Kind::detect("##no-such-directive x"), None);

        // Prefixes must end on a token boundary.
        assert_eq!(Kind::detect("##DNAx"), None);
    }

    #[test]
    fn test_parse_gff_version() -> Result<(), Box<dyn std::error::Error>> {
        let directive = "##gff-version 3".parse::<Directive>()?;
        assert_eq!(directive.kind(), Kind::GffVersion);
        assert_eq!(directive.integers(), [3]);
        assert!(directive.strings().is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_sequence_region() -> Result<(), Box<dyn std::error::Error>> {
        let directive = "##sequence-region chr1 1 248956422".parse::<Directive>()?;
        assert_eq!(directive.kind(), Kind::SequenceRegion);
        assert_eq!(directive.strings(), ["chr1".to_string()]);
        assert_eq!(directive.integers(), [1, 248956422]);
        Ok(())
    }

    #[test]
    fn test_parse_species_with_spaces() -> Result<(), Box<dyn std::error::Error>> {
        let directive = "##species Homo sapiens".parse::<Directive>()?;
        assert_eq!(directive.kind(), Kind::Species);
        assert_eq!(directive.strings(), ["Homo sapiens".to_string()]);
        Ok(())
    }

    #[test]
    fn test_parse_arity_mismatch() {
        let err = "##sequence-region chr1 1".parse::<Directive>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in `##sequence-region` directive: expected 3 fields, \
             found 2 fields"
        );
    }

    #[test]
    fn test_parse_bad_integer() {
        let err = "##gff-version three".parse::<Directive>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid integer in `##gff-version` directive: invalid digit found in string"
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        let err = "##made-up stuff".parse::<Directive>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unrecognized directive: `##made-up stuff`"
        );
    }

    #[test]
    fn test_display_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let directive = "##sequence-region chr1 1 100".parse::<Directive>()?;
        assert_eq!(directive.to_string(), "##sequence-region chr1 1 100");

        let directive = "##gff-version 2".parse::<Directive>()?;
        assert_eq!(directive.to_string(), "##gff-version 2");
        Ok(())
    }
}
