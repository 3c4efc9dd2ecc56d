//! The strand upon which a feature is located.

use std::str::FromStr;

/// An error related to the parsing of a strand.
#[derive(Clone, Debug)]
pub enum ParseError {
    /// The token was not one of `+`, `-`, `.`, or `?`.
    Invalid(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Invalid(token) => {
                write!(
                    f,
                    "invalid strand: expected `+`, `-`, `.`, or `?`, found `{token}`"
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The strand of a feature.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strand {
    /// The forward strand (`+`).
    Forward,

    /// The reverse strand (`-`).
    Reverse,

    /// The feature is not stranded (`.`).
    Unstranded,

    /// The strand is relevant but unknown (`?`).
    Unknown,
}

impl FromStr for Strand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            "." => Ok(Self::Unstranded),
            "?" => Ok(Self::Unknown),
            token => Err(ParseError::Invalid(token.into())),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unstranded => write!(f, "."),
            Strand::Unknown => write!(f, "?"),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_strand_from_str() -> Result<(), Box<dyn std::error::Error>> {
        let strand: Strand = "+".parse()?;
        assert_eq!(strand, Strand::Forward);

        let strand: Strand = "-".parse()?;
        assert_eq!(strand, Strand::Reverse);

        let strand: Strand = ".".parse()?;
        assert_eq!(strand, Strand::Unstranded);

        let strand: Strand = "?".parse()?;
        assert_eq!(strand, Strand::Unknown);

        let err = "*".parse::<Strand>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid strand: expected `+`, `-`, `.`, or `?`, found `*`"
        );

        Ok(())
    }

    #[test]
    fn test_strand_display() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
        assert_eq!(Strand::Unstranded.to_string(), ".");
        assert_eq!(Strand::Unknown.to_string(), "?");
        Ok(())
    }
}
