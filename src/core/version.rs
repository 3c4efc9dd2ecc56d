//! The version of the feature file format.

use std::str::FromStr;

/// An error related to the parsing of a format version.
#[derive(Clone, Debug)]
pub enum ParseError {
    /// The version was not `2` or `3`.
    Unsupported(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unsupported(token) => {
                write!(f, "unsupported format version: `{token}`")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The version of the feature file format, as declared by the
/// `##gff-version` directive.
///
/// The version selects the body dialect: the number of mandatory columns
/// and the attribute sub-grammar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Version {
    /// Version 2: eight mandatory columns, `tag value` attributes with
    /// quoted values.
    V2,

    /// Version 3: nine mandatory columns, `tag=value` attributes with
    /// percent escaping.
    V3,
}

impl Version {
    /// Attempts to interpret an integer directive payload as a version.
    pub fn from_number(n: i64) -> Result<Self, ParseError> {
        match n {
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            n => Err(ParseError::Unsupported(n.to_string())),
        }
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(Self::V2),
            "3" => Ok(Self::V3),
            token => Err(ParseError::Unsupported(token.into())),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V2 => write!(f, "2"),
            Version::V3 => write!(f, "3"),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_version_from_str() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("2".parse::<Version>()?, Version::V2);
        assert_eq!("3".parse::<Version>()?, Version::V3);

        let err = "4".parse::<Version>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported format version: `4`");

        Ok(())
    }

    #[test]
    fn test_version_from_number() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(Version::from_number(2)?, Version::V2);
        assert_eq!(Version::from_number(3)?, Version::V3);
        assert!(Version::from_number(1).is_err());
        Ok(())
    }
}
