//! The coding phase of a feature.

use std::str::FromStr;

/// An error related to the parsing of a phase.
#[derive(Clone, Debug)]
pub enum ParseError {
    /// The token was not one of `0`, `1`, or `2`.
    Invalid(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Invalid(token) => {
                write!(
                    f,
                    "invalid phase: expected `0`, `1`, or `2`, found `{token}`"
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The phase of a coding feature: the number of bases that must be removed
/// from the start of the feature to reach the first base of a codon.
///
/// The absent value (`.` in the phase column) is represented as
/// [`Option::None`] at the call site, not as a variant here.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// The feature begins at the first base of a codon (`0`).
    Zero,

    /// One base must be skipped (`1`).
    One,

    /// Two bases must be skipped (`2`).
    Two,
}

impl FromStr for Phase {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::Zero),
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            token => Err(ParseError::Invalid(token.into())),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Zero => write!(f, "0"),
            Phase::One => write!(f, "1"),
            Phase::Two => write!(f, "2"),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_phase_from_str() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("0".parse::<Phase>()?, Phase::Zero);
        assert_eq!("1".parse::<Phase>()?, Phase::One);
        assert_eq!("2".parse::<Phase>()?, Phase::Two);

        let err = "3".parse::<Phase>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid phase: expected `0`, `1`, or `2`, found `3`"
        );

        let err = ".".parse::<Phase>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid phase: expected `0`, `1`, or `2`, found `.`"
        );

        Ok(())
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Zero.to_string(), "0");
        assert_eq!(Phase::One.to_string(), "1");
        assert_eq!(Phase::Two.to_string(), "2");
    }
}
