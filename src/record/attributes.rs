//! The attribute column of a body record.
//!
//! The two dialects differ here more than anywhere else. Version 3 uses
//! `tag=value,value;tag=value` with percent escaping; version 2 uses
//! `tag value ; tag value` with double-quoted free-text values.

use crate::core::Version;
use crate::escape;

/// The version 3 tag carrying a record's grouping id.
pub const TAG_ID: &str = "ID";

/// The tag carrying a record's display name.
pub const TAG_NAME: &str = "Name";

/// The version 3 tag linking a record to the group of its parent.
pub const TAG_PARENT: &str = "Parent";

/// The tag carrying free-text notes.
pub const TAG_NOTE: &str = "Note";

/// The version 3 tag naming the aligned sequence of a match record.
pub const TAG_TARGET: &str = "Target";

/// The version 2 tags that carry a grouping id, in precedence order.
pub const V2_GROUP_TAGS: &[&str] = &["Sequence", "Transcript", "Gene", "Class"];

/// An error related to the parsing of an attribute column.
#[derive(Clone, Debug)]
pub enum ParseError {
    /// A version 3 attribute had no `=` separator.
    MissingSeparator(String),

    /// A version 3 attribute had an empty tag.
    EmptyTag,

    /// An invalid percent escape inside a tag or value.
    Escape(escape::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingSeparator(attribute) => {
                write!(f, "attribute `{attribute}` has no `=` separator")
            }
            ParseError::EmptyTag => write!(f, "attribute has an empty tag"),
            ParseError::Escape(err) => write!(f, "invalid escape in attribute: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The parsed attributes of one record, in column order.
///
/// Tags may repeat (`Parent` in particular); all values are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    /// `(tag, values)` pairs in column order.
    entries: Vec<(String, Vec<String>)>,
}

impl Attributes {
    /// Parses an attribute column for a dialect. An empty column yields
    /// empty attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurefile::core::Version;
    /// use featurefile::record::Attributes;
    ///
    /// let attributes = Attributes::parse("ID=mRNA1;Name=alpha%3Bbeta", Version::V3)?;
    /// assert_eq!(attributes.id(), Some("mRNA1"));
    /// assert_eq!(attributes.name(), Some("alpha;beta"));
    ///
    /// let attributes = Attributes::parse(r#"Sequence "mRNA1" ; Note "x""#, Version::V2)?;
    /// assert_eq!(attributes.group_key(Version::V2), Some("mRNA1"));
    /// # Ok::<(), featurefile::record::attributes::ParseError>(())
    /// ```
    pub fn parse(s: &str, version: Version) -> Result<Self, ParseError> {
        let s = s.trim();

        if s.is_empty() || s == "." {
            return Ok(Attributes::default());
        }

        match version {
            Version::V2 => Self::parse_v2(s),
            Version::V3 => Self::parse_v3(s),
        }
    }

    /// Parses the version 3 grammar: semicolon-separated `tag=v1,v2`
    /// pairs, percent-escaped per token.
    fn parse_v3(s: &str) -> Result<Self, ParseError> {
        let mut entries = Vec::new();

        for pair in s.split(';') {
            let pair = pair.trim();

            if pair.is_empty() {
                continue;
            }

            let (tag, values) = pair
                .split_once('=')
                .ok_or_else(|| ParseError::MissingSeparator(pair.to_string()))?;

            let tag = escape::unescape(tag.trim()).map_err(ParseError::Escape)?;

            if tag.is_empty() {
                return Err(ParseError::EmptyTag);
            }

            let values = values
                .split(',')
                .map(|value| escape::unescape(value.trim()).map_err(ParseError::Escape))
                .collect::<Result<Vec<_>, _>>()?;

            entries.push((tag, values));
        }

        Ok(Attributes { entries })
    }

    /// Parses the version 2 grammar: semicolon-separated `tag value`
    /// pairs, where a value is everything after the first whitespace and
    /// may be a quoted string containing semicolons.
    fn parse_v2(s: &str) -> Result<Self, ParseError> {
        let mut entries = Vec::new();

        for segment in escape::split_unquoted(s, ';', '"') {
            let segment = segment.trim();

            if segment.is_empty() {
                continue;
            }

            match segment.split_once(char::is_whitespace) {
                Some((tag, value)) => {
                    let value = escape::unquote(value);
                    entries.push((tag.to_string(), vec![value]));
                }
                // A bare tag acts as a flag with no value.
                None => entries.push((segment.to_string(), Vec::new())),
            }
        }

        Ok(Attributes { entries })
    }

    /// Returns the values of the first entry with this tag.
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(present, _)| present == tag)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the first value of the first entry with this tag.
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.get(tag)?.first().map(String::as_str)
    }

    /// Returns the `ID` value, if present.
    pub fn id(&self) -> Option<&str> {
        self.first(TAG_ID)
    }

    /// Returns the `Name` value, if present.
    pub fn name(&self) -> Option<&str> {
        self.first(TAG_NAME)
    }

    /// Returns the first `Parent` value, if present.
    pub fn parent(&self) -> Option<&str> {
        self.first(TAG_PARENT)
    }

    /// Returns the `Note` value, if present.
    pub fn note(&self) -> Option<&str> {
        self.first(TAG_NOTE)
    }

    /// Returns the `Target` value, if present.
    pub fn target(&self) -> Option<&str> {
        self.first(TAG_TARGET)
    }

    /// Returns the grouping key that drives multi-line feature assembly:
    /// `ID`, else `Parent`, for version 3; the first of the conventional
    /// grouping tags for version 2.
    pub fn group_key(&self, version: Version) -> Option<&str> {
        match version {
            Version::V2 => V2_GROUP_TAGS.iter().find_map(|tag| self.first(tag)),
            Version::V3 => self.id().or_else(|| self.parent()),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the column held no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(tag, values)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(tag, values)| (tag.as_str(), values.as_slice()))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_parse_v3() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = Attributes::parse("ID=mRNA1;Parent=gene1;Alias=a,b,c", Version::V3)?;

        assert_eq!(attributes.id(), Some("mRNA1"));
        assert_eq!(attributes.parent(), Some("gene1"));
        assert_eq!(
            attributes.get("Alias"),
            Some(["a".to_string(), "b".to_string(), "c".to_string()].as_slice())
        );
        assert_eq!(attributes.len(), 3);

        Ok(())
    }

    #[test]
    fn test_parse_v3_escapes() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = Attributes::parse("Note=a%3Bb%2Cc%3Dd", Version::V3)?;
        assert_eq!(attributes.note(), Some("a;b,c=d"));
        Ok(())
    }

    #[test]
    fn test_parse_v3_invalid() {
        let err = Attributes::parse("justatag", Version::V3).unwrap_err();
        assert_eq!(err.to_string(), "attribute `justatag` has no `=` separator");

        let err = Attributes::parse("Note=50%2", Version::V3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid escape in attribute: truncated percent escape at byte 2"
        );
    }

    #[test]
    fn test_parse_v2() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = Attributes::parse(
            r#"Sequence "mRNA1" ; Note "semi ; colon" ; pseudo"#,
            Version::V2,
        )?;

        assert_eq!(attributes.first("Sequence"), Some("mRNA1"));
        assert_eq!(attributes.note(), Some("semi ; colon"));
        assert_eq!(attributes.get("pseudo"), Some::<&[String]>(&[]));

        Ok(())
    }

    #[test]
    fn test_group_key() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = Attributes::parse("Parent=gene1", Version::V3)?;
        assert_eq!(attributes.group_key(Version::V3), Some("gene1"));

        let attributes = Attributes::parse("ID=x;Parent=y", Version::V3)?;
        assert_eq!(attributes.group_key(Version::V3), Some("x"));

        let attributes = Attributes::parse(r#"Class "alpha""#, Version::V2)?;
        assert_eq!(attributes.group_key(Version::V2), Some("alpha"));

        Ok(())
    }

    #[test]
    fn test_empty_column() -> Result<(), Box<dyn std::error::Error>> {
        assert!(Attributes::parse("", Version::V3)?.is_empty());
        assert!(Attributes::parse(".", Version::V2)?.is_empty());
        Ok(())
    }
}
